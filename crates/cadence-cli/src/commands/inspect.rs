//! Inspect command - classification report for a scene

use anyhow::Result;
use cadence_runtime::{Behaviour, Hooks, Pass, SceneSource};
use cadence_scene::SceneGraph;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct BehaviourReport {
    pub name: String,
    pub hooks: Vec<Pass>,
    /// Pass the behaviour is registered in, if any
    pub pass: Option<Pass>,
    /// Declared hooks that are never dispatched
    pub dropped: Vec<Pass>,
}

#[derive(Debug, Serialize)]
pub struct ObjectReport {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Whether the default (roots-only) bootstrap scan reaches this object
    pub scanned_at_bootstrap: bool,
    pub behaviours: Vec<BehaviourReport>,
}

pub fn run(scene_path: &str, scripts: Option<&str>, format: &str) -> Result<()> {
    let (scene, _) = super::load(scene_path, scripts)?;
    let report = build_report(&scene);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "text" => print_text(&report),
        _ => anyhow::bail!("Unknown format: {}", format),
    }
    Ok(())
}

pub fn build_report(scene: &SceneGraph) -> Vec<ObjectReport> {
    let roots = scene.root_objects();
    scene
        .objects()
        .map(|id| ObjectReport {
            name: scene.get_name(id).unwrap_or_default().to_string(),
            parent: scene
                .parent(id)
                .and_then(|p| scene.get_name(p))
                .map(String::from),
            scanned_at_bootstrap: roots.contains(&id),
            behaviours: scene
                .behaviours_of(id)
                .iter()
                .map(|handle| BehaviourReport {
                    name: handle
                        .with(|b| b.name().to_string())
                        .unwrap_or_else(|| "<busy>".to_string()),
                    hooks: declared(handle.hooks()),
                    pass: Pass::classify(handle.hooks()),
                    dropped: Pass::dropped_by_classification(handle.hooks()),
                })
                .collect(),
        })
        .collect()
}

fn declared(hooks: Hooks) -> Vec<Pass> {
    Pass::ALL
        .into_iter()
        .filter(|pass| pass.is_declared_in(hooks))
        .collect()
}

fn print_text(report: &[ObjectReport]) {
    for object in report {
        match &object.parent {
            Some(parent) => println!("{} (child of {})", object.name, parent),
            None => println!("{}", object.name),
        }
        if !object.scanned_at_bootstrap && !object.behaviours.is_empty() {
            println!("  (not a root: must register itself unless scanning the hierarchy)");
        }
        for behaviour in &object.behaviours {
            let pass = behaviour
                .pass
                .map(|p| p.to_string())
                .unwrap_or_else(|| "not registered".to_string());
            print!("  {} -> {}", behaviour.name, pass);
            if !behaviour.dropped.is_empty() {
                let dropped: Vec<_> = behaviour.dropped.iter().map(|p| p.as_str()).collect();
                print!(" (ignored: {})", dropped.join(", "));
            }
            println!();
        }
    }
}
