//! Run command - headless frame loop

use anyhow::{Context, Result};
use cadence_runtime::{BootstrapScan, GameClock, Pass, RuntimeConfig, UpdateManager};

pub struct RunArgs {
    pub scene: String,
    pub frames: u64,
    pub config: Option<String>,
    pub scripts: Option<String>,
    pub fixed_hz: Option<f64>,
    pub frame_time: Option<f64>,
    pub hierarchy: bool,
}

/// Totals over a whole run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub update_calls: usize,
    pub fixed_steps: u64,
    pub fixed_calls: usize,
    pub late_calls: usize,
    pub skipped: usize,
    pub destroyed: usize,
}

pub fn run(args: RunArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    let (mut scene, file) = super::load(&args.scene, args.scripts.as_deref())?;

    let mut manager = UpdateManager::bootstrap(&scene, config.bootstrap_scan);
    let mut clock = GameClock::from_config(&config);

    let summary = run_frames(&mut manager, &mut clock, &mut scene, args.frames, config.frame_time);

    println!("Scene '{}': {} frames", file.scene.name, summary.frames);
    println!(
        "  update: {} calls | fixed: {} steps, {} calls | late: {} calls",
        summary.update_calls, summary.fixed_steps, summary.fixed_calls, summary.late_calls
    );
    println!(
        "  skipped: {} | destroyed objects: {} | still registered: {}",
        summary.skipped,
        summary.destroyed,
        manager.registry().total()
    );

    Ok(())
}

fn resolve_config(args: &RunArgs) -> Result<RuntimeConfig> {
    let mut config = match &args.config {
        Some(path) => RuntimeConfig::load(path).with_context(|| format!("Failed to load config {}", path))?,
        None => RuntimeConfig::default(),
    };
    if let Some(hz) = args.fixed_hz {
        config.fixed_hz = hz;
    }
    if let Some(frame_time) = args.frame_time {
        config.frame_time = frame_time;
    }
    if args.hierarchy {
        config.bootstrap_scan = BootstrapScan::Hierarchy;
    }
    config.validate().context("Invalid runtime config")?;
    Ok(config)
}

/// Drive `frames` frames of simulated time and total up the reports
pub fn run_frames(
    manager: &mut UpdateManager,
    clock: &mut GameClock,
    scene: &mut impl cadence_runtime::SceneSource,
    frames: u64,
    frame_time: f64,
) -> RunSummary {
    let mut summary = RunSummary::default();
    for _ in 0..frames {
        let report = manager.run_frame_with(frame_time, clock, scene);
        summary.frames += 1;
        summary.update_calls += report.update.invoked;
        summary.fixed_steps += u64::from(report.fixed_steps);
        summary.fixed_calls += report.fixed_update.invoked;
        summary.late_calls += report.late_update.invoked;
        summary.skipped +=
            report.update.skipped + report.fixed_update.skipped + report.late_update.skipped;
        summary.destroyed += report.destroyed;
    }
    log::info!(
        "Run finished: {} frames, {} update / {} fixed / {} late still registered",
        summary.frames,
        manager.registry().len(Pass::Update),
        manager.registry().len(Pass::FixedUpdate),
        manager.registry().len(Pass::LateUpdate),
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_scene::{load_scene_string, BehaviourFactory};

    const SCENE: &str = r#"
        [scene]
        name = "cli"

        [[objects]]
        name = "fuse"

        [[objects.components]]
        type = "lifetime"
        frames = 2

        [[objects]]
        name = "clock"

        [[objects.components]]
        type = "fixed_counter"

        [[objects.components]]
        type = "late_probe"
    "#;

    fn args() -> RunArgs {
        RunArgs {
            scene: "scene.toml".into(),
            frames: 1,
            config: None,
            scripts: None,
            fixed_hz: None,
            frame_time: None,
            hierarchy: false,
        }
    }

    #[test]
    fn run_frames_totals_reports() {
        let factory = BehaviourFactory::with_builtins();
        let (mut scene, _) = load_scene_string(SCENE, &factory).unwrap();
        let mut manager = UpdateManager::bootstrap(&scene, BootstrapScan::Roots);
        let mut clock = GameClock::with_fixed_timestep(10.0);

        let summary = run_frames(&mut manager, &mut clock, &mut scene, 4, 0.1);

        assert_eq!(summary.frames, 4);
        assert_eq!(summary.update_calls, 2);
        assert_eq!(summary.destroyed, 1);
        assert_eq!(summary.late_calls, 4);
        assert_eq!(summary.fixed_calls as u64, summary.fixed_steps);
        assert!(summary.fixed_steps >= 3);
    }

    #[test]
    fn flags_override_defaults() {
        let config = resolve_config(&RunArgs {
            fixed_hz: Some(30.0),
            frame_time: Some(0.05),
            hierarchy: true,
            ..args()
        })
        .unwrap();
        assert_eq!(config.fixed_hz, 30.0);
        assert_eq!(config.frame_time, 0.05);
        assert_eq!(config.bootstrap_scan, BootstrapScan::Hierarchy);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let result = resolve_config(&RunArgs {
            fixed_hz: Some(-5.0),
            ..args()
        });
        assert!(result.is_err());
    }

    #[test]
    fn demo_scene_runs() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/arena.toml");
        let (mut scene, file) = crate::commands::load(path, None).unwrap();
        assert_eq!(file.scene.name, "arena");

        // debris sits under physics, so the roots-only scan leaves it out
        let mut manager = UpdateManager::bootstrap(&scene, BootstrapScan::Roots);
        assert_eq!(manager.registry().len(Pass::Update), 2);
        assert_eq!(manager.registry().len(Pass::FixedUpdate), 1);
        assert_eq!(manager.registry().len(Pass::LateUpdate), 1);

        let mut clock = GameClock::with_fixed_timestep(50.0);
        let summary = run_frames(&mut manager, &mut clock, &mut scene, 360, 1.0 / 60.0);

        assert_eq!(summary.update_calls, 720);
        assert_eq!(summary.late_calls, 360);
        assert_eq!(summary.destroyed, 0);
        // the wave script unregisters itself on its third wave
        assert_eq!(manager.registry().len(Pass::Update), 1);
    }
}
