//! Scene file format definitions
//!
//! ```toml
//! [scene]
//! name = "demo"
//!
//! [[objects]]
//! name = "player"
//!
//! [[objects.components]]
//! type = "lifetime"
//! frames = 120
//! ```

use serde::{Deserialize, Serialize};

/// Root structure of a scene TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFile {
    pub scene: SceneMetadata,
    /// Objects in spawn order
    #[serde(default)]
    pub objects: Vec<ObjectDef>,
}

/// Scene metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneMetadata {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_version() -> String {
    "1.0".to_string()
}

/// Definition of an object in a scene file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectDef {
    pub name: String,
    /// Optional parent object name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Behaviours attached to the object, in attachment order
    #[serde(default)]
    pub components: Vec<ComponentDef>,
}

impl ObjectDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            components: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_component(mut self, component: ComponentDef) -> Self {
        self.components.push(component);
        self
    }
}

/// A behaviour to attach: its factory type name plus free-form parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentDef {
    #[serde(rename = "type")]
    pub kind: String,
    /// All other fields are passed to the factory
    #[serde(flatten)]
    pub params: toml::Table,
}

impl ComponentDef {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: toml::Table::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.params.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(|v| v.as_str())
    }

    pub fn get_integer(&self, key: &str) -> Option<i64> {
        self.params.get(key).and_then(|v| v.as_integer())
    }
}

impl SceneFile {
    /// Create a new scene file
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            scene: SceneMetadata {
                name: name.into(),
                version: default_version(),
                description: None,
            },
            objects: Vec::new(),
        }
    }

    pub fn with_object(mut self, object: ObjectDef) -> Self {
        self.objects.push(object);
        self
    }

    /// Serialize to a TOML string
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
