use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use anyhow::{anyhow, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub use render::{get_angular_code, get_custom_code, get_node_code};
pub use settings::{EmitSettings, DEFAULT_NAME};

use crate::error::ConfigError;

mod render;
mod settings;
pub mod view;

/// Selects the emission entry point that produces source code.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Node,
    Angular,
    #[default]
    Custom,
}

impl Mode {
    pub const ALL: &'static [Mode] = &[Mode::Node, Mode::Angular, Mode::Custom];

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Node => "node",
            Mode::Angular => "angular",
            Mode::Custom => "custom",
        }
    }

    /// e.g. `getNodeCode` for [Mode::Node].
    pub fn entry_point_name(&self) -> String {
        format!("get{}Code", capitalize(self.name()))
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts the same lowercase names as the serde representation.
impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .iter()
            .find(|mode| mode.name() == s)
            .copied()
            .ok_or_else(|| ConfigError::UnknownMode(s.to_string()))
    }
}

/// Produces source text from [EmitSettings].
pub type EntryPoint = fn(&EmitSettings) -> Result<String>;

/// Named emission entry points. [Emitter::default] holds one entry point per [Mode].
#[derive(Clone)]
pub struct Emitter {
    entry_points: HashMap<String, EntryPoint>,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::empty()
            .register(Mode::Node.entry_point_name(), get_node_code)
            .register(Mode::Angular.entry_point_name(), get_angular_code)
            .register(Mode::Custom.entry_point_name(), get_custom_code)
    }
}

impl Debug for Emitter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("entry_points", &self.entry_points.keys().sorted().collect_vec())
            .finish()
    }
}

impl Emitter {
    pub fn empty() -> Self {
        Self {
            entry_points: HashMap::new(),
        }
    }

    pub fn register(mut self, name: impl ToString, entry_point: EntryPoint) -> Self {
        self.entry_points.insert(name.to_string(), entry_point);
        self
    }

    /// The entry point named after `mode`.
    pub fn entry_point(&self, mode: Mode) -> Result<EntryPoint> {
        let name = mode.entry_point_name();
        self.entry_points
            .get(&name)
            .copied()
            .ok_or_else(|| anyhow!("no entry point '{}' for generation mode '{}'", name, mode))
    }
}

pub(crate) fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
