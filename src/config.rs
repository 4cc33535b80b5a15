use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Everything tunable about the viewer. Every field has a default, so a config
/// file only needs the values it changes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub graph: GraphConfig,
    pub layout: LayoutConfig,
    pub camera: CameraConfig,
    pub navigation: NavigationConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub node_count: usize,
    pub connection_probability: f64,
    pub seed: u64,
    pub fallback_label: String,
    /// Label of the node whose height is pinned by the layout.
    pub anchor: Option<String>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            node_count: 13,
            connection_probability: 0.3,
            seed: 0x6e6f_6465,
            fallback_label: "Home".to_owned(),
            anchor: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub repulsion: f32,
    pub spring: f32,
    pub damping: f32,
    pub min_distance: f32,
    pub center_pull: f32,
    pub jitter: f32,
    pub spread_radius: f32,
    pub anchor_height: f32,
    pub pause_while_typing: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            repulsion: 100.0,
            spring: 0.03,
            damping: 0.95,
            min_distance: 3.0,
            center_pull: 0.05,
            jitter: 0.1,
            spread_radius: 10.0,
            anchor_height: 0.0,
            pause_while_typing: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub height: f32,
    pub orbit_radius: f32,
    pub orbit_distance_factor: f32,
    pub look_at_bias: f32,
    /// Seconds.
    pub move_duration: f32,
    /// Seconds.
    pub rotate_duration: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            height: 10.0,
            orbit_radius: 10.0,
            orbit_distance_factor: 0.75,
            look_at_bias: 0.3,
            move_duration: 1.0,
            rotate_duration: 0.5,
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// What happens to a commit that arrives while the camera is still moving.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusyPolicy {
    /// Forward/backward commits are dropped until the transition finishes.
    #[default]
    IgnoreCommits,
    /// Every command is accepted and restarts the transition from the
    /// current camera pose.
    Supersede,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub busy_policy: BusyPolicy,
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"layout": {{"damping": 0.9}}, "navigation": {{"busy_policy": "supersede"}}}}"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.layout.damping, 0.9);
        assert_eq!(config.layout.repulsion, LayoutConfig::default().repulsion);
        assert_eq!(config.navigation.busy_policy, BusyPolicy::Supersede);
        assert_eq!(config.camera, CameraConfig::default());
        assert_eq!(config.graph, GraphConfig::default());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let error = Config::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(format!("{error:#}").contains("failed to read config file"));
    }

    #[test]
    fn defaults_match_documented_constants() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.repulsion, 100.0);
        assert_eq!(layout.spring, 0.03);
        assert_eq!(layout.damping, 0.95);
        assert_eq!(layout.min_distance, 3.0);
        assert_eq!(layout.center_pull, 0.05);
        assert!(CameraConfig::default().move_duration > CameraConfig::default().rotate_duration);
    }
}
