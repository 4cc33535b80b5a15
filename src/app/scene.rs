use glam::Vec3;
use log::{debug, info};

use crate::config::{BusyPolicy, Config};
use crate::graph::{Graph, NodeId};

use super::camera::{CameraPose, CameraRig, overview_pose, target_pose};
use super::highlight::{HighlightState, build_highlight_state};
use super::navigation::{Command, Navigation, Phase};
use super::physics::LayoutEngine;

/// Everything one frame needs: the graph, its layout, where the user is and
/// where the camera looks. Rendering only reads from it.
pub(crate) struct Scene {
    graph: Graph,
    layout: LayoutEngine,
    navigation: Navigation,
    camera: CameraRig,
    layout_enabled: bool,
    input_captured: bool,
}

impl Scene {
    pub(crate) fn new(graph: Graph, config: &Config) -> Self {
        let graph = if graph.is_empty() {
            Graph::fallback(&config.graph.fallback_label)
        } else {
            graph
        };

        let mut layout = LayoutEngine::new(&graph, config.layout, config.graph.seed);
        if let Some(label) = config.graph.anchor.as_deref() {
            let anchor = graph.find_by_label(label);
            if anchor.is_none() {
                info!("anchor label {label:?} not in graph; layout runs unanchored");
            }
            layout.set_anchor(anchor);
        }

        let start = graph.first().unwrap_or(NodeId::from_index(0));
        let start_position = layout.position(start).unwrap_or(Vec3::ZERO);
        let camera = CameraRig::new(config.camera, overview_pose(start_position, &config.camera));

        Self {
            graph,
            layout,
            navigation: Navigation::new(start, config.navigation.busy_policy),
            camera,
            layout_enabled: true,
            input_captured: false,
        }
    }

    pub(crate) fn graph(&self) -> &Graph {
        &self.graph
    }

    pub(crate) fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    pub(crate) fn layout_mut(&mut self) -> &mut LayoutEngine {
        &mut self.layout
    }

    pub(crate) fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub(crate) fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub(crate) fn camera_mut(&mut self) -> &mut CameraRig {
        &mut self.camera
    }

    pub(crate) fn set_policy(&mut self, policy: BusyPolicy) {
        self.navigation.set_policy(policy);
    }

    pub(crate) fn layout_enabled(&self) -> bool {
        self.layout_enabled
    }

    pub(crate) fn set_layout_enabled(&mut self, enabled: bool) {
        self.layout_enabled = enabled;
    }

    pub(crate) fn input_captured(&self) -> bool {
        self.input_captured
    }

    /// Text entry elsewhere has the keyboard: navigation stops listening and
    /// the layout may pause.
    pub(crate) fn set_input_captured(&mut self, captured: bool) {
        if captured != self.input_captured {
            debug!("navigation input captured: {captured}");
        }
        self.input_captured = captured;
    }

    pub(crate) fn layout_running(&self) -> bool {
        self.layout_enabled && !(self.input_captured && self.layout.config().pause_while_typing)
    }

    pub(crate) fn phase(&self) -> Phase {
        if self.camera.is_transitioning() {
            Phase::Transitioning
        } else {
            Phase::Idle
        }
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.layout_running() || self.camera.is_transitioning()
    }

    pub(crate) fn target(&self) -> Option<NodeId> {
        self.navigation.target(&self.graph)
    }

    pub(crate) fn highlight(&self) -> HighlightState {
        build_highlight_state(&self.graph, self.navigation.current(), self.target())
    }

    fn pose_for(&self, current: NodeId) -> Option<CameraPose> {
        let current = self.layout.position(current)?;
        let target = self
            .target()
            .and_then(|target| self.layout.position(target));
        Some(target_pose(current, target, self.camera.config()))
    }

    /// Where the camera should be for the current navigation state, given
    /// the node positions right now.
    pub(crate) fn live_target_pose(&self) -> Option<CameraPose> {
        self.pose_for(self.navigation.current())
    }

    /// Routes one navigation input. Returns whether a transition started.
    pub(crate) fn apply(&mut self, command: Command) -> bool {
        if self.input_captured {
            return false;
        }

        let phase = self.phase();
        let Some(request) = self.navigation.handle(&self.graph, command, phase) else {
            return false;
        };

        let pose = self.pose_for(request.node);
        self.camera.begin(request.kind, pose)
    }

    /// One simulation step: layout first, then the camera against the
    /// positions the layout just produced.
    pub(crate) fn tick(&mut self, dt: f32) {
        if self.layout_running() {
            self.layout.step(&self.graph, dt);
        }

        let target = self.live_target_pose();
        self.camera.update(dt, target);
    }
}
