use glam::Vec3;

use crate::config::CameraConfig;

use super::navigation::TransitionKind;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct CameraPose {
    pub eye: Vec3,
    pub look_at: Vec3,
}

impl CameraPose {
    fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            eye: self.eye.lerp(other.eye, t),
            look_at: self.look_at.lerp(other.look_at, t),
        }
    }
}

/// Symmetric quadratic ease-in-ease-out on `[0, 1]`.
pub(crate) fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - 2.0 * (1.0 - t) * (1.0 - t)
    }
}

/// Above and behind the node, looking straight at it.
pub(crate) fn overview_pose(current: Vec3, config: &CameraConfig) -> CameraPose {
    CameraPose {
        eye: current + Vec3::new(0.0, config.height, -config.height),
        look_at: current,
    }
}

/// Behind `current` on the side facing away from `target`, raised by `height`,
/// looking at a point between the two that leans toward `current`.
pub(crate) fn orbit_pose(current: Vec3, target: Vec3, config: &CameraConfig) -> CameraPose {
    let offset = target - current;
    let Some(direction) = offset.try_normalize() else {
        return overview_pose(current, config);
    };

    let radius = config
        .orbit_radius
        .max(offset.length() * config.orbit_distance_factor);
    let midpoint = (current + target) * 0.5;

    CameraPose {
        eye: current - direction * radius + Vec3::Y * config.height,
        look_at: midpoint.lerp(current, config.look_at_bias),
    }
}

pub(crate) fn target_pose(
    current: Vec3,
    target: Option<Vec3>,
    config: &CameraConfig,
) -> CameraPose {
    match target {
        Some(target) => orbit_pose(current, target, config),
        None => overview_pose(current, config),
    }
}

struct Transition {
    start: CameraPose,
    target: CameraPose,
    elapsed: f32,
    duration: f32,
}

impl Transition {
    fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).min(1.0)
    }
}

/// Owns the camera pose and at most one running transition.
pub(crate) struct CameraRig {
    config: CameraConfig,
    pose: CameraPose,
    transition: Option<Transition>,
}

impl CameraRig {
    pub(crate) fn new(config: CameraConfig, pose: CameraPose) -> Self {
        Self {
            config,
            pose,
            transition: None,
        }
    }

    pub(crate) fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub(crate) fn config_mut(&mut self) -> &mut CameraConfig {
        &mut self.config
    }

    pub(crate) fn pose(&self) -> CameraPose {
        self.pose
    }

    pub(crate) fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Fraction of the running transition that has elapsed, if any.
    pub(crate) fn progress(&self) -> Option<f32> {
        self.transition.as_ref().map(Transition::progress)
    }

    fn duration(&self, kind: TransitionKind) -> f32 {
        match kind {
            TransitionKind::Move => self.config.move_duration,
            TransitionKind::Rotate => self.config.rotate_duration,
        }
    }

    /// Starts a transition from the current pose, replacing any running one.
    /// A request without a target pose is ignored. Returns whether a
    /// transition started.
    pub(crate) fn begin(&mut self, kind: TransitionKind, target: Option<CameraPose>) -> bool {
        let Some(target) = target else {
            return false;
        };

        self.transition = Some(Transition {
            start: self.pose,
            target,
            elapsed: 0.0,
            duration: self.duration(kind),
        });
        true
    }

    /// Advances by `dt` seconds toward `live_target`, the target pose computed
    /// from this tick's node positions. While idle the camera sits on it.
    pub(crate) fn update(&mut self, dt: f32, live_target: Option<CameraPose>) {
        let mut finished = false;

        if let Some(transition) = self.transition.as_mut() {
            if let Some(target) = live_target {
                transition.target = target;
            }
            transition.elapsed += dt.max(0.0);

            let progress = transition.progress();
            if progress >= 1.0 {
                self.pose = transition.target;
                finished = true;
            } else {
                self.pose = transition
                    .start
                    .lerp(transition.target, ease_in_out(progress));
            }
        } else if let Some(target) = live_target {
            self.pose = target;
        }

        if finished {
            self.transition = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CameraConfig {
        CameraConfig::default()
    }

    fn pose(x: f32) -> CameraPose {
        CameraPose {
            eye: Vec3::new(x, 0.0, 0.0),
            look_at: Vec3::new(x, 1.0, 0.0),
        }
    }

    #[test]
    fn easing_hits_its_endpoints_and_never_decreases() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);

        let mut previous = 0.0;
        for step in 0..=1000 {
            let value = ease_in_out(step as f32 / 1000.0);
            assert!(value >= previous);
            assert!((0.0..=1.0).contains(&value));
            previous = value;
        }
    }

    #[test]
    fn easing_clamps_out_of_range_input() {
        assert_eq!(ease_in_out(-2.0), 0.0);
        assert_eq!(ease_in_out(3.0), 1.0);
    }

    #[test]
    fn overview_sits_above_and_behind() {
        let pose = overview_pose(Vec3::new(1.0, 2.0, 3.0), &config());
        assert_eq!(pose.eye, Vec3::new(1.0, 12.0, -7.0));
        assert_eq!(pose.look_at, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn orbit_backs_away_from_a_near_target_by_the_minimum_radius() {
        let pose = orbit_pose(Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0), &config());
        assert!((pose.eye - Vec3::new(-10.0, 10.0, 0.0)).length() < 1e-5);
        // midpoint (2, 0, 0) pulled 30% of the way back toward the current node
        assert!((pose.look_at - Vec3::new(1.4, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn orbit_radius_grows_with_node_distance() {
        let pose = orbit_pose(Vec3::ZERO, Vec3::new(0.0, 0.0, 40.0), &config());
        assert!((pose.eye - Vec3::new(0.0, 10.0, -30.0)).length() < 1e-4);
    }

    #[test]
    fn coincident_target_uses_the_overview() {
        let here = Vec3::new(2.0, 2.0, 2.0);
        assert_eq!(orbit_pose(here, here, &config()), overview_pose(here, &config()));
        assert_eq!(target_pose(here, None, &config()), overview_pose(here, &config()));
    }

    #[test]
    fn request_without_target_is_ignored() {
        let mut rig = CameraRig::new(config(), pose(0.0));
        assert!(!rig.begin(TransitionKind::Move, None));
        assert!(!rig.is_transitioning());
        assert_eq!(rig.pose(), pose(0.0));
    }

    #[test]
    fn move_transition_ends_exactly_on_target() {
        let mut rig = CameraRig::new(config(), pose(0.0));
        assert!(rig.begin(TransitionKind::Move, Some(pose(10.0))));

        let mut ticks = 0;
        while rig.is_transitioning() {
            rig.update(0.016, Some(pose(10.0)));
            ticks += 1;
            assert!(ticks < 1000);
        }

        assert_eq!(rig.pose(), pose(10.0));
        assert_eq!(ticks, 63);
    }

    #[test]
    fn rotation_is_quicker_than_a_move() {
        let mut rig = CameraRig::new(config(), pose(0.0));
        rig.begin(TransitionKind::Rotate, Some(pose(10.0)));
        rig.update(0.5, Some(pose(10.0)));
        assert!(!rig.is_transitioning());

        let mut rig = CameraRig::new(config(), pose(0.0));
        rig.begin(TransitionKind::Move, Some(pose(10.0)));
        rig.update(0.5, Some(pose(10.0)));
        assert!(rig.is_transitioning());
        assert_eq!(rig.progress(), Some(0.5));
        assert!((rig.pose().eye.x - 5.0).abs() < 1e-4);
    }

    #[test]
    fn new_request_restarts_from_the_mid_flight_pose() {
        let mut rig = CameraRig::new(config(), pose(0.0));
        rig.begin(TransitionKind::Move, Some(pose(10.0)));
        rig.update(0.25, Some(pose(10.0)));
        let mid_flight = rig.pose();
        assert!(mid_flight.eye.x > 0.0 && mid_flight.eye.x < 10.0);

        rig.begin(TransitionKind::Move, Some(pose(-10.0)));
        assert_eq!(rig.progress(), Some(0.0));
        rig.update(0.0, Some(pose(-10.0)));
        assert_eq!(rig.pose(), mid_flight);
    }

    #[test]
    fn idle_camera_follows_the_live_target() {
        let mut rig = CameraRig::new(config(), pose(0.0));
        rig.update(0.016, Some(pose(3.0)));
        assert_eq!(rig.pose(), pose(3.0));
        rig.update(0.016, None);
        assert_eq!(rig.pose(), pose(3.0));
    }

    #[test]
    fn zero_duration_completes_on_the_next_tick() {
        let mut config = config();
        config.rotate_duration = 0.0;
        let mut rig = CameraRig::new(config, pose(0.0));
        rig.begin(TransitionKind::Rotate, Some(pose(1.0)));
        rig.update(0.0, None);
        assert!(!rig.is_transitioning());
        assert_eq!(rig.pose(), pose(1.0));
    }
}
