use glam::Vec3;

/// Push on the first node of a pair, away from the second.
///
/// `separation` points from the second node to the first and may already carry
/// jitter; `distance` is the unperturbed distance that sets the magnitude.
pub(super) fn repulsion_between(separation: Vec3, distance: f32, strength: f32) -> Vec3 {
    let direction = separation.try_normalize().unwrap_or(Vec3::X);
    direction * (strength / (distance * distance + 1.0))
}

/// Hookean pull on the first endpoint of an edge toward the second.
/// `delta` points from the first endpoint to the second.
pub(super) fn spring_between(delta: Vec3, stiffness: f32) -> Vec3 {
    let distance = delta.length();
    if distance <= f32::EPSILON {
        return Vec3::ZERO;
    }
    (delta / distance) * (distance * stiffness)
}

/// Pull toward the vertical axis through the origin, at the node's own height.
pub(super) fn centering(position: Vec3, pull: f32) -> Vec3 {
    Vec3::new(-position.x, 0.0, -position.z) * pull
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repulsion_falls_off_with_distance() {
        let near = repulsion_between(Vec3::new(1.0, 0.0, 0.0), 1.0, 100.0);
        let far = repulsion_between(Vec3::new(10.0, 0.0, 0.0), 10.0, 100.0);
        assert!((near.x - 50.0).abs() < 1e-4);
        assert!((far.x - 100.0 / 101.0).abs() < 1e-4);
        assert_eq!(near.y, 0.0);
    }

    #[test]
    fn repulsion_with_zero_separation_stays_finite() {
        let force = repulsion_between(Vec3::ZERO, 0.0, 100.0);
        assert!(force.is_finite());
        assert!((force.length() - 100.0).abs() < 1e-4);
    }

    #[test]
    fn spring_is_proportional_to_distance() {
        let force = spring_between(Vec3::new(0.0, 20.0, 0.0), 0.03);
        assert!((force.y - 0.6).abs() < 1e-5);
        assert_eq!(spring_between(Vec3::ZERO, 0.03), Vec3::ZERO);
    }

    #[test]
    fn centering_ignores_height() {
        let force = centering(Vec3::new(4.0, 9.0, -2.0), 0.05);
        assert_eq!(force.y, 0.0);
        assert!((force.x + 0.2).abs() < 1e-6);
        assert!((force.z - 0.1).abs() < 1e-6);
    }
}
