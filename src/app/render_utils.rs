use eframe::egui::{Color32, Painter, Pos2, Rect, ecolor::Hsva};
use glam::{Mat4, Vec3};

use crate::config::CameraConfig;
use crate::util::stable_hue;

use super::camera::CameraPose;

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

/// Same label, same colour, across runs.
pub(super) fn label_color(label: &str) -> Color32 {
    Hsva::new(stable_hue(label), 0.45, 0.85, 1.0).into()
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    if max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom() {
        return false;
    }

    if rect.contains(start) || rect.contains(end) {
        return true;
    }

    let top_left = rect.left_top();
    let top_right = rect.right_top();
    let bottom_left = rect.left_bottom();
    let bottom_right = rect.right_bottom();

    segments_intersect(start, end, top_left, top_right)
        || segments_intersect(start, end, top_right, bottom_right)
        || segments_intersect(start, end, bottom_right, bottom_left)
        || segments_intersect(start, end, bottom_left, top_left)
}

fn segments_intersect(a1: Pos2, a2: Pos2, b1: Pos2, b2: Pos2) -> bool {
    fn cross(o: Pos2, a: Pos2, b: Pos2) -> f32 {
        let oa = a - o;
        let ob = b - o;
        (oa.x * ob.y) - (oa.y * ob.x)
    }

    let c1 = cross(a1, a2, b1);
    let c2 = cross(a1, a2, b2);
    let c3 = cross(b1, b2, a1);
    let c4 = cross(b1, b2, a2);

    (c1 <= 0.0 && c2 >= 0.0 || c1 >= 0.0 && c2 <= 0.0)
        && (c3 <= 0.0 && c4 >= 0.0 || c3 >= 0.0 && c4 <= 0.0)
}

#[derive(Clone, Copy, Debug)]
pub(super) struct Projected {
    pub screen: Pos2,
    /// Distance along the view axis; larger is farther away.
    pub depth: f32,
    /// Screen pixels per world unit at this depth.
    pub scale: f32,
}

/// Perspective camera for one frame, mapping world space into `rect`.
pub(super) struct Projection {
    view_projection: Mat4,
    rect: Rect,
    near: f32,
    focal: f32,
}

impl Projection {
    pub(super) fn new(pose: CameraPose, config: &CameraConfig, rect: Rect) -> Self {
        let aspect = (rect.width() / rect.height().max(1.0)).max(0.01);
        let fov = config.fov_degrees.to_radians();
        let view = Mat4::look_at_rh(pose.eye, pose.look_at, Vec3::Y);
        let projection = Mat4::perspective_rh_gl(fov, aspect, config.near, config.far);

        Self {
            view_projection: projection * view,
            rect,
            near: config.near,
            focal: rect.height() * 0.5 / (fov * 0.5).tan(),
        }
    }

    /// `None` for points behind the near plane or a degenerate camera.
    pub(super) fn project(&self, world: Vec3) -> Option<Projected> {
        let clip = self.view_projection * world.extend(1.0);
        if !clip.is_finite() || clip.w <= self.near {
            return None;
        }

        let ndc = clip.truncate() / clip.w;
        let center = self.rect.center();
        let screen = Pos2::new(
            center.x + ndc.x * self.rect.width() * 0.5,
            center.y - ndc.y * self.rect.height() * 0.5,
        );

        Some(Projected {
            screen,
            depth: clip.w,
            scale: self.focal / clip.w,
        })
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;

    fn projection() -> Projection {
        let pose = CameraPose {
            eye: Vec3::new(0.0, 0.0, 10.0),
            look_at: Vec3::ZERO,
        };
        Projection::new(
            pose,
            &CameraConfig::default(),
            Rect::from_min_max(pos2(0.0, 0.0), pos2(800.0, 600.0)),
        )
    }

    #[test]
    fn look_at_point_lands_in_the_middle() {
        let projected = projection().project(Vec3::ZERO).unwrap();
        assert!((projected.screen.x - 400.0).abs() < 1e-3);
        assert!((projected.screen.y - 300.0).abs() < 1e-3);
        assert!((projected.depth - 10.0).abs() < 1e-3);
    }

    #[test]
    fn screen_axes_follow_the_camera() {
        let projection = projection();
        let right = projection.project(Vec3::X).unwrap();
        let up = projection.project(Vec3::Y).unwrap();
        assert!(right.screen.x > 400.0);
        assert!(up.screen.y < 300.0);
    }

    #[test]
    fn nearer_points_draw_larger() {
        let projection = projection();
        let near = projection.project(Vec3::new(0.0, 0.0, 5.0)).unwrap();
        let far = projection.project(Vec3::new(0.0, 0.0, -20.0)).unwrap();
        assert!(near.scale > far.scale);
        assert!(near.depth < far.depth);
    }

    #[test]
    fn points_behind_the_camera_are_dropped() {
        assert!(projection().project(Vec3::new(0.0, 0.0, 20.0)).is_none());
    }

    #[test]
    fn degenerate_pose_projects_nothing() {
        let pose = CameraPose {
            eye: Vec3::ONE,
            look_at: Vec3::ONE,
        };
        let projection = Projection::new(
            pose,
            &CameraConfig::default(),
            Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 100.0)),
        );
        assert!(projection.project(Vec3::ZERO).is_none());
    }

    #[test]
    fn label_colors_are_stable() {
        assert_eq!(label_color("Alpha"), label_color("Alpha"));
        assert_eq!(label_color("Alpha").a(), 255);
    }

    #[test]
    fn edge_crossing_the_view_is_visible() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 100.0));
        assert!(edge_visible(rect, pos2(-50.0, 50.0), pos2(150.0, 50.0), 0.0));
        assert!(!edge_visible(rect, pos2(-50.0, -50.0), pos2(-10.0, -5.0), 0.0));
        assert!(circle_visible(rect, pos2(-3.0, 50.0), 5.0));
    }

    #[test]
    fn blending_and_dimming() {
        let mixed = blend_color(Color32::BLACK, Color32::WHITE, 0.5);
        assert!((mixed.r() as i32 - 127).abs() <= 1);
        assert_eq!(dim_color(Color32::WHITE, 0.0).r(), 0);
    }
}
