//! Drag gestures that keep the grabbed point under the pointer.

use core::f64::consts::FRAC_PI_2;

use super::{CenterSolve, GeoPoint, Orientation, Vec2, lon_distance, solve_center};

/// State of one drag gesture, from pointer-down to pointer-up.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DragSession {
    grabbed: GeoPoint,
    far_side: bool,
}

impl DragSession {
    /// Grab the point under `screen` using the current orientation.
    pub fn begin(orientation: &Orientation, screen: Vec2) -> Self {
        let grabbed = orientation.unproject(screen);

        // Beyond the north-south axis the point stays there while dragged,
        // until it can be flipped to the front without a jump.
        let far_side = lon_distance(grabbed.lon_rad, orientation.center_lon()) > FRAC_PI_2;

        Self { grabbed, far_side }
    }

    pub fn grabbed(&self) -> GeoPoint {
        self.grabbed
    }

    pub fn is_far_side(&self) -> bool {
        self.far_side
    }

    /// Move the grabbed point under `screen`, updating `orientation` in place.
    pub fn drag_to(&mut self, orientation: &mut Orientation, screen: Vec2) -> CenterSolve {
        let solve = solve_center(screen, self.grabbed, self.far_side);
        orientation.reset(solve.center.lat_rad, solve.center.lon_rad);
        if solve.flippable {
            self.far_side = false;
        }
        solve
    }
}

#[cfg(test)]
mod tests {
    use super::DragSession;
    use crate::math::{GeoPoint, Orientation, Vec2};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn grab_at_center_is_near_side() {
        let o = Orientation::new(60f64.to_radians(), 25f64.to_radians());
        let session = DragSession::begin(&o, Vec2::new(0.0, 0.0));
        assert!(!session.is_far_side());
        assert_close(session.grabbed().lat_rad, o.center_lat(), 1e-12);
        assert_close(session.grabbed().lon_rad, o.center_lon(), 1e-12);
    }

    #[test]
    fn grab_over_the_pole_is_far_side() {
        // Looking down at 60N, a point near the top of the disc lies past the
        // north pole, on the opposite meridian.
        let o = Orientation::new(60f64.to_radians(), 0.0);
        let session = DragSession::begin(&o, Vec2::new(0.0, 0.8));
        assert!(session.grabbed().lat_rad > 60f64.to_radians());
        assert!(session.is_far_side());
    }

    #[test]
    fn drag_keeps_grabbed_point_under_pointer() {
        let mut o = Orientation::new(60f64.to_radians(), 25f64.to_radians());
        let mut session = DragSession::begin(&o, Vec2::new(0.2, -0.1));
        let grabbed = session.grabbed();

        for target in [
            Vec2::new(0.25, -0.05),
            Vec2::new(0.3, 0.0),
            Vec2::new(0.1, 0.2),
            Vec2::new(-0.2, 0.1),
        ] {
            let solve = session.drag_to(&mut o, target);
            assert!(!solve.flippable);
            assert_eq!(o.center(), solve.center);

            let p = o.project(grabbed);
            assert_close(p.x, target.x, 1e-9);
            assert_close(p.y, target.y, 1e-9);
        }
    }

    #[test]
    fn flippable_move_releases_far_side() {
        let mut o = Orientation::new(60f64.to_radians(), 0.0);
        let mut session = DragSession::begin(&o, Vec2::new(0.0, 0.8));
        let grabbed: GeoPoint = session.grabbed();
        assert!(session.is_far_side());

        // Far past the parallel's rim: the axis clamp engages.
        let solve = session.drag_to(&mut o, Vec2::new(0.9, 0.0));
        assert!(solve.flippable);
        assert!(!session.is_far_side());
        assert_eq!(session.grabbed(), grabbed);
    }
}
