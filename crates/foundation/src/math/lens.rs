//! Screen lens between the viewer's canvas and the orthographic disc.
//!
//! The visible hemisphere is displayed with an azimuthal equal-area style
//! warp whose rim is the horizon. Canvas points pass through
//! [`lens_to_disc`] before unprojection; projected points pass through
//! [`disc_to_lens`] before display.

use super::{Vec2, Vec3};

/// Map a lens (canvas) point to the orthographic disc.
///
/// Points beyond the rim are pulled onto it.
pub fn lens_to_disc(screen: Vec2) -> Vec2 {
    let len2 = screen.length_squared().min(1.0);
    let unit = if screen.length_squared() > 1.0 {
        screen.scale(1.0 / screen.length())
    } else {
        screen
    };
    unit.scale((2.0 - len2).sqrt())
}

/// Map a projected point to the lens. The antipode of the center has no image
/// and collapses to the origin.
pub fn disc_to_lens(projected: Vec3) -> Vec2 {
    let w = 1.0 + projected.z;
    if w <= 0.0 {
        return Vec2::new(0.0, 0.0);
    }
    projected.xy().scale((1.0 / w).sqrt())
}

#[cfg(test)]
mod tests {
    use super::{disc_to_lens, lens_to_disc};
    use crate::math::{GeoPoint, Orientation, Vec2, Vec3};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn center_and_rim_are_fixed() {
        assert_eq!(lens_to_disc(Vec2::new(0.0, 0.0)), Vec2::new(0.0, 0.0));

        let rim = lens_to_disc(Vec2::new(0.6, 0.8));
        assert_close(rim.x, 0.6, 1e-12);
        assert_close(rim.y, 0.8, 1e-12);
    }

    #[test]
    fn outside_rim_clamps_to_horizon() {
        let p = lens_to_disc(Vec2::new(3.0, 4.0));
        assert_close(p.x, 0.6, 1e-12);
        assert_close(p.y, 0.8, 1e-12);
    }

    #[test]
    fn lens_inverts_for_front_hemisphere() {
        let o = Orientation::new(0.5, -1.0);
        let point = GeoPoint::new(0.2, -0.6);
        let projected = o.project(point);
        assert!(projected.z > 0.0);

        let screen = disc_to_lens(projected);
        let disc = lens_to_disc(screen);
        assert_close(disc.x, projected.x, 1e-12);
        assert_close(disc.y, projected.y, 1e-12);
    }

    #[test]
    fn antipode_collapses() {
        assert_eq!(disc_to_lens(Vec3::new(0.0, 0.0, -1.0)), Vec2::new(0.0, 0.0));
    }
}
