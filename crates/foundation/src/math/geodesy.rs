use core::f64::consts::{PI, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geographic coordinates on the unit sphere, in radians.
///
/// Latitude is expected in [-pi/2, pi/2]. Longitude is periodic and may hold
/// any real value; only sines and cosines of longitude differences are used.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoPoint {
    pub lat_rad: f64,
    pub lon_rad: f64,
}

impl GeoPoint {
    pub fn new(lat_rad: f64, lon_rad: f64) -> Self {
        Self { lat_rad, lon_rad }
    }

    pub fn from_degrees(lat_deg: f64, lon_deg: f64) -> Self {
        Self::new(lat_deg.to_radians(), lon_deg.to_radians())
    }

    pub fn lat_deg(self) -> f64 {
        self.lat_rad.to_degrees()
    }

    pub fn lon_deg(self) -> f64 {
        self.lon_rad.to_degrees()
    }
}

/// Wrap an angle into (-pi, pi].
pub fn wrap_pi(angle_rad: f64) -> f64 {
    let wrapped = (angle_rad + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Absolute angular distance between two longitudes, in [0, pi].
pub fn lon_distance(a_rad: f64, b_rad: f64) -> f64 {
    wrap_pi(a_rad - b_rad).abs()
}

#[cfg(test)]
mod tests {
    use super::{GeoPoint, lon_distance, wrap_pi};
    use core::f64::consts::PI;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn degrees_round_trip() {
        let p = GeoPoint::from_degrees(60.0, 25.0);
        assert_close(p.lat_deg(), 60.0, 1e-12);
        assert_close(p.lon_deg(), 25.0, 1e-12);
    }

    #[test]
    fn wrap_pi_keeps_half_open_range() {
        assert_close(wrap_pi(0.0), 0.0, 1e-15);
        assert_close(wrap_pi(PI), PI, 1e-12);
        assert_close(wrap_pi(-PI), PI, 1e-12);
        assert_close(wrap_pi(3.0 * PI + 0.25), -PI + 0.25, 1e-12);
        assert_close(wrap_pi(-7.0), -7.0 + 2.0 * PI, 1e-12);
    }

    #[test]
    fn lon_distance_takes_short_way_round() {
        assert_close(
            lon_distance(170f64.to_radians(), (-170f64).to_radians()),
            20f64.to_radians(),
            1e-12,
        );
        assert_close(lon_distance(0.0, PI), PI, 1e-12);
        assert_close(lon_distance(0.25, 0.25 + 4.0 * PI), 0.0, 1e-12);
    }
}
