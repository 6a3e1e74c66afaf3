//! Orthographic projection of the unit sphere.
//!
//! The projection is parameterized by an [`Orientation`], the geographic point
//! facing the viewer. This module provides:
//! - The forward projection ([`Orientation::project`]).
//! - Its exact inverse for the visible hemisphere ([`Orientation::unproject`]).
//! - [`solve_center`], which finds the orientation that places a given
//!   geographic point under a given screen point. Dragging is built on it.

use core::f64::consts::{FRAC_PI_2, PI};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{GeoPoint, Vec2, Vec3};

/// Inward nudge applied when unprojecting points outside the disc.
pub const UNPROJECT_RIM_EPSILON: f64 = 1.0 / 1024.0;

/// Inward nudge applied when solving for a center from points outside the disc.
pub const SOLVE_RIM_EPSILON: f64 = 1.0 / 65536.0;

/// Projection center with cached trigonometry.
///
/// `reset` recomputes the sine and cosine of the center latitude eagerly; the
/// renderer reads them every frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Orientation {
    lat0: f64,
    lon0: f64,
    sin_lat0: f64,
    cos_lat0: f64,
}

impl Orientation {
    pub fn new(lat0_rad: f64, lon0_rad: f64) -> Self {
        let mut orientation = Self {
            lat0: 0.0,
            lon0: 0.0,
            sin_lat0: 0.0,
            cos_lat0: 1.0,
        };
        orientation.reset(lat0_rad, lon0_rad);
        orientation
    }

    pub fn from_center(center: GeoPoint) -> Self {
        Self::new(center.lat_rad, center.lon_rad)
    }

    /// Replace the projection center. Latitude is clamped to the poles.
    pub fn reset(&mut self, lat0_rad: f64, lon0_rad: f64) {
        let lat0 = lat0_rad.clamp(-FRAC_PI_2, FRAC_PI_2);
        self.lat0 = lat0;
        self.lon0 = lon0_rad;
        self.sin_lat0 = lat0.sin();
        self.cos_lat0 = lat0.cos();
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.lat0, self.lon0)
    }

    pub fn center_lat(&self) -> f64 {
        self.lat0
    }

    pub fn center_lon(&self) -> f64 {
        self.lon0
    }

    pub fn sin_center_lat(&self) -> f64 {
        self.sin_lat0
    }

    pub fn cos_center_lat(&self) -> f64 {
        self.cos_lat0
    }

    /// Project a geographic point.
    ///
    /// `z > 0` on the hemisphere facing the viewer, `z < 0` behind it.
    pub fn project(&self, point: GeoPoint) -> Vec3 {
        let (sin_lat, cos_lat) = point.lat_rad.sin_cos();
        let (sin_dlon, cos_dlon) = (point.lon_rad - self.lon0).sin_cos();

        let x = cos_lat * sin_dlon;
        let y = self.cos_lat0 * sin_lat - self.sin_lat0 * cos_lat * cos_dlon;
        let z = self.sin_lat0 * sin_lat + self.cos_lat0 * cos_lat * cos_dlon;

        Vec3::new(x, y, z)
    }

    /// Inverse projection onto the visible hemisphere.
    ///
    /// Points outside the unit disc are pulled just inside its rim and
    /// treated as lying on the horizon.
    pub fn unproject(&self, screen: Vec2) -> GeoPoint {
        let Vec2 { mut x, mut y } = screen;
        let len2 = x * x + y * y;

        let z = if len2 > 1.0 {
            let len = len2.sqrt() + UNPROJECT_RIM_EPSILON;
            x /= len;
            y /= len;
            0.0
        } else {
            (1.0 - len2).sqrt()
        };

        let lat = (z * self.sin_lat0 + y * self.cos_lat0).clamp(-1.0, 1.0).asin();
        let lon = x.atan2(z * self.cos_lat0 - y * self.sin_lat0) + self.lon0;

        GeoPoint::new(lat, lon)
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Result of [`solve_center`].
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CenterSolve {
    /// New projection center.
    pub center: GeoPoint,
    /// The point sits where it can be reassigned from beyond the north-south
    /// axis to its near side without a visible jump.
    pub flippable: bool,
}

/// Find the projection center that maps `point` to `screen`.
///
/// `far_side` selects the longitude solution that keeps `point` beyond the
/// north-south axis, more than a quarter turn from the center longitude.
///
/// Screen points that cannot be reached are clamped, in order, to the disc
/// rim, to the extent of the point's parallel, and finally by rotating about
/// the pole when the latitude solve runs past it.
pub fn solve_center(screen: Vec2, point: GeoPoint, far_side: bool) -> CenterSolve {
    let Vec2 { mut x, mut y } = screen;
    let GeoPoint { lat_rad: lat, lon_rad: lon } = point;
    let mut flippable = false;

    let (slat, clat) = lat.sin_cos();

    let len2 = x * x + y * y;
    if len2 > 1.0 {
        let len = len2.sqrt() + SOLVE_RIM_EPSILON;
        x /= len;
        y /= len;
    }

    // On an upright globe a point never leaves the north-south axis by more
    // than the radius of its parallel.
    if x.abs() > clat.abs() {
        x = clat * (x * clat).signum();
        flippable = true;
    }

    let ratio = if clat != 0.0 {
        (x / clat).clamp(-1.0, 1.0)
    } else {
        0.0
    };

    let mut lon0 = if far_side {
        lon + ratio.asin() + PI
    } else {
        lon - ratio.asin()
    };

    let clatlon = clat * (lon - lon0).cos();
    let d = clatlon * clatlon + slat * slat;

    // Equator limit.
    let mut a = -y;
    let mut b = (d - y * y).max(0.0).sqrt();

    if slat != 0.0 {
        a = a * clatlon + slat * b;
        b = (a * clatlon + y * d) / slat;
    }

    let mut lat0 = a.atan2(b);

    if !(-FRAC_PI_2..=FRAC_PI_2).contains(&lat0) {
        // Ran past a pole: put the front pole at the center and rotate about it.
        lat0 = FRAC_PI_2;

        // Only a southern point can drive the south pole up past the center.
        if lat < 0.0 {
            lat0 = -lat0;
            y = -y;
        }

        lon0 = lon - x.atan2(-y);

        if y < -clat {
            flippable = true;
        }
    }

    CenterSolve {
        center: GeoPoint::new(lat0, lon0),
        flippable,
    }
}
