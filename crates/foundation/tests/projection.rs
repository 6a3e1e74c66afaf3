use core::f64::consts::FRAC_PI_2;

use foundation::math::{DragSession, GeoPoint, Orientation, Vec2, solve_center};

fn assert_close(a: f64, b: f64, eps: f64) {
    let diff = (a - b).abs();
    assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
}

/// Deterministic spread of values in [lo, hi].
fn sweep(lo: f64, hi: f64, n: usize) -> impl Iterator<Item = f64> {
    (0..n).map(move |i| lo + (hi - lo) * i as f64 / (n - 1) as f64)
}

fn orientations() -> Vec<Orientation> {
    let mut out = Vec::new();
    for lat0 in sweep(-85.0, 85.0, 7) {
        for lon0 in sweep(-540.0, 540.0, 7) {
            out.push(Orientation::new(lat0.to_radians(), lon0.to_radians()));
        }
    }
    out
}

#[test]
fn unproject_inverts_project_on_visible_hemisphere() {
    for o in orientations() {
        for lat in sweep(-89.0, 89.0, 15) {
            for dlon in sweep(-179.0, 179.0, 19) {
                let point = GeoPoint::from_degrees(lat, o.center().lon_deg() + dlon);
                let projected = o.project(point);
                // Grazing points lose precision in sqrt(1 - r^2).
                if projected.z < 1e-4 {
                    continue;
                }

                let back = o.unproject(projected.xy());
                assert_close(back.lat_rad, point.lat_rad, 1e-9);
                // Longitude is periodic: compare through sine and cosine.
                assert_close(back.lon_rad.sin(), point.lon_rad.sin(), 1e-9);
                assert_close(back.lon_rad.cos(), point.lon_rad.cos(), 1e-9);
            }
        }
    }
}

#[test]
fn every_center_projects_to_origin() {
    for o in orientations() {
        let p = o.project(o.center());
        assert_close(p.x, 0.0, 1e-12);
        assert_close(p.y, 0.0, 1e-12);
        assert_close(p.z, 1.0, 1e-12);
    }
}

#[test]
fn solve_center_reproduces_visible_points() {
    for lat0 in sweep(-75.0, 75.0, 7) {
        let o = Orientation::new(lat0.to_radians(), 0.3);
        for lat in sweep(-75.0, 75.0, 11) {
            for dlon in sweep(-80.0, 80.0, 9) {
                let point = GeoPoint::new(lat.to_radians(), 0.3 + dlon.to_radians());
                let projected = o.project(point);
                if projected.z < 1e-4 {
                    continue;
                }

                let solve = solve_center(projected.xy(), point, false);
                let again = Orientation::from_center(solve.center).project(point);
                assert_close(again.x, projected.x, 1e-9);
                assert_close(again.y, projected.y, 1e-9);

                // Same longitude branch, so the starting center comes back.
                assert_close(solve.center.lat_rad, o.center_lat(), 1e-7);
                assert_close(solve.center.lon_rad, o.center_lon(), 1e-9);
            }
        }
    }
}

#[test]
fn solved_latitude_stays_within_poles() {
    for lat in sweep(-89.0, 89.0, 13) {
        for x in sweep(-1.2, 1.2, 13) {
            for y in sweep(-1.2, 1.2, 13) {
                for far_side in [false, true] {
                    let point = GeoPoint::new(lat.to_radians(), 0.7);
                    let solve = solve_center(Vec2::new(x, y), point, far_side);
                    assert!(solve.center.lat_rad.is_finite(), "lat {lat} x {x} y {y}");
                    assert!(solve.center.lon_rad.is_finite(), "lat {lat} x {x} y {y}");
                    assert!((-FRAC_PI_2..=FRAC_PI_2).contains(&solve.center.lat_rad));
                }
            }
        }
    }
}

#[test]
fn drag_gesture_from_default_view() {
    let mut o = Orientation::new(60f64.to_radians(), 25f64.to_radians());
    let mut session = DragSession::begin(&o, Vec2::new(0.0, 0.0));
    assert!(!session.is_far_side());

    session.drag_to(&mut o, Vec2::new(0.1, 0.05));
    let p = o.project(session.grabbed());
    assert_close(p.x, 0.1, 1e-6);
    assert_close(p.y, 0.05, 1e-6);
}
