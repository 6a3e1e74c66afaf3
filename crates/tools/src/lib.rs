//! Offline probes for the globe solver, shared by the `globe` binary.

use foundation::math::{CenterSolve, DragSession, GeoPoint, Orientation, Vec2, lens_to_disc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One pointer sample of a replayed gesture. Angles are in radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragStep {
    pub screen: Vec2,
    pub solve: CenterSolve,
    pub far_side: bool,
    /// Distance in the disc between the grabbed point and the pointer.
    pub residual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragReplay {
    pub grabbed: GeoPoint,
    pub far_side_at_start: bool,
    pub steps: Vec<DragStep>,
}

/// Replay a gesture: `samples[0]` is the press, the rest are moves.
///
/// Samples are screen coordinates; with `lens` they pass through the
/// equal-area lens before reaching the solver, as in the viewer.
pub fn replay_drag(center: GeoPoint, samples: &[Vec2], lens: bool) -> Result<DragReplay, String> {
    let (&press, moves) = samples
        .split_first()
        .ok_or_else(|| "drag path needs at least one sample".to_string())?;

    let to_disc = |s: Vec2| if lens { lens_to_disc(s) } else { s };

    let mut orientation = Orientation::from_center(center);
    let mut session = DragSession::begin(&orientation, to_disc(press));
    let grabbed = session.grabbed();
    let far_side_at_start = session.is_far_side();
    debug!(
        lat_deg = grabbed.lat_deg(),
        lon_deg = grabbed.lon_deg(),
        far_side = far_side_at_start,
        "replay begin"
    );

    let mut steps = Vec::with_capacity(moves.len());
    for &screen in moves {
        let disc = to_disc(screen);
        let solve = session.drag_to(&mut orientation, disc);
        let residual = (orientation.project(grabbed).xy() - disc).length();
        steps.push(DragStep {
            screen,
            solve,
            far_side: session.is_far_side(),
            residual,
        });
    }

    Ok(DragReplay {
        grabbed,
        far_side_at_start,
        steps,
    })
}

/// Parse `"a,b"` into two numbers.
pub fn parse_pair(text: &str) -> Result<[f64; 2], String> {
    let parts: Vec<_> = text.split(',').collect();
    if parts.len() != 2 {
        return Err(format!("expected two comma-separated numbers, got {text:?}"));
    }
    let a: f64 = parts[0]
        .trim()
        .parse()
        .map_err(|e| format!("{:?}: {e}", parts[0]))?;
    let b: f64 = parts[1]
        .trim()
        .parse()
        .map_err(|e| format!("{:?}: {e}", parts[1]))?;
    Ok([a, b])
}

/// Parse `"lat,lon"` in degrees.
pub fn parse_geo(text: &str) -> Result<GeoPoint, String> {
    let [lat, lon] = parse_pair(text)?;
    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude must be within [-90, 90], got {lat}"));
    }
    Ok(GeoPoint::from_degrees(lat, lon))
}

/// Parse a pointer path `"x,y;x,y;..."` in screen coordinates.
pub fn parse_path(text: &str) -> Result<Vec<Vec2>, String> {
    text.split(';')
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse_pair(s).map(|[x, y]| Vec2::new(x, y)))
        .collect()
}
