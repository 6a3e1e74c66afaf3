use foundation::math::{Orientation, wrap_pi};

/// Mesh vertex: geographic position in radians [lat, lon].
///
/// The vertex shader projects it with the current orientation, so the mesh
/// is uploaded once and never rebuilt while dragging.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GeoVertex {
    pub lat_lon: [f32; 2],
}

impl GeoVertex {
    fn from_degrees(lat_deg: f64, lon_deg: f64) -> Self {
        Self {
            lat_lon: [lat_deg.to_radians() as f32, lon_deg.to_radians() as f32],
        }
    }
}

/// Per-frame shader parameters.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobeUniforms {
    /// [sin(lat0), cos(lat0), lon0 wrapped to (-pi, pi], lens flag].
    pub view: [f32; 4],
    /// Disc radius in clip units along x and y.
    pub scale: [f32; 4],
}

impl GlobeUniforms {
    pub fn new(orientation: &Orientation, lens: bool, width: f64, height: f64) -> Self {
        let width = width.max(1.0);
        let height = height.max(1.0);
        let min_dim = width.min(height);
        Self {
            view: [
                orientation.sin_center_lat() as f32,
                orientation.cos_center_lat() as f32,
                wrap_pi(orientation.center_lon()) as f32,
                if lens { 1.0 } else { 0.0 },
            ],
            scale: [(min_dim / width) as f32, (min_dim / height) as f32, 0.0, 0.0],
        }
    }
}

/// Latitude/longitude grid covering the sphere, as an indexed triangle list.
pub fn generate_globe_mesh(lat_segments: u32, lon_segments: u32) -> (Vec<GeoVertex>, Vec<u16>) {
    let lat_segments = lat_segments.max(3);
    let lon_segments = lon_segments.max(3);

    let mut vertices = Vec::with_capacity(((lat_segments + 1) * (lon_segments + 1)) as usize);
    for lat in 0..=lat_segments {
        let lat_deg = 90.0 - 180.0 * lat as f64 / lat_segments as f64;
        for lon in 0..=lon_segments {
            let lon_deg = -180.0 + 360.0 * lon as f64 / lon_segments as f64;
            vertices.push(GeoVertex::from_degrees(lat_deg, lon_deg));
        }
    }

    let stride = lon_segments + 1;
    let mut indices = Vec::with_capacity((lat_segments * lon_segments * 6) as usize);
    for lat in 0..lat_segments {
        for lon in 0..lon_segments {
            let i0 = lat * stride + lon;
            let i1 = i0 + 1;
            let i2 = i0 + stride;
            let i3 = i2 + 1;

            indices.push(i0 as u16);
            indices.push(i2 as u16);
            indices.push(i1 as u16);
            indices.push(i1 as u16);
            indices.push(i2 as u16);
            indices.push(i3 as u16);
        }
    }

    (vertices, indices)
}

fn push_polyline(verts: &mut Vec<GeoVertex>, points: impl Iterator<Item = GeoVertex>) {
    let mut prev = None;
    for p in points {
        if let Some(prev_p) = prev {
            verts.push(prev_p);
            verts.push(p);
        }
        prev = Some(p);
    }
}

/// Meridians and parallels every `step_deg`, as a line list.
pub fn generate_graticule_lines(step_deg: f64) -> Vec<GeoVertex> {
    let step_deg = step_deg.clamp(1.0, 90.0);
    let samples: u32 = 128;
    let mut verts = Vec::new();

    // Meridians: lon fixed, lat varies -90..90.
    let mut lon_deg = -180.0;
    while lon_deg < 180.0 {
        let points = (0..=samples).map(|i| {
            let t = i as f64 / samples as f64;
            GeoVertex::from_degrees(-90.0 + 180.0 * t, lon_deg)
        });
        push_polyline(&mut verts, points);
        lon_deg += step_deg;
    }

    // Parallels: lat fixed, lon varies -180..180; the poles are skipped.
    let mut lat_deg = -90.0 + step_deg;
    while lat_deg < 90.0 {
        let points = (0..=samples).map(|i| {
            let t = i as f64 / samples as f64;
            GeoVertex::from_degrees(lat_deg, -180.0 + 360.0 * t)
        });
        push_polyline(&mut verts, points);
        lat_deg += step_deg;
    }

    verts
}
