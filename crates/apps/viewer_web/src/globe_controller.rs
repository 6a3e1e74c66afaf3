//! Pointer-driven globe controller.
//!
//! Converts canvas pixels to projection-disc coordinates and drives a
//! [`DragSession`] so the point grabbed on pointer-down stays under the
//! pointer for the whole gesture.

use foundation::math::{DragSession, GeoPoint, Orientation, Vec2, lens_to_disc, wrap_pi};
use serde::Serialize;
use tracing::debug;

use crate::config::ViewerConfig;

/// Snapshot reported to the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub center_lat_deg: f64,
    pub center_lon_deg: f64,
    pub dragging: bool,
    pub far_side: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct GlobeController {
    orientation: Orientation,
    home: GeoPoint,
    lens: bool,

    canvas_width: f64,
    canvas_height: f64,

    /// Open gesture, if any.
    drag: Option<DragSession>,
}

impl GlobeController {
    pub fn new(home: GeoPoint, lens: bool) -> Self {
        Self {
            orientation: Orientation::from_center(home),
            home,
            lens,
            canvas_width: 1024.0,
            canvas_height: 1024.0,
            drag: None,
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(config.home(), config.lens)
    }

    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas_width = width.max(1.0);
        self.canvas_height = height.max(1.0);
    }

    pub fn canvas_size(&self) -> (f64, f64) {
        (self.canvas_width, self.canvas_height)
    }

    pub fn orientation(&self) -> &Orientation {
        &self.orientation
    }

    pub fn lens(&self) -> bool {
        self.lens
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Handle pointer down event.
    ///
    /// - `pos_px`: Pointer position in canvas pixels [x, y], y down.
    pub fn on_pointer_down(&mut self, pos_px: [f64; 2]) {
        let disc = self.pixel_to_disc(pos_px);
        let session = DragSession::begin(&self.orientation, disc);
        let grabbed = session.grabbed();
        debug!(
            lat_deg = grabbed.lat_deg(),
            lon_deg = grabbed.lon_deg(),
            far_side = session.is_far_side(),
            "drag begin"
        );
        self.drag = Some(session);
    }

    /// Handle pointer move event. Returns whether the orientation changed.
    pub fn on_pointer_move(&mut self, pos_px: [f64; 2]) -> bool {
        let disc = self.pixel_to_disc(pos_px);
        let Some(session) = self.drag.as_mut() else {
            return false;
        };

        let was_far = session.is_far_side();
        session.drag_to(&mut self.orientation, disc);
        if was_far && !session.is_far_side() {
            debug!("grabbed point released to the near side");
        }
        true
    }

    /// Handle pointer up event. The orientation stays where the drag left it.
    pub fn on_pointer_up(&mut self) {
        if self.drag.take().is_some() {
            let center = self.orientation.center();
            debug!(
                lat_deg = center.lat_deg(),
                lon_deg = center.lon_deg(),
                "drag end"
            );
        }
    }

    /// Return to the configured home view and drop any open gesture.
    pub fn reset(&mut self) {
        self.drag = None;
        self.orientation = Orientation::from_center(self.home);
    }

    pub fn view_state(&self) -> ViewState {
        let center = self.orientation.center();
        ViewState {
            center_lat_deg: center.lat_deg(),
            center_lon_deg: wrap_pi(center.lon_rad).to_degrees(),
            dragging: self.is_dragging(),
            far_side: self.drag.as_ref().map(DragSession::is_far_side),
        }
    }

    /// Canvas pixels to screen coordinates: origin at the canvas center,
    /// y up, the disc's radius is half the smaller canvas side.
    pub fn pixel_to_screen(&self, pos_px: [f64; 2]) -> Vec2 {
        let min_dim = self.canvas_width.min(self.canvas_height).max(1.0);
        Vec2::new(
            (2.0 * pos_px[0] - self.canvas_width) / min_dim,
            (self.canvas_height - 2.0 * pos_px[1]) / min_dim,
        )
    }

    fn pixel_to_disc(&self, pos_px: [f64; 2]) -> Vec2 {
        let screen = self.pixel_to_screen(pos_px);
        if self.lens { lens_to_disc(screen) } else { screen }
    }
}

#[cfg(test)]
mod tests {
    use super::GlobeController;
    use foundation::math::{GeoPoint, Vec2, disc_to_lens};
    use pretty_assertions::assert_eq;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn controller(lens: bool) -> GlobeController {
        let mut ctrl = GlobeController::new(GeoPoint::from_degrees(60.0, 25.0), lens);
        ctrl.set_canvas_size(800.0, 600.0);
        ctrl
    }

    /// Inverse of `pixel_to_screen` for an 800x600 canvas.
    fn screen_to_pixel(s: Vec2) -> [f64; 2] {
        [(s.x * 600.0 + 800.0) / 2.0, (600.0 - s.y * 600.0) / 2.0]
    }

    #[test]
    fn pixel_to_screen_centers_and_flips_y() {
        let ctrl = controller(false);
        assert_eq!(ctrl.pixel_to_screen([400.0, 300.0]), Vec2::new(0.0, 0.0));
        assert_eq!(ctrl.pixel_to_screen([700.0, 0.0]), Vec2::new(1.0, 1.0));
        assert_eq!(ctrl.pixel_to_screen([100.0, 600.0]), Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn move_without_press_is_ignored() {
        let mut ctrl = controller(true);
        let before = *ctrl.orientation();
        assert!(!ctrl.on_pointer_move([500.0, 200.0]));
        assert_eq!(*ctrl.orientation(), before);
    }

    #[test]
    fn drag_keeps_grabbed_point_under_pointer() {
        for lens in [false, true] {
            let mut ctrl = controller(lens);
            let start = [420.0, 310.0];
            ctrl.on_pointer_down(start);
            assert!(ctrl.is_dragging());

            let grabbed = ctrl.orientation().unproject(ctrl.pixel_to_disc(start));

            for pos in [[430.0, 300.0], [470.0, 260.0], [380.0, 330.0]] {
                assert!(ctrl.on_pointer_move(pos));
                let projected = ctrl.orientation().project(grabbed);
                let on_screen = if lens {
                    disc_to_lens(projected)
                } else {
                    projected.xy()
                };
                let px = screen_to_pixel(on_screen);
                assert_close(px[0], pos[0], 1e-6);
                assert_close(px[1], pos[1], 1e-6);
            }

            ctrl.on_pointer_up();
            assert!(!ctrl.is_dragging());
        }
    }

    #[test]
    fn orientation_persists_after_release() {
        let mut ctrl = controller(true);
        ctrl.on_pointer_down([400.0, 300.0]);
        ctrl.on_pointer_move([450.0, 300.0]);
        ctrl.on_pointer_up();

        let after = *ctrl.orientation();
        assert!(after.center_lon() < 25f64.to_radians());
        assert!(!ctrl.on_pointer_move([300.0, 300.0]));
        assert_eq!(*ctrl.orientation(), after);
    }

    #[test]
    fn reset_restores_home_and_ends_drag() {
        let mut ctrl = controller(false);
        ctrl.on_pointer_down([400.0, 300.0]);
        ctrl.on_pointer_move([500.0, 350.0]);
        ctrl.reset();

        let state = ctrl.view_state();
        assert!(!state.dragging);
        assert_eq!(state.far_side, None);
        assert_close(state.center_lat_deg, 60.0, 1e-12);
        assert_close(state.center_lon_deg, 25.0, 1e-12);
    }

    #[test]
    fn view_state_reports_open_gesture() {
        let mut ctrl = controller(false);
        ctrl.on_pointer_down([400.0, 300.0]);
        let state = ctrl.view_state();
        assert!(state.dragging);
        assert_eq!(state.far_side, Some(false));
    }
}
