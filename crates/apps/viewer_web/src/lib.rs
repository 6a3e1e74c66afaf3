use console_error_panic_hook::set_once;
use gloo_net::http::Request;
use std::cell::RefCell;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

pub mod config;
pub mod geometry;
pub mod globe_controller;
pub mod logging;
mod wgpu;

use config::{ViewerConfig, ViewerError};
use geometry::GlobeUniforms;
use globe_controller::GlobeController;
use wgpu::{WgpuContext, init_wgpu_from_canvas_id, render_globe, resize_wgpu};

#[derive(Debug)]
pub struct ViewerState {
    pub config: ViewerConfig,
    pub controller: GlobeController,
    pub wgpu: Option<WgpuContext>,
}

impl ViewerState {
    fn new(config: ViewerConfig) -> Self {
        let controller = GlobeController::from_config(&config);
        Self {
            config,
            controller,
            wgpu: None,
        }
    }
}

thread_local! {
    static STATE: RefCell<ViewerState> = RefCell::new(ViewerState::new(ViewerConfig::default()));
}

fn render_scene() {
    STATE.with(|state_ref| {
        let state = state_ref.borrow();
        if let Some(ctx) = &state.wgpu {
            let (width, height) = state.controller.canvas_size();
            let uniforms = GlobeUniforms::new(
                state.controller.orientation(),
                state.controller.lens(),
                width,
                height,
            );
            if let Err(err) = render_globe(ctx, &uniforms) {
                warn!(%err, "frame skipped");
            }
        }
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Configure the viewer from a JSON string and start wgpu on its canvas.
///
/// Missing fields fall back to defaults; `"{}"` is a valid config.
#[wasm_bindgen]
pub fn init_viewer(config_json: &str) -> Result<(), JsValue> {
    let config = ViewerConfig::from_json(config_json)?;
    apply_config(config)?;
    Ok(())
}

/// Same as [`init_viewer`], with the config fetched from `url`.
#[wasm_bindgen]
pub fn init_viewer_from_url(url: String) {
    spawn_local(async move {
        let config = match fetch_config(&url).await {
            Ok(config) => config,
            Err(err) => {
                error!(%err, url = %url, "viewer config fetch failed");
                return;
            }
        };

        if let Err(err) = apply_config(config) {
            error!(%err, url = %url, "viewer config rejected");
        }
    });
}

#[wasm_bindgen]
pub fn set_canvas_sizes(width: f64, height: f64) {
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        s.controller.set_canvas_size(width, height);
        if let Some(ctx) = &mut s.wgpu {
            resize_wgpu(ctx, width as u32, height as u32);
        }
    });
    render_scene();
}

/// Begin a drag at a canvas pixel position (y down).
#[wasm_bindgen]
pub fn pointer_down(x_px: f64, y_px: f64) {
    STATE.with(|state| {
        state.borrow_mut().controller.on_pointer_down([x_px, y_px]);
    });
}

/// Continue the drag. Returns whether the globe was re-oriented.
#[wasm_bindgen]
pub fn pointer_move(x_px: f64, y_px: f64) -> bool {
    let changed = STATE.with(|state| state.borrow_mut().controller.on_pointer_move([x_px, y_px]));
    if changed {
        render_scene();
    }
    changed
}

#[wasm_bindgen]
pub fn pointer_up() {
    STATE.with(|state| {
        state.borrow_mut().controller.on_pointer_up();
    });
}

#[wasm_bindgen]
pub fn reset_view() {
    STATE.with(|state| {
        state.borrow_mut().controller.reset();
    });
    render_scene();
}

/// Current center and gesture state as JSON.
#[wasm_bindgen]
pub fn view_state_json() -> Result<String, JsValue> {
    let view = STATE.with(|state| state.borrow().controller.view_state());
    serde_json::to_string(&view).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn apply_config(config: ViewerConfig) -> Result<(), ViewerError> {
    let level = config.log_filter()?;
    if !logging::init_logging(level) && LevelFilter::current() != level {
        warn!(requested = %level, "log level is set once per page; keeping the current one");
    }
    info!(
        canvas = %config.canvas_id,
        center_lat_deg = config.center_lat_deg,
        center_lon_deg = config.center_lon_deg,
        lens = config.lens,
        "viewer configured"
    );

    let canvas_id = config.canvas_id.clone();
    let graticule_step_deg = config.graticule_step_deg;
    let reinit = STATE.with(|state| {
        let mut s = state.borrow_mut();
        let reinit = needs_gpu_init(&s.config, &config, s.wgpu.is_some());
        let (width, height) = s.controller.canvas_size();
        let wgpu = if reinit { None } else { s.wgpu.take() };

        let mut next = ViewerState::new(config);
        next.controller.set_canvas_size(width, height);
        next.wgpu = wgpu;
        *s = next;
        reinit
    });

    if !reinit {
        debug!(canvas = %canvas_id, "reusing wgpu context");
        render_scene();
        return Ok(());
    }

    spawn_local(async move {
        if let Err(err) = init_wgpu_inner(&canvas_id, graticule_step_deg).await {
            error!(%err, "wgpu init failed");
        }
    });
    Ok(())
}

/// A context is tied to its canvas and its baked graticule; each new one
/// leaks a `wgpu::Instance`, so it is only rebuilt when those change.
fn needs_gpu_init(current: &ViewerConfig, next: &ViewerConfig, has_context: bool) -> bool {
    !has_context
        || current.canvas_id != next.canvas_id
        || current.graticule_step_deg != next.graticule_step_deg
}

async fn init_wgpu_inner(canvas_id: &str, graticule_step_deg: f64) -> Result<(), ViewerError> {
    let mut ctx = init_wgpu_from_canvas_id(canvas_id, graticule_step_deg).await?;

    STATE.with(|state| {
        let mut s = state.borrow_mut();
        let (width, height) = s.controller.canvas_size();
        resize_wgpu(&mut ctx, width as u32, height as u32);
        s.wgpu = Some(ctx);
    });
    info!(canvas_id, "wgpu ready");

    render_scene();
    Ok(())
}

async fn fetch_config(url: &str) -> Result<ViewerConfig, ViewerError> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| ViewerError::Fetch(e.to_string()))?;
    let text = resp
        .text()
        .await
        .map_err(|e| ViewerError::Fetch(e.to_string()))?;
    ViewerConfig::from_json(&text)
}

#[cfg(test)]
mod tests {
    use super::needs_gpu_init;
    use crate::config::ViewerConfig;

    #[test]
    fn first_config_always_initializes() {
        let config = ViewerConfig::default();
        assert!(needs_gpu_init(&config, &config, false));
    }

    #[test]
    fn view_only_changes_reuse_the_context() {
        let current = ViewerConfig::default();
        let next = ViewerConfig {
            center_lat_deg: -20.0,
            lens: false,
            log_level: "debug".to_string(),
            ..ViewerConfig::default()
        };
        assert!(!needs_gpu_init(&current, &next, true));
    }

    #[test]
    fn canvas_or_graticule_change_rebuilds() {
        let current = ViewerConfig::default();
        let other_canvas = ViewerConfig {
            canvas_id: "side-canvas".to_string(),
            ..ViewerConfig::default()
        };
        let finer_grid = ViewerConfig {
            graticule_step_deg: 10.0,
            ..ViewerConfig::default()
        };
        assert!(needs_gpu_init(&current, &other_canvas, true));
        assert!(needs_gpu_init(&current, &finer_grid, true));
    }
}
