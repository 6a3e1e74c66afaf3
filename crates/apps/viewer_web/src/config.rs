use foundation::math::GeoPoint;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;
use wasm_bindgen::JsValue;

/// Viewer settings, usually passed in from the page as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub canvas_id: String,
    pub center_lat_deg: f64,
    pub center_lon_deg: f64,
    /// Display through the equal-area lens instead of the raw disc.
    pub lens: bool,
    pub graticule_step_deg: f64,
    pub log_level: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            canvas_id: "globe-canvas".to_string(),
            center_lat_deg: 60.0,
            center_lon_deg: 25.0,
            lens: true,
            graticule_step_deg: 15.0,
            log_level: "info".to_string(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json(text: &str) -> Result<Self, ViewerError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ViewerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ViewerError> {
        if !(-90.0..=90.0).contains(&self.center_lat_deg) {
            return Err(ViewerError::InvalidConfig(format!(
                "center_lat_deg must be within [-90, 90], got {}",
                self.center_lat_deg
            )));
        }
        if !self.center_lon_deg.is_finite() {
            return Err(ViewerError::InvalidConfig(
                "center_lon_deg must be finite".to_string(),
            ));
        }
        if !(self.graticule_step_deg > 0.0 && self.graticule_step_deg <= 90.0) {
            return Err(ViewerError::InvalidConfig(format!(
                "graticule_step_deg must be within (0, 90], got {}",
                self.graticule_step_deg
            )));
        }
        self.log_filter()?;
        Ok(())
    }

    /// Resting view the controller starts from and resets to.
    pub fn home(&self) -> GeoPoint {
        GeoPoint::from_degrees(self.center_lat_deg, self.center_lon_deg)
    }

    pub fn log_filter(&self) -> Result<LevelFilter, ViewerError> {
        self.log_level
            .parse::<LevelFilter>()
            .map_err(|e| ViewerError::InvalidConfig(format!("log_level: {e}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerError {
    Config(String),
    InvalidConfig(String),
    CanvasMissing(String),
    Gpu(String),
    Fetch(String),
}

impl std::fmt::Display for ViewerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewerError::Config(msg) => write!(f, "config parse error: {msg}"),
            ViewerError::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            ViewerError::CanvasMissing(id) => write!(f, "canvas #{id} not found"),
            ViewerError::Gpu(msg) => write!(f, "wgpu error: {msg}"),
            ViewerError::Fetch(msg) => write!(f, "fetch failed: {msg}"),
        }
    }
}

impl std::error::Error for ViewerError {}

impl From<ViewerError> for JsValue {
    fn from(err: ViewerError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
