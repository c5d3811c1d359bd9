//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Render surface dimensions (the logical field the simulation plays on)
//! - Storage (LocalStorage on web, nothing on native)

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::error::{ArcadeError, Result};

/// Logical size of the drawable surface the games run on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
        }
    }
}

impl Viewport {
    /// Build a viewport, failing fast when there is nothing to draw on
    pub fn new(width: f32, height: f32) -> Result<Self> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(ArcadeError::SurfaceUnavailable(format!(
                "surface has no drawable area ({width}x{height})"
            )));
        }
        Ok(Self { width, height })
    }
}

/// Load a JSON value from LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    let storage = web_sys::window()?.local_storage().ok()??;
    let json = storage.get_item(key).ok()??;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring malformed '{}' in LocalStorage: {}", key, e);
            None
        }
    }
}

/// Save a JSON value to LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn save_json<T: Serialize>(key: &str, value: &T) {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten();

    if let Some(storage) = storage {
        match serde_json::to_string(value) {
            Ok(json) => {
                if storage.set_item(key, &json).is_err() {
                    log::warn!("LocalStorage rejected '{}'", key);
                }
            }
            Err(e) => log::warn!("Could not serialize '{}': {}", key, e),
        }
    }
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn load_json<T: DeserializeOwned>(_key: &str) -> Option<T> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_json<T: Serialize>(_key: &str, _value: &T) {
    // No-op for native
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_rejects_empty_surface() {
        assert!(matches!(
            Viewport::new(0.0, 300.0),
            Err(ArcadeError::SurfaceUnavailable(_))
        ));
        assert!(Viewport::new(640.0, f32::NAN).is_err());
        assert!(Viewport::new(640.0, -1.0).is_err());
    }

    #[test]
    fn test_viewport_accepts_real_surface() {
        let vp = Viewport::new(320.0, 200.0).unwrap();
        assert_eq!(vp.width, 320.0);
        assert_eq!(vp.height, 200.0);
    }
}
