//! Canvas2D rendering module
//!
//! Draws session snapshots; never touches live run state. Layout geometry is
//! platform independent so pointer hit-testing can be checked natively.

#[cfg(target_arch = "wasm32")]
mod canvas;
pub mod layout;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
