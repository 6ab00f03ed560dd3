// Copyright 2025 the Inkpad Authors
// SPDX-License-Identifier: Apache-2.0

//! Inkpad: smooth ink strokes from raw pointer samples
//!
//! Pointer samples go through a sliding five-point window that fits a chain
//! of C1-continuous cubic Béziers. Ink is buffered in a per-stroke overlay
//! and flattened onto the committed surface; the eraser cuts straight into
//! the committed surface.
//!
//! ```no_run
//! use inkpad::{Canvas, PointerEvent, PointerPhase};
//!
//! let mut canvas = Canvas::new(256, 128);
//! canvas.handle_pointer(PointerEvent::new(PointerPhase::Began, (20.0, 60.0)));
//! canvas.handle_pointer(PointerEvent::new(PointerPhase::Moved, (60.0, 64.0)));
//! canvas.handle_pointer(PointerEvent::new(PointerPhase::Ended, (100.0, 60.0)));
//! let png = canvas.rendered_image(None);
//! ```

pub mod canvas;
pub mod config;
pub mod error;
pub mod path;
pub mod raster;
pub mod script;
pub mod settings;
pub mod tools;

pub use canvas::{Canvas, PointerEvent, PointerPhase, SketchMode, SketchObserver};
pub use config::SketchConfig;
pub use error::{ConfigError, ContextUnavailable, ScriptError};
pub use path::{ControlPointWindow, Segment};
pub use raster::{CompositeOp, DrawingContext, RasterSurface};
pub use script::{ScriptEvent, StrokeScript};
pub use tools::{EraseTool, InkTool, Tool, ToolId};

use tracing_subscriber::EnvFilter;

/// Install a `tracing` subscriber controlled by `RUST_LOG`.
///
/// Defaults to `inkpad=info`. Does nothing if a global subscriber is
/// already set.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("inkpad=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
