// Copyright 2025 the Inkpad Authors
// SPDX-License-Identifier: Apache-2.0

//! Recorded pointer input, replayed onto a `Canvas`.
//!
//! A stroke script is a JSON document with the canvas size and a list of
//! events in arrival order:
//!
//! ```json
//! {
//!   "width": 256,
//!   "height": 128,
//!   "background": [255, 255, 255, 255],
//!   "events": [
//!     { "type": "color", "rgba": [200, 0, 0, 255] },
//!     { "type": "begin", "x": 20, "y": 60 },
//!     { "type": "move", "x": 40, "y": 64 },
//!     { "type": "end", "x": 60, "y": 60 },
//!     { "type": "mode", "mode": "erase" },
//!     { "type": "begin", "x": 40, "y": 62 },
//!     { "type": "end", "x": 40, "y": 62 }
//!   ]
//! }
//! ```

use crate::canvas::{Canvas, PointerEvent, PointerPhase, SketchMode};
use crate::config::SketchConfig;
use crate::error::ScriptError;
use kurbo::Point;
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest canvas a script may ask for, in pixels
const MAX_PIXELS: u64 = 64 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    Begin { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    End { x: f64, y: f64 },
    Cancel { x: f64, y: f64 },
    Mode { mode: SketchMode },
    Color { rgba: [u8; 4] },
    Width { width: f64 },
    Clear,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeScript {
    pub width: u32,
    pub height: u32,
    /// Overrides the defaults; a config passed to `replay` wins over this
    #[serde(default)]
    pub config: Option<SketchConfig>,
    /// Flatten the output over this opaque color
    #[serde(default)]
    pub background: Option<[u8; 4]>,
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

impl StrokeScript {
    pub fn from_json_str(text: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let script = Self::from_json_str(&text)?;
        tracing::info!(
            "Loaded stroke script from {} ({} events)",
            path.display(),
            script.events.len()
        );
        Ok(script)
    }

    pub fn background_color(&self) -> Option<Color> {
        self.background
            .map(|[r, g, b, a]| Color::from_rgba8(r, g, b, a))
    }

    /// Build a canvas and drive it with every event in order.
    ///
    /// `config` takes precedence over the script's own config.
    pub fn replay(&self, config: Option<&SketchConfig>) -> Result<Canvas, ScriptError> {
        if u64::from(self.width) * u64::from(self.height) > MAX_PIXELS {
            return Err(ScriptError::CanvasTooLarge {
                width: self.width,
                height: self.height,
            });
        }

        let mut canvas = match config.or(self.config.as_ref()) {
            Some(config) => {
                config.validate()?;
                Canvas::with_config(self.width, self.height, config)
            }
            None => Canvas::new(self.width, self.height),
        };

        for event in &self.events {
            apply(&mut canvas, event);
        }
        tracing::debug!(
            events = self.events.len(),
            empty = canvas.is_empty(),
            "stroke script replayed"
        );
        Ok(canvas)
    }
}

fn apply(canvas: &mut Canvas, event: &ScriptEvent) {
    let pointer = |phase, x, y| PointerEvent::new(phase, Point::new(x, y));
    match *event {
        ScriptEvent::Begin { x, y } => canvas.handle_pointer(pointer(PointerPhase::Began, x, y)),
        ScriptEvent::Move { x, y } => canvas.handle_pointer(pointer(PointerPhase::Moved, x, y)),
        ScriptEvent::End { x, y } => canvas.handle_pointer(pointer(PointerPhase::Ended, x, y)),
        ScriptEvent::Cancel { x, y } => {
            canvas.handle_pointer(pointer(PointerPhase::Cancelled, x, y))
        }
        ScriptEvent::Mode { mode } => canvas.set_mode(mode),
        ScriptEvent::Color { rgba: [r, g, b, a] } => {
            canvas.set_color(Color::from_rgba8(r, g, b, a))
        }
        ScriptEvent::Width { width } => canvas.set_width(width),
        ScriptEvent::Clear => canvas.clear(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::tools::Tool;

    const SCRIPT: &str = r#"{
        "width": 128,
        "height": 64,
        "events": [
            { "type": "color", "rgba": [0, 0, 0, 255] },
            { "type": "begin", "x": 10, "y": 30 },
            { "type": "move", "x": 20, "y": 30 },
            { "type": "move", "x": 30, "y": 30 },
            { "type": "move", "x": 40, "y": 30 },
            { "type": "move", "x": 50, "y": 30 },
            { "type": "end", "x": 60, "y": 30 }
        ]
    }"#;

    #[test]
    fn parses_tagged_events() {
        let script = StrokeScript::from_json_str(SCRIPT).expect("script parses");
        assert_eq!(script.width, 128);
        assert_eq!(script.events.len(), 7);
        assert_eq!(script.events[1], ScriptEvent::Begin { x: 10.0, y: 30.0 });
        assert_eq!(script.config, None);
        assert_eq!(script.background_color(), None);
    }

    #[test]
    fn replay_draws_the_stroke() {
        let script = StrokeScript::from_json_str(SCRIPT).expect("script parses");
        let canvas = script.replay(None).expect("replay succeeds");
        assert!(!canvas.is_empty());
        assert_eq!(canvas.current_image().alpha(35, 30), 1.0);
        assert_eq!(canvas.current_image().alpha(35, 50), 0.0);
    }

    #[test]
    fn mode_and_clear_events() {
        let text = r#"{
            "width": 32, "height": 32,
            "events": [
                { "type": "begin", "x": 10, "y": 10 },
                { "type": "end", "x": 10, "y": 10 },
                { "type": "mode", "mode": "erase" },
                { "type": "width", "width": 8 },
                { "type": "clear" }
            ]
        }"#;
        let canvas = StrokeScript::from_json_str(text)
            .and_then(|script| script.replay(None))
            .expect("replay succeeds");
        assert_eq!(canvas.mode(), SketchMode::Erase);
        assert_eq!(canvas.tool_width(), 8.0);
        assert!(canvas.is_empty());
    }

    #[test]
    fn explicit_config_wins() {
        let mut script = StrokeScript::from_json_str(SCRIPT).expect("script parses");
        script.config = Some(SketchConfig {
            ink_width: 2.0,
            ..SketchConfig::default()
        });
        let config = SketchConfig {
            ink_width: 9.0,
            ..SketchConfig::default()
        };
        let canvas = script.replay(Some(&config)).expect("replay succeeds");
        assert_eq!(canvas.ink_tool().style().width, 9.0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut script = StrokeScript::from_json_str(SCRIPT).expect("script parses");
        script.config = Some(SketchConfig {
            ink_width: -1.0,
            ..SketchConfig::default()
        });
        let err = script.replay(None).unwrap_err();
        assert!(matches!(err, ScriptError::Config(ConfigError::Invalid { .. })));
    }

    #[test]
    fn oversized_canvas_is_rejected() {
        let text = r#"{ "width": 100000, "height": 100000 }"#;
        let err = StrokeScript::from_json_str(text)
            .and_then(|script| script.replay(None))
            .unwrap_err();
        assert!(matches!(err, ScriptError::CanvasTooLarge { .. }));
    }

    #[test]
    fn unknown_event_is_a_parse_error() {
        let text = r#"{ "width": 1, "height": 1, "events": [{ "type": "undo" }] }"#;
        assert!(matches!(
            StrokeScript::from_json_str(text),
            Err(ScriptError::Parse(_))
        ));
    }
}
