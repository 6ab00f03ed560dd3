// Copyright 2025 the Inkpad Authors
// SPDX-License-Identifier: Apache-2.0

//! Error types

use std::path::PathBuf;
use thiserror::Error;

/// A drawing context could not be opened on a surface.
///
/// Tools recover from this locally: the composite step is skipped and the
/// stroke leaves no mark. It never reaches the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no drawing context available for a {width}x{height} surface")]
pub struct ContextUnavailable {
    pub width: u32,
    pub height: u32,
}

/// Failure to load or validate a `SketchConfig`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Failure to load or replay a `StrokeScript`
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse script: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("script canvas size {width}x{height} is too large")]
    CanvasTooLarge { width: u32, height: u32 },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
