// Copyright 2025 the Inkpad Authors
// SPDX-License-Identifier: Apache-2.0

//! Replay a stroke script and write the result as a PNG

use anyhow::{Context, Result, bail};
use inkpad::{SketchConfig, StrokeScript};
use std::path::PathBuf;

const USAGE: &str = "Usage: inkpad <script.json> <out.png> [config.toml]";

fn main() -> Result<()> {
    inkpad::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (script_path, out_path, config_path) = match args.as_slice() {
        [script, out] => (PathBuf::from(script), PathBuf::from(out), None),
        [script, out, config] => (
            PathBuf::from(script),
            PathBuf::from(out),
            Some(PathBuf::from(config)),
        ),
        _ => bail!("{USAGE}"),
    };

    let config = config_path
        .map(|path| {
            SketchConfig::load(&path)
                .with_context(|| format!("loading config {}", path.display()))
        })
        .transpose()?;

    let script = StrokeScript::load(&script_path)
        .with_context(|| format!("loading script {}", script_path.display()))?;
    let canvas = script
        .replay(config.as_ref())
        .context("replaying stroke script")?;

    let image = canvas.rendered_image(script.background_color());
    image
        .save(&out_path)
        .with_context(|| format!("writing {}", out_path.display()))?;

    tracing::info!(
        "Wrote {}x{} sketch to {}",
        canvas.width(),
        canvas.height(),
        out_path.display()
    );
    Ok(())
}
