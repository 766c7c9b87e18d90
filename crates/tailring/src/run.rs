// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI orchestration: drain the configured input into a tail window,
//! then render the retained lines to a sink.

use std::io::Write;

use anyhow::Context;
use tracing::debug;

use crate::config::Config;
use crate::pump;
use crate::tail::TailBuffer;

/// Drain the configured input (file or stdin) to EOF into a new window.
pub async fn capture(config: &Config) -> anyhow::Result<TailBuffer> {
    let buffer = TailBuffer::new(config.effective_capacity());
    let total = match config.file {
        Some(ref path) => {
            let mut file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("open {}", path.display()))?;
            pump::drain(&mut file, &buffer).await?
        }
        None => pump::drain(&mut tokio::io::stdin(), &buffer).await?,
    };
    debug!(total, retained = buffer.status().retained, "input exhausted");
    Ok(buffer)
}

/// Render the window to `out`, raw or as a JSON array of lines.
pub fn render<W: Write>(buffer: &TailBuffer, json: bool, out: &mut W) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer(&mut *out, &buffer.lines())?;
        out.write_all(b"\n")?;
    } else {
        buffer.write_to(out)?;
    }
    Ok(())
}

/// Capture the input and print the window to stdout.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let buffer = capture(&config).await?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render(&buffer, config.json, &mut out)?;
    Ok(())
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
