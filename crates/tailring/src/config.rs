// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::Parser;

/// Keep only the most recent lines of a byte stream.
#[derive(Debug, Parser)]
#[command(name = "tailring", version, about)]
pub struct Config {
    /// Number of completed lines to retain. Negative retains nothing.
    #[arg(
        short = 'n',
        long,
        env = "TAILRING_LINES",
        default_value = "10",
        allow_hyphen_values = true
    )]
    pub lines: i64,

    /// Input file. Reads stdin when omitted.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Emit the window as a JSON array of lines.
    #[arg(long, env = "TAILRING_JSON")]
    pub json: bool,

    /// Log format (json or text).
    #[arg(long, env = "TAILRING_LOG_FORMAT", default_value = "text")]
    pub log_format: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "TAILRING_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl Config {
    /// Validate the configuration after parsing.
    pub fn validate(&self) -> anyhow::Result<()> {
        match self.log_format.as_str() {
            "json" | "text" => {}
            other => anyhow::bail!("invalid log format: {other}"),
        }
        Ok(())
    }

    /// Window capacity with negative input clamped to zero
    /// (retain-nothing), keeping construction total.
    pub fn effective_capacity(&self) -> usize {
        usize::try_from(self.lines).unwrap_or(0)
    }

    /// Build a minimal `Config` for tests (3 lines, stdin, text logs).
    #[doc(hidden)]
    pub fn test() -> Self {
        Self {
            lines: 3,
            file: None,
            json: false,
            log_format: "text".into(),
            log_level: "debug".into(),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
