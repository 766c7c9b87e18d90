// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stream capture — drains an async byte source into a tail window.
//!
//! The window itself is synchronous; these helpers sit between it and a
//! `tokio` byte source (process stdout/stderr, a pipe, stdin) so a
//! bounded recent window of a live stream can be kept without retaining
//! the stream itself.

use std::io;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::tail::TailBuffer;

const READ_CHUNK: usize = 8192;

/// Read `reader` to EOF, feeding every chunk into `buffer`.
///
/// Returns the total number of bytes captured. A read error is surfaced
/// to the caller; bytes captured before it remain in the window.
pub async fn drain<R>(reader: &mut R, buffer: &TailBuffer) -> io::Result<u64>
where
    R: AsyncRead + Unpin,
{
    let mut chunk = vec![0u8; READ_CHUNK];
    let mut total: u64 = 0;
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buffer.append(&chunk[..n]);
        total += n as u64;
        trace!(bytes = n, "captured chunk");
    }
    debug!(total, "stream drained");
    Ok(total)
}

/// Spawn a background task that captures `reader` into `buffer` until
/// EOF, a read error, or `shutdown` is cancelled.
///
/// On EOF and shutdown the task resolves with the bytes captured so far.
pub fn spawn_capture<R>(
    reader: R,
    buffer: Arc<TailBuffer>,
    shutdown: CancellationToken,
) -> JoinHandle<io::Result<u64>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = reader;
        let mut chunk = vec![0u8; READ_CHUNK];
        let mut total: u64 = 0;
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!(total, "capture stopped by shutdown");
                    break;
                }
                read = reader.read(&mut chunk) => {
                    match read {
                        Ok(0) => {
                            debug!(total, "capture reached EOF");
                            break;
                        }
                        Ok(n) => {
                            buffer.append(&chunk[..n]);
                            total += n as u64;
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
        }
        Ok(total)
    })
}

#[cfg(test)]
#[path = "pump_tests.rs"]
mod tests;
