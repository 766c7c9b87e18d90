// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line-oriented tail window over a byte stream.
//!
//! Accepts arbitrarily chunked byte writes and retains only the most
//! recently completed lines, like `tail -n` over a live stream. Writes
//! may split a line (or a multi-byte sequence) anywhere; only whole
//! lines count toward the retention limit, and the unterminated tail of
//! the stream is tracked separately until its terminator arrives.

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, Write};

use bytes::{Bytes, BytesMut};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Bounded window of the most recent completed lines of a byte stream.
///
/// All state sits behind a single mutex, so a shared reference (or an
/// `Arc`) can be written from any number of threads without external
/// synchronization. Line content is raw bytes; the string accessors are
/// lossy UTF-8 projections.
pub struct TailBuffer {
    capacity: usize,
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    lines: VecDeque<Bytes>,
    partial: BytesMut,
    total_lines: u64,
    total_bytes: u64,
}

/// Point-in-time counters for a [`TailBuffer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TailStatus {
    pub capacity: usize,
    pub retained: usize,
    pub pending_bytes: usize,
    pub total_lines: u64,
    pub total_bytes: u64,
}

/// Consistent copy of the visible window, taken under the lock.
struct Snapshot {
    entries: Vec<Bytes>,
    terminated: bool,
}

impl TailBuffer {
    /// Create a new tail window retaining at most `capacity` completed
    /// lines. Capacity 0 retains nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Inner {
                // Preallocation is capped; large windows grow on demand.
                lines: VecDeque::with_capacity(capacity.min(64)),
                partial: BytesMut::new(),
                total_lines: 0,
                total_bytes: 0,
            }),
        }
    }

    /// Maximum number of completed lines this window retains.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock_inner(&self) -> parking_lot::MutexGuard<'_, Inner> {
        self.inner.lock()
    }

    /// Ingest a chunk of the stream. Always consumes the whole chunk and
    /// returns its length; this operation cannot fail.
    ///
    /// Completed lines (terminator stripped) are committed in arrival
    /// order, evicting oldest-first once the window is full. Bytes after
    /// the last terminator stay pending until a later write completes
    /// them.
    pub fn append(&self, data: &[u8]) -> usize {
        let mut inner = self.lock_inner();
        inner.total_bytes += data.len() as u64;
        inner.partial.extend_from_slice(data);
        while let Some(idx) = inner.partial.iter().position(|&b| b == b'\n') {
            let mut line = inner.partial.split_to(idx + 1);
            line.truncate(idx);
            inner.commit(self.capacity, line.freeze());
        }
        data.len()
    }

    /// Snapshot copy of the visible window as strings (lossy UTF-8).
    ///
    /// Committed lines in order, plus the pending fragment as a final
    /// entry when non-empty. The fragment never displaces committed
    /// state: if it pushes the count above capacity the returned copy is
    /// trimmed from the front, leaving the window itself untouched.
    pub fn lines(&self) -> Vec<String> {
        self.snapshot()
            .entries
            .iter()
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect()
    }

    /// Same snapshot as [`lines`](Self::lines) with exact byte content.
    pub fn line_bytes(&self) -> Vec<Bytes> {
        self.snapshot().entries
    }

    /// Exact byte encoding of the rendered window.
    ///
    /// Entries joined by the terminator; ends with a terminator exactly
    /// when the stream last ended on a line boundary and at least one
    /// committed line is visible.
    pub fn bytes(&self) -> Bytes {
        self.snapshot().into_bytes()
    }

    /// Write the rendered window to `writer` and return the byte count.
    ///
    /// The only fallible operation: any error is the sink's, surfaced
    /// verbatim. The window itself is untouched, so a caller-level retry
    /// recomputes fresh.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<u64> {
        let data = self.bytes();
        writer.write_all(&data)?;
        Ok(data.len() as u64)
    }

    /// Current counters (retained lines, pending size, lifetime totals).
    pub fn status(&self) -> TailStatus {
        let inner = self.lock_inner();
        TailStatus {
            capacity: self.capacity,
            retained: inner.lines.len(),
            pending_bytes: inner.partial.len(),
            total_lines: inner.total_lines,
            total_bytes: inner.total_bytes,
        }
    }

    /// Total bytes ever written through this window.
    pub fn total_bytes(&self) -> u64 {
        self.lock_inner().total_bytes
    }

    /// Total lines ever completed, including lines evicted or discarded
    /// by a zero-capacity window.
    pub fn total_lines(&self) -> u64 {
        self.lock_inner().total_lines
    }

    fn snapshot(&self) -> Snapshot {
        let inner = self.lock_inner();
        if self.capacity == 0 {
            return Snapshot { entries: Vec::new(), terminated: false };
        }
        let mut entries: Vec<Bytes> = inner.lines.iter().cloned().collect();
        let terminated = inner.partial.is_empty() && !entries.is_empty();
        if !inner.partial.is_empty() {
            entries.push(Bytes::copy_from_slice(&inner.partial));
            if entries.len() > self.capacity {
                let excess = entries.len() - self.capacity;
                entries.drain(..excess);
            }
        }
        Snapshot { entries, terminated }
    }
}

impl Inner {
    fn commit(&mut self, capacity: usize, line: Bytes) {
        self.total_lines += 1;
        // Capacity 0 is retain-nothing, not a no-op: the line is still
        // consumed from the pending fragment and counted.
        if capacity == 0 {
            return;
        }
        if self.lines.len() == capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }
}

impl Snapshot {
    fn into_bytes(self) -> Bytes {
        let content: usize = self.entries.iter().map(Bytes::len).sum();
        let mut out = BytesMut::with_capacity(content + self.entries.len());
        for (i, line) in self.entries.iter().enumerate() {
            if i > 0 {
                out.extend_from_slice(b"\n");
            }
            out.extend_from_slice(line);
        }
        if self.terminated {
            out.extend_from_slice(b"\n");
        }
        out.freeze()
    }
}

impl fmt::Display for TailBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.bytes();
        f.write_str(&String::from_utf8_lossy(&data))
    }
}

impl fmt::Debug for TailBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock_inner();
        f.debug_struct("TailBuffer")
            .field("capacity", &self.capacity)
            .field("retained", &inner.lines.len())
            .field("pending_bytes", &inner.partial.len())
            .finish()
    }
}

impl Write for &TailBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.append(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Write for TailBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.append(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "tail_tests.rs"]
mod tests;
