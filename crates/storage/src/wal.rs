// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only write-ahead log.
//!
//! One JSON document per line: `{"seq": N, "event": {...}}`. Sequence
//! numbers start at 1 and never rewind. A corrupt tail (partial write,
//! crash mid-append) is detected at open: the damaged file is rotated to
//! a `.bak` backup and the valid prefix is rewritten in place, so the log
//! that the store sees is always well-formed.

use crate::snapshot::rotate_bak_path;
use serde::{Deserialize, Serialize};
use sparkq_core::Event;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum WalError {
    #[error("WAL io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("WAL encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One committed log record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalEntry {
    pub seq: u64,
    pub event: Event,
}

/// The log writer. Reads go through [`Wal::entries_after`], which opens
/// its own read handle so an iterator never disturbs the append position.
#[derive(Debug)]
pub struct Wal {
    path: PathBuf,
    writer: BufWriter<File>,
    write_seq: u64,
}

impl Wal {
    /// Open (or create) the log at `path`.
    ///
    /// `after_seq` is the snapshot's sequence number; entries at or below
    /// it are already folded into the snapshot. The write sequence resumes
    /// from the highest valid entry on disk, or from `after_seq` when the
    /// file is empty.
    pub fn open(path: impl AsRef<Path>, after_seq: u64) -> Result<Self, WalError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let (valid, corrupt_tail) = scan(&path)?;
        if corrupt_tail {
            let bak = rotate_bak_path(&path);
            warn!(path = %path.display(), bak = %bak.display(), "corrupt WAL tail, rotating");
            fs::rename(&path, &bak)?;
            rewrite(&path, &valid)?;
        }

        let write_seq = valid.last().map(|e| e.seq).unwrap_or(0).max(after_seq);

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, writer: BufWriter::new(file), write_seq })
    }

    /// Sequence number of the most recently appended entry.
    pub fn write_seq(&self) -> u64 {
        self.write_seq
    }

    /// Append an event, returning its sequence number. The entry is
    /// buffered; it is durable only after [`Wal::flush`].
    pub fn append(&mut self, event: &Event) -> Result<u64, WalError> {
        let seq = self.write_seq + 1;
        let entry = WalEntry { seq, event: event.clone() };
        let line = serde_json::to_string(&entry)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.write_seq = seq;
        Ok(seq)
    }

    /// Flush buffered entries and fsync to disk.
    pub fn flush(&mut self) -> Result<(), WalError> {
        self.writer.flush()?;
        self.writer.get_ref().sync_data()?;
        Ok(())
    }

    /// All valid entries with `seq > after_seq`, in order. Stops silently
    /// at the first damaged line (the tail past a crash point).
    pub fn entries_after(&self, after_seq: u64) -> Result<Vec<WalEntry>, WalError> {
        let (valid, _) = scan(&self.path)?;
        Ok(valid.into_iter().filter(|e| e.seq > after_seq).collect())
    }

    /// Drop entries with `seq < before_seq` (already captured by a
    /// snapshot). Rewrites the file atomically and reopens the writer.
    pub fn truncate_before(&mut self, before_seq: u64) -> Result<(), WalError> {
        self.flush()?;
        let (valid, _) = scan(&self.path)?;
        let kept: Vec<WalEntry> = valid.into_iter().filter(|e| e.seq >= before_seq).collect();
        rewrite(&self.path, &kept)?;
        let file = OpenOptions::new().append(true).open(&self.path)?;
        self.writer = BufWriter::new(file);
        Ok(())
    }
}

/// Read every parseable entry from the start of the file. Returns the
/// valid prefix and whether damaged data follows it.
fn scan(path: &Path) -> Result<(Vec<WalEntry>, bool), WalError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok((Vec::new(), false)),
        Err(e) => return Err(e.into()),
    };

    let mut entries = Vec::new();
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf)?;
        if n == 0 {
            return Ok((entries, false));
        }
        let line = match std::str::from_utf8(&buf) {
            Ok(s) => s.trim_end(),
            Err(_) => return Ok((entries, true)),
        };
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<WalEntry>(line) {
            Ok(entry) => entries.push(entry),
            Err(_) => return Ok((entries, true)),
        }
    }
}

/// Write `entries` to `path` via a temp file and rename.
fn rewrite(path: &Path, entries: &[WalEntry]) -> Result<(), WalError> {
    let tmp = path.with_extension("tmp");
    {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        for entry in entries {
            let line = serde_json::to_string(entry)?;
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        writer.get_ref().sync_data()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
