// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sparkq_core::TaskId;
use std::io::Write as _;
use tempfile::tempdir;

fn test_event(n: u64) -> Event {
    Event::TaskDeleted { id: TaskId::from_string(format!("tsk-{n:019}")), at_ms: n }
}

#[test]
fn open_creates_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.wal");

    let wal = Wal::open(&path, 0).unwrap();

    assert!(path.exists());
    assert_eq!(wal.write_seq(), 0);
}

#[test]
fn append_assigns_increasing_seqs() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.wal");

    let mut wal = Wal::open(&path, 0).unwrap();
    let seq1 = wal.append(&test_event(1)).unwrap();
    let seq2 = wal.append(&test_event(2)).unwrap();

    assert_eq!(seq1, 1);
    assert_eq!(seq2, 2);

    wal.flush().unwrap();
    let metadata = std::fs::metadata(&path).unwrap();
    assert!(metadata.len() > 0);
}

#[test]
fn entries_after_filters_by_seq() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.wal");

    let mut wal = Wal::open(&path, 0).unwrap();
    wal.append(&test_event(1)).unwrap();
    wal.append(&test_event(2)).unwrap();
    wal.append(&test_event(3)).unwrap();
    wal.flush().unwrap();

    let entries = wal.entries_after(1).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].seq, 2);
    assert_eq!(entries[1].seq, 3);
}

#[test]
fn reopen_resumes_seq_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.wal");

    {
        let mut wal = Wal::open(&path, 0).unwrap();
        wal.append(&test_event(1)).unwrap();
        wal.append(&test_event(2)).unwrap();
        wal.flush().unwrap();
    }

    let mut wal = Wal::open(&path, 0).unwrap();
    assert_eq!(wal.write_seq(), 2);

    let seq = wal.append(&test_event(3)).unwrap();
    assert_eq!(seq, 3);
}

#[test]
fn reopen_after_snapshot_seq_on_empty_log() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.wal");

    // Snapshot covered seq 7; log was truncated away entirely.
    let wal = Wal::open(&path, 7).unwrap();
    assert_eq!(wal.write_seq(), 7);
}

#[test]
fn truncate_before_drops_covered_prefix() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.wal");

    let mut wal = Wal::open(&path, 0).unwrap();
    wal.append(&test_event(1)).unwrap();
    wal.append(&test_event(2)).unwrap();
    wal.append(&test_event(3)).unwrap();
    wal.flush().unwrap();

    wal.truncate_before(2).unwrap();

    let entries = wal.entries_after(0).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].seq, 2);
    assert_eq!(entries[1].seq, 3);

    // Appends continue from the surviving tail.
    let seq = wal.append(&test_event(4)).unwrap();
    assert_eq!(seq, 4);
}

#[test]
fn corrupt_tail_rotates_to_bak_and_keeps_valid_prefix() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.wal");

    {
        let mut wal = Wal::open(&path, 0).unwrap();
        wal.append(&test_event(1)).unwrap();
        wal.append(&test_event(2)).unwrap();
        wal.flush().unwrap();
    }
    {
        let mut f = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        f.write_all(b"not-valid-json\n").unwrap();
    }

    let wal = Wal::open(&path, 0).unwrap();
    assert_eq!(wal.write_seq(), 2);

    let bak = path.with_extension("bak");
    assert!(bak.exists());

    let entries = wal.entries_after(0).unwrap();
    assert_eq!(entries.len(), 2);
}

#[test]
fn fully_corrupt_file_rotates_and_starts_fresh() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.wal");

    std::fs::write(&path, b"\x80\x81\xff\xfe\n").unwrap();

    let wal = Wal::open(&path, 0).unwrap();
    assert_eq!(wal.write_seq(), 0);
    assert!(path.with_extension("bak").exists());
}

#[test]
fn repeated_corruption_rotates_bak_files_with_cap() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.wal");

    // Four corrupt opens; at most three backups are kept.
    for i in 1..=4u8 {
        std::fs::write(&path, [i; 8]).unwrap();
        let wal = Wal::open(&path, 0).unwrap();
        assert_eq!(wal.write_seq(), 0);
    }

    assert_eq!(std::fs::read(path.with_extension("bak")).unwrap(), vec![4u8; 8]);
    assert_eq!(std::fs::read(path.with_extension("bak.2")).unwrap(), vec![3u8; 8]);
    assert_eq!(std::fs::read(path.with_extension("bak.3")).unwrap(), vec![2u8; 8]);
    assert!(!path.with_extension("bak.4").exists());
}

#[test]
fn entries_after_stops_at_post_open_corruption() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.wal");

    let mut wal = Wal::open(&path, 0).unwrap();
    wal.append(&test_event(1)).unwrap();
    wal.flush().unwrap();

    // Corrupt the file behind the open writer's back.
    {
        let mut f = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        f.write_all(b"post-open-garbage\n").unwrap();
    }

    let entries = wal.entries_after(0).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].seq, 1);
}

#[test]
fn events_round_trip_through_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.wal");

    let mut wal = Wal::open(&path, 0).unwrap();
    let event = test_event(42);
    wal.append(&event).unwrap();
    wal.flush().unwrap();

    let entries = wal.entries_after(0).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].event, event);
}
