//! File-backed JSONL journal with a SHA-256 hash chain.
//!
//! Line 1 is a header (`format_version`, `seed`, `size`, `path`); every
//! following line is one frame record carrying `prev_sha256_hex` and
//! `sha256_hex`. Each append flushes immediately so the file survives a
//! crash mid-run. Loading validates shape and chain and stops at the first
//! invalid line, returning whatever prefix was intact.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::journal::{FrameRecord, SessionJournal};
use crate::types::RunPath;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
struct FileHeader {
    format_version: u16,
    seed: u64,
    size: usize,
    path: RunPath,
}

/// Fields hashed for one record, serialized to JSON and concatenated with
/// the previous hash.
#[derive(Serialize)]
struct RecordBody<'a> {
    seq: u64,
    frame: &'a FrameRecord,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct FileRecord {
    seq: u64,
    frame: FrameRecord,
    prev_sha256_hex: String,
    sha256_hex: String,
}

const INITIAL_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

fn compute_record_sha256(body_json: &str, prev_sha256_hex: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body_json.as_bytes());
    hasher.update(prev_sha256_hex.as_bytes());
    let digest = hasher.finalize();
    format!("{digest:064x}")
}

/// Appends session frames to a JSONL file, flushing every record.
pub struct JournalWriter {
    writer: BufWriter<File>,
    last_sha256_hex: String,
    next_seq: u64,
}

impl JournalWriter {
    pub fn create(path: &Path, seed: u64, size: usize, run_path: RunPath) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        let header = FileHeader { format_version: 1, seed, size, path: run_path };
        let header_json = serde_json::to_string(&header).map_err(io::Error::other)?;
        writeln!(writer, "{header_json}")?;
        writer.flush()?;

        Ok(Self { writer, last_sha256_hex: INITIAL_HASH.to_string(), next_seq: 0 })
    }

    pub fn append(&mut self, frame: &FrameRecord) -> io::Result<()> {
        let body = RecordBody { seq: self.next_seq, frame };
        let body_json = serde_json::to_string(&body).map_err(io::Error::other)?;
        let sha256_hex = compute_record_sha256(&body_json, &self.last_sha256_hex);

        let record = FileRecord {
            seq: self.next_seq,
            frame: *frame,
            prev_sha256_hex: self.last_sha256_hex.clone(),
            sha256_hex: sha256_hex.clone(),
        };
        let record_json = serde_json::to_string(&record).map_err(io::Error::other)?;
        writeln!(self.writer, "{record_json}")?;
        self.writer.flush()?;

        self.last_sha256_hex = sha256_hex;
        self.next_seq += 1;
        Ok(())
    }
}

#[derive(Debug)]
pub struct LoadedJournal {
    pub journal: SessionJournal,
    /// True when the file ended in a corrupt or incomplete line; the
    /// returned journal holds the intact prefix.
    pub truncated: bool,
}

pub fn load_journal(path: &Path) -> io::Result<LoadedJournal> {
    let content = fs::read_to_string(path)?;
    let mut lines = content.lines();

    let header_line = lines
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "journal file is empty"))?;
    let header: FileHeader = serde_json::from_str(header_line)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;

    let mut journal = SessionJournal::new(header.seed, header.size, header.path);
    journal.format_version = header.format_version;

    let mut last_sha256_hex = INITIAL_HASH.to_string();
    let mut expected_seq = 0_u64;
    let mut truncated = false;

    for line in lines {
        let Ok(record) = serde_json::from_str::<FileRecord>(line) else {
            truncated = true;
            break;
        };
        if record.seq != expected_seq || record.prev_sha256_hex != last_sha256_hex {
            truncated = true;
            break;
        }
        let body = RecordBody { seq: record.seq, frame: &record.frame };
        let body_json = serde_json::to_string(&body)
            .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;
        if compute_record_sha256(&body_json, &record.prev_sha256_hex) != record.sha256_hex {
            truncated = true;
            break;
        }

        journal.frames.push(record.frame);
        last_sha256_hex = record.sha256_hex;
        expected_seq += 1;
    }

    Ok(LoadedJournal { journal, truncated })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::SignalFrame;
    use crate::types::Direction;

    fn sample_frame(step: u64) -> FrameRecord {
        FrameRecord {
            dt_ms: 200,
            input: if step % 2 == 0 { Some(Direction::Right) } else { Some(Direction::Down) },
            signals: SignalFrame::default(),
        }
    }

    #[test]
    fn write_then_load_round_trips_every_frame() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("run.jsonl");

        let mut writer = JournalWriter::create(&path, 99, 12, RunPath::Steady).expect("create");
        for step in 0..10 {
            writer.append(&sample_frame(step)).expect("append");
        }

        let loaded = load_journal(&path).expect("load");
        assert!(!loaded.truncated);
        assert_eq!(loaded.journal.seed, 99);
        assert_eq!(loaded.journal.frames.len(), 10);
        assert_eq!(loaded.journal.frames[0], sample_frame(0));
    }

    #[test]
    fn a_tampered_record_truncates_the_load_at_that_line() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("run.jsonl");

        let mut writer = JournalWriter::create(&path, 7, 12, RunPath::Lucid).expect("create");
        for step in 0..6 {
            writer.append(&sample_frame(step)).expect("append");
        }
        drop(writer);

        let content = fs::read_to_string(&path).expect("read");
        let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
        // Corrupt the 4th record's payload without touching its hashes.
        lines[4] = lines[4].replace("\"dt_ms\":200", "\"dt_ms\":999");
        fs::write(&path, lines.join("\n")).expect("rewrite");

        let loaded = load_journal(&path).expect("load");
        assert!(loaded.truncated);
        assert_eq!(loaded.journal.frames.len(), 3);
    }

    #[test]
    fn a_half_written_trailing_line_is_dropped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("run.jsonl");

        let mut writer = JournalWriter::create(&path, 3, 10, RunPath::Turbulent).expect("create");
        for step in 0..4 {
            writer.append(&sample_frame(step)).expect("append");
        }
        drop(writer);

        let mut content = fs::read_to_string(&path).expect("read");
        content.push_str("{\"seq\":4,\"frame\":");
        fs::write(&path, content).expect("rewrite");

        let loaded = load_journal(&path).expect("load");
        assert!(loaded.truncated);
        assert_eq!(loaded.journal.frames.len(), 4);
    }

    #[test]
    fn loading_an_empty_file_is_an_invalid_data_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("empty.jsonl");
        fs::write(&path, "").expect("write");
        let error = load_journal(&path).expect_err("must fail");
        assert_eq!(error.kind(), io::ErrorKind::InvalidData);
    }
}
