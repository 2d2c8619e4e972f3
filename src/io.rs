//! Trace files
//!
//! One access per line: a hexadecimal address followed by `R` or `W`,
//! e.g. `0041f7a0 R`. Blank lines are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Result, SimError};
use crate::process::TraceSource;
use crate::translation::{AccessKind, MemoryAccess};

/// Parse one trace line. `None` if it is not `<hex address> <R|W>`.
pub fn parse_access(line: &str) -> Option<MemoryAccess> {
    let mut tokens = line.split_whitespace();
    let address = tokens.next()?;
    let kind = tokens.next()?;

    let digits = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .unwrap_or(address);
    let address = u32::from_str_radix(digits, 16).ok()?;

    let kind = match kind {
        "R" | "r" => AccessKind::Read,
        "W" | "w" => AccessKind::Write,
        _ => return None,
    };
    Some(MemoryAccess { address, kind })
}

/// A trace read lazily from disk
#[derive(Debug)]
pub struct TraceFile {
    path: PathBuf,
    reader: BufReader<File>,
    line_number: usize,
    line: String,
}

impl TraceFile {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| SimError::TraceOpen {
            path: path.clone(),
            source,
        })?;
        Ok(TraceFile {
            path,
            reader: BufReader::new(file),
            line_number: 0,
            line: String::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TraceSource for TraceFile {
    fn next_access(&mut self) -> Result<Option<MemoryAccess>> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = self.line.trim();
            if line.is_empty() {
                continue;
            }
            return match parse_access(line) {
                Some(access) => Ok(Some(access)),
                None => Err(SimError::MalformedTrace {
                    trace: self.path.display().to_string(),
                    line: self.line_number,
                    content: line.to_string(),
                }),
            };
        }
    }

    fn rewind(&mut self) -> Result<()> {
        debug!("rewinding {}", self.path.display());
        self.reader.seek(SeekFrom::Start(0))?;
        self.line_number = 0;
        Ok(())
    }
}

/// Open every trace, named by the path it was given as
pub fn open_traces<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<(String, TraceFile)>> {
    paths
        .iter()
        .map(|p| {
            let trace = TraceFile::open(p)?;
            Ok((p.as_ref().display().to_string(), trace))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn trace_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_access() {
        assert_eq!(parse_access("0041f7a0 R"), Some(MemoryAccess::read(0x0041_f7a0)));
        assert_eq!(parse_access("  13f5e2c0   W "), Some(MemoryAccess::write(0x13f5_e2c0)));
        assert_eq!(parse_access("0xFFFFFFFF r"), Some(MemoryAccess::read(u32::MAX)));
    }

    #[test]
    fn test_parse_access_rejects_garbage() {
        assert_eq!(parse_access(""), None);
        assert_eq!(parse_access("0041f7a0"), None);
        assert_eq!(parse_access("zzzz R"), None);
        assert_eq!(parse_access("0041f7a0 X"), None);
        // Wider than 32 bits
        assert_eq!(parse_access("1ffffffff R"), None);
    }

    #[test]
    fn test_trace_file_reads_and_rewinds() {
        let file = trace_file("00001000 R\n\n00002000 W\n");
        let mut trace = TraceFile::open(file.path()).unwrap();

        assert_eq!(trace.next_access().unwrap(), Some(MemoryAccess::read(0x1000)));
        assert_eq!(trace.next_access().unwrap(), Some(MemoryAccess::write(0x2000)));
        assert_eq!(trace.next_access().unwrap(), None);

        trace.rewind().unwrap();
        assert_eq!(trace.next_access().unwrap(), Some(MemoryAccess::read(0x1000)));
    }

    #[test]
    fn test_trace_file_without_trailing_newline() {
        let file = trace_file("00001000 R\n00003000 R");
        let mut trace = TraceFile::open(file.path()).unwrap();
        trace.next_access().unwrap();
        assert_eq!(trace.next_access().unwrap(), Some(MemoryAccess::read(0x3000)));
        assert_eq!(trace.next_access().unwrap(), None);
    }

    #[test]
    fn test_malformed_line_reports_position() {
        let file = trace_file("00001000 R\nnot a trace\n");
        let mut trace = TraceFile::open(file.path()).unwrap();
        trace.next_access().unwrap();
        match trace.next_access() {
            Err(SimError::MalformedTrace { line, content, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(content, "not a trace");
            }
            other => panic!("expected malformed trace error, got {:?}", other),
        }
    }

    #[test]
    fn test_open_missing_file() {
        let err = TraceFile::open("/nonexistent/memsim.trace").unwrap_err();
        assert!(matches!(err, SimError::TraceOpen { .. }));
    }

    #[test]
    fn test_open_traces_keeps_order() {
        let a = trace_file("00001000 R\n");
        let b = trace_file("00002000 R\n");
        let traces = open_traces(&[a.path(), b.path()]).unwrap();
        assert_eq!(traces.len(), 2);
        assert_eq!(traces[0].0, a.path().display().to_string());
        assert_eq!(traces[1].1.path(), b.path());
    }
}
