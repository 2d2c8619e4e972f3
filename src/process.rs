use crate::config::Architecture;
use crate::error::{Result, SimError};
use crate::translation::MemoryAccess;

/// Per-process counters for one simulation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessStats {
    pub traces: u64,
    pub page_faults: u64,
    pub page_hits: u64,
    pub second_level_tables: u64,
    pub hash_conflicts: u64,
    pub empty_bucket_accesses: u64,
    pub non_empty_bucket_accesses: u64,
}

impl ProcessStats {
    /// Verify the bookkeeping identities that every run must satisfy
    pub fn check(&self, architecture: Architecture, pid: usize) -> Result<()> {
        if self.page_hits + self.page_faults != self.traces {
            return Err(SimError::InvariantViolation {
                architecture,
                pid,
                detail: format!(
                    "hits {} + faults {} != traces {}",
                    self.page_hits, self.page_faults, self.traces
                ),
            });
        }
        if architecture == Architecture::Inverted
            && self.empty_bucket_accesses + self.non_empty_bucket_accesses != self.traces
        {
            return Err(SimError::InvariantViolation {
                architecture,
                pid,
                detail: format!(
                    "empty bucket accesses {} + non-empty bucket accesses {} != traces {}",
                    self.empty_bucket_accesses, self.non_empty_bucket_accesses, self.traces
                ),
            });
        }
        Ok(())
    }
}

/// A finite, restartable sequence of memory accesses
pub trait TraceSource {
    /// Next access, or `None` once the trace is exhausted
    fn next_access(&mut self) -> Result<Option<MemoryAccess>>;

    /// Restart from the first access
    fn rewind(&mut self) -> Result<()>;
}

/// Trace held in memory
#[derive(Debug, Clone, Default)]
pub struct VecTrace {
    accesses: Vec<MemoryAccess>,
    cursor: usize,
}

impl VecTrace {
    pub fn new(accesses: Vec<MemoryAccess>) -> Self {
        VecTrace {
            accesses,
            cursor: 0,
        }
    }

    /// Read accesses to each address in order
    pub fn from_addresses(addresses: &[u32]) -> Self {
        Self::new(addresses.iter().map(|&a| MemoryAccess::read(a)).collect())
    }

    pub fn len(&self) -> usize {
        self.accesses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accesses.is_empty()
    }
}

impl TraceSource for VecTrace {
    fn next_access(&mut self) -> Result<Option<MemoryAccess>> {
        let access = self.accesses.get(self.cursor).copied();
        if access.is_some() {
            self.cursor += 1;
        }
        Ok(access)
    }

    fn rewind(&mut self) -> Result<()> {
        self.cursor = 0;
        Ok(())
    }
}

/// One simulated process
#[derive(Debug)]
pub struct Process<T> {
    pub pid: usize,
    pub name: String,
    pub trace: T,
    pub finished: bool,
    pub stats: ProcessStats,
}

impl<T: TraceSource> Process<T> {
    pub fn new(pid: usize, name: impl Into<String>, trace: T) -> Self {
        Process {
            pid,
            name: name.into(),
            trace,
            finished: false,
            stats: ProcessStats::default(),
        }
    }

    /// Back to the start of the trace with zeroed counters
    pub fn reset(&mut self) -> Result<()> {
        self.trace.rewind()?;
        self.finished = false;
        self.stats = ProcessStats::default();
        Ok(())
    }
}
