use std::path::PathBuf;

use thiserror::Error;

use crate::config::Architecture;
use crate::constants::{MAX_PHYS_MEM_BITS, PAGE_SIZE_BITS, VIRTUAL_ADDR_BITS};

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("PhysicalMemorySizeBits {bits} should be larger than PageSizeBits {}", PAGE_SIZE_BITS)]
    PhysicalMemoryTooSmall { bits: u32 },

    #[error("PhysicalMemorySizeBits {bits} exceeds the {} bit address model", MAX_PHYS_MEM_BITS)]
    PhysicalMemoryTooLarge { bits: u32 },

    #[error(
        "firstLevelBits {bits} is too big for the 2nd level page system ({} address bits, {} offset bits)",
        VIRTUAL_ADDR_BITS,
        PAGE_SIZE_BITS
    )]
    FirstLevelBitsTooLarge { bits: u32 },

    #[error("failed to open trace {}: {source}", .path.display())]
    TraceOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed line {line} in trace {trace}: {content:?}")]
    MalformedTrace {
        trace: String,
        line: usize,
        content: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Counter bookkeeping disagreed at the end of a run. This is a logic
    /// defect, never a recoverable condition.
    #[error("{architecture}: invariant violated for process {pid}: {detail}")]
    InvariantViolation {
        architecture: Architecture,
        pid: usize,
        detail: String,
    },
}

impl SimError {
    /// Configuration problems are detected before anything runs
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SimError::PhysicalMemoryTooSmall { .. }
                | SimError::PhysicalMemoryTooLarge { .. }
                | SimError::FirstLevelBitsTooLarge { .. }
        )
    }
}
