//! Address translators
//!
//! Each architecture keeps the tables of every process (eviction has to reach
//! into whichever process owned the victim frame) and drives the shared
//! `FramePool`. The simulator only sees the `PageTable` trait.

mod inverted;
mod single_level;
mod two_level;

pub use inverted::InvertedPageTable;
pub use single_level::{ReplacementPolicy, SingleLevelPageTable};
pub use two_level::TwoLevelPageTable;

use crate::config::{Architecture, SimConfig};
use crate::memory::FramePool;
use crate::process::ProcessStats;
use crate::translation::{Resolution, VirtualAddress};

/// A valid bit and the frame it points at. Invalidation keeps the stale
/// frame number, only the bit is cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageTableEntry {
    pub valid: bool,
    pub frame: u32,
}

impl PageTableEntry {
    #[inline]
    fn mapped(frame: usize) -> Self {
        PageTableEntry {
            valid: true,
            frame: frame as u32,
        }
    }

    #[inline]
    fn frame(&self) -> Option<usize> {
        self.valid.then_some(self.frame as usize)
    }
}

pub trait PageTable {
    fn architecture(&self) -> Architecture;

    /// Translate one access of process `pid`, faulting the page in if needed.
    ///
    /// Architecture-specific counters are accumulated into `stats`; hits,
    /// faults and trace counts are left to the caller.
    fn resolve(
        &mut self,
        pid: usize,
        va: VirtualAddress,
        frames: &mut FramePool,
        stats: &mut ProcessStats,
    ) -> Resolution;

    /// Frame currently mapped for `va`, without touching any state
    fn mapped_frame(&self, pid: usize, va: VirtualAddress) -> Option<usize>;
}

/// Fresh, empty tables of the given architecture for `processes` processes
pub fn build(
    architecture: Architecture,
    config: &SimConfig,
    processes: usize,
) -> Box<dyn PageTable> {
    match architecture {
        Architecture::OneLevelFifo => {
            Box::new(SingleLevelPageTable::new(ReplacementPolicy::Fifo, processes))
        }
        Architecture::OneLevelLru => {
            Box::new(SingleLevelPageTable::new(ReplacementPolicy::Lru, processes))
        }
        Architecture::TwoLevel => {
            Box::new(TwoLevelPageTable::new(config.first_level_bits, processes))
        }
        Architecture::Inverted => Box::new(InvertedPageTable::new(config.frame_count())),
    }
}
