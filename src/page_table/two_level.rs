use crate::config::Architecture;
use crate::constants::VPN_BITS;
use crate::memory::{FrameOwner, FramePool, PageKey};
use crate::process::ProcessStats;
use crate::translation::{Resolution, VirtualAddress};

use super::{PageTable, PageTableEntry};

type SecondLevel = Box<[PageTableEntry]>;

/// Hierarchical table with LRU replacement.
///
/// First-level tables are allocated up front, second-level tables on the
/// first fault that needs them. A first-level slot never goes back to empty:
/// eviction only clears the second-level entry, so an emptied second-level
/// table stays allocated and is reused on the next fault.
pub struct TwoLevelPageTable {
    first_level_bits: u32,
    second_level_size: usize,
    tables: Vec<Vec<Option<SecondLevel>>>,
}

impl TwoLevelPageTable {
    pub fn new(first_level_bits: u32, processes: usize) -> Self {
        let first_level_size = 1usize << first_level_bits;
        let second_level_size = 1usize << (VPN_BITS - first_level_bits);
        let tables = (0..processes)
            .map(|_| (0..first_level_size).map(|_| None).collect())
            .collect();
        TwoLevelPageTable {
            first_level_bits,
            second_level_size,
            tables,
        }
    }

    fn entry(&self, pid: usize, first: u32, second: u32) -> Option<PageTableEntry> {
        let table = self.tables[pid][first as usize].as_ref()?;
        Some(table[second as usize])
    }

    /// Number of second-level tables currently allocated for `pid`
    pub fn second_level_tables(&self, pid: usize) -> usize {
        self.tables[pid].iter().filter(|t| t.is_some()).count()
    }
}

impl PageTable for TwoLevelPageTable {
    fn architecture(&self) -> Architecture {
        Architecture::TwoLevel
    }

    fn resolve(
        &mut self,
        pid: usize,
        va: VirtualAddress,
        frames: &mut FramePool,
        stats: &mut ProcessStats,
    ) -> Resolution {
        let (first, second) = va.split(self.first_level_bits);

        if let Some(frame) = self.entry(pid, first, second).and_then(|e| e.frame()) {
            frames.promote(frame);
            return Resolution::Hit { frame };
        }

        let eviction = frames.allocate_for_fault(FrameOwner {
            pid,
            page: PageKey::TwoLevel { first, second },
        });
        if let Some(FrameOwner {
            pid: victim_pid,
            page: PageKey::TwoLevel { first: f, second: s },
        }) = eviction.previous
        {
            if let Some(table) = self.tables[victim_pid][f as usize].as_mut() {
                table[s as usize].valid = false;
            }
        }

        let size = self.second_level_size;
        let table = self.tables[pid][first as usize].get_or_insert_with(|| {
            stats.second_level_tables += 1;
            vec![PageTableEntry::default(); size].into_boxed_slice()
        });
        table[second as usize] = PageTableEntry::mapped(eviction.frame);

        Resolution::Fault {
            frame: eviction.frame,
            evicted: eviction.previous,
        }
    }

    fn mapped_frame(&self, pid: usize, va: VirtualAddress) -> Option<usize> {
        let (first, second) = va.split(self.first_level_bits);
        self.entry(pid, first, second)?.frame()
    }
}
