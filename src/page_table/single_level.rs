use crate::config::Architecture;
use crate::constants::SINGLE_LEVEL_TABLE_SIZE;
use crate::memory::{FrameOwner, FramePool, PageKey};
use crate::process::ProcessStats;
use crate::translation::{Resolution, VirtualAddress};

use super::{PageTable, PageTableEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacementPolicy {
    Fifo,
    Lru,
}

/// One flat table per process, indexed directly by virtual page number
pub struct SingleLevelPageTable {
    policy: ReplacementPolicy,
    tables: Vec<Vec<PageTableEntry>>,
}

impl SingleLevelPageTable {
    pub fn new(policy: ReplacementPolicy, processes: usize) -> Self {
        let tables = (0..processes)
            .map(|_| vec![PageTableEntry::default(); SINGLE_LEVEL_TABLE_SIZE])
            .collect();
        SingleLevelPageTable { policy, tables }
    }

    pub fn policy(&self) -> ReplacementPolicy {
        self.policy
    }
}

impl PageTable for SingleLevelPageTable {
    fn architecture(&self) -> Architecture {
        match self.policy {
            ReplacementPolicy::Fifo => Architecture::OneLevelFifo,
            ReplacementPolicy::Lru => Architecture::OneLevelLru,
        }
    }

    fn resolve(
        &mut self,
        pid: usize,
        va: VirtualAddress,
        frames: &mut FramePool,
        _stats: &mut ProcessStats,
    ) -> Resolution {
        let vpn = va.vpn as usize;

        if let Some(frame) = self.tables[pid][vpn].frame() {
            if self.policy == ReplacementPolicy::Lru {
                frames.promote(frame);
            }
            return Resolution::Hit { frame };
        }

        let eviction = frames.allocate_for_fault(FrameOwner {
            pid,
            page: PageKey::Flat(va.vpn),
        });
        if let Some(FrameOwner {
            pid: victim_pid,
            page: PageKey::Flat(victim_vpn),
        }) = eviction.previous
        {
            self.tables[victim_pid][victim_vpn as usize].valid = false;
        }
        self.tables[pid][vpn] = PageTableEntry::mapped(eviction.frame);

        Resolution::Fault {
            frame: eviction.frame,
            evicted: eviction.previous,
        }
    }

    fn mapped_frame(&self, pid: usize, va: VirtualAddress) -> Option<usize> {
        self.tables[pid][va.vpn as usize].frame()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: u32 = 0x0000_1000;
    const B: u32 = 0x0000_2000;
    const C: u32 = 0x0000_3000;

    fn run(table: &mut SingleLevelPageTable, frames: &mut FramePool, pid: usize, addr: u32) -> Resolution {
        let mut stats = ProcessStats::default();
        table.resolve(pid, VirtualAddress::from_raw(addr), frames, &mut stats)
    }

    fn count_faults(policy: ReplacementPolicy, frame_count: usize, trace: &[u32]) -> usize {
        let mut table = SingleLevelPageTable::new(policy, 1);
        let mut frames = FramePool::new(frame_count);
        trace
            .iter()
            .filter(|&&addr| !run(&mut table, &mut frames, 0, addr).is_hit())
            .count()
    }

    #[test]
    fn test_first_touch_faults_then_hits() {
        let mut table = SingleLevelPageTable::new(ReplacementPolicy::Fifo, 1);
        let mut frames = FramePool::new(4);

        let first = run(&mut table, &mut frames, 0, A | 0x10);
        assert_eq!(first, Resolution::Fault { frame: 0, evicted: None });

        // Same page, different offset
        let second = run(&mut table, &mut frames, 0, A | 0xff0);
        assert_eq!(second, Resolution::Hit { frame: 0 });
    }

    #[test]
    fn test_fifo_scenario_two_frames() {
        // A, B, C, A with two frames: C evicts A, so A faults again
        let mut table = SingleLevelPageTable::new(ReplacementPolicy::Fifo, 1);
        let mut frames = FramePool::new(2);
        let results: Vec<bool> = [A, B, C, A]
            .iter()
            .map(|&addr| run(&mut table, &mut frames, 0, addr).is_hit())
            .collect();
        assert_eq!(results, vec![false, false, false, false]);
    }

    #[test]
    fn test_lru_scenario_three_frames() {
        let mut table = SingleLevelPageTable::new(ReplacementPolicy::Lru, 1);
        let mut frames = FramePool::new(3);
        let results: Vec<bool> = [A, B, C, A, B]
            .iter()
            .map(|&addr| run(&mut table, &mut frames, 0, addr).is_hit())
            .collect();
        assert_eq!(results, vec![false, false, false, true, true]);
    }

    #[test]
    fn test_eviction_invalidates_previous_owner() {
        let mut table = SingleLevelPageTable::new(ReplacementPolicy::Fifo, 2);
        let mut frames = FramePool::new(2);
        run(&mut table, &mut frames, 0, A);
        run(&mut table, &mut frames, 1, A);

        let victim = frames.oldest();
        let result = run(&mut table, &mut frames, 1, B);
        assert_eq!(
            result,
            Resolution::Fault {
                frame: victim,
                evicted: Some(FrameOwner { pid: 0, page: PageKey::Flat(A >> 12) }),
            }
        );
        assert_eq!(table.mapped_frame(0, VirtualAddress::from_raw(A)), None);
        assert_eq!(table.mapped_frame(1, VirtualAddress::from_raw(B)), Some(victim));
        assert_eq!(table.mapped_frame(1, VirtualAddress::from_raw(A)), Some(1));
    }

    #[test]
    fn test_processes_do_not_share_pages() {
        let mut table = SingleLevelPageTable::new(ReplacementPolicy::Lru, 2);
        let mut frames = FramePool::new(4);
        assert!(!run(&mut table, &mut frames, 0, A).is_hit());
        assert!(!run(&mut table, &mut frames, 1, A).is_hit());
        assert!(run(&mut table, &mut frames, 0, A).is_hit());
        assert!(run(&mut table, &mut frames, 1, A).is_hit());
    }

    #[test]
    fn test_lru_beats_fifo_on_hot_page() {
        // A is re-touched right before FIFO would evict it
        let trace = [A, B, A, C, A, B, A, C, A, B];
        let fifo = count_faults(ReplacementPolicy::Fifo, 2, &trace);
        let lru = count_faults(ReplacementPolicy::Lru, 2, &trace);
        assert!(lru < fifo, "lru {} fifo {}", lru, fifo);
    }

    #[test]
    fn test_fifo_ignores_hits_for_ordering() {
        // Under FIFO the hit on A does not save it from eviction
        let mut table = SingleLevelPageTable::new(ReplacementPolicy::Fifo, 1);
        let mut frames = FramePool::new(2);
        run(&mut table, &mut frames, 0, A);
        run(&mut table, &mut frames, 0, B);
        assert!(run(&mut table, &mut frames, 0, A).is_hit());
        run(&mut table, &mut frames, 0, C);
        assert_eq!(table.mapped_frame(0, VirtualAddress::from_raw(A)), None);
        assert_eq!(table.mapped_frame(0, VirtualAddress::from_raw(B)), Some(1));
    }

    #[test]
    fn test_highest_page_is_addressable() {
        let mut table = SingleLevelPageTable::new(ReplacementPolicy::Fifo, 1);
        let mut frames = FramePool::new(2);
        assert!(!run(&mut table, &mut frames, 0, u32::MAX).is_hit());
        assert!(run(&mut table, &mut frames, 0, 0xffff_f000).is_hit());
    }
}
