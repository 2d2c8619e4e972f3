use crate::config::Architecture;
use crate::memory::{FrameOwner, FramePool, PageKey};
use crate::process::ProcessStats;
use crate::translation::{Resolution, VirtualAddress};

use super::PageTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InvertedEntry {
    pid: usize,
    vpn: u32,
    /// Frame holding the next entry of the same bucket chain
    next: Option<usize>,
}

/// Hashed inverted page table with chained buckets and LRU replacement.
///
/// There are as many buckets as frames. An entry exists only while its page
/// occupies a frame, so entries are stored in a slot per frame and chains
/// link those slots by frame number. New entries go to the head of their
/// chain.
pub struct InvertedPageTable {
    buckets: Vec<Option<usize>>,
    entries: Vec<Option<InvertedEntry>>,
}

impl InvertedPageTable {
    pub fn new(frame_count: usize) -> Self {
        InvertedPageTable {
            buckets: vec![None; frame_count],
            entries: vec![None; frame_count],
        }
    }

    #[inline]
    fn bucket(&self, pid: usize, vpn: u32) -> usize {
        (vpn as usize + pid) % self.buckets.len()
    }

    /// Frames of a bucket chain, head first
    fn chain(&self, bucket: usize) -> impl Iterator<Item = (usize, InvertedEntry)> + '_ {
        let mut cursor = self.buckets[bucket];
        std::iter::from_fn(move || {
            let frame = cursor?;
            let entry = self.entries[frame]?;
            cursor = entry.next;
            Some((frame, entry))
        })
    }

    /// Remove the entry for (pid, vpn) from its chain. Returns whether one
    /// was found.
    fn unlink(&mut self, pid: usize, vpn: u32) -> bool {
        let bucket = self.bucket(pid, vpn);
        let mut prev: Option<usize> = None;
        let mut cursor = self.buckets[bucket];

        while let Some(frame) = cursor {
            let Some(entry) = self.entries[frame] else {
                break;
            };
            if entry.pid == pid && entry.vpn == vpn {
                match prev {
                    None => self.buckets[bucket] = entry.next,
                    Some(p) => {
                        if let Some(prev_entry) = self.entries[p].as_mut() {
                            prev_entry.next = entry.next;
                        }
                    }
                }
                self.entries[frame] = None;
                return true;
            }
            prev = Some(frame);
            cursor = entry.next;
        }
        false
    }

    /// Number of entries currently reachable from the buckets
    pub fn live_entries(&self) -> usize {
        (0..self.buckets.len()).map(|b| self.chain(b).count()).sum()
    }

    /// Length of the chain `(pid, vpn)` hashes into
    pub fn chain_len(&self, pid: usize, vpn: u32) -> usize {
        self.chain(self.bucket(pid, vpn)).count()
    }
}

impl PageTable for InvertedPageTable {
    fn architecture(&self) -> Architecture {
        Architecture::Inverted
    }

    fn resolve(
        &mut self,
        pid: usize,
        va: VirtualAddress,
        frames: &mut FramePool,
        stats: &mut ProcessStats,
    ) -> Resolution {
        let vpn = va.vpn;
        let bucket = self.bucket(pid, vpn);

        if self.buckets[bucket].is_none() {
            stats.empty_bucket_accesses += 1;
        } else {
            stats.non_empty_bucket_accesses += 1;
            let mut found = None;
            for (frame, entry) in self.chain(bucket) {
                stats.hash_conflicts += 1;
                if entry.pid == pid && entry.vpn == vpn {
                    found = Some(frame);
                    break;
                }
            }
            if let Some(frame) = found {
                frames.promote(frame);
                return Resolution::Hit { frame };
            }
        }

        let eviction = frames.allocate_for_fault(FrameOwner {
            pid,
            page: PageKey::Flat(vpn),
        });
        if let Some(FrameOwner {
            pid: victim_pid,
            page: PageKey::Flat(victim_vpn),
        }) = eviction.previous
        {
            self.unlink(victim_pid, victim_vpn);
        }

        // Head of the chain, read after the unlink may have changed it
        self.entries[eviction.frame] = Some(InvertedEntry {
            pid,
            vpn,
            next: self.buckets[bucket],
        });
        self.buckets[bucket] = Some(eviction.frame);

        Resolution::Fault {
            frame: eviction.frame,
            evicted: eviction.previous,
        }
    }

    fn mapped_frame(&self, pid: usize, va: VirtualAddress) -> Option<usize> {
        self.chain(self.bucket(pid, va.vpn))
            .find(|(_, e)| e.pid == pid && e.vpn == va.vpn)
            .map(|(frame, _)| frame)
    }
}
