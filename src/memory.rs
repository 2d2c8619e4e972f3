//! Physical frame pool
//!
//! Frames live in an arena and are linked into one circular doubly-linked
//! ring by index. The ring order is the eviction order: `oldest` is the next
//! victim and following `next` from it visits frames from least to most
//! recently inserted (FIFO) or used (LRU).

use log::trace;

/// The virtual identity a frame currently holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKey {
    /// Flat virtual page number (single-level and inverted tables)
    Flat(u32),
    /// First- and second-level indices of a two-level table
    TwoLevel { first: u32, second: u32 },
}

/// Which process mapping currently occupies a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameOwner {
    pub pid: usize,
    pub page: PageKey,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    owner: Option<FrameOwner>,
    prev: usize,
    next: usize,
}

/// Result of handing the oldest frame to a faulting page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eviction {
    pub frame: usize,
    /// Mapping that owned the frame before; the caller must invalidate it
    pub previous: Option<FrameOwner>,
}

#[derive(Debug, Clone)]
pub struct FramePool {
    frames: Vec<Frame>,
    oldest: usize,
}

impl FramePool {
    /// Build `n` unowned frames in ring order 0, 1, .., n-1
    pub fn new(n: usize) -> Self {
        assert!(n > 0, "frame pool needs at least one frame");
        let frames = (0..n)
            .map(|i| Frame {
                owner: None,
                prev: (i + n - 1) % n,
                next: (i + 1) % n,
            })
            .collect();
        FramePool { frames, oldest: 0 }
    }

    /// Drop every mapping and restore the initial ring
    pub fn reset(&mut self) {
        *self = FramePool::new(self.frames.len());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Next eviction candidate
    #[inline]
    pub fn oldest(&self) -> usize {
        self.oldest
    }

    #[inline]
    pub fn owner(&self, frame: usize) -> Option<FrameOwner> {
        self.frames[frame].owner
    }

    /// Move the eviction cursor one frame forward
    #[inline]
    pub fn advance(&mut self) {
        self.oldest = self.frames[self.oldest].next;
    }

    /// Mark `frame` as most recently used.
    ///
    /// The frame is spliced in just before `oldest`, the furthest point from
    /// eviction. If it already is `oldest` the cursor moves past it instead,
    /// which leaves the frame in that same most-recent slot.
    pub fn promote(&mut self, frame: usize) {
        if frame == self.oldest {
            self.advance();
            return;
        }

        let Frame { prev, next, .. } = self.frames[frame];
        self.frames[prev].next = next;
        self.frames[next].prev = prev;

        let tail = self.frames[self.oldest].prev;
        self.frames[frame].prev = tail;
        self.frames[frame].next = self.oldest;
        self.frames[tail].next = frame;
        self.frames[self.oldest].prev = frame;
    }

    /// Hand the oldest frame to `owner` and advance the cursor
    pub fn allocate_for_fault(&mut self, owner: FrameOwner) -> Eviction {
        let frame = self.oldest;
        let previous = self.frames[frame].owner.replace(owner);
        if let Some(prev) = previous {
            trace!(
                "frame {}: evicting pid {} {:?} for pid {} {:?}",
                frame, prev.pid, prev.page, owner.pid, owner.page
            );
        }
        self.advance();
        Eviction { frame, previous }
    }

    /// Walk the ring once following `next`, starting at `start`
    pub fn iter_from(&self, start: usize) -> RingIter<'_> {
        RingIter {
            pool: self,
            start,
            current: Some(start),
        }
    }

    /// Frames in eviction order, oldest first
    pub fn eviction_order(&self) -> Vec<usize> {
        self.iter_from(self.oldest).collect()
    }
}

pub struct RingIter<'a> {
    pool: &'a FramePool,
    start: usize,
    current: Option<usize>,
}

impl Iterator for RingIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let frame = self.current?;
        let next = self.pool.frames[frame].next;
        self.current = (next != self.start).then_some(next);
        Some(frame)
    }
}
