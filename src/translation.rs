use std::fmt;

use crate::constants::*;
use crate::memory::FrameOwner;

/// Represents the decomposed components of a virtual address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualAddress {
    pub va: u32,
    pub vpn: u32,
    pub offset: u32,
}

impl VirtualAddress {
    /// Decompose a raw VA into page number and offset
    pub fn from_raw(va: u32) -> Self {
        let vpn = va >> PAGE_SIZE_BITS;
        let offset = va & OFFSET_MASK;

        VirtualAddress { va, vpn, offset }
    }

    /// Split the page number into (first-level index, second-level index)
    ///
    /// `first_level_bits` must be below `VPN_BITS`; `SimConfig` guarantees it.
    #[inline]
    pub fn split(&self, first_level_bits: u32) -> (u32, u32) {
        let second_bits = VPN_BITS - first_level_bits;
        let first = self.vpn >> second_bits;
        let second = self.vpn & ((1 << second_bits) - 1);
        (first, second)
    }
}

impl fmt::Display for VirtualAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VA({:#010x}) = (vpn={:#x}, offset={:#x})",
            self.va, self.vpn, self.offset
        )
    }
}

/// PA = frame * PAGE_SIZE + offset
#[inline]
pub fn physical_address(frame: usize, offset: u32) -> u64 {
    ((frame as u64) << PAGE_SIZE_BITS) | offset as u64
}

/// Read/write tag from the trace. Carried along but never changes a
/// replacement decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
}

/// One event of a process trace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryAccess {
    pub address: u32,
    pub kind: AccessKind,
}

impl MemoryAccess {
    pub fn read(address: u32) -> Self {
        MemoryAccess {
            address,
            kind: AccessKind::Read,
        }
    }

    pub fn write(address: u32) -> Self {
        MemoryAccess {
            address,
            kind: AccessKind::Write,
        }
    }
}

/// Outcome of resolving one access against a page table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Hit {
        frame: usize,
    },
    /// `evicted` is the mapping that owned `frame` before this fault, if any
    Fault {
        frame: usize,
        evicted: Option<FrameOwner>,
    },
}

impl Resolution {
    #[inline]
    pub fn frame(&self) -> usize {
        match *self {
            Resolution::Hit { frame } | Resolution::Fault { frame, .. } => frame,
        }
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, Resolution::Hit { .. })
    }
}
