//! Simulation configuration
//!
//! Validated once, before any simulation runs. A `SimConfig` that exists is
//! always usable: the frame count is at least two and the two-level split
//! leaves at least one bit for the second level.

use std::fmt;

use log::debug;

use crate::constants::*;
use crate::error::{Result, SimError};

/// The paging architectures the simulator can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    OneLevelFifo,
    OneLevelLru,
    TwoLevel,
    Inverted,
}

impl Architecture {
    pub const ALL: [Architecture; 4] = [
        Architecture::OneLevelFifo,
        Architecture::OneLevelLru,
        Architecture::TwoLevel,
        Architecture::Inverted,
    ];

    /// Short tag used in verbose per-access lines
    pub fn trace_tag(&self) -> &'static str {
        match self {
            Architecture::OneLevelFifo | Architecture::OneLevelLru => "One-Level",
            Architecture::TwoLevel => "Two-Level",
            Architecture::Inverted => "IHT",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Architecture::OneLevelFifo => "One-Level Page Table with FIFO",
            Architecture::OneLevelLru => "One-Level Page Table with LRU",
            Architecture::TwoLevel => "Two-Level Page Table",
            Architecture::Inverted => "Inverted Page Table",
        };
        f.write_str(name)
    }
}

/// Which architectures to run
///
/// 0 runs one-level FIFO and LRU, 1 the two-level table, 2 the inverted
/// table, and anything larger runs all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimType(pub u32);

impl SimType {
    pub fn architectures(&self) -> &'static [Architecture] {
        match self.0 {
            0 => &[Architecture::OneLevelFifo, Architecture::OneLevelLru],
            1 => &[Architecture::TwoLevel],
            2 => &[Architecture::Inverted],
            _ => &Architecture::ALL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimConfig {
    pub sim_type: SimType,
    pub first_level_bits: u32,
    pub phys_mem_bits: u32,
}

impl SimConfig {
    pub fn new(sim_type: SimType, first_level_bits: u32, phys_mem_bits: u32) -> Result<Self> {
        if phys_mem_bits <= PAGE_SIZE_BITS {
            return Err(SimError::PhysicalMemoryTooSmall { bits: phys_mem_bits });
        }
        if phys_mem_bits > MAX_PHYS_MEM_BITS {
            return Err(SimError::PhysicalMemoryTooLarge { bits: phys_mem_bits });
        }
        if first_level_bits >= VPN_BITS {
            return Err(SimError::FirstLevelBitsTooLarge { bits: first_level_bits });
        }

        let config = SimConfig {
            sim_type,
            first_level_bits,
            phys_mem_bits,
        };
        debug!(
            "config: sim type {}, {} first-level bits, {} frames",
            sim_type.0,
            first_level_bits,
            config.frame_count()
        );
        Ok(config)
    }

    /// Number of physical frames
    #[inline]
    pub fn frame_count(&self) -> usize {
        1 << (self.phys_mem_bits - PAGE_SIZE_BITS)
    }

    /// Physical memory size in bytes
    #[inline]
    pub fn phys_mem_size(&self) -> u64 {
        1u64 << self.phys_mem_bits
    }

    #[inline]
    pub fn second_level_bits(&self) -> u32 {
        VPN_BITS - self.first_level_bits
    }
}
