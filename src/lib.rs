pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod memory;
pub mod page_table;
pub mod process;
pub mod report;
pub mod simulator;
pub mod translation;

// Re-export commonly used items for convenience
pub use config::{Architecture, SimConfig, SimType};
pub use constants::*;
pub use error::{Result, SimError};
pub use memory::FramePool;
pub use page_table::PageTable;
pub use process::{ProcessStats, TraceSource, VecTrace};
pub use report::SimulationReport;
pub use simulator::Simulator;
pub use translation::{MemoryAccess, Resolution, VirtualAddress};
