//! Simulation results and their text rendering

use std::fmt;

use crate::config::Architecture;
use crate::process::ProcessStats;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessReport {
    pub pid: usize,
    pub name: String,
    pub stats: ProcessStats,
}

/// Final counters of every process for one architecture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationReport {
    pub architecture: Architecture,
    pub processes: Vec<ProcessReport>,
}

impl SimulationReport {
    /// The rule-framed "Simulation Starts" banner printed before a run
    pub fn banner(architecture: Architecture) -> String {
        let rule = "=".repeat(61);
        format!(
            "{rule}\nThe {} Memory Simulation Starts .....\n{rule}",
            architecture
        )
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in &self.processes {
            let (pid, s) = (p.pid, &p.stats);
            writeln!(f, "**** {} *****", p.name)?;
            writeln!(f, "Proc {} Num of traces {}", pid, s.traces)?;
            match self.architecture {
                Architecture::TwoLevel => writeln!(
                    f,
                    "Proc {} Num of second level page tables allocated {}",
                    pid, s.second_level_tables
                )?,
                Architecture::Inverted => {
                    writeln!(
                        f,
                        "Proc {} Num of Inverted Hash Table Access Conflicts {}",
                        pid, s.hash_conflicts
                    )?;
                    writeln!(
                        f,
                        "Proc {} Num of Empty Inverted Hash Table Access {}",
                        pid, s.empty_bucket_accesses
                    )?;
                    writeln!(
                        f,
                        "Proc {} Num of Non-Empty Inverted Hash Table Access {}",
                        pid, s.non_empty_bucket_accesses
                    )?;
                }
                Architecture::OneLevelFifo | Architecture::OneLevelLru => {}
            }
            writeln!(f, "Proc {} Num of Page Faults {}", pid, s.page_faults)?;
            writeln!(f, "Proc {} Num of Page Hit {}", pid, s.page_hits)?;
        }
        Ok(())
    }
}

/// One translated access, as seen by a verbose observer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessEvent {
    pub architecture: Architecture,
    pub pid: usize,
    pub trace_number: u64,
    pub virtual_address: u32,
    pub physical_address: u64,
    pub hit: bool,
}

impl fmt::Display for AccessEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} procID {} traceNumber {} virtual addr {:x} physical addr {:x}",
            self.architecture.trace_tag(),
            self.pid,
            self.trace_number,
            self.virtual_address,
            self.physical_address
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(architecture: Architecture) -> SimulationReport {
        SimulationReport {
            architecture,
            processes: vec![ProcessReport {
                pid: 0,
                name: "gcc.trace".to_string(),
                stats: ProcessStats {
                    traces: 10,
                    page_faults: 4,
                    page_hits: 6,
                    second_level_tables: 2,
                    hash_conflicts: 7,
                    empty_bucket_accesses: 3,
                    non_empty_bucket_accesses: 7,
                },
            }],
        }
    }

    #[test]
    fn test_one_level_report() {
        let text = report(Architecture::OneLevelFifo).to_string();
        assert_eq!(
            text,
            "**** gcc.trace *****\n\
             Proc 0 Num of traces 10\n\
             Proc 0 Num of Page Faults 4\n\
             Proc 0 Num of Page Hit 6\n"
        );
    }

    #[test]
    fn test_two_level_report() {
        let text = report(Architecture::TwoLevel).to_string();
        assert!(text.contains("Proc 0 Num of second level page tables allocated 2\n"));
        assert!(!text.contains("Inverted"));
    }

    #[test]
    fn test_inverted_report() {
        let text = report(Architecture::Inverted).to_string();
        assert!(text.contains("Proc 0 Num of Inverted Hash Table Access Conflicts 7\n"));
        assert!(text.contains("Proc 0 Num of Empty Inverted Hash Table Access 3\n"));
        assert!(text.contains("Proc 0 Num of Non-Empty Inverted Hash Table Access 7\n"));
        assert!(!text.contains("second level"));
    }

    #[test]
    fn test_banner() {
        let banner = SimulationReport::banner(Architecture::TwoLevel);
        assert!(banner.contains("The Two-Level Page Table Memory Simulation Starts ....."));
        assert_eq!(banner.lines().count(), 3);
    }

    #[test]
    fn test_access_event_line() {
        let event = AccessEvent {
            architecture: Architecture::TwoLevel,
            pid: 1,
            trace_number: 3,
            virtual_address: 0x0041_f7a0,
            physical_address: 0x27a0,
            hit: false,
        };
        assert_eq!(
            event.to_string(),
            "Two-Level procID 1 traceNumber 3 virtual addr 41f7a0 physical addr 27a0"
        );
    }
}
