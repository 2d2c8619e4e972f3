//! Round-robin trace driver
//!
//! Each round takes one access from every process that still has trace left,
//! in pid order, until all traces are exhausted. Every run starts from a
//! reset frame pool, rewound traces, zeroed counters and empty tables, so
//! runs never observe each other.

use log::{debug, info};

use crate::config::{Architecture, SimConfig};
use crate::error::Result;
use crate::memory::FramePool;
use crate::page_table;
use crate::process::{Process, TraceSource};
use crate::report::{AccessEvent, ProcessReport, SimulationReport};
use crate::translation::{physical_address, VirtualAddress};

pub type AccessObserver = Box<dyn FnMut(&AccessEvent)>;

pub struct Simulator<T> {
    config: SimConfig,
    frames: FramePool,
    processes: Vec<Process<T>>,
    observer: Option<AccessObserver>,
}

impl<T: TraceSource> Simulator<T> {
    /// Processes get pids in the order their traces are given
    pub fn new(config: SimConfig, traces: Vec<(String, T)>) -> Self {
        let processes = traces
            .into_iter()
            .enumerate()
            .map(|(pid, (name, trace))| Process::new(pid, name, trace))
            .collect();
        Simulator {
            config,
            frames: FramePool::new(config.frame_count()),
            processes,
            observer: None,
        }
    }

    /// Call `observer` after every translated access
    pub fn with_observer(mut self, observer: impl FnMut(&AccessEvent) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn frames(&self) -> &FramePool {
        &self.frames
    }

    pub fn processes(&self) -> &[Process<T>] {
        &self.processes
    }

    /// Run every architecture the configured `SimType` selects, in order
    pub fn run_selected(&mut self) -> Result<Vec<SimulationReport>> {
        self.config
            .sim_type
            .architectures()
            .iter()
            .map(|&arch| self.run(arch))
            .collect()
    }

    pub fn run(&mut self, architecture: Architecture) -> Result<SimulationReport> {
        info!(
            "{} simulation starts: {} processes, {} frames",
            architecture,
            self.processes.len(),
            self.frames.len()
        );

        self.frames.reset();
        for process in self.processes.iter_mut() {
            process.reset()?;
        }
        let mut table = page_table::build(architecture, &self.config, self.processes.len());

        let mut active = self.processes.len();
        while active > 0 {
            for process in self.processes.iter_mut() {
                if process.finished {
                    continue;
                }
                let Some(access) = process.trace.next_access()? else {
                    debug!("process {} ({}) reached end of trace", process.pid, process.name);
                    process.finished = true;
                    active -= 1;
                    continue;
                };

                let va = VirtualAddress::from_raw(access.address);
                let resolution =
                    table.resolve(process.pid, va, &mut self.frames, &mut process.stats);
                if resolution.is_hit() {
                    process.stats.page_hits += 1;
                } else {
                    process.stats.page_faults += 1;
                }
                process.stats.traces += 1;

                if let Some(observer) = self.observer.as_mut() {
                    observer(&AccessEvent {
                        architecture,
                        pid: process.pid,
                        trace_number: process.stats.traces,
                        virtual_address: access.address,
                        physical_address: physical_address(resolution.frame(), va.offset),
                        hit: resolution.is_hit(),
                    });
                }
            }
        }

        for process in &self.processes {
            process.stats.check(architecture, process.pid)?;
        }
        info!("{} simulation done", architecture);

        Ok(SimulationReport {
            architecture,
            processes: self
                .processes
                .iter()
                .map(|p| ProcessReport {
                    pid: p.pid,
                    name: p.name.clone(),
                    stats: p.stats,
                })
                .collect(),
        })
    }
}
