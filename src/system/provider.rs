use std::time::{Duration, Instant};

use sysinfo::{
    CpuRefreshKind, Disks, MemoryRefreshKind, Networks, Pid, ProcessRefreshKind,
    ProcessesToUpdate, RefreshKind, System,
};
use thiserror::Error;

use super::snapshot::{DiskStat, MemoryStat, RuntimeStat};

/// A metrics category that could not be read for the current tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("cpu reading unavailable: {0}")]
    Cpu(String),
    #[error("memory reading unavailable: {0}")]
    Memory(String),
    #[error("disk reading unavailable: {0}")]
    Disk(String),
    #[error("network reading unavailable: {0}")]
    Network(String),
}

/// Cumulative interface counters as reported by the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkCounters {
    pub name: String,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub rx_packets: u64,
    pub tx_packets: u64,
}

/// Raw readings for one sampling tick.
///
/// Implementations are polled from the sampling task only, one category at a
/// time, so they may keep mutable refresh state.
pub trait MetricsProvider: Send + 'static {
    /// Aggregate utilization first, then one entry per logical core.
    fn read_cpu(&mut self) -> Result<Vec<f32>, ProviderError>;
    fn read_memory(&mut self) -> Result<MemoryStat, ProviderError>;
    fn read_disks(&mut self) -> Result<Vec<DiskStat>, ProviderError>;
    /// Cumulative counters; the collector turns them into rates.
    fn read_network(&mut self) -> Result<Vec<NetworkCounters>, ProviderError>;
    fn read_runtime(&mut self) -> RuntimeStat;
}

pub struct SysinfoProvider {
    sys: System,
    pid: Option<Pid>,
    last_cpu_refresh: Instant,
}

impl Default for SysinfoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoProvider {
    pub fn new() -> Self {
        let mut sys = System::new_with_specifics(
            RefreshKind::nothing()
                .with_cpu(CpuRefreshKind::nothing().with_cpu_usage())
                .with_memory(MemoryRefreshKind::everything()),
        );
        // Usage is computed between two refreshes; prime the baseline.
        sys.refresh_cpu_usage();
        let pid = sysinfo::get_current_pid().ok();
        SysinfoProvider {
            sys,
            pid,
            last_cpu_refresh: Instant::now(),
        }
    }

    pub fn logical_cores(&self) -> usize {
        self.sys.cpus().len()
    }
}

/// Time left before a CPU refresh yields a meaningful usage delta.
fn cpu_settle_delay(since_last_refresh: Duration) -> Duration {
    sysinfo::MINIMUM_CPU_UPDATE_INTERVAL.saturating_sub(since_last_refresh)
}

impl MetricsProvider for SysinfoProvider {
    fn read_cpu(&mut self) -> Result<Vec<f32>, ProviderError> {
        // Runs on the blocking pool, so waiting out the window here is fine.
        let delay = cpu_settle_delay(self.last_cpu_refresh.elapsed());
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        self.sys.refresh_cpu_usage();
        self.last_cpu_refresh = Instant::now();
        let cpus = self.sys.cpus();
        if cpus.is_empty() {
            return Err(ProviderError::Cpu("no logical cores reported".to_string()));
        }
        let mut usage = Vec::with_capacity(cpus.len() + 1);
        usage.push(self.sys.global_cpu_usage());
        usage.extend(cpus.iter().map(|cpu| cpu.cpu_usage()));
        Ok(usage)
    }

    fn read_memory(&mut self) -> Result<MemoryStat, ProviderError> {
        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        if total == 0 {
            return Err(ProviderError::Memory("total memory reported as zero".to_string()));
        }
        let used = self.sys.used_memory();
        Ok(MemoryStat::new(total, used, total.saturating_sub(used)))
    }

    fn read_disks(&mut self) -> Result<Vec<DiskStat>, ProviderError> {
        let disks = Disks::new_with_refreshed_list();
        Ok(disks
            .list()
            .iter()
            .map(|disk| {
                let total = disk.total_space();
                let free = disk.available_space();
                DiskStat::new(
                    disk.mount_point().to_string_lossy(),
                    total,
                    total.saturating_sub(free),
                    free,
                )
            })
            .collect())
    }

    fn read_network(&mut self) -> Result<Vec<NetworkCounters>, ProviderError> {
        let networks = Networks::new_with_refreshed_list();
        let mut counters: Vec<NetworkCounters> = networks
            .list()
            .iter()
            .map(|(name, data)| NetworkCounters {
                name: name.clone(),
                rx_bytes: data.total_received(),
                tx_bytes: data.total_transmitted(),
                rx_packets: data.total_packets_received(),
                tx_packets: data.total_packets_transmitted(),
            })
            .collect();
        // The platform map has no stable order; name order keeps ranking ties deterministic.
        counters.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(counters)
    }

    fn read_runtime(&mut self) -> RuntimeStat {
        let workers = tokio::runtime::Handle::try_current()
            .map(|handle| handle.metrics().num_alive_tasks())
            .unwrap_or(0);

        let (heap_bytes, reserved_bytes) = match self.pid {
            Some(pid) => {
                self.sys.refresh_processes_specifics(
                    ProcessesToUpdate::Some(&[pid]),
                    true,
                    ProcessRefreshKind::nothing().with_memory(),
                );
                self.sys
                    .process(pid)
                    .map(|p| (p.memory(), p.virtual_memory()))
                    .unwrap_or((0, 0))
            }
            None => (0, 0),
        };

        RuntimeStat {
            workers,
            heap_bytes,
            reserved_bytes,
            ..RuntimeStat::default()
        }
    }
}
