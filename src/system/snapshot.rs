use std::time::{Duration, Instant, SystemTime};

use serde::Serialize;

/// One sampling tick worth of resource readings.
///
/// Built once by the collector and never mutated afterwards; it moves by value
/// through the stream buffer and is dropped by the scheduler after rendering.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    #[serde(skip)]
    pub timestamp: Instant,
    pub captured_at: SystemTime,
    /// Index 0 is the aggregate, 1.. are the logical cores in provider order.
    pub cpu: Vec<f32>,
    pub memory: MemoryStat,
    pub disk: Vec<DiskStat>,
    pub network: Vec<NetworkStat>,
    pub runtime: RuntimeStat,
}

impl Snapshot {
    pub fn aggregate_cpu(&self) -> f32 {
        self.cpu.first().copied().unwrap_or(0.0)
    }

    pub fn per_core(&self) -> &[f32] {
        self.cpu.get(1..).unwrap_or(&[])
    }

    pub fn core_count(&self) -> usize {
        self.cpu.len().saturating_sub(1)
    }

    pub fn interface(&self, name: &str) -> Option<&NetworkStat> {
        self.network.iter().find(|n| n.name == name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MemoryStat {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub used_percent: f64,
}

impl MemoryStat {
    pub fn new(total: u64, used: u64, free: u64) -> Self {
        Self {
            total,
            used,
            free,
            used_percent: used_percent(used, total),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiskStat {
    pub path: String,
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub used_percent: f64,
}

impl DiskStat {
    pub fn new(path: impl Into<String>, total: u64, used: u64, free: u64) -> Self {
        Self {
            path: path.into(),
            total,
            used,
            free,
            used_percent: used_percent(used, total),
        }
    }
}

/// Per-second rates for one interface.
///
/// On the first tick an interface is seen these hold the raw cumulative
/// counters instead, since no baseline exists yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetworkStat {
    pub name: String,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub rx_packets: u64,
    pub tx_packets: u64,
}

impl NetworkStat {
    pub fn total_bytes(&self) -> u64 {
        self.rx_bytes.saturating_add(self.tx_bytes)
    }
}

/// Statistics about the monitor process itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RuntimeStat {
    pub workers: usize,
    pub heap_bytes: u64,
    pub reserved_bytes: u64,
    pub gc_cycles: u32,
    pub gc_pause: Duration,
}

/// `used / total * 100`, kept inside `[0, 100]`. A zero total reads as 0 %.
pub fn used_percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (used as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn used_percent_is_bounded() {
        assert_eq!(used_percent(0, 0), 0.0);
        assert_eq!(used_percent(50, 200), 25.0);
        assert_eq!(used_percent(300, 200), 100.0);
    }

    #[test]
    fn cpu_accessors_split_aggregate_from_cores() {
        let snapshot = Snapshot {
            timestamp: Instant::now(),
            captured_at: SystemTime::now(),
            cpu: vec![40.0, 10.0, 70.0],
            memory: MemoryStat::default(),
            disk: Vec::new(),
            network: Vec::new(),
            runtime: RuntimeStat::default(),
        };
        assert_eq!(snapshot.aggregate_cpu(), 40.0);
        assert_eq!(snapshot.per_core(), &[10.0, 70.0]);
        assert_eq!(snapshot.core_count(), 2);
    }

    #[test]
    fn empty_cpu_reads_as_idle() {
        let snapshot = Snapshot {
            timestamp: Instant::now(),
            captured_at: SystemTime::now(),
            cpu: Vec::new(),
            memory: MemoryStat::default(),
            disk: Vec::new(),
            network: Vec::new(),
            runtime: RuntimeStat::default(),
        };
        assert_eq!(snapshot.aggregate_cpu(), 0.0);
        assert!(snapshot.per_core().is_empty());
        assert_eq!(snapshot.core_count(), 0);
    }
}
