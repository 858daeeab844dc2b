//! What each panel currently shows.
//!
//! The scheduler writes into these views when a panel is allowed to redraw;
//! the UI only ever reads them. A throttled panel therefore keeps showing the
//! content from its last permitted redraw.

use crate::system::snapshot::{DiskStat, MemoryStat, NetworkStat, RuntimeStat};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuView {
    pub aggregate: f32,
    pub cores: Vec<f32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryView {
    pub stat: MemoryStat,
    /// Present only when the runtime section was enabled at render time.
    pub runtime: Option<RuntimeStat>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiskView {
    pub disks: Vec<DiskStat>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkView {
    /// Ranked interfaces still present in the snapshot, busiest first.
    pub columns: Vec<NetworkStat>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyHints {
    pub quit: String,
    pub toggle_runtime: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    pub samples: u64,
    pub cpu: CpuView,
    pub memory: Option<MemoryView>,
    pub disk: DiskView,
    pub network: Option<NetworkView>,
    pub runtime_enabled: bool,
    pub hints: KeyHints,
}

impl Dashboard {
    pub fn has_data(&self) -> bool {
        self.samples > 0
    }
}
