use std::time::{Instant, SystemTime};

use super::provider::{MetricsProvider, ProviderError, SysinfoProvider};
use super::rates::RateTracker;
use super::snapshot::Snapshot;

/// Assembles snapshots from a provider.
///
/// Owns the network baselines, so it must be kept alive across ticks for rates
/// to be meaningful.
pub struct Collector<P = SysinfoProvider> {
    provider: P,
    rates: RateTracker,
}

impl Default for Collector<SysinfoProvider> {
    fn default() -> Self {
        Self::new(SysinfoProvider::new())
    }
}

impl<P: MetricsProvider> Collector<P> {
    pub fn new(provider: P) -> Self {
        Collector {
            provider,
            rates: RateTracker::new(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Reads every category. Any failure discards the whole snapshot; the rate
    /// baselines only move forward once all fallible reads succeeded.
    pub fn collect(&mut self) -> Result<Snapshot, ProviderError> {
        let timestamp = Instant::now();
        let captured_at = SystemTime::now();

        let cpu = self.provider.read_cpu()?;
        let memory = self.provider.read_memory()?;
        let disk = self.provider.read_disks()?;
        let counters = self.provider.read_network()?;
        let runtime = self.provider.read_runtime();

        let network = self.rates.observe(counters, timestamp);

        Ok(Snapshot {
            timestamp,
            captured_at,
            cpu,
            memory,
            disk,
            network,
            runtime,
        })
    }
}
