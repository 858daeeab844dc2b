use std::collections::HashMap;
use std::time::Instant;

use super::provider::NetworkCounters;
use super::snapshot::NetworkStat;

#[derive(Debug, Clone)]
struct Baseline {
    counters: NetworkCounters,
    at: Instant,
}

/// Turns cumulative interface counters into per-second rates.
///
/// Keeps the previous reading per interface name. Names missing from a reading
/// are forgotten so a returning interface starts over from a raw reading.
#[derive(Debug, Default)]
pub struct RateTracker {
    previous: HashMap<String, Baseline>,
}

impl RateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, readings: Vec<NetworkCounters>, at: Instant) -> Vec<NetworkStat> {
        let mut next = HashMap::with_capacity(readings.len());
        let mut stats = Vec::with_capacity(readings.len());

        for counters in readings {
            let stat = match self.previous.get(&counters.name) {
                Some(prev) => {
                    let elapsed = at.saturating_duration_since(prev.at).as_secs_f64();
                    NetworkStat {
                        name: counters.name.clone(),
                        rx_bytes: rate(prev.counters.rx_bytes, counters.rx_bytes, elapsed),
                        tx_bytes: rate(prev.counters.tx_bytes, counters.tx_bytes, elapsed),
                        rx_packets: rate(prev.counters.rx_packets, counters.rx_packets, elapsed),
                        tx_packets: rate(prev.counters.tx_packets, counters.tx_packets, elapsed),
                    }
                }
                None => NetworkStat {
                    name: counters.name.clone(),
                    rx_bytes: counters.rx_bytes,
                    tx_bytes: counters.tx_bytes,
                    rx_packets: counters.rx_packets,
                    tx_packets: counters.tx_packets,
                },
            };
            stats.push(stat);
            next.insert(counters.name.clone(), Baseline { counters, at });
        }

        self.previous = next;
        stats
    }

    pub fn tracked(&self) -> usize {
        self.previous.len()
    }
}

/// Counter resets and wraparound show up as a negative delta and read as 0.
fn rate(previous: u64, current: u64, elapsed_secs: f64) -> u64 {
    if elapsed_secs <= 0.0 {
        return 0;
    }
    let delta = current.saturating_sub(previous);
    (delta as f64 / elapsed_secs) as u64
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn counters(name: &str, rx: u64, tx: u64) -> NetworkCounters {
        NetworkCounters {
            name: name.to_string(),
            rx_bytes: rx,
            tx_bytes: tx,
            rx_packets: rx / 100,
            tx_packets: tx / 100,
        }
    }

    #[test]
    fn first_observation_reports_raw_counters() {
        let mut tracker = RateTracker::new();
        let stats = tracker.observe(vec![counters("eth0", 5_000, 1_200)], Instant::now());
        assert_eq!(stats[0].rx_bytes, 5_000);
        assert_eq!(stats[0].tx_bytes, 1_200);
        assert_eq!(stats[0].rx_packets, 50);
    }

    #[test]
    fn second_observation_divides_by_elapsed() {
        let mut tracker = RateTracker::new();
        let t0 = Instant::now();
        tracker.observe(vec![counters("eth0", 1_000, 1_000)], t0);
        let stats = tracker.observe(
            vec![counters("eth0", 5_000, 2_000)],
            t0 + Duration::from_secs(2),
        );
        assert_eq!(stats[0].rx_bytes, 2_000);
        assert_eq!(stats[0].tx_bytes, 500);
        assert_eq!(stats[0].rx_packets, 20);
        assert_eq!(stats[0].tx_packets, 5);
    }

    #[test]
    fn negative_delta_clamps_to_zero() {
        let mut tracker = RateTracker::new();
        let t0 = Instant::now();
        tracker.observe(vec![counters("eth0", 9_000, 9_000)], t0);
        let stats = tracker.observe(
            vec![counters("eth0", 100, 10_000)],
            t0 + Duration::from_secs(1),
        );
        assert_eq!(stats[0].rx_bytes, 0);
        assert_eq!(stats[0].tx_bytes, 1_000);
    }

    #[test]
    fn zero_elapsed_yields_zero_rates() {
        let mut tracker = RateTracker::new();
        let t0 = Instant::now();
        tracker.observe(vec![counters("lo", 100, 100)], t0);
        let stats = tracker.observe(vec![counters("lo", 900, 900)], t0);
        assert_eq!(stats[0].rx_bytes, 0);
        assert_eq!(stats[0].tx_bytes, 0);
    }

    #[test]
    fn vanished_interfaces_are_forgotten() {
        let mut tracker = RateTracker::new();
        let t0 = Instant::now();
        tracker.observe(vec![counters("eth0", 10, 10), counters("wg0", 10, 10)], t0);
        assert_eq!(tracker.tracked(), 2);

        tracker.observe(vec![counters("eth0", 20, 20)], t0 + Duration::from_secs(1));
        assert_eq!(tracker.tracked(), 1);

        // wg0 comes back without a baseline
        let stats = tracker.observe(
            vec![counters("eth0", 30, 30), counters("wg0", 700, 700)],
            t0 + Duration::from_secs(2),
        );
        assert_eq!(stats[1].rx_bytes, 700);
    }

    #[test]
    fn output_preserves_provider_order() {
        let mut tracker = RateTracker::new();
        let stats = tracker.observe(
            vec![counters("b", 1, 1), counters("a", 1, 1), counters("c", 1, 1)],
            Instant::now(),
        );
        let names: Vec<&str> = stats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }
}
