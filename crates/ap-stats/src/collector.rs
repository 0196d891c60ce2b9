//! `StatisticsCollector`: accumulates per-entity and per-server metrics as
//! the model processes events.

use ap_core::{Priority, ServerId, SimTime};

use crate::report::{Report, ServerReport};
use crate::ratio;

#[derive(Clone, Debug, Default)]
struct ServerTotals {
    busy_time: f64,
    services:  u64,
}

/// Running sums and counts for one run.
///
/// Mutated only through the `record_*` methods; read once by
/// [`finalize`](Self::finalize).
#[derive(Clone, Debug)]
pub struct StatisticsCollector {
    start: SimTime,

    arrived:         u64,
    arrived_high:    u64,
    served:          u64,
    served_high:     u64,
    diverted:        u64,
    diverted_high:   u64,

    started:         u64,
    delayed:         u64,
    total_delay:     f64,
    max_delay:       f64,
    total_service:   f64,

    servers: Vec<ServerTotals>,

    // Waiting-area length, sampled at each state change and integrated over
    // time.
    queue_samples:   u64,
    queue_sample_sum: f64,
    queue_max:       usize,
    queue_area:      f64,
    queue_last:      usize,
    queue_last_time: SimTime,
}

impl StatisticsCollector {
    /// Create a collector for `servers` gates, with the run starting at
    /// `start`.
    pub fn new(servers: usize, start: SimTime) -> Self {
        Self {
            start,
            arrived:          0,
            arrived_high:     0,
            served:           0,
            served_high:      0,
            diverted:         0,
            diverted_high:    0,
            started:          0,
            delayed:          0,
            total_delay:      0.0,
            max_delay:        0.0,
            total_service:    0.0,
            servers:          vec![ServerTotals::default(); servers],
            queue_samples:    0,
            queue_sample_sum: 0.0,
            queue_max:        0,
            queue_area:       0.0,
            queue_last:       0,
            queue_last_time:  start,
        }
    }

    pub fn record_arrival(&mut self, priority: Priority) {
        self.arrived += 1;
        if priority.is_high() {
            self.arrived_high += 1;
        }
    }

    /// An entity that arrived at `arrival` starts service at `start`.  Any
    /// gap between the two counts as delay.
    pub fn record_service_start(&mut self, arrival: SimTime, start: SimTime) {
        self.started += 1;
        let delay = start.since(arrival);
        if delay > 0.0 {
            self.delayed += 1;
            self.total_delay += delay;
            self.max_delay = self.max_delay.max(delay);
        }
    }

    /// An entity of class `priority` finished the service it began at
    /// `start` and departed at `end`.
    pub fn record_service_end(&mut self, priority: Priority, start: SimTime, end: SimTime) {
        self.served += 1;
        if priority.is_high() {
            self.served_high += 1;
        }
        self.total_service += end.since(start);
    }

    /// Add `duration` of busy time to `server` and count one completed
    /// service there.
    pub fn record_server_busy(&mut self, server: ServerId, duration: f64) {
        if let Some(totals) = self.servers.get_mut(server.index()) {
            totals.busy_time += duration;
            totals.services += 1;
        }
    }

    /// Busy time of a service cut short by the end of the run.  Adds time
    /// without counting a completed service.
    pub fn record_partial_busy(&mut self, server: ServerId, duration: f64) {
        if let Some(totals) = self.servers.get_mut(server.index()) {
            totals.busy_time += duration;
        }
    }

    pub fn record_diversion(&mut self, priority: Priority) {
        self.diverted += 1;
        if priority.is_high() {
            self.diverted_high += 1;
        }
    }

    /// Sample the number of waiting entities after a state change at `now`.
    pub fn record_waiting(&mut self, now: SimTime, waiting: usize) {
        self.advance_queue_area(now);
        self.queue_last = waiting;
        self.queue_samples += 1;
        self.queue_sample_sum += waiting as f64;
        self.queue_max = self.queue_max.max(waiting);
    }

    fn advance_queue_area(&mut self, now: SimTime) {
        self.queue_area += self.queue_last as f64 * now.since(self.queue_last_time);
        if now > self.queue_last_time {
            self.queue_last_time = now;
        }
    }

    // ── Read-only views ───────────────────────────────────────────────────

    pub fn arrived(&self) -> u64 {
        self.arrived
    }

    pub fn served(&self) -> u64 {
        self.served
    }

    pub fn diverted(&self) -> u64 {
        self.diverted
    }

    /// Busy time accumulated so far at `server`.
    pub fn busy_time(&self, server: ServerId) -> f64 {
        self.servers.get(server.index()).map_or(0.0, |s| s.busy_time)
    }

    // ── Finalization ──────────────────────────────────────────────────────

    /// Derive the report.
    ///
    /// `in_system` is the number of entities still queued, held or in
    /// service when the run ended; `seed` is the seed the run used.
    pub fn finalize(&mut self, end: SimTime, in_system: u64, seed: u64) -> Report {
        self.advance_queue_area(end);
        let elapsed = end.since(self.start);

        let servers: Vec<ServerReport> = self
            .servers
            .iter()
            .map(|s| ServerReport {
                busy_time:   s.busy_time,
                services:    s.services,
                utilization: ratio(s.busy_time, elapsed),
            })
            .collect();
        let average_utilization =
            ratio(servers.iter().map(|s| s.utilization).sum(), servers.len() as f64);

        Report {
            seed,
            end_time: end.as_f64(),
            elapsed,

            arrived:            self.arrived,
            arrived_high:       self.arrived_high,
            served:             self.served,
            served_high:        self.served_high,
            served_normal:      self.served - self.served_high,
            diverted:           self.diverted,
            diverted_high:      self.diverted_high,
            in_system_at_end:   in_system,

            delayed:              self.delayed,
            percent_delayed:      100.0 * ratio(self.delayed as f64, self.started as f64),
            total_delay:          self.total_delay,
            average_delay:        ratio(self.total_delay, self.started as f64),
            average_delay_of_delayed: ratio(self.total_delay, self.delayed as f64),
            max_delay:            self.max_delay,
            average_service_time: ratio(self.total_service, self.served as f64),

            servers,
            average_utilization,

            average_queue_length:     ratio(self.queue_sample_sum, self.queue_samples as f64),
            time_average_queue_length: ratio(self.queue_area, elapsed),
            max_queue_length:         self.queue_max,

            throughput: ratio(self.served as f64, elapsed),
        }
    }
}
