//! End-to-end tests: complete runs assembled through `SimBuilder`.

use std::collections::HashMap;

use ap_core::{AirportConfig, Priority, ServerId, SimTime, VariateGenerator, WaitingConfig};
use ap_engine::{Event, NoopObserver, Notification, SimObserver};
use ap_model::{ArrivalManifest, Observation, PlannedArrival};

use crate::{SimBuilder, SimError, run_batch};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn config(servers: usize, waiting: WaitingConfig, seed: u64) -> AirportConfig {
    AirportConfig { servers, waiting, seed: Some(seed), ..AirportConfig::default() }
}

fn queues(count: usize) -> WaitingConfig {
    WaitingConfig::Queues { count, capacity: None }
}

/// Checks occupancy and clock invariants on every callback and records the
/// dispatched events.
struct InvariantObserver {
    servers:   usize,
    occupied:  HashMap<ServerId, u32>,
    last_time: SimTime,
    events:    Vec<Event>,
    entered:   Vec<u32>,
}

impl InvariantObserver {
    fn new(servers: usize) -> Self {
        Self {
            servers,
            occupied: HashMap::new(),
            last_time: SimTime::ZERO,
            events: Vec::new(),
            entered: Vec::new(),
        }
    }
}

impl SimObserver for InvariantObserver {
    fn on_event(&mut self, event: &Event) {
        assert!(event.time() >= self.last_time, "clock moved backwards");
        self.last_time = event.time();
        self.events.push(*event);
    }

    fn on_notification(&mut self, now: SimTime, notification: &Notification) {
        assert_eq!(now, self.last_time);
        match *notification {
            Notification::EnteredService { entity, server } => {
                assert!(server.index() < self.servers);
                let prev = self.occupied.insert(server, entity.0);
                assert_eq!(prev, None, "{server} bound twice");
                assert!(self.occupied.len() <= self.servers);
                self.entered.push(entity.0);
            }
            Notification::Departed { entity, server } => {
                assert_eq!(self.occupied.remove(&server), Some(entity.0));
            }
            Notification::Enqueued { .. } | Notification::Diverted { .. } => {}
        }
    }
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenarios {
    use super::*;

    /// One gate, nowhere to wait: every arrival that finds the gate busy is
    /// diverted.  The expected count is traced by hand from a second
    /// generator with the same seed, consuming draws in the model's order
    /// (service duration, priority, next gap).
    #[test]
    fn single_gate_without_waiting_room_diverts() {
        let cfg = AirportConfig {
            mean_arrival_time: 1.0,
            mean_service_time: 3.0,
            total_arrivals:    10,
            ..config(1, queues(0), 2024)
        };

        let mut trace = VariateGenerator::new(2024);
        let mut now = 0.0;
        let mut busy_until = 0.0;
        let mut expected_diverted = 0;
        for k in 0..10 {
            let service = trace.exponential(3.0);
            trace.bernoulli(cfg.high_priority_fraction);
            if busy_until > now {
                expected_diverted += 1;
            } else {
                busy_until = now + service;
            }
            if k < 9 {
                now += trace.exponential(1.0);
            }
        }

        let mut obs = InvariantObserver::new(1);
        let report = SimBuilder::new(cfg).build().unwrap().run(&mut obs).unwrap();

        assert!(expected_diverted > 0);
        assert_eq!(report.diverted, expected_diverted);
        assert_eq!(report.served + report.diverted, 10);
        assert_eq!(report.in_system_at_end, 0);
    }

    #[test]
    fn fast_service_never_diverts() {
        let cfg = AirportConfig {
            mean_arrival_time: 1.0,
            mean_service_time: 0.5,
            total_arrivals:    10,
            ..config(5, queues(3), 99)
        };
        let mut obs = InvariantObserver::new(5);
        let report = SimBuilder::new(cfg).build().unwrap().run(&mut obs).unwrap();

        assert_eq!(report.diverted, 0);
        assert_eq!(report.served, 10);
        assert!(obs.occupied.is_empty(), "every entity departed");

        let utilization = report.total_busy_time() / report.end_time;
        let per_gate: f64 = report.servers.iter().map(|s| s.utilization).sum();
        assert!((utilization - per_gate).abs() < 1e-9);
        assert!((report.average_utilization * 5.0 - per_gate).abs() < 1e-9);
        assert!((report.average_service_time * 10.0 - report.total_busy_time()).abs() < 1e-9);
    }

    #[test]
    fn late_high_priority_overtakes_queued_normal() {
        let arrivals = vec![
            PlannedArrival { time: 0.0, priority: Priority::Normal, service_time: 4.0 },
            PlannedArrival { time: 1.0, priority: Priority::Normal, service_time: 1.0 },
            PlannedArrival { time: 2.0, priority: Priority::High, service_time: 1.0 },
        ];
        let mut obs = InvariantObserver::new(1);
        let report = SimBuilder::new(config(1, queues(1), 1))
            .arrivals(ArrivalManifest::new(arrivals).unwrap())
            .build()
            .unwrap()
            .run(&mut obs)
            .unwrap();

        assert_eq!(obs.entered, vec![0, 2, 1]);
        assert_eq!(report.arrived_high, 1);
        assert_eq!(report.served, 3);
    }

    #[test]
    fn out_of_range_decision_falls_back() {
        let arrivals = [(0.0, 5.0), (1.0, 1.0), (2.0, 1.0)]
            .into_iter()
            .map(|(time, service_time)| PlannedArrival { time, priority: Priority::Normal, service_time })
            .collect();
        let mut sim = SimBuilder::new(config(1, queues(1), 1))
            .decision_maker(|_: &Observation| 1_000)
            .arrivals(ArrivalManifest::new(arrivals).unwrap())
            .build()
            .unwrap();
        let mut obs = InvariantObserver::new(1);
        let report = sim.run(&mut obs).unwrap();

        assert_eq!(obs.entered, vec![0, 1, 2]);
        assert_eq!(report.served, 3);
        assert_eq!(sim.model.rejected_decisions(), 1);
    }

    #[test]
    fn invalid_decisions_never_stall_a_stochastic_run() {
        let cfg = AirportConfig { total_arrivals: 50, ..config(1, queues(2), 8) };
        let mut sim = SimBuilder::new(cfg).decision_maker(|_: &Observation| -5).build().unwrap();
        let report = sim.run(&mut InvariantObserver::new(1)).unwrap();
        assert_eq!(report.served + report.diverted, 50);
    }

    #[test]
    fn holds_retry_until_a_gate_frees() {
        let cfg = AirportConfig {
            total_arrivals: 40,
            ..config(2, WaitingConfig::Holds { slots: 3, retry_interval: 0.25 }, 17)
        };
        let mut obs = InvariantObserver::new(2);
        let report = SimBuilder::new(cfg).build().unwrap().run(&mut obs).unwrap();

        assert_eq!(report.served + report.diverted, 40);
        assert!(report.max_queue_length <= 3);
    }
}

// ── Determinism and invariants ────────────────────────────────────────────────

#[cfg(test)]
mod determinism {
    use super::*;

    #[test]
    fn same_seed_replays_identically() {
        let cfg = AirportConfig { total_arrivals: 100, ..config(3, queues(2), 31) };

        let mut a = InvariantObserver::new(3);
        let ra = SimBuilder::new(cfg.clone()).build().unwrap().run(&mut a).unwrap();
        let mut b = InvariantObserver::new(3);
        let rb = SimBuilder::new(cfg).build().unwrap().run(&mut b).unwrap();

        assert_eq!(ra, rb);
        assert_eq!(a.events, b.events);
    }

    #[test]
    fn entropy_seed_is_recorded_and_replayable() {
        let cfg = AirportConfig { seed: None, total_arrivals: 30, ..AirportConfig::default() };
        let first = SimBuilder::new(cfg.clone()).build().unwrap().run(&mut NoopObserver).unwrap();
        let replay = SimBuilder::new(cfg).seed(first.seed).build().unwrap().run(&mut NoopObserver).unwrap();
        assert_eq!(first, replay);
    }

    #[test]
    fn conservation_holds_after_every_event() {
        let cfg = AirportConfig {
            total_arrivals: 150,
            waiting: WaitingConfig::Queues { count: 2, capacity: Some(2) },
            ..config(2, queues(0), 5)
        };
        let mut sim = SimBuilder::new(cfg).build().unwrap();
        let mut obs = InvariantObserver::new(2);

        while !sim.is_complete() {
            assert!(sim.step(&mut obs).unwrap().is_some(), "queue drained early");
            let stats = sim.model.stats();
            assert_eq!(
                stats.arrived(),
                stats.served() + stats.diverted() + sim.model.in_system() as u64
            );
        }
        let report = sim.run(&mut obs).unwrap();
        assert_eq!(report.arrived, 150);
        assert_eq!(report.served + report.diverted, 150);
    }

    #[test]
    fn time_limit_leaves_entities_in_system() {
        let cfg = AirportConfig {
            total_arrivals:    1_000,
            mean_service_time: 5.0,
            time_limit:        Some(50.0),
            ..config(1, queues(1), 3)
        };
        let report = SimBuilder::new(cfg).build().unwrap().run(&mut NoopObserver).unwrap();
        assert!((report.end_time - 50.0).abs() < 1e-9);
        assert!(report.in_system_at_end > 0);
        assert_eq!(report.arrived, report.served + report.diverted + report.in_system_at_end);
    }

    #[test]
    fn warm_up_delays_first_arrival() {
        let cfg = AirportConfig { warm_up: 10.0, ..config(1, queues(1), 4) };
        let mut obs = InvariantObserver::new(1);
        SimBuilder::new(cfg).build().unwrap().run(&mut obs).unwrap();
        assert_eq!(obs.events[1].time(), SimTime(10.0));
    }

    #[test]
    fn invalid_config_is_rejected_before_running() {
        let cfg = AirportConfig { mean_service_time: 0.0, ..AirportConfig::default() };
        assert!(matches!(SimBuilder::new(cfg).build(), Err(SimError::Config(_))));
    }
}

// ── Batch ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod batch {
    use super::*;

    #[test]
    fn replications_use_consecutive_seeds() {
        let cfg = AirportConfig { total_arrivals: 40, ..config(2, queues(1), 100) };
        let summary = run_batch(&cfg, 4).unwrap();

        assert_eq!(summary.base_seed, 100);
        let seeds: Vec<u64> = summary.runs.iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![100, 101, 102, 103]);

        let single = SimBuilder::new(cfg).seed(102).build().unwrap().run(&mut NoopObserver).unwrap();
        assert_eq!(summary.runs[2], single);
    }

    #[test]
    fn spreads_bracket_their_mean() {
        let cfg = AirportConfig { total_arrivals: 40, ..config(1, queues(0), 9) };
        let summary = run_batch(&cfg, 5).unwrap();
        for s in [summary.average_delay, summary.utilization, summary.diverted, summary.throughput] {
            assert!(s.min <= s.mean + 1e-12 && s.mean <= s.max + 1e-12);
        }
    }

    #[test]
    fn zero_replications_rejected() {
        assert!(matches!(run_batch(&AirportConfig::default(), 0), Err(SimError::Config(_))));
    }
}
