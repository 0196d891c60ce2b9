//! Integration tests for ap-output.

#[cfg(test)]
mod row_tests {
    use ap_core::{EntityId, QueueId, ServerId, SimTime, SlotId};
    use ap_engine::{Notification, WaitingSpot};

    use crate::row::{EventRow, NO_LOCATION};

    #[test]
    fn notifications_map_to_rows() {
        let now = SimTime(2.5);
        let queued = Notification::Enqueued {
            entity:   EntityId(4),
            spot:     WaitingSpot::Queue(QueueId(1)),
            position: 3,
        };
        let row = EventRow::from_notification(now, &queued);
        assert_eq!((row.event, row.entity, row.location, row.position), ("queued", 4, 1, 3));
        assert_eq!(row.time, 2.5);

        let held = Notification::Enqueued { entity: EntityId(5), spot: WaitingSpot::Hold(SlotId(2)), position: 0 };
        assert_eq!(EventRow::from_notification(now, &held).event, "held");

        let diverted = EventRow::from_notification(now, &Notification::Diverted { entity: EntityId(6) });
        assert_eq!(diverted.location, NO_LOCATION);

        let served = Notification::EnteredService { entity: EntityId(7), server: ServerId(2) };
        assert_eq!(EventRow::from_notification(now, &served).location, 2);
    }
}

#[cfg(test)]
mod csv_tests {
    use ap_core::{AirportConfig, SimTime, VariateGenerator, WaitingConfig};
    use ap_engine::{EventKind, Scheduler};
    use ap_model::{AirportModel, NoDecision};
    use ap_stats::Report;
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::observer::EventLogObserver;
    use crate::row::EventRow;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn headers(path: &std::path::Path) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    /// A complete seeded run logged through `obs`.
    fn run(obs: &mut EventLogObserver<CsvWriter>) -> Report {
        let config = AirportConfig {
            servers:        2,
            waiting:        WaitingConfig::Queues { count: 1, capacity: Some(2) },
            total_arrivals: 25,
            ..AirportConfig::default()
        };
        let mut model = AirportModel::new(config, VariateGenerator::new(11), NoDecision).unwrap();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(SimTime::ZERO, EventKind::Start);
        scheduler.run(&mut model, obs).unwrap()
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("events.csv").exists());
        assert!(dir.path().join("summary.csv").exists());
        assert!(dir.path().join("servers.csv").exists());
    }

    #[test]
    fn creates_missing_output_dir() {
        let dir = tmp();
        let nested = dir.path().join("runs").join("a");
        let _w = CsvWriter::new(&nested).unwrap();
        assert!(nested.join("events.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        assert_eq!(headers(&dir.path().join("events.csv")), ["time", "event", "entity", "location", "position"]);
        assert_eq!(headers(&dir.path().join("servers.csv")), ["server", "busy_time", "services", "utilization"]);
        let summary = headers(&dir.path().join("summary.csv"));
        assert_eq!(summary.first().map(String::as_str), Some("seed"));
        assert!(summary.iter().any(|h| h == "average_utilization"));
    }

    #[test]
    fn event_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let row = EventRow { time: 1.5, event: "queued", entity: 3, location: 0, position: 2 };
        w.write_event(&row).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("events.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "1.5");
        assert_eq!(&rows[0][1], "queued");
        assert_eq!(&rows[0][4], "2");
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn observer_logs_a_full_run() {
        let dir = tmp();
        let mut obs = EventLogObserver::new(CsvWriter::new(dir.path()).unwrap());
        let report = run(&mut obs);
        obs.write_report(&report).unwrap();
        assert!(obs.take_error().is_none());

        let mut rdr = csv::Reader::from_path(dir.path().join("events.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len() as u64, obs.rows());

        // Every arrival ends in exactly one departure or diversion.
        let count = |kind: &str| rows.iter().filter(|r| &r[1] == kind).count() as u64;
        assert_eq!(count("departed"), report.served);
        assert_eq!(count("diverted"), report.diverted);
        assert_eq!(count("departed") + count("diverted"), 25);
        assert_eq!(count("entered_service"), report.served);

        let mut rdr = csv::Reader::from_path(dir.path().join("servers.csv")).unwrap();
        assert_eq!(rdr.records().count(), 2);

        let mut rdr = csv::Reader::from_path(dir.path().join("summary.csv")).unwrap();
        let summary: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(summary.len(), 1);
        assert_eq!(&summary[0][0], "11");
        assert_eq!(summary[0][4].parse::<u64>().unwrap(), report.served);
    }
}
