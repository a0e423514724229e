use super::model::QueueingModel;
use super::stats::{RunningStats, StatSummary};
use crate::core::errors::SimResult;
use serde::Serialize;
use std::fmt;

/// Wait statistics of one queue station
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationReport {
    pub id: u32,
    pub processed: u64,
    /// None when no customer ever departed the station
    pub wait: Option<StatSummary>,
}

/// End-of-run statistics for the whole network
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub entered: u64,
    pub exited: u64,
    pub time_in_system: Option<StatSummary>,
    pub time_in_queue: Option<StatSummary>,
    pub stations: Vec<StationReport>,
}

impl SimulationReport {
    /// Collect statistics from a finished model without modifying it.
    ///
    /// Time in system and time in queue cover customers that reached an
    /// exit, visited in creation order.
    pub fn from_model(model: &QueueingModel) -> Self {
        let mut time_in_system = RunningStats::new();
        let mut time_in_queue = RunningStats::new();
        for customer in model.customers().iter() {
            if let Some(duration) = customer.time_in_system() {
                time_in_system.record(duration);
                time_in_queue.record(customer.waiting_time);
            }
        }

        let stations = model
            .stations()
            .queues()
            .map(|queue| StationReport {
                id: queue.id.value(),
                processed: queue.processed(),
                wait: queue.wait_stats.summary(),
            })
            .collect();

        Self {
            entered: model.entered(),
            exited: time_in_system.count,
            time_in_system: time_in_system.summary(),
            time_in_queue: time_in_queue.summary(),
            stations,
        }
    }

    /// Plain-text report, as written by `Display`
    pub fn render_text(&self) -> String {
        self.to_string()
    }

    /// Pretty-printed JSON report
    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            out,
            "During the simulation, {} customers entered the system, and {} exited the system.",
            self.entered, self.exited
        )?;

        match &self.time_in_system {
            None => writeln!(
                out,
                "During the simulation, no customers exited the system, so there are no\n\
                 statistics for the total amount of time customers spent in the system."
            )?,
            Some(s) => writeln!(
                out,
                "Among those who exited the system, customers averaged {:.6} time units in the\n\
                 system, the minimum time spent in the system was {:.6}, and the maximum time\n\
                 spent was {:.6}.",
                s.average, s.min, s.max
            )?,
        }

        if self.entered == 0 {
            writeln!(
                out,
                "No customers entered the system, so other statistics on wait and queue times \
                 are unavailable."
            )?;
            return Ok(());
        }

        match &self.time_in_queue {
            None => writeln!(
                out,
                "No customer completed its route, so there are no statistics for the total\n\
                 amount of time customers spent waiting in queues."
            )?,
            Some(s) => writeln!(
                out,
                "The total amount of time customers spent waiting in queues averaged to {:.6},\n\
                 with the least time being {:.6}, and the greatest being {:.6}.",
                s.average, s.min, s.max
            )?,
        }

        for station in &self.stations {
            match &station.wait {
                None => writeln!(out, "For queue with ID {}, no one came to this queue!", station.id)?,
                Some(w) => writeln!(
                    out,
                    "For queue with ID {}, the average waiting time is {:.6} \
                     (min {:.6}, max {:.6}, {} customers served).",
                    station.id, w.average, w.min, w.max, station.processed
                )?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(min: f64, max: f64, average: f64) -> Option<StatSummary> {
        Some(StatSummary {
            count: 2,
            min,
            max,
            average,
        })
    }

    #[test]
    fn test_empty_run_text() {
        let report = SimulationReport {
            entered: 0,
            exited: 0,
            time_in_system: None,
            time_in_queue: None,
            stations: vec![StationReport {
                id: 1,
                processed: 0,
                wait: None,
            }],
        };
        let text = report.render_text();
        assert!(text.starts_with(
            "During the simulation, 0 customers entered the system, and 0 exited the system."
        ));
        assert!(text.contains("no customers exited the system"));
        assert!(text.contains("No customers entered the system"));
        // Station lines are only written once someone entered
        assert!(!text.contains("queue with ID 1"));
    }

    #[test]
    fn test_full_run_text() {
        let report = SimulationReport {
            entered: 2,
            exited: 2,
            time_in_system: summary(1.0, 3.0, 2.0),
            time_in_queue: summary(0.0, 1.0, 0.5),
            stations: vec![
                StationReport {
                    id: 1,
                    processed: 2,
                    wait: summary(0.0, 1.0, 0.5),
                },
                StationReport {
                    id: 4,
                    processed: 0,
                    wait: None,
                },
            ],
        };
        let text = report.render_text();
        assert!(text.contains("customers averaged 2.000000 time units"));
        assert!(text.contains("averaged to 0.500000"));
        assert!(text.contains("For queue with ID 1, the average waiting time is 0.500000"));
        assert!(text.contains("For queue with ID 4, no one came to this queue!"));
    }

    #[test]
    fn test_display_matches_rendered_text() {
        let report = SimulationReport {
            entered: 1,
            exited: 0,
            time_in_system: None,
            time_in_queue: None,
            stations: vec![StationReport {
                id: 3,
                processed: 1,
                wait: summary(0.25, 0.25, 0.25),
            }],
        };
        let shown = format!("{}", report);
        assert_eq!(shown, report.render_text());
        assert!(shown.contains("No customer completed its route"));
        assert!(shown.ends_with("1 customers served).\n"));
    }

    #[test]
    fn test_json_contains_fields() {
        let report = SimulationReport {
            entered: 3,
            exited: 1,
            time_in_system: summary(1.0, 1.0, 1.0),
            time_in_queue: None,
            stations: Vec::new(),
        };
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["entered"], 3);
        assert_eq!(json["exited"], 1);
        assert_eq!(json["time_in_system"]["average"], 1.0);
        assert!(json["time_in_queue"].is_null());
    }
}
