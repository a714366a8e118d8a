pub mod bulletin;
pub mod grid;
pub mod industry;
pub mod period;
pub mod report;

pub use bulletin::{BulletinId, Era, Frequency};
pub use grid::Grid;
pub use industry::Industry;
pub use period::{TargetPeriod, Vintage};
pub use report::{BulletinOutcome, BulletinStatus, RunReport};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_report_serializes() {
        let report = RunReport {
            processed: 2,
            skipped: 1,
            failed: 0,
            outcomes: vec![BulletinOutcome {
                bulletin: "b103_2020".to_string(),
                era: "newer".to_string(),
                frequency: "monthly".to_string(),
                rows: 9,
                dropped_rows: 1,
                coercion_losses: 0,
                status: BulletinStatus::Processed,
                error: None,
            }],
        };
        let json = serde_json::to_string(&report).expect("serialize report");
        let round: RunReport = serde_json::from_str(&json).expect("deserialize report");
        assert_eq!(round.processed, 2);
        assert_eq!(round.outcomes.len(), 1);
    }
}
