use crate::core::engine::{monthly_cost, BundleAdvisor};
use crate::domain::model::{TierId, VolumeRange};
use crate::utils::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepRow {
    pub volume: u32,
    pub recommended: TierId,
    pub tier_a: TierId,
    pub tier_b: TierId,
    pub cost_a: u64,
    pub cost_b: u64,
    pub savings: u64,
}

/// One row per selectable volume in `range`.
pub fn sweep(advisor: &BundleAdvisor, range: &VolumeRange) -> Vec<SweepRow> {
    range
        .values()
        .map(|volume| {
            let (a, b) = advisor.display_pair(volume);
            let cost_a = monthly_cost(volume, a);
            let cost_b = monthly_cost(volume, b);
            SweepRow {
                volume,
                recommended: advisor.recommend_tier(volume).id.clone(),
                tier_a: a.id.clone(),
                tier_b: b.id.clone(),
                cost_a,
                cost_b,
                savings: cost_a.abs_diff(cost_b),
            }
        })
        .collect()
}

pub fn write_sweep_csv<W: Write>(rows: &[SweepRow], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_covers_range() {
        let advisor = BundleAdvisor::reference();
        let range = VolumeRange {
            min: 180,
            max: 420,
            step: 20,
            default: 200,
        };
        let rows = sweep(&advisor, &range);

        assert_eq!(rows.len(), 13);
        assert_eq!(rows[0].volume, 180);
        assert_eq!(rows[0].recommended, "mini");
        assert_eq!(rows[1].volume, 200);
        assert_eq!(rows[2].recommended, "trivya");
        assert_eq!(rows[2].cost_a, 2000);
        assert_eq!(rows[2].savings, 500);
        assert_eq!(rows.last().unwrap().recommended, "trivyaHigh");
    }

    #[test]
    fn test_write_sweep_csv() {
        let advisor = BundleAdvisor::reference();
        let range = VolumeRange {
            min: 250,
            max: 250,
            step: 10,
            default: 250,
        };
        let rows = sweep(&advisor, &range);

        let mut buffer = Vec::new();
        write_sweep_csv(&rows, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "volume,recommended,tier_a,tier_b,cost_a,cost_b,savings");
        assert_eq!(lines[1], "250,trivya,mini,trivya,2000,2500,500");
    }
}
