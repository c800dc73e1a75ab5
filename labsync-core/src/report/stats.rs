//! Per-district roll-up of the per-facility summary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{CauseCounts, NotProcessedCause, ResultSummaryRow};

/// Count columns summed over every facility of one district.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictStats {
    /// District name.
    pub district: String,
    /// Sum of `received`.
    pub received: u64,
    /// Sum of `processed`.
    pub processed: u64,
    /// Sum of `pending`.
    pub pending: u64,
    /// Sum of the not-processed counts, per cause.
    pub not_processed: CauseCounts,
}

impl DistrictStats {
    /// Share of received results that were processed.
    #[must_use]
    pub fn processed_pct(&self) -> f64 {
        percent(self.processed, self.received)
    }

    /// Share of received results still pending.
    #[must_use]
    pub fn pending_pct(&self) -> f64 {
        percent(self.pending, self.received)
    }

    /// Share of received results rejected for `cause`.
    #[must_use]
    pub fn cause_pct(&self, cause: NotProcessedCause) -> f64 {
        percent(self.not_processed.get(cause), self.received)
    }
}

/// `count * 100 / total`, clamped to `[0, 100]`; 0 when `total` is 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 * 100.0 / total as f64).clamp(0.0, 100.0)
}

/// Sum the summary rows per district, ordered by district name.
#[must_use]
pub fn district_stats(rows: &[ResultSummaryRow]) -> Vec<DistrictStats> {
    let mut by_district: BTreeMap<&str, DistrictStats> = BTreeMap::new();
    for row in rows {
        let acc = by_district
            .entry(row.district.as_str())
            .or_insert_with(|| DistrictStats {
                district: row.district.clone(),
                ..DistrictStats::default()
            });
        acc.received += row.received;
        acc.processed += row.processed;
        acc.pending += row.pending;
        acc.not_processed = acc.not_processed.plus(row.not_processed);
    }
    by_district.into_values().collect()
}
