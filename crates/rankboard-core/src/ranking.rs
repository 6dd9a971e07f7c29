//! Display-ready ranking rows. Pure formatting; the order of the input is
//! kept as-is.

use serde::{Deserialize, Serialize};

use crate::aggregate::GroupTotal;
use crate::format::NumberFormat;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankingRow {
    /// 1-based.
    pub position: usize,
    pub label: String,
    pub total: f64,
    pub formatted_total: String,
    pub count: usize,
}

pub fn rank(groups: &[GroupTotal], format: &NumberFormat) -> Vec<RankingRow> {
    groups
        .iter()
        .enumerate()
        .map(|(i, g)| RankingRow {
            position: i + 1,
            label: g.key.label(),
            total: g.total,
            formatted_total: format.format(g.total),
            count: g.count,
        })
        .collect()
}
