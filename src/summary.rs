use crate::models::{ScoreRecord, Summary};

/// Headline figures shown beside the chart. Ties for best and worst go to
/// the earliest date.
pub fn build_summary(records: &[ScoreRecord]) -> Summary {
    let count = records.len();
    let average = (count > 0).then(|| {
        let total: u32 = records.iter().map(|r| u32::from(r.score.value())).sum();
        round_one_decimal(f64::from(total) / count as f64)
    });

    let mut best: Option<ScoreRecord> = None;
    let mut worst: Option<ScoreRecord> = None;
    for record in records {
        if best.is_none_or(|b| record.score > b.score) {
            best = Some(*record);
        }
        if worst.is_none_or(|w| record.score < w.score) {
            worst = Some(*record);
        }
    }

    Summary {
        count,
        latest: records.last().copied(),
        average,
        best,
        worst,
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
