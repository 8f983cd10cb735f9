//! End-of-run text report.
//!
//! Two views over the economy's state: a histogram of current consumer
//! wealth and the last few collector records as a table. Both write to any
//! [`Write`] sink so they can be tested against a buffer.

use std::io::Write;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use ecosim_types::WealthRecord;

use crate::error::EngineError;

/// Widest bar drawn for the fullest bin.
const BAR_WIDTH: u64 = 40;

/// Counts of values falling into equal-width bins.
///
/// Bins are half-open `[lo, hi)` except the last, which also includes its
/// upper edge. Values below the first edge or above the last are counted
/// in `out_of_range`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    /// Bin edges, one more than the number of bins.
    pub edges: Vec<Decimal>,
    /// Count per bin.
    pub counts: Vec<u64>,
    /// Values outside every bin.
    pub out_of_range: u64,
}

impl Histogram {
    /// Bin `values` into `ceil(max / bin_width)` bins starting at 0.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Report`] if `bin_width` is 0 or `max` is
    /// smaller than one bin.
    pub fn build(
        values: impl IntoIterator<Item = Decimal>,
        bin_width: u32,
        max: u32,
    ) -> Result<Self, EngineError> {
        if bin_width == 0 || max < bin_width {
            return Err(EngineError::Report {
                message: format!("cannot bin with width {bin_width} up to {max}"),
            });
        }
        let bins = max.div_ceil(bin_width);
        let width = Decimal::from(bin_width);
        let edges: Vec<Decimal> = (0..=bins)
            .map(|k| Decimal::from(u64::from(k).saturating_mul(u64::from(bin_width))))
            .collect();
        let upper = edges.last().copied().unwrap_or_default();
        let last_bin = usize::try_from(bins)
            .map_err(|err| report_error(&err))?
            .saturating_sub(1);

        let mut counts = vec![0_u64; last_bin.saturating_add(1)];
        let mut out_of_range = 0_u64;
        for value in values {
            if value < Decimal::ZERO || value > upper {
                out_of_range = out_of_range.saturating_add(1);
                continue;
            }
            let index = value
                .checked_div(width)
                .map(|q| q.floor())
                .and_then(|q| q.to_usize())
                .ok_or_else(|| report_error(&format!("cannot bin value {value}")))?
                .min(last_bin);
            if let Some(count) = counts.get_mut(index) {
                *count = count.saturating_add(1);
            }
        }

        Ok(Self {
            edges,
            counts,
            out_of_range,
        })
    }

    /// Total values that landed in a bin.
    pub fn total(&self) -> u64 {
        self.counts.iter().fold(0_u64, |acc, n| acc.saturating_add(*n))
    }

    /// Write one line per bin with a proportional bar.
    pub fn render(&self, out: &mut impl Write) -> Result<(), EngineError> {
        let peak = self.counts.iter().copied().max().unwrap_or(0).max(1);
        let last = self.counts.len().saturating_sub(1);
        for (i, (count, bounds)) in self.counts.iter().zip(self.edges.windows(2)).enumerate() {
            let [lo, hi] = bounds else { continue };
            let close = if i == last { ']' } else { ')' };
            let bar = count.saturating_mul(BAR_WIDTH).checked_div(peak).unwrap_or(0);
            let bar = "#".repeat(usize::try_from(bar).map_err(|err| report_error(&err))?);
            writeln!(out, "[{lo:>4}, {hi:>4}{close} {count:>5} {bar}")?;
        }
        if self.out_of_range > 0 {
            writeln!(out, "out of range {:>5}", self.out_of_range)?;
        }
        Ok(())
    }
}

/// Write `records` as a table with step, agent, kind and wealth columns.
pub fn render_tail(records: &[WealthRecord], out: &mut impl Write) -> Result<(), EngineError> {
    writeln!(out, "{:>6} {:>8} {:<9} {:>10}", "Step", "AgentID", "Kind", "Wealth")?;
    for record in records {
        writeln!(
            out,
            "{:>6} {:>8} {:<9} {:>10}",
            record.step,
            record.agent_id,
            record.kind.to_string(),
            record.wealth
        )?;
    }
    Ok(())
}

fn report_error(err: &impl ToString) -> EngineError {
    EngineError::Report {
        message: err.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ecosim_types::{AgentId, AgentKind};
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_layout_has_eleven_bins() {
        let h = Histogram::build([dec!(0), dec!(4.99), dec!(5), dec!(55)], 5, 55).unwrap();
        assert_eq!(h.edges.len(), 12);
        assert_eq!(h.counts.len(), 11);
        assert_eq!(h.counts.first(), Some(&2));
        assert_eq!(h.counts.get(1), Some(&1));
        // The upper edge belongs to the last bin.
        assert_eq!(h.counts.last(), Some(&1));
        assert_eq!(h.out_of_range, 0);
        assert_eq!(h.total(), 4);
    }

    #[test]
    fn values_past_the_last_edge_are_out_of_range() {
        let h = Histogram::build([dec!(55.01), dec!(120), dec!(30)], 5, 55).unwrap();
        assert_eq!(h.out_of_range, 2);
        assert_eq!(h.total(), 1);
        assert_eq!(h.counts.get(6), Some(&1));
    }

    #[test]
    fn uneven_max_rounds_up_to_whole_bins() {
        let h = Histogram::build([dec!(7)], 5, 7).unwrap();
        assert_eq!(h.edges, vec![dec!(0), dec!(5), dec!(10)]);
        assert_eq!(h.counts, vec![0, 1]);
    }

    #[test]
    fn invalid_layout_rejected() {
        assert!(Histogram::build(Vec::new(), 0, 55).is_err());
        assert!(Histogram::build(Vec::new(), 10, 5).is_err());
    }

    #[test]
    fn render_draws_bars() {
        let h = Histogram::build([dec!(1), dec!(2), dec!(12)], 5, 15).unwrap();
        let mut out = Vec::new();
        h.render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.first().unwrap().ends_with(&"#".repeat(40)));
        assert!(lines.last().unwrap().contains(']'));
    }

    #[test]
    fn tail_table_lists_each_record() {
        let records = vec![
            WealthRecord {
                step: 9,
                agent_id: AgentId::new(48),
                kind: AgentKind::Consumer,
                wealth: dec!(17),
            },
            WealthRecord {
                step: 9,
                agent_id: AgentId::new(49),
                kind: AgentKind::Producer,
                wealth: dec!(23.45),
            },
        ];
        let mut out = Vec::new();
        render_tail(&records, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("23.45"));
        assert!(text.contains("Producer"));
    }
}
