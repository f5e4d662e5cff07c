//! Metric series data model.
//!
//! A series is the parsed form of the `/metric` endpoint's
//! `{"values": [[timestamp, value], ...]}` payload. Series are immutable
//! after receipt: a new fetch produces a wholly new series.

use serde::{Deserialize, Serialize};

/// One sample of a metric series.
///
/// `value` is `None` where the server had no reading for the sample slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    /// Unix timestamp, in seconds.
    pub timestamp: f64,
    pub value: Option<f64>,
}

/// A named time series returned for one metric expression.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    expr: String,
    display: String,
    points: Vec<SamplePoint>,
}

impl MetricSeries {
    pub fn new(
        expr: impl Into<String>,
        display: impl Into<String>,
        points: Vec<SamplePoint>,
    ) -> Self {
        Self {
            expr: expr.into(),
            display: display.into(),
            points,
        }
    }

    /// The server-side expression name this series was queried as.
    pub fn expr(&self) -> &str {
        &self.expr
    }

    /// The human-facing name shown next to the series.
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Samples that can actually be drawn: finite timestamp and value.
    pub fn plottable(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().filter_map(|p| {
            let value = p.value.filter(|v| v.is_finite())?;
            p.timestamp.is_finite().then_some((p.timestamp, value))
        })
    }

    /// The most recent plottable value, for the live readout column.
    pub fn latest(&self) -> Option<f64> {
        self.plottable().last().map(|(_, v)| v)
    }

    /// Min and max over the plottable values.
    pub fn value_extent(&self) -> Option<(f64, f64)> {
        let mut iter = self.plottable().map(|(_, v)| v);
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some((min, max))
    }

    /// Min and max over the timestamps of plottable samples.
    pub fn time_extent(&self) -> Option<(f64, f64)> {
        let mut iter = self.plottable().map(|(t, _)| t);
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t)));
        Some((min, max))
    }

    /// Pointwise ratio of this series over `denom`, aligned sample by
    /// sample. Both series come from the same query window so they share a
    /// sample grid; a missing numerator or denominator sample, or a zero
    /// denominator, yields a missing sample in the result.
    pub fn divide(&self, denom: &MetricSeries, display: impl Into<String>) -> MetricSeries {
        let points = self
            .points
            .iter()
            .zip(denom.points.iter())
            .map(|(n, d)| {
                let value = match (n.value, d.value) {
                    (Some(n), Some(d)) if d != 0.0 => Some(n / d),
                    _ => None,
                };
                SamplePoint {
                    timestamp: n.timestamp,
                    value,
                }
            })
            .collect();

        MetricSeries {
            expr: format!("{}/{}", self.expr, denom.expr),
            display: display.into(),
            points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(t: f64, v: Option<f64>) -> SamplePoint {
        SamplePoint {
            timestamp: t,
            value: v,
        }
    }

    fn series(expr: &str, values: &[(f64, Option<f64>)]) -> MetricSeries {
        MetricSeries::new(
            expr,
            expr,
            values.iter().map(|&(t, v)| point(t, v)).collect(),
        )
    }

    #[test]
    fn test_plottable_skips_missing_and_non_finite() {
        let s = series(
            "temp-0",
            &[
                (0.0, Some(1.0)),
                (1.0, None),
                (2.0, Some(f64::NAN)),
                (3.0, Some(4.0)),
            ],
        );
        let plottable: Vec<_> = s.plottable().collect();
        assert_eq!(plottable, vec![(0.0, 1.0), (3.0, 4.0)]);
        assert_eq!(s.latest(), Some(4.0));
    }

    #[test]
    fn test_value_extent() {
        let s = series("temp-0", &[(0.0, Some(-2.0)), (1.0, Some(5.0)), (2.0, Some(1.0))]);
        assert_eq!(s.value_extent(), Some((-2.0, 5.0)));

        let empty = series("temp-1", &[(0.0, None)]);
        assert_eq!(empty.value_extent(), None);
    }

    #[test]
    fn test_divide_aligns_samples() {
        let lost = series("crug-packets-lost", &[(0.0, Some(1.0)), (1.0, Some(2.0))]);
        let sent = series("crug-packets-sent", &[(0.0, Some(10.0)), (1.0, Some(40.0))]);

        let ratio = lost.divide(&sent, "crug loss");
        assert_eq!(ratio.display(), "crug loss");
        assert_eq!(ratio.expr(), "crug-packets-lost/crug-packets-sent");
        let values: Vec<_> = ratio.plottable().collect();
        assert_eq!(values, vec![(0.0, 0.1), (1.0, 0.05)]);
    }

    #[test]
    fn test_divide_by_zero_yields_missing_sample() {
        let num = series("a", &[(0.0, Some(1.0)), (1.0, Some(1.0))]);
        let denom = series("b", &[(0.0, Some(0.0)), (1.0, None)]);

        let ratio = num.divide(&denom, "a/b");
        assert_eq!(ratio.plottable().count(), 0);
        assert_eq!(ratio.len(), 2);
    }
}
