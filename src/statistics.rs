//! Count, sum, min, max and average over primitive values.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::stream::Primitive;

/// Running statistics for one primitive kind.
///
/// Empty statistics report an average of `0.0`, the kind's largest value as
/// `min` and its smallest value as `max`, so that `accept` and `combine` need
/// no special case for the first element.
///
/// Serialized statistics omit `min` and `max` while empty, so the infinite
/// identities of double statistics never reach formats that cannot hold them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStatistics<P: Primitive> {
    count: u64,
    sum: P::Sum,
    min: P,
    max: P,
}

pub type IntSummaryStatistics = SummaryStatistics<i32>;
pub type LongSummaryStatistics = SummaryStatistics<i64>;
pub type DoubleSummaryStatistics = SummaryStatistics<f64>;

impl<P: Primitive> Default for SummaryStatistics<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Primitive> SummaryStatistics<P> {
    pub fn new() -> Self {
        Self {
            count: 0,
            sum: Default::default(),
            min: P::MIN_IDENTITY,
            max: P::MAX_IDENTITY,
        }
    }

    /// Record one value
    pub fn accept(&mut self, value: P) {
        self.count += 1;
        P::add_to_sum(&mut self.sum, value);
        self.min = self.min.min_of(value);
        self.max = self.max.max_of(value);
    }

    /// Fold another set of statistics into this one
    pub fn combine(&mut self, other: &SummaryStatistics<P>) {
        self.count += other.count;
        P::merge_sums(&mut self.sum, &other.sum);
        self.min = self.min.min_of(other.min);
        self.max = self.max.max_of(other.max);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Sum of every accepted value; int statistics keep 64 bits.
    pub fn sum(&self) -> P::Total {
        P::total(&self.sum)
    }

    pub fn min(&self) -> P {
        self.min
    }

    pub fn max(&self) -> P {
        self.max
    }

    pub fn average(&self) -> f64 {
        if self.count > 0 {
            P::total_as_f64(self.sum()) / self.count as f64
        } else {
            0.0
        }
    }
}

impl<P: Primitive> Extend<P> for SummaryStatistics<P> {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        for value in iter {
            self.accept(value);
        }
    }
}

impl<P: Primitive> FromIterator<P> for SummaryStatistics<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut stats = Self::new();
        stats.extend(iter);
        stats
    }
}

impl<P: Primitive> fmt::Display for SummaryStatistics<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Precision is ignored for integer kinds.
        write!(
            f,
            "{}SummaryStatistics{{count={}, sum={:.6}, min={:.6}, average={:.6}, max={:.6}}}",
            P::KIND,
            self.count,
            self.sum(),
            self.min,
            self.average(),
            self.max
        )
    }
}

/// Wire shape of `SummaryStatistics`
#[derive(Serialize, Deserialize)]
#[serde(bound(serialize = "", deserialize = ""))]
struct StatisticsReport<P: Primitive> {
    count: u64,
    sum: P::Sum,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<P>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<P>,
}

impl<P: Primitive> Serialize for SummaryStatistics<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let seen = self.count > 0;
        StatisticsReport::<P> {
            count: self.count,
            sum: self.sum,
            min: seen.then_some(self.min),
            max: seen.then_some(self.max),
        }
        .serialize(serializer)
    }
}

impl<'de, P: Primitive> Deserialize<'de> for SummaryStatistics<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let report = StatisticsReport::<P>::deserialize(deserializer)?;
        Ok(Self {
            count: report.count,
            sum: report.sum,
            min: report.min.unwrap_or(P::MIN_IDENTITY),
            max: report.max.unwrap_or(P::MAX_IDENTITY),
        })
    }
}

/// Compensated (Kahan) summation for double statistics.
///
/// `simple` keeps the naive sum so an infinite total is reported as such
/// rather than as the NaN the compensation term would produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CompensatedSum {
    sum: f64,
    compensation: f64,
    simple: f64,
}

impl CompensatedSum {
    pub fn add(&mut self, value: f64) {
        self.simple += value;
        self.add_compensated(value);
    }

    pub fn merge(&mut self, other: &CompensatedSum) {
        self.simple += other.simple;
        self.add_compensated(other.sum);
        self.add_compensated(-other.compensation);
    }

    pub fn value(&self) -> f64 {
        let total = self.sum - self.compensation;
        if total.is_nan() && self.simple.is_infinite() {
            self.simple
        } else {
            total
        }
    }

    fn add_compensated(&mut self, value: f64) {
        let corrected = value - self.compensation;
        let next = self.sum + corrected;
        self.compensation = (next - self.sum) - corrected;
        self.sum = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_statistics_use_identities() {
        let stats = IntSummaryStatistics::new();
        assert_eq!(stats.count(), 0);
        assert_eq!(stats.sum(), 0);
        assert_eq!(stats.min(), i32::MAX);
        assert_eq!(stats.max(), i32::MIN);
        assert_eq!(stats.average(), 0.0);

        let stats = DoubleSummaryStatistics::new();
        assert_eq!(stats.min(), f64::INFINITY);
        assert_eq!(stats.max(), f64::NEG_INFINITY);
    }

    #[test]
    fn int_sum_does_not_overflow_32_bits() {
        let stats: IntSummaryStatistics = [i32::MAX, i32::MAX].into_iter().collect();
        assert_eq!(stats.sum(), 2 * i64::from(i32::MAX));
        assert_eq!(stats.average(), f64::from(i32::MAX));
    }

    #[test]
    fn combine_merges_every_field() {
        let mut left: LongSummaryStatistics = [4, 8].into_iter().collect();
        let right: LongSummaryStatistics = [-3, 20, 1].into_iter().collect();
        left.combine(&right);
        assert_eq!(left.count(), 5);
        assert_eq!(left.sum(), 30);
        assert_eq!(left.min(), -3);
        assert_eq!(left.max(), 20);
        assert_eq!(left.average(), 6.0);
    }

    #[test]
    fn compensated_sum_beats_naive_sum() {
        let values = std::iter::once(1.0).chain(std::iter::repeat(1e-16).take(10_000));
        let stats: DoubleSummaryStatistics = values.collect();
        assert!((stats.sum() - (1.0 + 1e-12)).abs() < 1e-15);
    }

    #[test]
    fn nan_propagates_through_min_and_max() {
        let stats: DoubleSummaryStatistics = [1.0, f64::NAN, 3.0].into_iter().collect();
        assert!(stats.min().is_nan());
        assert!(stats.max().is_nan());
    }

    #[test]
    fn negative_zero_orders_below_zero() {
        let stats: DoubleSummaryStatistics = [0.0, -0.0].into_iter().collect();
        assert!(stats.min().is_sign_negative());
        assert!(stats.max().is_sign_positive());
    }

    #[test]
    fn infinite_sum_is_reported() {
        let stats: DoubleSummaryStatistics = [f64::INFINITY, 1.0].into_iter().collect();
        assert_eq!(stats.sum(), f64::INFINITY);
    }

    #[test]
    fn display_uses_kind_name() {
        let stats: IntSummaryStatistics = [1, 2, 3].into_iter().collect();
        assert_eq!(
            stats.to_string(),
            "IntSummaryStatistics{count=3, sum=6, min=1, average=2.000000, max=3}"
        );
    }
}
