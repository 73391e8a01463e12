use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Additive per-range statistics.
///
/// Every field, `last_update_nanos` included, accumulates by two's-complement
/// wrapping addition: the aggregate of N ranges carries the sum of their
/// update clocks, not the latest one, and wraps on overflow in every build
/// profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeStats {
    pub live_bytes: i64,
    pub key_bytes: i64,
    pub val_bytes: i64,
    pub intent_bytes: i64,
    pub live_count: i64,
    pub key_count: i64,
    pub val_count: i64,
    pub intent_count: i64,
    pub intent_age: i64,
    pub gc_bytes_age: i64,
    pub last_update_nanos: i64,
}

impl RangeStats {
    /// Declared field names, in declaration order.
    pub const FIELD_NAMES: [&'static str; 11] = [
        "LiveBytes",
        "KeyBytes",
        "ValBytes",
        "IntentBytes",
        "LiveCount",
        "KeyCount",
        "ValCount",
        "IntentCount",
        "IntentAge",
        "GCBytesAge",
        "LastUpdateNanos",
    ];

    /// Field values, in the same order as [`RangeStats::FIELD_NAMES`].
    pub fn values(&self) -> [i64; 11] {
        [
            self.live_bytes,
            self.key_bytes,
            self.val_bytes,
            self.intent_bytes,
            self.live_count,
            self.key_count,
            self.val_count,
            self.intent_count,
            self.intent_age,
            self.gc_bytes_age,
            self.last_update_nanos,
        ]
    }

    /// `(declared name, value)` pairs.
    pub fn named_values(&self) -> impl Iterator<Item = (&'static str, i64)> {
        Self::FIELD_NAMES.into_iter().zip(self.values())
    }
}

impl AddAssign<&RangeStats> for RangeStats {
    fn add_assign(&mut self, rhs: &RangeStats) {
        self.live_bytes = self.live_bytes.wrapping_add(rhs.live_bytes);
        self.key_bytes = self.key_bytes.wrapping_add(rhs.key_bytes);
        self.val_bytes = self.val_bytes.wrapping_add(rhs.val_bytes);
        self.intent_bytes = self.intent_bytes.wrapping_add(rhs.intent_bytes);
        self.live_count = self.live_count.wrapping_add(rhs.live_count);
        self.key_count = self.key_count.wrapping_add(rhs.key_count);
        self.val_count = self.val_count.wrapping_add(rhs.val_count);
        self.intent_count = self.intent_count.wrapping_add(rhs.intent_count);
        self.intent_age = self.intent_age.wrapping_add(rhs.intent_age);
        self.gc_bytes_age = self.gc_bytes_age.wrapping_add(rhs.gc_bytes_age);
        self.last_update_nanos = self.last_update_nanos.wrapping_add(rhs.last_update_nanos);
    }
}

impl AddAssign for RangeStats {
    fn add_assign(&mut self, rhs: RangeStats) {
        *self += &rhs;
    }
}

impl Add for RangeStats {
    type Output = RangeStats;

    fn add(mut self, rhs: RangeStats) -> RangeStats {
        self += &rhs;
        self
    }
}

impl<'a> Sum<&'a RangeStats> for RangeStats {
    fn sum<I: Iterator<Item = &'a RangeStats>>(iter: I) -> Self {
        iter.fold(RangeStats::default(), |mut acc, s| {
            acc += s;
            acc
        })
    }
}

impl Sum for RangeStats {
    fn sum<I: Iterator<Item = RangeStats>>(iter: I) -> Self {
        iter.fold(RangeStats::default(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> RangeStats {
        RangeStats {
            live_bytes: 1,
            key_bytes: 2,
            val_bytes: 3,
            intent_bytes: 4,
            live_count: 5,
            key_count: 6,
            val_count: 7,
            intent_count: 8,
            intent_age: 9,
            gc_bytes_age: 10,
            last_update_nanos: 1_000_000_000,
        }
    }

    #[test]
    fn test_add_is_fieldwise() {
        let total = unit() + unit() + unit();
        assert_eq!(total.values(), unit().values().map(|v| v * 3));
    }

    #[test]
    fn test_sum_of_wall_clock_timestamps_wraps() {
        let now = 1_790_000_000_000_000_000i64;
        let ranges = vec![
            RangeStats {
                live_bytes: 1,
                last_update_nanos: now,
                ..Default::default()
            };
            6
        ];
        let total: RangeStats = ranges.iter().sum();
        let expected = (0..6).fold(0i64, |acc, _| acc.wrapping_add(now));
        assert_eq!(total.last_update_nanos, expected);
        assert_eq!(total.live_bytes, 6);
    }

    #[test]
    fn test_last_update_is_summed_not_maxed() {
        let a = RangeStats {
            last_update_nanos: 5,
            ..Default::default()
        };
        let b = RangeStats {
            last_update_nanos: 7,
            ..Default::default()
        };
        assert_eq!((a + b).last_update_nanos, 12);
    }

    #[test]
    fn test_sum_of_refs_and_values() {
        let all = vec![unit(), unit()];
        let by_ref: RangeStats = all.iter().sum();
        let by_val: RangeStats = all.into_iter().sum();
        assert_eq!(by_ref, by_val);
        assert_eq!(by_ref.gc_bytes_age, 20);
        assert_eq!(Vec::<RangeStats>::new().iter().sum::<RangeStats>(), RangeStats::default());
    }

    #[test]
    fn test_add_is_commutative() {
        let a = unit();
        let b = RangeStats {
            live_bytes: -4,
            intent_age: 100,
            ..Default::default()
        };
        assert_eq!(a + b, b + a);
    }

    #[test]
    fn test_named_values_order() {
        let names: Vec<_> = unit().named_values().map(|(n, _)| n).collect();
        assert_eq!(names.first(), Some(&"LiveBytes"));
        assert_eq!(names.last(), Some(&"LastUpdateNanos"));
        let lookup: Vec<_> = unit().named_values().collect();
        assert!(lookup.contains(&("GCBytesAge", 10)));
    }

    #[test]
    fn test_serde_partial_input_defaults() {
        let stats: RangeStats = serde_json::from_str(r#"{"live_bytes": 3}"#).unwrap();
        assert_eq!(stats.live_bytes, 3);
        assert_eq!(stats.key_bytes, 0);
    }
}
