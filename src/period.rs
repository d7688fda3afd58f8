//! Bucketing message timestamps into configured reporting periods.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A closed date-time interval tagged with its period number.
/// Bounds are wall-clock times at the table's UTC offset, inclusive to the second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub number: u32,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Period {
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at <= self.end
    }
}

/// Validated, non-overlapping period list.
#[derive(Debug, Clone)]
pub struct PeriodTable {
    periods: Vec<Period>,
    offset: FixedOffset,
}

impl PeriodTable {
    pub fn new(periods: Vec<Period>, offset: FixedOffset) -> Result<Self, ConfigError> {
        for p in &periods {
            if p.start > p.end {
                return Err(ConfigError::InvalidPeriod {
                    number: p.number,
                    reason: format!("start {} is after end {}", p.start, p.end),
                });
            }
        }

        let mut sorted: Vec<&Period> = periods.iter().collect();
        sorted.sort_by_key(|p| p.start);
        for pair in sorted.windows(2) {
            if pair[1].start <= pair[0].end {
                return Err(ConfigError::OverlappingPeriods {
                    first: pair[0].number,
                    second: pair[1].number,
                });
            }
        }

        Ok(PeriodTable { periods, offset })
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Period number for a fractional epoch-seconds timestamp, or `None`
    /// when it falls outside every configured interval.
    pub fn classify(&self, ts: f64) -> Option<u32> {
        let at = self.local_time(ts)?;
        self.periods.iter().find(|p| p.contains(at)).map(|p| p.number)
    }

    /// Wall-clock time at the table's offset, truncated to the whole second.
    fn local_time(&self, ts: f64) -> Option<NaiveDateTime> {
        if !ts.is_finite() {
            return None;
        }
        let utc = DateTime::from_timestamp(ts.floor() as i64, 0)?;
        Some(utc.with_timezone(&self.offset).naive_local())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn period(number: u32, start: &str, end: &str) -> Period {
        Period {
            number,
            start: at(start),
            end: at(end),
        }
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn two_weeks() -> PeriodTable {
        PeriodTable::new(
            vec![
                period(1, "2025-10-13T00:00:00", "2025-10-19T23:59:59"),
                period(2, "2025-10-20T00:00:00", "2025-10-26T23:59:59"),
            ],
            utc(),
        )
        .unwrap()
    }

    #[test]
    fn test_classify_inside_interval() {
        // 2025-10-14T15:00:00Z
        assert_eq!(two_weeks().classify(1_760_454_000.0), Some(1));
    }

    #[test]
    fn test_classify_upper_bound_inclusive() {
        let t = two_weeks();
        // 2025-10-19T23:59:59Z
        assert_eq!(t.classify(1_760_918_399.0), Some(1));
        assert_eq!(t.classify(1_760_918_399.75), Some(1));
        assert_eq!(t.classify(1_760_918_400.0), Some(2));
    }

    #[test]
    fn test_classify_lower_bound_inclusive() {
        // 2025-10-13T00:00:00Z
        assert_eq!(two_weeks().classify(1_760_313_600.0), Some(1));
        assert_eq!(two_weeks().classify(1_760_313_599.0), None);
    }

    #[test]
    fn test_classify_past_last_period() {
        // 2025-10-26T23:59:59Z + 1s
        assert_eq!(two_weeks().classify(1_761_523_200.0), None);
    }

    #[test]
    fn test_classify_rejects_non_finite() {
        assert_eq!(two_weeks().classify(f64::NAN), None);
        assert_eq!(two_weeks().classify(f64::INFINITY), None);
    }

    #[test]
    fn test_classify_respects_offset() {
        let table = PeriodTable::new(
            vec![period(1, "2025-10-13T00:00:00", "2025-10-19T23:59:59")],
            FixedOffset::west_opt(7 * 3600).unwrap(),
        )
        .unwrap();
        // 2025-10-20T03:00:00Z is still 2025-10-19T20:00 at UTC-7.
        assert_eq!(table.classify(1_760_929_200.0), Some(1));
        // 2025-10-13T03:00:00Z is 2025-10-12T20:00 at UTC-7.
        assert_eq!(table.classify(1_760_324_400.0), None);
    }

    #[test]
    fn test_inverted_period_rejected() {
        let err = PeriodTable::new(
            vec![period(4, "2025-10-19T00:00:00", "2025-10-13T00:00:00")],
            utc(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPeriod { number: 4, .. }));
    }

    #[test]
    fn test_overlapping_periods_rejected() {
        let err = PeriodTable::new(
            vec![
                period(2, "2025-10-19T00:00:00", "2025-10-26T23:59:59"),
                period(1, "2025-10-13T00:00:00", "2025-10-19T00:00:00"),
            ],
            utc(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OverlappingPeriods { first: 1, second: 2 }
        ));
    }
}
