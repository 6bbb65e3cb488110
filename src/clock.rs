//! 주간 리셋 시계
//!
//! Trials 주간은 매주 금요일 18:00 UTC에 리셋됩니다.
//! 임의의 시각이 속한 주간의 시작일(`WeekKey`)을 계산합니다.

use anyhow::Result;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc, Weekday};
use serde::{Serialize, Serializer};
use std::fmt;

/// 기본 리셋 요일
pub const DEFAULT_RESET_WEEKDAY: Weekday = Weekday::Fri;
/// 기본 리셋 시각 (UTC)
pub const DEFAULT_RESET_HOUR: u32 = 18;

/// 리셋 주간의 시작일
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey(NaiveDate);

#[allow(unused)]
impl WeekKey {
    /// 다음 주간 키
    pub fn next(&self) -> WeekKey {
        WeekKey(self.0 + TimeDelta::days(7))
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl Serialize for WeekKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 주간 리셋 일정 (요일 + 시각)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetSchedule {
    weekday: Weekday,
    time: NaiveTime,
}

impl Default for ResetSchedule {
    fn default() -> Self {
        Self {
            weekday: DEFAULT_RESET_WEEKDAY,
            time: NaiveTime::MIN + TimeDelta::hours(DEFAULT_RESET_HOUR as i64),
        }
    }
}

impl ResetSchedule {
    pub fn new(weekday: Weekday, hour: u32) -> Result<Self> {
        let time = match NaiveTime::from_hms_opt(hour, 0, 0) {
            Some(time) => time,
            None => anyhow::bail!("invalid reset hour: {}", hour),
        };
        Ok(Self { weekday, time })
    }

    /// `at` 이전(포함)의 가장 최근 리셋 시각
    pub fn reset_moment(&self, at: DateTime<Utc>) -> DateTime<Utc> {
        let days_back = (7 + at.weekday().num_days_from_monday() as i64
            - self.weekday.num_days_from_monday() as i64)
            % 7;
        let date = at.date_naive() - TimeDelta::days(days_back);
        let candidate = Utc.from_utc_datetime(&date.and_time(self.time));

        // 같은 요일이지만 리셋 시각 전이면 지난 주
        if candidate > at {
            candidate - TimeDelta::days(7)
        } else {
            candidate
        }
    }

    pub fn week_start(&self, at: DateTime<Utc>) -> WeekKey {
        WeekKey(self.reset_moment(at).date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn same_reset_week_shares_key() {
        let schedule = ResetSchedule::default();
        let a = schedule.week_start(ts("2016-01-08T17:00:00Z"));
        let b = schedule.week_start(ts("2016-01-02T19:00:00Z"));
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "2016-01-01");
    }

    #[test]
    fn after_reset_starts_new_week() {
        let schedule = ResetSchedule::default();
        assert_eq!(
            schedule.week_start(ts("2016-01-08T19:00:00Z")).to_string(),
            "2016-01-08"
        );
    }

    #[test]
    fn exact_reset_moment_belongs_to_new_week() {
        let schedule = ResetSchedule::default();
        let at = ts("2016-01-08T18:00:00Z");
        assert_eq!(schedule.reset_moment(at), at);
        assert_eq!(
            schedule.week_start(ts("2016-01-08T17:59:59Z")).to_string(),
            "2016-01-01"
        );
    }

    #[test]
    fn sunday_before_reset_uses_previous_friday() {
        let schedule = ResetSchedule::default();
        assert_eq!(
            schedule.week_start(ts("2016-01-10T03:00:00Z")).to_string(),
            "2016-01-08"
        );
    }

    #[test]
    fn seven_days_apart_is_one_step() {
        let schedule = ResetSchedule::default();
        let at = ts("2016-03-15T11:30:00Z");
        let key = schedule.week_start(at);
        assert_eq!(schedule.week_start(at + TimeDelta::days(7)), key.next());
    }

    #[test]
    fn week_start_is_monotonic() {
        let schedule = ResetSchedule::default();
        let mut at = ts("2015-12-20T00:00:00Z");
        let mut previous = schedule.week_start(at);
        for _ in 0..(24 * 40) {
            at += TimeDelta::minutes(59);
            let key = schedule.week_start(at);
            assert!(key == previous || key == previous.next());
            previous = key;
        }
    }

    #[test]
    fn custom_schedule() {
        let schedule = ResetSchedule::new(Weekday::Tue, 9).unwrap();
        assert_eq!(
            schedule.week_start(ts("2016-01-05T08:59:00Z")).to_string(),
            "2015-12-29"
        );
        assert_eq!(
            schedule.week_start(ts("2016-01-05T09:00:00Z")).to_string(),
            "2016-01-05"
        );
    }

    #[test]
    fn rejects_invalid_hour() {
        assert!(ResetSchedule::new(Weekday::Fri, 24).is_err());
    }
}
