//! Trials 통계 파생값
//!
//! - 전체 기간 통계에 승률(`activitiesWinPercentage`) 추가
//! - 이번 주간 전적 요약
//! - 후원자 상태

use serde::Serialize;
use std::collections::BTreeMap;

use crate::payload::{BasicValue, CurrentWeekRow, Envelope, StatEntry, StatsResponse};
use crate::weapons::percentage;

pub const WIN_PERCENTAGE_STAT: &str = "activitiesWinPercentage";
const ACTIVITIES_WON: &str = "activitiesWon";
const ACTIVITIES_ENTERED: &str = "activitiesEntered";

/// 전체 기간 Trials 통계 (statId → 값)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TrialsStats {
    pub entries: BTreeMap<String, StatEntry>,
}

#[allow(unused)]
impl TrialsStats {
    pub fn get(&self, stat_id: &str) -> Option<&StatEntry> {
        self.entries.get(stat_id)
    }

    pub fn value(&self, stat_id: &str) -> Option<f64> {
        self.get(stat_id).map(|entry| entry.basic.value)
    }

    pub fn win_percentage(&self) -> Option<u32> {
        self.value(WIN_PERCENTAGE_STAT).map(|value| value as u32)
    }
}

/// `activitiesWon / activitiesEntered` 승률 항목. 참가 기록이 없으면 None
pub fn win_percentage_entry(won: f64, entered: f64) -> Option<StatEntry> {
    if !(entered > 0.0) || won < 0.0 {
        return None;
    }
    let value = percentage(won as u64, entered as u64)?;
    Some(StatEntry {
        stat_id: Some(WIN_PERCENTAGE_STAT.to_string()),
        basic: BasicValue {
            value: value as f64,
            display_value: Some(format!("{}%", value)),
        },
    })
}

/// 응답에서 전체 기간 통계를 꺼내고 승률을 계산
///
/// 응답이나 중첩 필드가 없으면 None (데이터 없음)
pub fn derive_stats(envelope: Envelope<StatsResponse>) -> Option<TrialsStats> {
    let mut entries = envelope.response?.trials_of_osiris?.all_time?;

    let won = entries.get(ACTIVITIES_WON).map(|e| e.basic.value);
    let entered = entries.get(ACTIVITIES_ENTERED).map(|e| e.basic.value);
    match (won, entered) {
        (Some(won), Some(entered)) => match win_percentage_entry(won, entered) {
            Some(entry) => {
                entries.insert(WIN_PERCENTAGE_STAT.to_string(), entry);
            }
            None => {
                entries.remove(WIN_PERCENTAGE_STAT);
            }
        },
        _ => {
            entries.remove(WIN_PERCENTAGE_STAT);
        }
    }

    Some(TrialsStats { entries })
}

/// 이번 주간 전적
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentWeek {
    pub matches: u32,
    pub losses: u32,
    pub wins: u32,
    #[serde(rename = "winPercentage")]
    pub win_percentage: Option<u32>,
}

pub fn current_week(rows: &[CurrentWeekRow]) -> Option<CurrentWeek> {
    let row = rows.first()?;
    let wins = row.matches.saturating_sub(row.losses);
    Some(CurrentWeek {
        matches: row.matches,
        losses: row.losses,
        wins,
        win_percentage: percentage(wins as u64, row.matches as u64),
    })
}

/// 후원자 상태. `null`은 데이터 없음
pub fn supporter_status(value: Option<serde_json::Value>) -> Option<serde_json::Value> {
    value.filter(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::ModeStats;

    fn entry(id: &str, value: f64) -> (String, StatEntry) {
        (
            id.to_string(),
            StatEntry {
                stat_id: Some(id.to_string()),
                basic: BasicValue {
                    value,
                    display_value: None,
                },
            },
        )
    }

    fn envelope(entries: Vec<(String, StatEntry)>) -> Envelope<StatsResponse> {
        Envelope::new(Some(StatsResponse {
            trials_of_osiris: Some(ModeStats {
                all_time: Some(entries.into_iter().collect()),
            }),
        }))
    }

    #[test]
    fn win_percentage_rounds() {
        let stats = derive_stats(envelope(vec![
            entry("activitiesWon", 7.0),
            entry("activitiesEntered", 13.0),
            entry("kills", 120.0),
        ]))
        .unwrap();

        let win = stats.get(WIN_PERCENTAGE_STAT).unwrap();
        assert_eq!(win.basic.value, 54.0);
        assert_eq!(win.basic.display_value.as_deref(), Some("54%"));
        assert_eq!(win.stat_id.as_deref(), Some(WIN_PERCENTAGE_STAT));
        assert_eq!(stats.value("kills"), Some(120.0));
        assert_eq!(stats.win_percentage(), Some(54));
    }

    #[test]
    fn no_matches_means_no_win_percentage() {
        let stats = derive_stats(envelope(vec![
            entry("activitiesWon", 0.0),
            entry("activitiesEntered", 0.0),
        ]))
        .unwrap();
        assert!(stats.get(WIN_PERCENTAGE_STAT).is_none());
    }

    #[test]
    fn missing_response_is_absent() {
        assert_eq!(derive_stats(Envelope::new(None)), None);
        assert_eq!(
            derive_stats(Envelope::new(Some(StatsResponse {
                trials_of_osiris: None
            }))),
            None
        );
    }

    #[test]
    fn derivation_is_stable() {
        let build = || {
            derive_stats(envelope(vec![
                entry("activitiesWon", 7.0),
                entry("activitiesEntered", 13.0),
            ]))
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn current_week_summary() {
        let week = current_week(&[CurrentWeekRow {
            matches: 9,
            losses: 2,
        }])
        .unwrap();
        assert_eq!(week.wins, 7);
        assert_eq!(week.win_percentage, Some(78));

        let empty = current_week(&[CurrentWeekRow {
            matches: 0,
            losses: 0,
        }])
        .unwrap();
        assert_eq!(empty.win_percentage, None);
        assert_eq!(current_week(&[]), None);
    }

    #[test]
    fn supporter_null_is_absent() {
        assert_eq!(supporter_status(Some(serde_json::Value::Null)), None);
        assert_eq!(supporter_status(None), None);
        assert_eq!(
            supporter_status(Some(serde_json::json!(true))),
            Some(serde_json::json!(true))
        );
    }
}
