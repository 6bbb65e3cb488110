//! 무기별 통계 요약 (정확도, 승률)

use serde::Serialize;
use std::collections::BTreeMap;

use crate::payload::RawWeaponCounters;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeaponStatLine {
    #[serde(rename = "weaponId")]
    pub weapon_id: String,
    pub kills: u32,
    pub headshots: u32,
    /// 헤드샷 비율 (0-100). 킬이 없으면 None
    pub precision: Option<u32>,
    /// 경기가 없으면 None
    #[serde(rename = "winPercentage")]
    pub win_percentage: Option<u32>,
    #[serde(rename = "totalMatches")]
    pub total_matches: u32,
}

/// `round(100 * part / whole)`, `whole == 0`이면 None
pub fn percentage(part: u64, whole: u64) -> Option<u32> {
    if whole == 0 {
        return None;
    }
    Some((100.0 * part as f64 / whole as f64).round() as u32)
}

pub fn summarize(raw: &RawWeaponCounters) -> WeaponStatLine {
    let win_percentage = if raw.total_matches > 0 && raw.win_percentage.is_finite() {
        Some(raw.win_percentage.clamp(0.0, 100.0).round() as u32)
    } else {
        None
    };

    WeaponStatLine {
        weapon_id: raw.weapon_id.clone(),
        kills: raw.kills,
        headshots: raw.headshots,
        precision: percentage(raw.headshots as u64, raw.kills as u64),
        win_percentage,
        total_matches: raw.total_matches,
    }
}

/// 플레이어의 상위 무기 목록을 weaponId 기준으로 정리
pub fn top_weapons(rows: &[RawWeaponCounters]) -> BTreeMap<String, WeaponStatLine> {
    rows.iter()
        .map(|row| (row.weapon_id.clone(), summarize(row)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters(weapon_id: &str, kills: u32, headshots: u32) -> RawWeaponCounters {
        RawWeaponCounters {
            weapon_id: weapon_id.to_string(),
            kills,
            headshots,
            win_percentage: 0.0,
            total_matches: 0,
        }
    }

    #[test]
    fn precision_rounds() {
        assert_eq!(summarize(&counters("1274330687", 10, 3)).precision, Some(30));
        assert_eq!(summarize(&counters("1274330687", 3, 2)).precision, Some(67));
    }

    #[test]
    fn precision_without_kills_is_absent() {
        let line = summarize(&counters("1274330687", 0, 0));
        assert_eq!(line.precision, None);
        assert_eq!(line.win_percentage, None);
    }

    #[test]
    fn win_percentage_requires_matches() {
        let mut raw = counters("346443849", 40, 20);
        raw.win_percentage = 61.4;
        assert_eq!(summarize(&raw).win_percentage, None);

        raw.total_matches = 12;
        assert_eq!(summarize(&raw).win_percentage, Some(61));
    }

    #[test]
    fn top_weapons_keyed_by_id() {
        let rows = vec![counters("a", 10, 5), counters("b", 4, 1)];
        let top = top_weapons(&rows);
        assert_eq!(top["a"].precision, Some(50));
        assert_eq!(top["b"].precision, Some(25));
    }

    #[test]
    fn resummarizing_is_stable() {
        let raw = counters("a", 17, 9);
        assert_eq!(summarize(&raw), summarize(&raw));
    }
}
