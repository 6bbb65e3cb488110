//! 맵 단위 무기 통계 집계
//!
//! 버킷별 킬 점유율과 맵 전체 기록 대비 편차를 계산합니다.
//! Heavy 버킷은 표본이 적어 비교 대상에서 빠지지만 총합에는 포함됩니다.

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::buckets::{Bucket, BucketTable};
use crate::payload::{MapInfoPayload, MapInfoRow, MapOccurrence, MapWeaponRow};
use crate::weapons::percentage;

/// 버킷 합계
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BucketTotals {
    /// 이번 주간 킬 합계
    pub kills: u64,
    /// 맵 전체 기록 누적 킬 합계
    pub sum_kills: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapWeaponSummary {
    pub weapon_id: String,
    pub name: Option<String>,
    pub bucket: Bucket,
    pub kills: u64,
    pub sum_kills: u64,
    pub precision: Option<u32>,
    /// 버킷 내 이번 주간 킬 점유율
    #[serde(rename = "killPercentage")]
    pub kill_percentage: Option<f64>,
    /// 버킷 내 누적 킬 점유율
    #[serde(rename = "avgPercentage")]
    pub avg_percentage: Option<f64>,
    #[serde(rename = "diffPercentage")]
    pub diff_percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSummary {
    pub current: Option<MapInfoRow>,
    /// 과거 등장 기록 (오래된 순)
    pub history: Vec<MapOccurrence>,
    pub buckets: BTreeMap<Bucket, BucketTotals>,
    pub total_kills: u64,
    pub total_sum_kills: u64,
    pub weapons: Vec<MapWeaponSummary>,
}

/// 소수점 둘째 자리 반올림
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn share(part: u64, whole: u64) -> Option<f64> {
    if whole == 0 {
        return None;
    }
    Some(round2(100.0 * part as f64 / whole as f64))
}

pub fn aggregate_map(payload: &MapInfoPayload, table: &BucketTable) -> Result<MapSummary> {
    let classified = payload
        .weapon_stats
        .iter()
        .map(|row| Ok((table.classify(&row.weapon_type)?, row)))
        .collect::<Result<Vec<(Bucket, &MapWeaponRow)>>>()?;

    let mut buckets: BTreeMap<Bucket, BucketTotals> = BTreeMap::new();
    for (bucket, row) in &classified {
        let totals = buckets.entry(*bucket).or_default();
        totals.kills += row.kills;
        totals.sum_kills += row.sum_kills;
    }

    let total_kills = buckets.values().map(|t| t.kills).sum();
    let total_sum_kills = buckets.values().map(|t| t.sum_kills).sum();

    let mut weapons: Vec<MapWeaponSummary> = classified
        .iter()
        .filter(|(bucket, _)| *bucket != Bucket::Heavy)
        .map(|(bucket, row)| {
            let totals = buckets.get(bucket).copied().unwrap_or_default();
            // 이번 맵에서 킬이 없는 버킷은 비율 계산 생략
            let (kill_percentage, avg_percentage, diff_percentage) = if totals.kills > 0 {
                let kill = share(row.kills, totals.kills);
                let avg = share(row.sum_kills, totals.sum_kills);
                let diff = match (kill, avg) {
                    (Some(kill), Some(avg)) => Some(round2(kill - avg)),
                    _ => None,
                };
                (kill, avg, diff)
            } else {
                (None, None, None)
            };

            MapWeaponSummary {
                weapon_id: row.weapon_id.clone(),
                name: row.name.clone(),
                bucket: *bucket,
                kills: row.kills,
                sum_kills: row.sum_kills,
                precision: percentage(row.headshots, row.kills),
                kill_percentage,
                avg_percentage,
                diff_percentage,
            }
        })
        .collect();
    weapons.sort_by(|a, b| a.bucket.cmp(&b.bucket).then(b.kills.cmp(&a.kills)));

    let mut history = payload.map_ref.clone();
    history.sort_by_key(|occurrence| occurrence.first_occurrence);

    let current = payload
        .map_info
        .iter()
        .max_by_key(|info| info.start_date)
        .cloned();

    tracing::debug!(
        "map summary: {} weapons, {} history entries, {} total kills",
        weapons.len(),
        history.len(),
        total_kills
    );

    Ok(MapSummary {
        current,
        history,
        buckets,
        total_kills,
        total_sum_kills,
        weapons,
    })
}
