//! 원격 API 응답 구조체
//!
//! 모든 구조체는 이미 역직렬화된 응답 본문입니다.
//! 집계 로직은 이 타입들만 입력으로 받습니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bungie 응답 봉투. `Response`가 없으면 데이터 없음.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(rename = "Response")]
    pub response: Option<T>,
}

impl<T> Envelope<T> {
    pub fn new(response: Option<T>) -> Self {
        Self { response }
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct StatsResponse {
    #[serde(rename = "trialsOfOsiris")]
    pub trials_of_osiris: Option<ModeStats>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModeStats {
    #[serde(rename = "allTime")]
    pub all_time: Option<BTreeMap<String, StatEntry>>,
}

/// 개별 통계 항목 (`{statId, basic: {value, displayValue}}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatEntry {
    #[serde(rename = "statId", default, skip_serializing_if = "Option::is_none")]
    pub stat_id: Option<String>,
    pub basic: BasicValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicValue {
    pub value: f64,
    #[serde(rename = "displayValue", default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
}

// ---------------------------------------------------------------------------
// Grimoire
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct GrimoireResponse {
    pub data: GrimoireData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GrimoireData {
    #[serde(rename = "cardCollection")]
    pub card_collection: Vec<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Trials Report API
// ---------------------------------------------------------------------------

/// 라이트하우스 방문 이벤트 (활동 1회 완료당 1개)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitEvent {
    #[serde(rename = "characterId")]
    pub character_id: String,
    pub period: DateTime<Utc>,
}

/// 무기별 원시 카운터
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawWeaponCounters {
    #[serde(rename = "weaponId")]
    pub weapon_id: String,
    pub kills: u32,
    pub headshots: u32,
    #[serde(default)]
    pub win_percentage: f64,
    #[serde(default)]
    pub total_matches: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeekRow {
    pub matches: u32,
    pub losses: u32,
}

/// 이전 매치 행 (`previousMatches`)
///
/// 필드 구성은 Trials Report 쪽에서 정하므로 그대로 보존합니다.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PreviousMatchRow {
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

#[allow(unused)]
impl PreviousMatchRow {
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }
}

/// 맵 정보 응답 (`getMapInfo`)
#[derive(Debug, Clone, Deserialize)]
pub struct MapInfoPayload {
    #[serde(default)]
    pub map_info: Vec<MapInfoRow>,
    #[serde(default)]
    pub map_ref: Vec<MapOccurrence>,
    #[serde(default)]
    pub weapon_stats: Vec<MapWeaponRow>,
}

/// 현재 주간의 맵 요약
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapInfoRow {
    pub reference_id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub matches: u32,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub headshots: u32,
}

/// 과거 맵 등장 기록
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapOccurrence {
    pub reference_id: String,
    pub first_occurrence: DateTime<Utc>,
}

/// 맵 단위 무기 통계 행
///
/// `kills`는 이번 주간, `sum_kills`는 해당 맵 전체 기록의 누적 킬입니다.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapWeaponRow {
    pub weapon_id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub weapon_type: String,
    pub kills: u64,
    #[serde(default)]
    pub headshots: u64,
    pub sum_kills: u64,
}

// ---------------------------------------------------------------------------
// Account / Inventory / Activities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct AccountSearchRow {
    #[serde(rename = "membershipType")]
    pub membership_type: u8,
    #[serde(rename = "membershipId")]
    pub membership_id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountSummaryResponse {
    pub data: AccountSummaryData,
    #[serde(default)]
    pub definitions: Option<Definitions>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountSummaryData {
    pub characters: Vec<CharacterRow>,
    #[serde(default)]
    pub items: Vec<ItemRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CharacterRow {
    #[serde(rename = "characterBase")]
    pub character_base: CharacterBase,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CharacterBase {
    #[serde(rename = "characterId")]
    pub character_id: String,
    #[serde(rename = "classHash", default)]
    pub class_hash: u32,
    #[serde(rename = "dateLastPlayed")]
    pub date_last_played: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemRow {
    #[serde(rename = "itemHash")]
    pub item_hash: u32,
    #[serde(rename = "bucketHash")]
    pub bucket_hash: u32,
    #[serde(rename = "characterIndex")]
    pub character_index: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Definitions {
    #[serde(default)]
    pub items: BTreeMap<String, ItemDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemDefinition {
    #[serde(rename = "itemName")]
    pub item_name: String,
    #[serde(rename = "itemTypeName", default)]
    pub item_type_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityHistoryResponse {
    pub data: ActivityHistoryData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityHistoryData {
    #[serde(default)]
    pub activities: Vec<ActivityRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityRow {
    pub period: DateTime<Utc>,
    #[serde(rename = "activityDetails")]
    pub activity_details: ActivityDetails,
    #[serde(default)]
    pub values: BTreeMap<String, StatEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityDetails {
    #[serde(rename = "instanceId")]
    pub instance_id: String,
}

/// guardian.gg Elo 행
#[derive(Debug, Clone, Deserialize)]
pub struct EloRow {
    pub mode: u32,
    pub elo: f64,
    #[serde(default)]
    pub rank: Option<i64>,
}
