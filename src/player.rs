use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::buckets::Bucket;
use crate::lighthouse::LighthouseSummary;
use crate::stats::{CurrentWeek, TrialsStats};
use crate::weapons::WeaponStatLine;

/// 플랫폼 (Bungie membershipType)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Xbox,
    Psn,
}

impl Platform {
    pub fn membership_type(&self) -> u8 {
        match self {
            Platform::Xbox => 1,
            Platform::Psn => 2,
        }
    }

    pub fn from_membership_type(value: u8) -> Option<Platform> {
        match value {
            1 => Some(Platform::Xbox),
            2 => Some(Platform::Psn),
            _ => None,
        }
    }

    /// 경로 접두사 (`ps` / `xbox`)
    pub fn slug(&self) -> &'static str {
        match self {
            Platform::Xbox => "xbox",
            Platform::Psn => "ps",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Platform> {
        match slug.to_ascii_lowercase().as_str() {
            "xbox" | "xb" => Some(Platform::Xbox),
            "ps" | "psn" => Some(Platform::Psn),
            _ => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// 플레이어 계정 (조회 후 변경되지 않음)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "membershipId")]
    pub membership_id: String,
    #[serde(rename = "membershipType")]
    pub membership_type: Platform,
    pub name: String,
}

/// 무기 정의
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeaponDefinition {
    #[serde(rename = "itemHash")]
    pub item_hash: u32,
    pub name: String,
    #[serde(rename = "itemType")]
    pub item_type: String,
}

/// 캐릭터 정보 (가장 최근에 플레이한 캐릭터)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterInfo {
    #[serde(rename = "characterId")]
    pub character_id: String,
    #[serde(rename = "classHash")]
    pub class_hash: u32,
    #[serde(rename = "dateLastPlayed")]
    pub date_last_played: DateTime<Utc>,
    pub weapons: BTreeMap<Bucket, WeaponDefinition>,
}

/// 최근 매치 요약
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    #[serde(rename = "instanceId")]
    pub instance_id: String,
    pub period: DateTime<Utc>,
    /// 승리 여부. 결과 값이 없으면 None
    pub won: Option<bool>,
}

/// 최근 매치 (최신순)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Activities {
    #[serde(rename = "lastThree")]
    pub last_three: Vec<MatchSummary>,
    #[serde(rename = "lastMatches")]
    pub last_matches: Vec<MatchSummary>,
}

impl Activities {
    #[allow(unused)]
    pub fn find(&self, instance_id: &str) -> Option<&MatchSummary> {
        self.last_matches.iter().find(|m| m.instance_id == instance_id)
    }
}

/// guardian.gg Elo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rating {
    pub elo: f64,
    pub rank: Option<i64>,
}

/// 그룹 슬롯 하나에 들어가는 플레이어 기록
///
/// 각 필드는 하나의 생산자만 씁니다. `lighthouse`만 필드 단위로 병합됩니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRecord {
    pub account: Account,
    #[serde(rename = "characterInfo")]
    pub character_info: Option<CharacterInfo>,
    pub stats: Option<TrialsStats>,
    pub lighthouse: Option<LighthouseSummary>,
    #[serde(rename = "topWeapons")]
    pub top_weapons: Option<BTreeMap<String, WeaponStatLine>>,
    #[serde(rename = "nonHazard")]
    pub non_hazard: Option<serde_json::Value>,
    #[serde(rename = "currentWeek")]
    pub current_week: Option<CurrentWeek>,
    pub activities: Option<Activities>,
    pub rating: Option<Rating>,
}

impl PlayerRecord {
    pub fn new(account: Account) -> Self {
        Self {
            account,
            character_info: None,
            stats: None,
            lighthouse: None,
            top_weapons: None,
            non_hazard: None,
            current_week: None,
            activities: None,
            rating: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.account.name
    }

    #[allow(unused)]
    pub fn character_id(&self) -> Option<&str> {
        self.character_info.as_ref().map(|c| c.character_id.as_str())
    }
}
