//! 플레이어 기록 병합
//!
//! 부분 결과(`RecordUpdate`)는 자신이 소유한 필드 하나만 씁니다.
//! 같은 업데이트를 여러 번 적용해도 결과는 같습니다.

use std::collections::BTreeMap;

use crate::lighthouse::LighthouseSummary;
use crate::player::{Activities, CharacterInfo, PlayerRecord, Rating};
use crate::stats::{CurrentWeek, TrialsStats};
use crate::weapons::WeaponStatLine;

/// 필드별 부분 결과
#[derive(Debug, Clone, PartialEq)]
pub enum RecordUpdate {
    Character(Option<CharacterInfo>),
    Stats(Option<TrialsStats>),
    /// 필드 단위 병합 (없는 필드는 유지)
    Lighthouse(LighthouseSummary),
    TopWeapons(Option<BTreeMap<String, WeaponStatLine>>),
    Supporter(Option<serde_json::Value>),
    CurrentWeek(Option<CurrentWeek>),
    Activities(Option<Activities>),
    Rating(Option<Rating>),
}

impl RecordUpdate {
    /// 대상 필드 이름
    pub fn field(&self) -> &'static str {
        match self {
            RecordUpdate::Character(_) => "characterInfo",
            RecordUpdate::Stats(_) => "stats",
            RecordUpdate::Lighthouse(_) => "lighthouse",
            RecordUpdate::TopWeapons(_) => "topWeapons",
            RecordUpdate::Supporter(_) => "nonHazard",
            RecordUpdate::CurrentWeek(_) => "currentWeek",
            RecordUpdate::Activities(_) => "activities",
            RecordUpdate::Rating(_) => "rating",
        }
    }
}

impl PlayerRecord {
    pub fn apply(&mut self, update: RecordUpdate) {
        match update {
            RecordUpdate::Character(value) => self.character_info = value,
            RecordUpdate::Stats(value) => self.stats = value,
            RecordUpdate::Lighthouse(patch) => {
                self.lighthouse.get_or_insert_with(Default::default).merge(patch)
            }
            RecordUpdate::TopWeapons(value) => self.top_weapons = value,
            RecordUpdate::Supporter(value) => self.non_hazard = value,
            RecordUpdate::CurrentWeek(value) => self.current_week = value,
            RecordUpdate::Activities(value) => self.activities = value,
            RecordUpdate::Rating(value) => self.rating = value,
        }
    }

    pub fn apply_all<I>(&mut self, updates: I)
    where
        I: IntoIterator<Item = RecordUpdate>,
    {
        for update in updates {
            self.apply(update);
        }
    }
}

#[allow(unused)]
pub fn merge(mut record: PlayerRecord, update: RecordUpdate) -> PlayerRecord {
    record.apply(update);
    record
}
