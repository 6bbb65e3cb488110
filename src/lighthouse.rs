//! 라이트하우스 방문 집계
//!
//! 방문 이벤트를 캐릭터별 리셋 주간으로 묶어, 방문한 주간 수를 계산합니다.
//! 그리모어 카드 여부와 방문 집계는 서로 다른 생산자가 채우므로
//! `LighthouseSummary`는 필드 단위로 병합됩니다.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::clock::{ResetSchedule, WeekKey};
use crate::payload::{Envelope, GrimoireResponse, VisitEvent};

/// 캐릭터 ID → (주간 → 방문 횟수)
pub type VisitsByCharacter = BTreeMap<String, BTreeMap<WeekKey, u32>>;

/// 방문 집계 결과
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VisitAggregate {
    pub visits_by_character: VisitsByCharacter,
    /// 모든 캐릭터의 방문 주간 수 합계
    pub account_week_count: u32,
    /// 현재 캐릭터의 방문 주간 수
    pub character_week_count: u32,
}

impl VisitAggregate {
    /// 방문 관련 필드만 채운 라이트하우스 패치
    pub fn into_lighthouse(self) -> LighthouseSummary {
        LighthouseSummary {
            grimoire: None,
            visits: Some(self.visits_by_character),
            account_count: Some(self.account_week_count),
            character_count: Some(self.character_week_count),
        }
    }
}

pub fn aggregate_visits(
    events: &[VisitEvent],
    current_character_id: &str,
    schedule: &ResetSchedule,
) -> VisitAggregate {
    let mut visits_by_character = VisitsByCharacter::new();
    for event in events {
        let key = schedule.week_start(event.period);
        *visits_by_character
            .entry(event.character_id.clone())
            .or_default()
            .entry(key)
            .or_insert(0) += 1;
    }

    let account_week_count = visits_by_character
        .values()
        .map(|weeks| weeks.len() as u32)
        .sum();
    let character_week_count = visits_by_character
        .get(current_character_id)
        .map(|weeks| weeks.len() as u32)
        .unwrap_or(0);

    VisitAggregate {
        visits_by_character,
        account_week_count,
        character_week_count,
    }
}

/// 그리모어 카드가 하나라도 있으면 라이트하우스 도달 경험 있음
pub fn grimoire_lighthouse(envelope: &Envelope<GrimoireResponse>) -> LighthouseSummary {
    let grimoire = envelope
        .response
        .as_ref()
        .map(|response| !response.data.card_collection.is_empty())
        .unwrap_or(false);

    LighthouseSummary {
        grimoire: Some(grimoire),
        ..Default::default()
    }
}

/// 라이트하우스 요약 (필드별 소유자가 다름)
///
/// - `grimoire`: 그리모어 조회
/// - `visits`, `account_count`, `character_count`: 방문 집계
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LighthouseSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grimoire: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visits: Option<VisitsByCharacter>,
    #[serde(rename = "accountCount", skip_serializing_if = "Option::is_none")]
    pub account_count: Option<u32>,
    #[serde(rename = "characterCount", skip_serializing_if = "Option::is_none")]
    pub character_count: Option<u32>,
}

impl LighthouseSummary {
    /// 패치에 있는 필드만 덮어쓰고 나머지는 유지
    pub fn merge(&mut self, patch: LighthouseSummary) {
        if let Some(grimoire) = patch.grimoire {
            self.grimoire = Some(grimoire);
        }
        if let Some(visits) = patch.visits {
            self.visits = Some(visits);
        }
        if let Some(count) = patch.account_count {
            self.account_count = Some(count);
        }
        if let Some(count) = patch.character_count {
            self.character_count = Some(count);
        }
    }
}
