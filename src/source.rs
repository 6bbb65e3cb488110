//! 원격 데이터 소스 경계
//!
//! 집계 코어는 이 트레이트를 통해 이미 역직렬화된 응답만 받습니다.
//! 재시도는 구현체의 몫이며 코어는 실패를 그대로 전파합니다.

use anyhow::Result;
use std::future::Future;

use crate::payload::{
    AccountSearchRow, AccountSummaryResponse, ActivityHistoryResponse, CurrentWeekRow, EloRow,
    Envelope, GrimoireResponse, MapInfoPayload, PreviousMatchRow, RawWeaponCounters, StatsResponse,
    VisitEvent,
};
use crate::player::{Account, Platform};

/// 그리모어에서 라이트하우스 카드 ID
pub const LIGHTHOUSE_CARD_ID: &str = "110012";
/// Trials of Osiris 모드 ID
pub const TRIALS_MODE: u32 = 14;

pub trait StatsSource: Send + Sync {
    fn search_account(
        &self,
        platform: Platform,
        name: &str,
    ) -> impl Future<Output = Result<Envelope<Vec<AccountSearchRow>>>> + Send;

    fn account_summary(
        &self,
        account: &Account,
    ) -> impl Future<Output = Result<Envelope<AccountSummaryResponse>>> + Send;

    fn stats(
        &self,
        account: &Account,
        character_id: &str,
    ) -> impl Future<Output = Result<Envelope<StatsResponse>>> + Send;

    fn grimoire(
        &self,
        account: &Account,
    ) -> impl Future<Output = Result<Envelope<GrimoireResponse>>> + Send;

    fn lighthouse_visits(
        &self,
        account: &Account,
    ) -> impl Future<Output = Result<Vec<VisitEvent>>> + Send;

    fn top_weapons(
        &self,
        account: &Account,
    ) -> impl Future<Output = Result<Vec<RawWeaponCounters>>> + Send;

    /// 이전 매치 목록. 응답 본문이 비어 있으면 None
    fn previous_matches(
        &self,
        account: &Account,
    ) -> impl Future<Output = Result<Option<Vec<PreviousMatchRow>>>> + Send;

    fn supporter_status(
        &self,
        account: &Account,
    ) -> impl Future<Output = Result<Option<serde_json::Value>>> + Send;

    fn current_week(
        &self,
        account: &Account,
    ) -> impl Future<Output = Result<Vec<CurrentWeekRow>>> + Send;

    fn activity_history(
        &self,
        account: &Account,
        character_id: &str,
        count: u32,
    ) -> impl Future<Output = Result<Envelope<ActivityHistoryResponse>>> + Send;

    fn elo(&self, account: &Account) -> impl Future<Output = Result<Vec<EloRow>>> + Send;

    fn map_info(&self, reference_id: &str) -> impl Future<Output = Result<MapInfoPayload>> + Send;
}
