//! 필드별 조회 + 파생
//!
//! 각 함수는 원격 조회 한 번과 순수 파생 한 번으로 `RecordUpdate` 하나를 만듭니다.
//! 조회 실패는 호출자에게 그대로 전파됩니다.

use anyhow::Result;
use std::collections::BTreeMap;

use crate::buckets::Bucket;
use crate::clock::ResetSchedule;
use crate::lighthouse::{aggregate_visits, grimoire_lighthouse};
use crate::merge::RecordUpdate;
use crate::payload::{
    AccountSearchRow, AccountSummaryResponse, ActivityRow, EloRow, Envelope, PreviousMatchRow,
};
use crate::player::{Account, Activities, CharacterInfo, MatchSummary, Platform, Rating, WeaponDefinition};
use crate::source::{StatsSource, TRIALS_MODE};
use crate::stats::{current_week, derive_stats, supporter_status};
use crate::weapons::top_weapons;

/// 최근 활동 조회 개수
pub const RECENT_ACTIVITY_COUNT: u32 = 25;
const LAST_THREE: usize = 3;

/// 이름으로 계정 조회. 결과가 없으면 None
pub async fn resolve_account<S: StatsSource>(
    source: &S,
    platform: Platform,
    name: &str,
) -> Result<Option<Account>> {
    let envelope = source.search_account(platform, name).await?;
    Ok(account_from_search(envelope))
}

pub fn account_from_search(envelope: Envelope<Vec<AccountSearchRow>>) -> Option<Account> {
    let row = envelope.response?.into_iter().next()?;
    let membership_type = match Platform::from_membership_type(row.membership_type) {
        Some(platform) => platform,
        None => {
            tracing::warn!("unknown membership type {} for {}", row.membership_type, row.display_name);
            return None;
        }
    };
    Some(Account {
        membership_id: row.membership_id,
        membership_type,
        name: row.display_name,
    })
}

/// 가장 최근에 플레이한 캐릭터와 장착 무기
pub fn character_from_summary(summary: &AccountSummaryResponse) -> Option<CharacterInfo> {
    let (index, row) = summary
        .data
        .characters
        .iter()
        .enumerate()
        .max_by_key(|(_, row)| row.character_base.date_last_played)?;

    let weapons: BTreeMap<Bucket, WeaponDefinition> = summary
        .data
        .items
        .iter()
        .filter(|item| item.character_index == index as i32)
        .filter_map(|item| {
            let bucket = Bucket::from_bucket_hash(item.bucket_hash)?;
            let definition = summary
                .definitions
                .as_ref()
                .and_then(|d| d.items.get(&item.item_hash.to_string()));
            Some((
                bucket,
                WeaponDefinition {
                    item_hash: item.item_hash,
                    name: definition.map(|d| d.item_name.clone()).unwrap_or_default(),
                    item_type: definition.map(|d| d.item_type_name.clone()).unwrap_or_default(),
                },
            ))
        })
        .collect();

    Some(CharacterInfo {
        character_id: row.character_base.character_id.clone(),
        class_hash: row.character_base.class_hash,
        date_last_played: row.character_base.date_last_played,
        weapons,
    })
}

pub fn activities_from_history(rows: &[ActivityRow]) -> Activities {
    let mut sorted: Vec<&ActivityRow> = rows.iter().collect();
    sorted.sort_by(|a, b| b.period.cmp(&a.period));

    let summaries: Vec<MatchSummary> = sorted
        .into_iter()
        .map(|row| MatchSummary {
            instance_id: row.activity_details.instance_id.clone(),
            period: row.period,
            // standing 0 = 승리
            won: row.values.get("standing").map(|s| s.basic.value == 0.0),
        })
        .collect();

    Activities {
        last_three: summaries.iter().take(LAST_THREE).cloned().collect(),
        last_matches: summaries,
    }
}

pub fn rating_from_elo(rows: &[EloRow]) -> Option<Rating> {
    rows.iter()
        .find(|row| row.mode == TRIALS_MODE)
        .filter(|row| row.elo.is_finite())
        .map(|row| Rating {
            elo: row.elo.round(),
            rank: row.rank.filter(|rank| *rank > 0),
        })
}

pub async fn character<S: StatsSource>(source: &S, account: &Account) -> Result<RecordUpdate> {
    let envelope = source.account_summary(account).await?;
    let info = envelope.response.as_ref().and_then(character_from_summary);
    if info.is_none() {
        tracing::warn!("no characters found for {}", account.name);
    }
    Ok(RecordUpdate::Character(info))
}

pub async fn stats<S: StatsSource>(
    source: &S,
    account: &Account,
    character_id: &str,
) -> Result<RecordUpdate> {
    let envelope = source.stats(account, character_id).await?;
    Ok(RecordUpdate::Stats(derive_stats(envelope)))
}

pub async fn grimoire<S: StatsSource>(source: &S, account: &Account) -> Result<RecordUpdate> {
    let envelope = source.grimoire(account).await?;
    Ok(RecordUpdate::Lighthouse(grimoire_lighthouse(&envelope)))
}

pub async fn lighthouse_visits<S: StatsSource>(
    source: &S,
    account: &Account,
    character_id: &str,
    schedule: &ResetSchedule,
) -> Result<RecordUpdate> {
    let events = source.lighthouse_visits(account).await?;
    let aggregate = aggregate_visits(&events, character_id, schedule);
    tracing::debug!(
        "{}: {} lighthouse weeks on account, {} on character",
        account.name,
        aggregate.account_week_count,
        aggregate.character_week_count
    );
    Ok(RecordUpdate::Lighthouse(aggregate.into_lighthouse()))
}

pub async fn top_weapon_stats<S: StatsSource>(source: &S, account: &Account) -> Result<RecordUpdate> {
    let rows = source.top_weapons(account).await?;
    Ok(RecordUpdate::TopWeapons(Some(top_weapons(&rows))))
}

pub async fn supporter<S: StatsSource>(source: &S, account: &Account) -> Result<RecordUpdate> {
    let value = source.supporter_status(account).await?;
    Ok(RecordUpdate::Supporter(supporter_status(value)))
}

pub async fn week<S: StatsSource>(source: &S, account: &Account) -> Result<RecordUpdate> {
    let rows = source.current_week(account).await?;
    Ok(RecordUpdate::CurrentWeek(current_week(&rows)))
}

pub async fn activities<S: StatsSource>(
    source: &S,
    account: &Account,
    character_id: &str,
) -> Result<RecordUpdate> {
    let envelope = source
        .activity_history(account, character_id, RECENT_ACTIVITY_COUNT)
        .await?;
    Ok(RecordUpdate::Activities(
        envelope
            .response
            .map(|response| activities_from_history(&response.data.activities)),
    ))
}

/// 이전 매치 목록을 그대로 반환 (기록에는 쓰지 않음)
pub async fn previous_matches<S: StatsSource>(
    source: &S,
    account: &Account,
) -> Result<Option<Vec<PreviousMatchRow>>> {
    let rows = source.previous_matches(account).await?;
    if rows.is_none() {
        tracing::debug!("no previous matches for {}", account.name);
    }
    Ok(rows)
}

pub async fn rating<S: StatsSource>(source: &S, account: &Account) -> Result<RecordUpdate> {
    let rows = source.elo(account).await?;
    Ok(RecordUpdate::Rating(rating_from_elo(&rows)))
}

/// 계정 단위 파생 (동시 실행, 하나라도 실패하면 전체 실패)
pub async fn account_bundle<S: StatsSource>(source: &S, account: &Account) -> Result<Vec<RecordUpdate>> {
    let (grimoire, weapons, supporter, week) = tokio::try_join!(
        grimoire(source, account),
        top_weapon_stats(source, account),
        supporter(source, account),
        week(source, account),
    )?;
    Ok(vec![grimoire, weapons, supporter, week])
}

/// 캐릭터 조회 후 캐릭터 단위 파생
///
/// 캐릭터가 없으면 캐릭터 단위 필드는 모두 데이터 없음으로 채웁니다.
pub async fn character_bundle<S: StatsSource>(
    source: &S,
    account: &Account,
    schedule: &ResetSchedule,
) -> Result<Vec<RecordUpdate>> {
    let update = character(source, account).await?;
    let character_id = match &update {
        RecordUpdate::Character(Some(info)) => info.character_id.clone(),
        _ => {
            // 방문 집계는 계정 단위로만 (캐릭터 주간 수 0)
            let visits = lighthouse_visits(source, account, "", schedule).await?;
            return Ok(vec![
                update,
                RecordUpdate::Stats(None),
                visits,
                RecordUpdate::Activities(None),
            ]);
        }
    };

    let (stats, visits, activities) = tokio::try_join!(
        stats(source, account, &character_id),
        lighthouse_visits(source, account, &character_id, schedule),
        activities(source, account, &character_id),
    )?;
    Ok(vec![update, stats, visits, activities])
}
