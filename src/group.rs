//! 파이어팀 그룹 (최대 3명)
//!
//! 슬롯 하나를 채울 때 여러 조회를 동시에 실행하고, 모두 성공했을 때만
//! 쓰기 잠금 한 번으로 기록을 교체합니다. 하나라도 실패하면 슬롯은 그대로입니다.

use anyhow::{Context, Result};
use reqwest::Url;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::cancel::CancelToken;
use crate::clock::ResetSchedule;
use crate::fetchers;
use crate::merge::RecordUpdate;
use crate::player::{Account, Activities, Platform, PlayerRecord};
use crate::source::StatsSource;

pub const GROUP_SIZE: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Group {
    slots: [Option<PlayerRecord>; GROUP_SIZE],
    /// 채워진 슬롯의 이름 (슬롯 순서)
    identity: Vec<String>,
}

impl Group {
    pub fn slot(&self, index: usize) -> Option<&PlayerRecord> {
        self.slots.get(index).and_then(|slot| slot.as_ref())
    }

    pub fn identity(&self) -> &[String] {
        &self.identity
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_some())
    }

    fn refresh_identity(&mut self) {
        self.identity = self
            .slots
            .iter()
            .flatten()
            .map(|record| record.name().to_string())
            .collect();
    }

    /// 세 슬롯이 모두 찼을 때의 공유 경로 (`/ps/a/b/c`)
    ///
    /// 이름은 경로 조각 단위로 퍼센트 인코딩됩니다.
    pub fn route_path(&self, platform: Platform) -> Option<String> {
        if !self.is_full() {
            return None;
        }
        let mut url = Url::parse("http://localhost/").ok()?;
        url.path_segments_mut()
            .ok()?
            .clear()
            .push(platform.slug())
            .extend(self.identity.iter());
        Some(url.path().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOutcome {
    Written,
    /// 계정 없음. 아무것도 쓰지 않음
    Skipped,
    /// 쓰기 전에 취소됨
    Cancelled,
}

/// 공유 그룹 상태
#[derive(Debug, Clone)]
pub struct Roster {
    group: Arc<RwLock<Group>>,
    schedule: ResetSchedule,
}

impl Roster {
    pub fn new(schedule: ResetSchedule) -> Self {
        Self {
            group: Default::default(),
            schedule,
        }
    }

    pub async fn snapshot(&self) -> Group {
        self.group.read().await.clone()
    }

    pub async fn identity(&self) -> Vec<String> {
        self.group.read().await.identity.clone()
    }

    /// 이름으로 계정을 찾은 뒤 슬롯을 채움
    pub async fn search_player<S: StatsSource>(
        &self,
        source: &S,
        platform: Platform,
        name: &str,
        slot: usize,
        cancel: &CancelToken,
    ) -> Result<SlotOutcome> {
        let account = fetchers::resolve_account(source, platform, name)
            .await
            .with_context(|| format!("could not resolve account {:?}", name))?;
        if account.is_none() {
            tracing::info!("no account found for {} on {}", name, platform);
        }
        self.populate_slot(source, slot, account, cancel).await
    }

    pub async fn populate_slot<S: StatsSource>(
        &self,
        source: &S,
        slot: usize,
        account: Option<Account>,
        cancel: &CancelToken,
    ) -> Result<SlotOutcome> {
        if slot >= GROUP_SIZE {
            anyhow::bail!("slot {} out of range", slot);
        }
        let account = match account {
            Some(account) => account,
            None => return Ok(SlotOutcome::Skipped),
        };
        if cancel.is_cancelled() {
            return Ok(SlotOutcome::Cancelled);
        }

        let fetch = async {
            tokio::try_join!(
                fetchers::character_bundle(source, &account, &self.schedule),
                fetchers::account_bundle(source, &account),
                fetchers::rating(source, &account),
            )
        };

        let (character_updates, account_updates, rating) = tokio::select! {
            result = fetch => result
                .with_context(|| format!("could not populate slot {} for {}", slot, account.name))?,
            _ = cancel.cancelled() => {
                tracing::info!("slot {} population for {} cancelled", slot, account.name);
                return Ok(SlotOutcome::Cancelled);
            }
        };

        let mut group = self.group.write().await;
        if cancel.is_cancelled() {
            return Ok(SlotOutcome::Cancelled);
        }

        let mut record = match &group.slots[slot] {
            Some(existing) if existing.account.membership_id == account.membership_id => {
                existing.clone()
            }
            _ => PlayerRecord::new(account),
        };
        record.apply_all(
            character_updates
                .into_iter()
                .chain(account_updates)
                .chain(std::iter::once(rating)),
        );
        group.slots[slot] = Some(record);

        if let Some(anchor) = group.slots[0].as_mut() {
            if anchor.activities.is_none() {
                anchor.activities = Some(Activities::default());
            }
        }
        group.refresh_identity();

        tracing::info!("slot {} populated, group: {}", slot, group.identity.join(", "));
        Ok(SlotOutcome::Written)
    }

    /// 필드 하나를 조회해서 바로 병합
    ///
    /// 조회 중에 슬롯 주인이 바뀌었으면 쓰지 않고 `false`를 반환합니다.
    #[allow(unused)]
    pub async fn refresh<F>(&self, slot: usize, membership_id: &str, update: F) -> Result<bool>
    where
        F: Future<Output = Result<RecordUpdate>>,
    {
        let update = update.await?;
        let field = update.field();

        let mut group = self.group.write().await;
        match group.slots.get_mut(slot).and_then(|slot| slot.as_mut()) {
            Some(record) if record.account.membership_id == membership_id => {
                record.apply(update);
                tracing::debug!("slot {} field {} refreshed", slot, field);
                Ok(true)
            }
            _ => {
                tracing::debug!("slot {} changed owner, dropping {} update", slot, field);
                Ok(false)
            }
        }
    }

    /// 슬롯 비우기
    #[allow(unused)]
    pub async fn clear_slot(&self, slot: usize) {
        let mut group = self.group.write().await;
        if let Some(entry) = group.slots.get_mut(slot) {
            *entry = None;
        }
        group.refresh_identity();
    }
}
