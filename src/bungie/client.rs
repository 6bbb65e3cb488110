//! Bungie / Trials Report / guardian.gg HTTP 클라이언트
//!
//! `StatsSource` 구현체입니다. 응답을 역직렬화해서 그대로 넘기며 재시도하지 않습니다.

use anyhow::Context;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::{Bungie as BungieConfig, Config, GuardianGg as GuardianGgConfig, Report as ReportConfig};
use crate::payload::{
    AccountSearchRow, AccountSummaryResponse, ActivityHistoryResponse, CurrentWeekRow, EloRow,
    Envelope, GrimoireResponse, MapInfoPayload, PreviousMatchRow, RawWeaponCounters, StatsResponse,
    VisitEvent,
};
use crate::player::{Account, Platform};
use crate::source::{StatsSource, LIGHTHOUSE_CARD_ID, TRIALS_MODE};

/// Bungie 성공 코드
const BUNGIE_SUCCESS: i32 = 1;

pub struct BungieClient {
    bungie: BungieConfig,
    report: ReportConfig,
    guardian_gg: GuardianGgConfig,
    http: reqwest::Client,
}

/// Bungie Platform 응답 (에러 코드 포함)
#[derive(Debug, Deserialize)]
struct PlatformResponse<T> {
    #[serde(rename = "Response")]
    response: Option<T>,
    #[serde(rename = "ErrorCode", default = "default_error_code")]
    error_code: i32,
    #[serde(rename = "Message", default)]
    message: String,
}

fn default_error_code() -> i32 {
    BUNGIE_SUCCESS
}

/// `base` 뒤에 경로 조각을 인코딩해서 붙임
fn join_url(base: &str, segments: &[&str], trailing_slash: bool) -> anyhow::Result<Url> {
    let mut url = Url::parse(base).with_context(|| format!("invalid base url {:?}", base))?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| anyhow::anyhow!("base url cannot have a path: {:?}", base))?;
        path.pop_if_empty().extend(segments);
        if trailing_slash {
            path.push("");
        }
    }
    Ok(url)
}

impl BungieClient {
    pub fn new(config: &Config) -> Self {
        Self {
            bungie: config.bungie.clone(),
            report: config.report.clone(),
            guardian_gg: config.guardian_gg.clone(),
            http: reqwest::Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
        with_api_key: bool,
    ) -> anyhow::Result<T> {
        let body = self.get_text(url.clone(), query, with_api_key).await?;
        serde_json::from_str(&body).with_context(|| format!("could not decode response from {}", url))
    }

    async fn get_text(
        &self,
        url: Url,
        query: &[(&str, String)],
        with_api_key: bool,
    ) -> anyhow::Result<String> {
        let mut request = self.http.get(url.clone()).query(query);
        if with_api_key {
            request = request.header("X-API-Key", &self.bungie.api_key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("request to {} failed: {} - {}", url, status, body);
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("could not read response from {}", url))?;
        Ok(body)
    }

    /// Bungie Platform 호출. ErrorCode가 1이 아니면 실패
    async fn platform<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> anyhow::Result<Envelope<T>> {
        let url = join_url(&self.bungie.base_url, segments, true)?;
        let result: PlatformResponse<T> = self.get_json(url, query, true).await?;
        if result.error_code != BUNGIE_SUCCESS {
            anyhow::bail!("Bungie error {}: {}", result.error_code, result.message);
        }
        Ok(Envelope::new(result.response))
    }

    async fn report<T: DeserializeOwned>(&self, segments: &[&str]) -> anyhow::Result<T> {
        let url = join_url(&self.report.base_url, segments, false)?;
        self.get_json(url, &[], false).await
    }

    /// 빈 본문을 데이터 없음으로 취급하는 Trials Report 호출
    async fn report_optional<T: DeserializeOwned>(&self, segments: &[&str]) -> anyhow::Result<Option<T>> {
        let url = join_url(&self.report.base_url, segments, false)?;
        let body = self.get_text(url.clone(), &[], false).await?;
        decode_optional(&body).with_context(|| format!("could not decode response from {}", url))
    }
}

/// 빈 본문이면 None
fn decode_optional<T: DeserializeOwned>(body: &str) -> serde_json::Result<Option<T>> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(body).map(Some)
}

fn membership_type(account: &Account) -> String {
    account.membership_type.membership_type().to_string()
}

impl StatsSource for BungieClient {
    async fn search_account(
        &self,
        platform: Platform,
        name: &str,
    ) -> anyhow::Result<Envelope<Vec<AccountSearchRow>>> {
        let membership_type = platform.membership_type().to_string();
        self.platform(&["Destiny", "SearchDestinyPlayer", &membership_type, name], &[])
            .await
    }

    async fn account_summary(&self, account: &Account) -> anyhow::Result<Envelope<AccountSummaryResponse>> {
        self.platform(
            &[
                "Destiny",
                &membership_type(account),
                "Account",
                &account.membership_id,
                "Summary",
            ],
            &[("definitions", "true".to_string())],
        )
        .await
    }

    async fn stats(&self, account: &Account, character_id: &str) -> anyhow::Result<Envelope<StatsResponse>> {
        self.platform(
            &[
                "Destiny",
                "Stats",
                &membership_type(account),
                &account.membership_id,
                character_id,
            ],
            &[("modes", TRIALS_MODE.to_string())],
        )
        .await
    }

    async fn grimoire(&self, account: &Account) -> anyhow::Result<Envelope<GrimoireResponse>> {
        self.platform(
            &[
                "Destiny",
                "Vanguard",
                "Grimoire",
                &membership_type(account),
                &account.membership_id,
            ],
            &[("single", LIGHTHOUSE_CARD_ID.to_string())],
        )
        .await
    }

    async fn lighthouse_visits(&self, account: &Account) -> anyhow::Result<Vec<VisitEvent>> {
        self.report(&["lighthouseCount", &account.membership_id]).await
    }

    async fn top_weapons(&self, account: &Account) -> anyhow::Result<Vec<RawWeaponCounters>> {
        self.report(&["topWeapons", &account.membership_id]).await
    }

    async fn previous_matches(&self, account: &Account) -> anyhow::Result<Option<Vec<PreviousMatchRow>>> {
        self.report_optional(&["previousMatches", &account.membership_id])
            .await
    }

    async fn supporter_status(&self, account: &Account) -> anyhow::Result<Option<serde_json::Value>> {
        self.report_optional(&["supporterStatus", &account.membership_id])
            .await
    }

    async fn current_week(&self, account: &Account) -> anyhow::Result<Vec<CurrentWeekRow>> {
        self.report(&["currentWeek", &account.membership_id]).await
    }

    async fn activity_history(
        &self,
        account: &Account,
        character_id: &str,
        count: u32,
    ) -> anyhow::Result<Envelope<ActivityHistoryResponse>> {
        self.platform(
            &[
                "Destiny",
                "Stats",
                "ActivityHistory",
                &membership_type(account),
                &account.membership_id,
                character_id,
            ],
            &[
                ("mode", TRIALS_MODE.to_string()),
                ("count", count.to_string()),
            ],
        )
        .await
    }

    async fn elo(&self, account: &Account) -> anyhow::Result<Vec<EloRow>> {
        let url = join_url(&self.guardian_gg.base_url, &["elo", &account.membership_id], false)?;
        self.get_json(url, &[], false).await
    }

    async fn map_info(&self, reference_id: &str) -> anyhow::Result<MapInfoPayload> {
        self.report(&["getMapInfo", reference_id]).await
    }
}
