use anyhow::Result;
use chrono::Weekday;
use serde::Deserialize;
use std::collections::HashMap;

use crate::buckets::{Bucket, BucketTable};
use crate::clock::{ResetSchedule, DEFAULT_RESET_HOUR, DEFAULT_RESET_WEEKDAY};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub bungie: Bungie,
    #[serde(default)]
    pub report: Report,
    #[serde(default)]
    pub guardian_gg: GuardianGg,
    #[serde(default)]
    pub reset: Reset,
    #[serde(default)]
    pub weapons: Weapons,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Bungie {
    #[serde(default = "default_bungie_url")]
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Report {
    #[serde(default = "default_report_url")]
    pub base_url: String,
}

impl Default for Report {
    fn default() -> Self {
        Self {
            base_url: default_report_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuardianGg {
    #[serde(default = "default_guardian_gg_url")]
    pub base_url: String,
}

impl Default for GuardianGg {
    fn default() -> Self {
        Self {
            base_url: default_guardian_gg_url(),
        }
    }
}

/// 주간 리셋 (기본: 금요일 18시 UTC)
#[derive(Debug, Clone, Deserialize)]
pub struct Reset {
    #[serde(default = "default_reset_weekday")]
    pub weekday: Weekday,
    #[serde(default = "default_reset_hour")]
    pub hour: u32,
}

impl Default for Reset {
    fn default() -> Self {
        Self {
            weekday: DEFAULT_RESET_WEEKDAY,
            hour: DEFAULT_RESET_HOUR,
        }
    }
}

impl Reset {
    pub fn schedule(&self) -> Result<ResetSchedule> {
        ResetSchedule::new(self.weekday, self.hour)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Weapons {
    /// 무기 타입 → 버킷 추가/덮어쓰기
    #[serde(default)]
    pub buckets: HashMap<String, Bucket>,
}

impl Weapons {
    pub fn table(&self) -> BucketTable {
        BucketTable::with_overrides(self.buckets.clone())
    }
}

fn default_bungie_url() -> String {
    "https://www.bungie.net/Platform".to_string()
}

fn default_report_url() -> String {
    "https://api.destinytrialsreport.com".to_string()
}

fn default_guardian_gg_url() -> String {
    "https://api.guardian.gg".to_string()
}

fn default_reset_weekday() -> Weekday {
    DEFAULT_RESET_WEEKDAY
}

fn default_reset_hour() -> u32 {
    DEFAULT_RESET_HOUR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config() {
        let config: Config = toml::from_str(
            r#"
            [bungie]
            api_key = "abc"
            "#,
        )
        .unwrap();
        assert_eq!(config.bungie.base_url, "https://www.bungie.net/Platform");
        assert_eq!(config.reset.weekday, Weekday::Fri);
        assert_eq!(config.reset.hour, 18);
        assert_eq!(config.reset.schedule().unwrap(), ResetSchedule::default());
        assert_eq!(config.weapons.table(), BucketTable::default());
    }

    #[test]
    fn full_config() {
        let config: Config = toml::from_str(
            r#"
            [bungie]
            base_url = "http://localhost:8080/Platform"
            api_key = "abc"

            [report]
            base_url = "http://localhost:9000"

            [reset]
            weekday = "Tue"
            hour = 9

            [weapons.buckets]
            "Trace Rifle" = "special"
            "#,
        )
        .unwrap();
        assert_eq!(config.report.base_url, "http://localhost:9000");
        assert_eq!(config.reset.weekday, Weekday::Tue);
        assert_eq!(config.weapons.table().get("Trace Rifle"), Some(Bucket::Special));
    }

    #[test]
    fn invalid_reset_hour() {
        let config: Config = toml::from_str(
            r#"
            [bungie]
            api_key = "abc"
            [reset]
            hour = 30
            "#,
        )
        .unwrap();
        assert!(config.reset.schedule().is_err());
    }
}
