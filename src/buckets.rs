//! 무기 타입 → 버킷 매핑
//!
//! 기본 테이블은 Destiny 1 무기 타입 이름 기준이며,
//! 설정 파일의 `[weapons.buckets]`로 덮어쓸 수 있습니다.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 무기 슬롯 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Primary,
    Special,
    Heavy,
}

impl Bucket {
    /// Bungie 인벤토리 버킷 해시
    pub fn from_bucket_hash(hash: u32) -> Option<Bucket> {
        match hash {
            1498876634 => Some(Bucket::Primary),
            2465295065 => Some(Bucket::Special),
            953998645 => Some(Bucket::Heavy),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Primary => "primary",
            Bucket::Special => "special",
            Bucket::Heavy => "heavy",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

lazy_static::lazy_static! {
    /// 기본 무기 타입 매핑
    static ref DEFAULT_BUCKETS: HashMap<&'static str, Bucket> = maplit::hashmap! {
        "Auto Rifle" => Bucket::Primary,
        "Hand Cannon" => Bucket::Primary,
        "Pulse Rifle" => Bucket::Primary,
        "Scout Rifle" => Bucket::Primary,
        "Fusion Rifle" => Bucket::Special,
        "Shotgun" => Bucket::Special,
        "Sniper Rifle" => Bucket::Special,
        "Sidearm" => Bucket::Special,
        "Machine Gun" => Bucket::Heavy,
        "Rocket Launcher" => Bucket::Heavy,
        "Sword" => Bucket::Heavy,
    };
}

/// 무기 타입 → 버킷 조회 테이블
#[derive(Debug, Clone, PartialEq)]
pub struct BucketTable {
    types: HashMap<String, Bucket>,
}

impl Default for BucketTable {
    fn default() -> Self {
        Self {
            types: DEFAULT_BUCKETS
                .iter()
                .map(|(name, bucket)| (name.to_string(), *bucket))
                .collect(),
        }
    }
}

impl BucketTable {
    #[allow(unused)]
    pub fn empty() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// 기본 테이블에 설정값을 덮어씀
    pub fn with_overrides<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, Bucket)>,
    {
        let mut table = Self::default();
        table.types.extend(overrides);
        table
    }

    pub fn get(&self, weapon_type: &str) -> Option<Bucket> {
        self.types.get(weapon_type).copied()
    }

    /// 알 수 없는 타입은 잘못된 입력으로 취급
    pub fn classify(&self, weapon_type: &str) -> Result<Bucket> {
        match self.get(weapon_type) {
            Some(bucket) => Ok(bucket),
            None => anyhow::bail!("unknown weapon type: {:?}", weapon_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table() {
        let table = BucketTable::default();
        assert_eq!(table.get("Hand Cannon"), Some(Bucket::Primary));
        assert_eq!(table.get("Shotgun"), Some(Bucket::Special));
        assert_eq!(table.get("Rocket Launcher"), Some(Bucket::Heavy));
        assert!(table.classify("Trace Rifle").is_err());
    }

    #[test]
    fn overrides_extend_defaults() {
        let table = BucketTable::with_overrides(vec![
            ("Trace Rifle".to_string(), Bucket::Special),
            ("Sidearm".to_string(), Bucket::Primary),
        ]);
        assert_eq!(table.get("Trace Rifle"), Some(Bucket::Special));
        assert_eq!(table.get("Sidearm"), Some(Bucket::Primary));
        assert_eq!(table.get("Auto Rifle"), Some(Bucket::Primary));
    }

    #[test]
    fn bucket_hashes() {
        assert_eq!(Bucket::from_bucket_hash(953998645), Some(Bucket::Heavy));
        assert_eq!(Bucket::from_bucket_hash(0), None);
    }
}
