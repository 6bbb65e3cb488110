//! 원격 통계 서비스 HTTP 클라이언트
//!
//! - `client`: Bungie Platform / Trials Report API / guardian.gg

pub mod client;

pub use client::BungieClient;
