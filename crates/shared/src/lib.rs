//! # LwMailer 共有ユーティリティ
//!
//! ロギング初期化と構造化ログの命名規約を提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（domain, infra, lwmailer）から依存可能
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - 外部クレートへの依存は最小限に抑える（`tracing-subscriber` は feature で任意）

pub mod event_log;
pub mod observability;
