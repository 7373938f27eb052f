//! # LwMailer
//!
//! 設定に応じて SMTP / sendmail / デバッグログファイルのいずれかでメールを送る
//! ファサード。
//!
//! ## 処理の流れ
//!
//! ```text
//! send_mail(to, subject, message)
//!   → 宛先検証（不正なら InvalidAddress、送信しない）
//!   → 件名プレフィックス・署名の付与
//!   → config.transport に応じた配送
//!        library → SMTP（lettre）
//!        native  → sendmail コマンド
//!        debug   → <resource>/lw_logs/<dir>/<file> に追記
//! ```
//!
//! ## 使用例
//!
//! ```rust,no_run
//! use lwmailer::{MailDispatcher, MailRequest};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut mailer = MailDispatcher::from_env()?;
//! mailer.force_debug_mode();
//!
//! mailer
//!     .send_mail(MailRequest::new("user@example.com", "Hi", "Body"))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## モジュール構成
//!
//! - [`config`] - 環境変数からの設定読み込み
//! - [`dispatcher`] - 送信ファサード
//! - [`error`] - 初期化エラー
//! - [`signature`] - 署名の生成と付与

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod signature;

pub use dispatcher::{MailDispatcher, Transports};
pub use error::InitError;
pub use lwmailer_domain::{
    ConfigError,
    MailError,
    config::{MailerConfig, TransportMode},
    mail::{MailAddress, MailRequest},
};
#[cfg(feature = "observability")]
pub use lwmailer_shared::observability::init_tracing;
pub use lwmailer_shared::observability::{DEFAULT_FILTER, LogFormat, TracingConfig};
