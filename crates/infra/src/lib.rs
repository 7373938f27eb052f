//! # LwMailer インフラ層
//!
//! メールの実際の配送を担当するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! ドメイン層で定義された [`MailEnvelope`](lwmailer_domain::mail::MailEnvelope) を、
//! 外部の配送手段に引き渡す。配送手段の詳細はこのクレートに閉じ込める。
//!
//! ## 責務
//!
//! - **SMTP 送信**: lettre の非同期 SMTP クライアント（認証・TLS）
//! - **sendmail 送信**: ホストの sendmail コマンド
//! - **デバッグログ**: 送信せずにログファイルへ追記
//!
//! ## 依存関係
//!
//! ```text
//! lwmailer → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`transport`] - `MailTransport` トレイトと 3 つの実装
//! - `mock` - テスト用トランスポート（`test-utils` feature）

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod transport;

pub use transport::{
    DebugLogTransport,
    MailTransport,
    SendmailMailTransport,
    SmtpMailTransport,
};
