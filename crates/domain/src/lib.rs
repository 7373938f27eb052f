//! # LwMailer ドメイン層
//!
//! メール送信ファサードの中核となる値オブジェクトと設定を定義する。
//!
//! ## 設計方針
//!
//! - **値オブジェクト**: 宛先アドレスは検証済みの [`mail::MailAddress`] としてのみ流通する
//! - **閉じた列挙型**: 送信方式は [`config::TransportMode`] の 3 種類に限定する
//! - **ドメインエラー**: 送信・設定の失敗を [`MailError`] / [`ConfigError`] で表現する
//!
//! ## 依存関係の方向
//!
//! ```text
//! lwmailer → infra → domain
//!          ↘ shared
//! ```
//!
//! ドメイン層は SMTP クライアントやファイルシステムには一切依存しない。
//!
//! ## 使用例
//!
//! ```rust
//! use lwmailer_domain::mail::{MailAddress, MailRequest};
//!
//! let request = MailRequest::new("user@example.com", "件名", "本文");
//! let to = MailAddress::new(request.to.clone()).unwrap();
//! assert_eq!(to.as_str(), "user@example.com");
//! ```

pub mod clock;
pub mod config;
pub mod contact;
pub mod error;
pub mod mail;

pub use error::{ConfigError, MailError};
