//! # メール配送
//!
//! 送信方式ごとの配送処理を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `MailTransport` trait で配送手段を抽象化
//! - **3 つの実装**: SMTP（本番用）、sendmail（ホスト委譲）、デバッグログ（テスト環境用）
//! - **送信ごとに設定を参照**: 設定の上書きが次の送信から反映されるよう、
//!   接続設定は `send` の引数で受け取る

mod debug_log;
mod sendmail;
mod smtp;

use async_trait::async_trait;
pub use debug_log::{DebugLogTransport, LOG_ROOT_DIR, RECORD_DELIMITER};
use lettre::{Address, message::Mailbox};
use lwmailer_domain::{
    MailError,
    config::{MailerConfig, TransportMode},
    mail::MailEnvelope,
};
pub use sendmail::SendmailMailTransport;
pub use smtp::SmtpMailTransport;

/// メール配送トレイト
///
/// ディスパッチャーから選択された 1 つの実装が呼ばれる。
/// 宛先は検証済み、本文は署名付与済みの状態で渡される。
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// メールを配送する
    async fn send(&self, envelope: &MailEnvelope, config: &MailerConfig) -> Result<(), MailError>;
}

/// アドレス文字列を lettre の `Mailbox` に変換する
///
/// `with_name` が true の場合、アドレス自体を表示名として付与する。
fn mailbox(mode: TransportMode, address: &str, with_name: bool) -> Result<Mailbox, MailError> {
    let parsed: Address = address
        .parse()
        .map_err(|e| MailError::transport(mode, format!("アドレス不正 ({address}): {e}")))?;
    let name = with_name.then(|| address.to_string());

    Ok(Mailbox::new(name, parsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mailboxは表示名付きで変換できる() {
        let mailbox = mailbox(TransportMode::Library, "a@b.com", true).unwrap();

        assert_eq!(mailbox.name.as_deref(), Some("a@b.com"));
        assert_eq!(mailbox.email.to_string(), "a@b.com");
    }

    #[test]
    fn mailboxは不正なアドレスをトランスポートエラーにする() {
        let err = mailbox(TransportMode::Native, "", false).unwrap_err();

        assert!(matches!(
            err,
            MailError::Transport {
                mode: TransportMode::Native,
                ..
            }
        ));
    }
}
