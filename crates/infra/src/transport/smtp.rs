//! SMTP 配送実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//! LOGIN 認証、ポート指定、SMTPS / STARTTLS に対応する。

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Message,
    Tokio1Executor,
    message::{
        Body,
        header::{ContentTransferEncoding, ContentType},
    },
    transport::smtp::{
        authentication::{Credentials, Mechanism},
        client::{Tls, TlsParameters},
    },
};
use lwmailer_domain::{
    MailError,
    config::{MailerConfig, SmtpSettings, SmtpTls, TransportMode},
    mail::MailEnvelope,
};

use super::{MailTransport, mailbox};

const MODE: TransportMode = TransportMode::Library;

/// SMTP 配送
///
/// 接続は送信ごとに設定から組み立てる。
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpMailTransport;

impl SmtpMailTransport {
    pub fn new() -> Self {
        Self
    }

    /// SMTP クライアントを組み立てる
    fn build_transport(
        settings: &SmtpSettings,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.server)
            .port(settings.port)
            .timeout(settings.timeout);

        let builder = match settings.tls {
            SmtpTls::None => builder,
            SmtpTls::Ssl => builder.tls(Tls::Wrapper(Self::tls_parameters(settings)?)),
            SmtpTls::Tls => builder.tls(Tls::Required(Self::tls_parameters(settings)?)),
        };

        // ユーザー名が空の場合は認証なしのリレーとして扱う
        let builder = if settings.username.is_empty() {
            builder
        } else {
            builder
                .credentials(Credentials::new(
                    settings.username.clone(),
                    settings.password.clone(),
                ))
                .authentication(vec![Mechanism::Login])
        };

        Ok(builder.build())
    }

    fn tls_parameters(settings: &SmtpSettings) -> Result<TlsParameters, MailError> {
        TlsParameters::new(settings.server.clone()).map_err(|e| MailError::transport(MODE, e))
    }

    /// 送信メッセージを組み立てる
    ///
    /// 本文は base64 でエンコードする。送信元と宛先にはアドレスを表示名として付ける。
    pub(crate) fn build_message(
        envelope: &MailEnvelope,
        config: &MailerConfig,
    ) -> Result<Message, MailError> {
        let sender = &config.sender;

        let mut builder = Message::builder()
            .from(mailbox(MODE, &sender.from, true)?)
            .to(mailbox(MODE, envelope.to.as_str(), true)?)
            .subject(&envelope.subject)
            .header(ContentType::TEXT_PLAIN);

        if !sender.reply_to.is_empty() {
            builder = builder.reply_to(mailbox(MODE, &sender.reply_to, false)?);
        }

        let body = Body::new_with_encoding(envelope.body.clone(), ContentTransferEncoding::Base64)
            .map_err(|_| MailError::transport(MODE, "本文を base64 でエンコードできません"))?;

        builder
            .body(body)
            .map_err(|e| MailError::transport(MODE, e))
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, envelope: &MailEnvelope, config: &MailerConfig) -> Result<(), MailError> {
        let message = Self::build_message(envelope, config)?;
        let transport = Self::build_transport(&config.smtp)?;

        tracing::debug!(
            server = %config.smtp.server,
            port = config.smtp.port,
            tls = %config.smtp.tls,
            to = %envelope.to,
            "SMTP 送信を開始"
        );

        transport
            .send(message)
            .await
            .map_err(|e| MailError::transport(MODE, e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use lwmailer_domain::{config::SenderSettings, mail::MailAddress};

    use super::*;

    fn make_config() -> MailerConfig {
        MailerConfig {
            transport: TransportMode::Library,
            sender: SenderSettings {
                from:           "noreply@example.com".to_string(),
                reply_to:       "support@example.com".to_string(),
                subject_prefix: "[LW] ".to_string(),
            },
            ..MailerConfig::default()
        }
    }

    fn make_envelope() -> MailEnvelope {
        MailEnvelope {
            to:      MailAddress::new("a@b.com").unwrap(),
            subject: "[LW] Hi".to_string(),
            body:    "Body".to_string(),
        }
    }

    #[test]
    fn トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SmtpMailTransport>();
    }

    #[test]
    fn メッセージはbase64本文と各ヘッダーを持つ() {
        let message = SmtpMailTransport::build_message(&make_envelope(), &make_config()).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("Content-Transfer-Encoding: base64"));
        assert!(formatted.contains("<noreply@example.com>"));
        assert!(formatted.contains("Reply-To: support@example.com"));
        assert!(formatted.contains("<a@b.com>"));
        assert!(formatted.contains("Subject: [LW] Hi"));
        // "Body" の base64
        assert!(formatted.contains("Qm9keQ=="));
    }

    #[test]
    fn reply_toが空ならヘッダーを付けない() {
        let mut config = make_config();
        config.sender.reply_to = String::new();

        let message = SmtpMailTransport::build_message(&make_envelope(), &config).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(!formatted.contains("Reply-To:"));
    }

    #[test]
    fn 送信元が不正ならトランスポートエラー() {
        let mut config = make_config();
        config.sender.from = "not-an-address".to_string();

        let err = SmtpMailTransport::build_message(&make_envelope(), &config).unwrap_err();

        assert!(matches!(
            err,
            MailError::Transport {
                mode: TransportMode::Library,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn 接続できないサーバーではトランスポートエラーを返す() {
        let mut config = make_config();
        config.smtp.server = "127.0.0.1".to_string();
        config.smtp.port = 1;

        let result = SmtpMailTransport::new().send(&make_envelope(), &config).await;

        assert!(matches!(
            result,
            Err(MailError::Transport {
                mode: TransportMode::Library,
                ..
            })
        ));
    }
}
