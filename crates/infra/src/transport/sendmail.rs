//! sendmail 配送実装
//!
//! ホストの sendmail コマンドにメールを渡す。
//! lettre の `AsyncSendmailTransport` を使用する。

use async_trait::async_trait;
use lettre::{
    AsyncSendmailTransport,
    AsyncTransport,
    Message,
    Tokio1Executor,
    message::{
        Body,
        header::{ContentTransferEncoding, ContentType, Header, HeaderName, HeaderValue},
    },
};
use lwmailer_domain::{
    MailError,
    config::{MailerConfig, TransportMode},
    mail::MailEnvelope,
};

use super::{MailTransport, mailbox};

const MODE: TransportMode = TransportMode::Native;

/// `X-Mailer` ヘッダー
#[derive(Debug, Clone)]
struct XMailer(String);

impl XMailer {
    fn current() -> Self {
        Self(format!("lwmailer/{}", env!("CARGO_PKG_VERSION")))
    }
}

impl Header for XMailer {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("X-Mailer")
    }

    fn parse(s: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self(s.to_string()))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.0.clone())
    }
}

/// sendmail 配送
///
/// コマンドのパスは送信ごとに設定から読む。
#[derive(Debug, Clone, Copy, Default)]
pub struct SendmailMailTransport;

impl SendmailMailTransport {
    pub fn new() -> Self {
        Self
    }

    /// 送信メッセージを組み立てる
    ///
    /// 本文はプレーンテキストで、`X-Mailer` を付与する。
    /// 8bit で運べない本文（998 バイトを超える行など）は lettre にエンコーディングを選ばせる。
    pub(crate) fn build_message(
        envelope: &MailEnvelope,
        config: &MailerConfig,
    ) -> Result<Message, MailError> {
        let sender = &config.sender;

        let mut builder = Message::builder()
            .from(mailbox(MODE, &sender.from, false)?)
            .to(mailbox(MODE, envelope.to.as_str(), false)?)
            .subject(&envelope.subject)
            .header(ContentType::TEXT_PLAIN)
            .header(XMailer::current());

        if !sender.reply_to.is_empty() {
            builder = builder.reply_to(mailbox(MODE, &sender.reply_to, false)?);
        }

        let body = Body::new_with_encoding(envelope.body.clone(), ContentTransferEncoding::EightBit)
            .unwrap_or_else(|_| Body::new(envelope.body.clone()));

        builder
            .body(body)
            .map_err(|e| MailError::transport(MODE, e))
    }
}

#[async_trait]
impl MailTransport for SendmailMailTransport {
    async fn send(&self, envelope: &MailEnvelope, config: &MailerConfig) -> Result<(), MailError> {
        let message = Self::build_message(envelope, config)?;

        let transport = match &config.sendmail.command {
            Some(command) => AsyncSendmailTransport::<Tokio1Executor>::new_with_command(command),
            None => AsyncSendmailTransport::<Tokio1Executor>::new(),
        };

        tracing::debug!(
            command = config.sendmail.command.as_deref().unwrap_or("sendmail"),
            to = %envelope.to,
            "sendmail に送信を委譲"
        );

        transport
            .send(message)
            .await
            .map_err(|e| MailError::transport(MODE, e))?;

        Ok(())
    }
}
