//! # メールディスパッチャー
//!
//! 宛先検証 → 署名付与 → 送信方式に応じた配送を統合するファサード。
//!
//! ## 設計方針
//!
//! - **呼び出し側は 1 つの関数だけ**: `send_mail()` は送信方式を意識させない
//! - **検証が先**: 宛先が不正なら署名生成もトランスポート呼び出しも行わない
//! - **リトライしない**: トランスポートの失敗はそのまま呼び出し元に返す
//! - **依存性注入**: トランスポートと署名レンダラーは trait で抽象化

use std::sync::Arc;

use lwmailer_domain::{
    ConfigError,
    MailError,
    config::{MailerConfig, TransportMode},
    mail::{MailAddress, MailEnvelope, MailRequest},
};
use lwmailer_infra::{DebugLogTransport, MailTransport, SendmailMailTransport, SmtpMailTransport};
use lwmailer_shared::{
    event_log::{error::kind, event},
    log_business_event,
};

use crate::{
    InitError,
    config,
    signature::{SignatureComposer, TeraSignatureRenderer},
};

/// 送信方式ごとのトランスポート
#[derive(Clone)]
pub struct Transports {
    pub library: Arc<dyn MailTransport>,
    pub native:  Arc<dyn MailTransport>,
    pub debug:   Arc<dyn MailTransport>,
}

impl Transports {
    /// 送信方式に対応するトランスポートを返す
    pub fn select(&self, mode: TransportMode) -> &dyn MailTransport {
        match mode {
            TransportMode::Library => self.library.as_ref(),
            TransportMode::Native => self.native.as_ref(),
            TransportMode::Debug => self.debug.as_ref(),
        }
    }
}

impl Default for Transports {
    fn default() -> Self {
        Self {
            library: Arc::new(SmtpMailTransport::new()),
            native:  Arc::new(SendmailMailTransport::new()),
            debug:   Arc::new(DebugLogTransport::default()),
        }
    }
}

/// メールディスパッチャー
///
/// 設定を所有し、送信ごとに `config.transport` で配送先を選ぶ。
pub struct MailDispatcher {
    config:     MailerConfig,
    composer:   SignatureComposer,
    transports: Transports,
}

impl MailDispatcher {
    /// tera の署名レンダラーと標準のトランスポートで組み立てる
    pub fn new(config: MailerConfig) -> Result<Self, InitError> {
        let renderer = TeraSignatureRenderer::new()?;

        Ok(Self::with_parts(
            config,
            SignatureComposer::new(Arc::new(renderer)),
            Transports::default(),
        ))
    }

    /// 環境変数の設定で組み立てる
    ///
    /// `observability` feature が有効なら、同じ環境からトレーシングも初期化する。
    pub fn from_env() -> Result<Self, InitError> {
        let mailer_config = config::from_env()?;

        #[cfg(feature = "observability")]
        lwmailer_shared::observability::init_tracing(&config::tracing_from_env());

        Self::new(mailer_config)
    }

    /// 署名付与とトランスポートを指定して組み立てる
    pub fn with_parts(
        config: MailerConfig,
        composer: SignatureComposer,
        transports: Transports,
    ) -> Self {
        Self {
            config,
            composer,
            transports,
        }
    }

    pub fn config(&self) -> &MailerConfig {
        &self.config
    }

    /// 以降の送信を `debug` に固定する
    pub fn force_debug_mode(&mut self) {
        self.config.force_debug_mode();
    }

    /// 設定値を 1 件上書きする
    ///
    /// キーは従来の設定キー名（`mailType`, `server` など）。
    pub fn set_config_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.config.set_value(key, value)
    }

    /// メールを送信する
    ///
    /// 宛先検証 → 署名付与 → 選択されたトランスポートでの配送を行う。
    ///
    /// # エラー
    ///
    /// - 宛先が不正: `MailError::InvalidAddress`（トランスポートは呼ばれない）
    /// - 署名のレンダリング失敗: `MailError::Template`
    /// - 配送失敗: `MailError::Transport` / `MailError::Filesystem`
    #[tracing::instrument(skip_all, fields(mode = %self.config.transport))]
    pub async fn send_mail(&self, request: MailRequest) -> Result<(), MailError> {
        let mode = self.config.transport;
        let MailRequest {
            to,
            subject,
            message,
        } = request;

        let to = match MailAddress::new(to) {
            Ok(address) => address,
            Err(e) => {
                log_business_event!(
                    event.category = event::category::MAIL,
                    event.action = event::action::MAIL_REJECTED,
                    event.result = event::result::FAILURE,
                    error.kind = kind::INVALID_ADDRESS,
                    error = %e,
                    "宛先メールアドレスが不正なため送信を中止"
                );
                return Err(e);
            }
        };

        let envelope = self.prepare(to, &subject, &message)?;

        match self.transports.select(mode).send(&envelope, &self.config).await {
            Ok(()) => {
                log_business_event!(
                    event.category = event::category::MAIL,
                    event.action = event::action::MAIL_SENT,
                    event.result = event::result::SUCCESS,
                    mail.mode = %mode,
                    mail.recipient = %envelope.to,
                    mail.subject = %envelope.subject,
                    "メール送信成功"
                );
                Ok(())
            }
            Err(e) => {
                log_business_event!(
                    event.category = event::category::MAIL,
                    event.action = event::action::MAIL_FAILED,
                    event.result = event::result::FAILURE,
                    mail.mode = %mode,
                    mail.recipient = %envelope.to,
                    error.kind = error_kind(&e),
                    error = %e,
                    "メール送信失敗"
                );
                Err(e)
            }
        }
    }

    /// 件名にプレフィックスを、本文に署名を付与する
    fn prepare(
        &self,
        to: MailAddress,
        subject: &str,
        message: &str,
    ) -> Result<MailEnvelope, MailError> {
        let body = self.composer.compose(message, &self.config.signature)?;

        Ok(MailEnvelope {
            to,
            subject: self.config.sender.prefixed_subject(subject),
            body,
        })
    }
}

fn error_kind(error: &MailError) -> &'static str {
    match error {
        MailError::InvalidAddress(_) => kind::INVALID_ADDRESS,
        MailError::Transport { .. } => kind::TRANSPORT,
        MailError::Filesystem { .. } => kind::FILESYSTEM,
        MailError::Template(_) => kind::TEMPLATE,
    }
}
