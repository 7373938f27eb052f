//! # テスト用モックトランスポート
//!
//! ディスパッチャーのテストで使用するインメモリトランスポート。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! lwmailer-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lwmailer_domain::{
    MailError,
    config::{MailerConfig, TransportMode},
    mail::MailEnvelope,
};

use crate::transport::MailTransport;

// ===== MockMailTransport =====

/// 受け取ったメールを記録するモックトランスポート
///
/// `failing` で生成した場合は常にトランスポートエラーを返す。
#[derive(Clone, Default)]
pub struct MockMailTransport {
    sent: Arc<Mutex<Vec<MailEnvelope>>>,
    fail: Option<TransportMode>,
}

impl MockMailTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 常に失敗するモックを作成する
    pub fn failing(mode: TransportMode) -> Self {
        Self {
            sent: Arc::default(),
            fail: Some(mode),
        }
    }

    /// 受け取ったメールの一覧
    pub fn sent_envelopes(&self) -> Vec<MailEnvelope> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl MailTransport for MockMailTransport {
    async fn send(&self, envelope: &MailEnvelope, _config: &MailerConfig) -> Result<(), MailError> {
        if let Some(mode) = self.fail {
            return Err(MailError::transport(mode, "モック送信失敗"));
        }

        self.sent.lock().unwrap().push(envelope.clone());
        Ok(())
    }
}
