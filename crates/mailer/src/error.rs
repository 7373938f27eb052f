//! # 初期化エラー
//!
//! ディスパッチャーの組み立て時に発生するエラー。送信時のエラーは
//! [`MailError`] をそのまま返す。

use lwmailer_domain::{ConfigError, MailError};
use thiserror::Error;

/// ディスパッチャーの初期化エラー
#[derive(Debug, Error)]
pub enum InitError {
    /// 設定の読み込みに失敗
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 署名テンプレートの登録に失敗
    #[error(transparent)]
    Mail(#[from] MailError),
}
