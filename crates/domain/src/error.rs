//! # ドメイン層エラー定義
//!
//! メール送信と設定操作で発生するエラー型。
//!
//! ## 設計方針
//!
//! - **型による分類**: 送信失敗の原因（宛先・トランスポート・ファイル・テンプレート）を列挙型で明示
//! - **thiserror 活用**: `#[error(...)]` マクロでエラーメッセージを自動生成
//! - **原因の保持**: 下位ライブラリのエラーは `#[source]` で保持し、呼び出し元で辿れるようにする
//!
//! ## エラーの種類
//!
//! | エラー種別 | 発生箇所 | 送信の有無 |
//! |-----------|---------|-----------|
//! | `InvalidAddress` | 宛先検証 | 送信されない |
//! | `Transport` | SMTP / sendmail | 送信失敗 |
//! | `Filesystem` | デバッグログ | 記録失敗 |
//! | `Template` | 署名レンダリング | 送信されない |

use std::path::PathBuf;

use thiserror::Error;

use crate::config::TransportMode;

/// 下位ライブラリのエラーを保持するための型
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// メール送信で発生するエラー
#[derive(Debug, Error)]
pub enum MailError {
    /// 宛先メールアドレスの形式が不正
    ///
    /// トランスポートが呼ばれる前に検出される。
    #[error("宛先メールアドレスが不正です: {0:?}")]
    InvalidAddress(String),

    /// トランスポート（SMTP / sendmail）での送信失敗
    #[error("{mode} トランスポートでの送信に失敗: {source}")]
    Transport {
        /// 失敗したトランスポート
        mode:   TransportMode,
        /// 下位ライブラリのエラー
        #[source]
        source: BoxError,
    },

    /// デバッグログのディレクトリ作成・書き込みの失敗
    #[error("デバッグログの書き込みに失敗 ({}): {source}", path.display())]
    Filesystem {
        /// 対象パス
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 署名テンプレートのレンダリング失敗
    #[error("署名テンプレートのレンダリングに失敗: {0}")]
    Template(String),
}

impl MailError {
    /// トランスポートエラーを生成する
    pub fn transport(mode: TransportMode, source: impl Into<BoxError>) -> Self {
        Self::Transport {
            mode,
            source: source.into(),
        }
    }

    /// ファイルシステムエラーを生成する
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}

/// 設定の読み込み・上書きで発生するエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 未知の設定キー
    #[error("未知の設定キーです: {0}")]
    UnknownKey(String),

    /// 値を設定項目の型に変換できない
    #[error("設定値が不正です: {key}={value:?}")]
    InvalidValue {
        /// 設定キー
        key:   String,
        /// 指定された値
        value: String,
    },

    /// 必須の設定項目が未設定
    #[error("{0} が設定されていません")]
    Missing(&'static str),
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, value: &str) -> Self {
        Self::InvalidValue {
            key:   key.to_string(),
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_トランスポートエラーは原因を保持する() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = MailError::transport(TransportMode::Library, io);

        assert!(err.to_string().starts_with("library トランスポート"));
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("refused"));
    }

    #[test]
    fn test_ファイルシステムエラーはパスを含む() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = MailError::filesystem("/var/lw_logs/mailLogs", io);

        assert!(err.to_string().contains("/var/lw_logs/mailLogs"));
    }
}
