//! # トレーシング設定
//!
//! メーラーの送信イベントをホストアプリケーションのログに載せるための
//! subscriber 設定。設定値はメーラー設定と同じキー参照関数から読む。
//!
//! | 変数名 | 説明 |
//! |--------|------|
//! | `MAIL_LOG_FILTER` | `EnvFilter` 形式のフィルタ（`RUST_LOG` が優先） |
//! | `MAIL_LOG_FORMAT` | `json` / `pretty`（大文字小文字を区別しない） |

use std::str::FromStr;

/// メーラーのクレートを拾うデフォルトのフィルタ
pub const DEFAULT_FILTER: &str = "warn,lwmailer=info,lwmailer_infra=info";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// 1 イベント 1 行の JSON。`event.kind` などがトップレベルのキーになる
    Json,
    #[default]
    Pretty,
}

/// subscriber の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub filter:     String,
    pub log_format: LogFormat,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            filter:     DEFAULT_FILTER.to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl TracingConfig {
    /// キー参照関数から設定を組み立てる
    ///
    /// 未設定・空・解釈できない値はデフォルトのまま残す。
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            filter:     lookup("MAIL_LOG_FILTER")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.filter),
            log_format: lookup("MAIL_LOG_FORMAT")
                .and_then(|v| LogFormat::from_str(v.trim()).ok())
                .unwrap_or(defaults.log_format),
        }
    }
}

/// グローバル subscriber を設定する
///
/// 既にホスト側が設定済みなら何もせず `false` を返す。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) -> bool {
    use tracing_subscriber::{EnvFilter, Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().with_target(false).boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .is_ok()
}
