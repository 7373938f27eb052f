//! # メーラー設定
//!
//! 送信方式の選択と、各トランスポートが参照する設定値を定義する。
//!
//! ## 設計方針
//!
//! - **閉じた送信方式**: [`TransportMode`] は `library` / `native` / `debug` の 3 種類。
//!   未知の値は `debug` にフォールバックする（エラーにはしない）
//! - **生成後は不変**: 変更経路は [`MailerConfig::force_debug_mode`] と
//!   [`MailerConfig::set_value`] の 2 つだけ。いずれもテスト・運用時の上書き用
//! - **キー語彙**: `set_value` のキーは従来の設定配列のキー名（`mailType` 等）を使う

use std::{path::PathBuf, str::FromStr, time::Duration};

use strum::IntoStaticStr;

use crate::{ConfigError, contact::ContactInfo};

/// SMTP 送信のデフォルトタイムアウト
pub const DEFAULT_SMTP_TIMEOUT: Duration = Duration::from_secs(60);

/// 送信方式
///
/// 文字列からのパースは大文字小文字を区別しない。
/// 旧設定値（`zendMail` / `phpMail`）も受け付ける。
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum TransportMode {
    /// SMTP（認証付き）で送信する
    #[strum(to_string = "library", serialize = "smtp", serialize = "zendMail")]
    Library,
    /// ホストの sendmail に渡す
    #[strum(to_string = "native", serialize = "sendmail", serialize = "phpMail")]
    Native,
    /// ログファイルに書き出すだけで送信しない
    #[default]
    #[strum(to_string = "debug")]
    Debug,
}

impl TransportMode {
    /// 文字列から送信方式を決定する
    ///
    /// 未知の値・空文字列は [`Debug`](TransportMode::Debug) にフォールバックする。
    pub fn parse(value: &str) -> Self {
        value.trim().parse().unwrap_or_default()
    }

    /// 既知の送信方式名かどうか
    pub fn is_known(value: &str) -> bool {
        Self::from_str(value.trim()).is_ok()
    }
}

/// SMTP 接続の暗号化方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SmtpTls {
    /// 平文
    #[default]
    None,
    /// 接続直後から TLS（SMTPS）
    Ssl,
    /// STARTTLS で昇格（必須）
    Tls,
}

impl FromStr for SmtpTls {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "0" | "false" => Ok(Self::None),
            "ssl" | "smtps" => Ok(Self::Ssl),
            "tls" | "starttls" => Ok(Self::Tls),
            _ => Err(ConfigError::invalid("ssl", value)),
        }
    }
}

/// SMTP 送信の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub username: String,
    pub password: String,
    /// SMTP サーバーのホスト名
    pub server:   String,
    pub port:     u16,
    pub tls:      SmtpTls,
    /// `None` の場合はタイムアウトなし
    pub timeout:  Option<Duration>,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            server:   "localhost".to_string(),
            port:     25,
            tls:      SmtpTls::None,
            timeout:  Some(DEFAULT_SMTP_TIMEOUT),
        }
    }
}

/// 送信者情報
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenderSettings {
    /// 送信元アドレス
    pub from:           String,
    /// 返信先アドレス
    pub reply_to:       String,
    /// 件名の先頭に付与する文字列
    pub subject_prefix: String,
}

impl SenderSettings {
    /// プレフィックスを付与した件名を返す
    pub fn prefixed_subject(&self, subject: &str) -> String {
        format!("{}{subject}", self.subject_prefix)
    }
}

/// 署名の設定
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureSettings {
    /// 本文末尾に署名を付与するか
    pub enabled: bool,
    pub contact: ContactInfo,
}

/// デバッグログの出力先
///
/// 実際のパスは `<resource_dir>/lw_logs/<dir>/<file>`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugLogSettings {
    /// Web リソースのベースディレクトリ
    pub resource_dir: PathBuf,
    /// `lw_logs/` 配下のサブディレクトリ名
    pub dir:          String,
    /// ログファイル名
    pub file:         String,
}

impl Default for DebugLogSettings {
    fn default() -> Self {
        Self {
            resource_dir: PathBuf::from("."),
            dir:          "mailLogs".to_string(),
            file:         "log.txt".to_string(),
        }
    }
}

/// sendmail の設定
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendmailSettings {
    /// sendmail バイナリのパス（未設定ならシステム既定）
    pub command: Option<String>,
}

/// メーラー全体の設定
///
/// ディスパッチャーが所有し、送信ごとに選択されたトランスポートへ参照を渡す。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailerConfig {
    /// 送信方式
    pub transport: TransportMode,
    pub smtp:      SmtpSettings,
    pub sender:    SenderSettings,
    pub signature: SignatureSettings,
    pub debug_log: DebugLogSettings,
    pub sendmail:  SendmailSettings,
}

/// `set_value` で指定できる設定キー
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr, strum::Display, strum::EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum ConfigKey {
    MailType,
    MailDebugLogDir,
    MailDebugLogFile,
    WebResource,
    From,
    ReplyTo,
    SubjectPrefix,
    Username,
    Password,
    Server,
    Port,
    Ssl,
    TimeoutSecs,
    AddSignature,
    #[strum(serialize = "contact.organisationName")]
    ContactOrganisationName,
    #[strum(serialize = "contact.name")]
    ContactName,
    #[strum(serialize = "contact.phone")]
    ContactPhone,
    #[strum(serialize = "contact.fax")]
    ContactFax,
    SendmailCommand,
}

impl MailerConfig {
    /// 送信方式を `debug` に固定する
    ///
    /// 何度呼んでも結果は同じ。
    pub fn force_debug_mode(&mut self) {
        self.transport = TransportMode::Debug;
    }

    /// 設定値を 1 件上書きする
    ///
    /// `key` は従来の設定キー名。`value` は項目の型に合わせてパースされる。
    ///
    /// # エラー
    ///
    /// - 未知のキー: `ConfigError::UnknownKey`
    /// - パースできない値（ポート番号、真偽値、暗号化方式、秒数）: `ConfigError::InvalidValue`
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let parsed_key =
            ConfigKey::from_str(key).map_err(|_| ConfigError::UnknownKey(key.to_string()))?;

        match parsed_key {
            ConfigKey::MailType => self.transport = TransportMode::parse(value),
            ConfigKey::MailDebugLogDir => self.debug_log.dir = value.to_string(),
            ConfigKey::MailDebugLogFile => self.debug_log.file = value.to_string(),
            ConfigKey::WebResource => self.debug_log.resource_dir = PathBuf::from(value),
            ConfigKey::From => self.sender.from = value.to_string(),
            ConfigKey::ReplyTo => self.sender.reply_to = value.to_string(),
            ConfigKey::SubjectPrefix => self.sender.subject_prefix = value.to_string(),
            ConfigKey::Username => self.smtp.username = value.to_string(),
            ConfigKey::Password => self.smtp.password = value.to_string(),
            ConfigKey::Server => self.smtp.server = value.to_string(),
            ConfigKey::Port => self.smtp.port = parse_port(key, value)?,
            ConfigKey::Ssl => {
                self.smtp.tls = value
                    .parse()
                    .map_err(|_| ConfigError::invalid(key, value))?;
            }
            ConfigKey::TimeoutSecs => self.smtp.timeout = parse_timeout(key, value)?,
            ConfigKey::AddSignature => self.signature.enabled = parse_flag(key, value)?,
            ConfigKey::ContactOrganisationName => {
                self.signature.contact.organisation_name = value.to_string();
            }
            ConfigKey::ContactName => self.signature.contact.name = value.to_string(),
            ConfigKey::ContactPhone => self.signature.contact.phone = value.to_string(),
            ConfigKey::ContactFax => self.signature.contact.fax = value.to_string(),
            ConfigKey::SendmailCommand => {
                self.sendmail.command = Some(value).filter(|v| !v.is_empty()).map(str::to_string);
            }
        }

        Ok(())
    }
}

/// 真偽値をパースする
///
/// 空文字列は `false` とみなす。
pub fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(key, value)),
    }
}

/// ポート番号をパースする
pub fn parse_port(key: &str, value: &str) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid(key, value))
}

/// タイムアウト秒数をパースする（`0` はタイムアウトなし）
pub fn parse_timeout(key: &str, value: &str) -> Result<Option<Duration>, ConfigError> {
    let secs: u64 = value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid(key, value))?;

    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}
