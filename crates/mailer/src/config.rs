//! # メーラー設定の読み込み
//!
//! 環境変数（`.env` を含む）から [`MailerConfig`] を組み立てる。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `MAIL_TYPE` | No | `library` / `native` / `debug`（デフォルト: `debug`） |
//! | `MAIL_FROM` | library / native 時 | 送信元アドレス |
//! | `MAIL_REPLY_TO` | No | 返信先（デフォルト: `MAIL_FROM`） |
//! | `MAIL_SUBJECT_PREFIX` | No | 件名プレフィックス |
//! | `MAIL_DEBUG_LOG_DIR` | No | `lw_logs/` 配下のディレクトリ名（デフォルト: `mailLogs`） |
//! | `MAIL_DEBUG_LOG_FILE` | No | ログファイル名（デフォルト: `log.txt`） |
//! | `MAIL_WEB_RESOURCE_PATH` | No | `lw_logs/` を置くベースディレクトリ（デフォルト: `.`） |
//! | `MAIL_ADD_SIGNATURE` | No | 署名を付与するか（デフォルト: `false`） |
//! | `MAIL_CONTACT_ORGANISATION_NAME` ほか | No | 署名の連絡先（`_NAME`, `_PHONE`, `_FAX`） |
//! | `SMTP_SERVER` / `SMTP_PORT` | No | SMTP サーバー（デフォルト: `localhost:25`） |
//! | `SMTP_USERNAME` / `SMTP_PASSWORD` | No | LOGIN 認証の資格情報 |
//! | `SMTP_SSL` | No | 空 / `ssl` / `tls` |
//! | `SMTP_TIMEOUT_SECS` | No | タイムアウト秒数（`0` でなし、デフォルト: `60`） |
//! | `SENDMAIL_COMMAND` | No | sendmail バイナリのパス |
//! | `MAIL_LOG_FILTER` / `MAIL_LOG_FORMAT` | No | トレーシング設定（[`tracing_from_env`]） |

use std::path::PathBuf;

use lwmailer_domain::{
    ConfigError,
    config::{
        DebugLogSettings,
        MailerConfig,
        SendmailSettings,
        SenderSettings,
        SignatureSettings,
        SmtpSettings,
        SmtpTls,
        TransportMode,
        parse_flag,
        parse_port,
        parse_timeout,
    },
    contact::ContactInfo,
};
use lwmailer_shared::observability::TracingConfig;

/// `.env` と環境変数から設定を読み込む
pub fn from_env() -> Result<MailerConfig, ConfigError> {
    dotenvy::dotenv().ok();
    from_lookup(|key| std::env::var(key).ok())
}

/// `.env` と環境変数からトレーシング設定を読み込む
pub fn tracing_from_env() -> TracingConfig {
    dotenvy::dotenv().ok();
    TracingConfig::from_lookup(|key| std::env::var(key).ok())
}

/// 任意のキー参照関数から設定を組み立てる
///
/// `from_env` と同じ変換を行う。テストではマップを渡す。
pub fn from_lookup<F>(lookup: F) -> Result<MailerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).unwrap_or_default();
    let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

    let transport = transport_mode(lookup("MAIL_TYPE").as_deref());

    let defaults = MailerConfig::default();

    let smtp = SmtpSettings {
        username: var("SMTP_USERNAME"),
        password: var("SMTP_PASSWORD"),
        server:   var_or("SMTP_SERVER", &defaults.smtp.server),
        port:     match lookup("SMTP_PORT") {
            Some(value) => parse_port("SMTP_PORT", &value)?,
            None => defaults.smtp.port,
        },
        tls:      match lookup("SMTP_SSL") {
            Some(value) => value
                .parse::<SmtpTls>()
                .map_err(|_| invalid("SMTP_SSL", &value))?,
            None => SmtpTls::None,
        },
        timeout:  match lookup("SMTP_TIMEOUT_SECS") {
            Some(value) => parse_timeout("SMTP_TIMEOUT_SECS", &value)?,
            None => defaults.smtp.timeout,
        },
    };

    let from = var("MAIL_FROM");
    if from.is_empty() && transport != TransportMode::Debug {
        return Err(ConfigError::Missing("MAIL_FROM"));
    }

    let sender = SenderSettings {
        reply_to:       lookup("MAIL_REPLY_TO").unwrap_or_else(|| from.clone()),
        subject_prefix: var("MAIL_SUBJECT_PREFIX"),
        from,
    };

    let signature = SignatureSettings {
        enabled: match lookup("MAIL_ADD_SIGNATURE") {
            Some(value) => parse_flag("MAIL_ADD_SIGNATURE", &value)?,
            None => false,
        },
        contact: ContactInfo {
            organisation_name: var("MAIL_CONTACT_ORGANISATION_NAME"),
            name:              var("MAIL_CONTACT_NAME"),
            phone:             var("MAIL_CONTACT_PHONE"),
            fax:               var("MAIL_CONTACT_FAX"),
        },
    };

    let debug_log = DebugLogSettings {
        resource_dir: lookup("MAIL_WEB_RESOURCE_PATH")
            .map_or(defaults.debug_log.resource_dir, PathBuf::from),
        dir:          var_or("MAIL_DEBUG_LOG_DIR", &defaults.debug_log.dir),
        file:         var_or("MAIL_DEBUG_LOG_FILE", &defaults.debug_log.file),
    };

    let sendmail = SendmailSettings {
        command: lookup("SENDMAIL_COMMAND").filter(|v| !v.is_empty()),
    };

    Ok(MailerConfig {
        transport,
        smtp,
        sender,
        signature,
        debug_log,
        sendmail,
    })
}

/// 送信方式を決定する
///
/// 未知の値は警告を出して `debug` にフォールバックする。
fn transport_mode(value: Option<&str>) -> TransportMode {
    let Some(value) = value else {
        return TransportMode::default();
    };

    if !TransportMode::is_known(value) {
        tracing::warn!(
            mail_type = value,
            "未知の MAIL_TYPE のため debug にフォールバックします"
        );
    }

    TransportMode::parse(value)
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key:   key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, time::Duration};

    use maplit::hashmap;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn load(vars: &HashMap<&str, &str>) -> Result<MailerConfig, ConfigError> {
        from_lookup(|key| vars.get(key).map(|v| (*v).to_string()))
    }

    #[test]
    fn 何も設定しなければdebugのデフォルト設定になる() {
        let config = load(&HashMap::new()).unwrap();

        assert_eq!(config, MailerConfig::default());
    }

    #[test]
    fn 全項目を読み込む() {
        let vars = hashmap! {
            "MAIL_TYPE" => "library",
            "MAIL_FROM" => "noreply@example.com",
            "MAIL_REPLY_TO" => "support@example.com",
            "MAIL_SUBJECT_PREFIX" => "[LW] ",
            "MAIL_DEBUG_LOG_DIR" => "t/",
            "MAIL_DEBUG_LOG_FILE" => "mail.log",
            "MAIL_WEB_RESOURCE_PATH" => "/srv/resource",
            "MAIL_ADD_SIGNATURE" => "yes",
            "MAIL_CONTACT_ORGANISATION_NAME" => "Logic Works GmbH",
            "MAIL_CONTACT_NAME" => "Michael Mandt",
            "MAIL_CONTACT_PHONE" => "0231 000000",
            "MAIL_CONTACT_FAX" => "0231 000001",
            "SMTP_USERNAME" => "mailer",
            "SMTP_PASSWORD" => "secret",
            "SMTP_SERVER" => "smtp.example.com",
            "SMTP_PORT" => "465",
            "SMTP_SSL" => "ssl",
            "SMTP_TIMEOUT_SECS" => "10",
            "SENDMAIL_COMMAND" => "/usr/sbin/sendmail",
        };

        let config = load(&vars).unwrap();

        assert_eq!(config.transport, TransportMode::Library);
        assert_eq!(config.sender.from, "noreply@example.com");
        assert_eq!(config.sender.reply_to, "support@example.com");
        assert_eq!(config.sender.subject_prefix, "[LW] ");
        assert_eq!(config.debug_log.resource_dir, PathBuf::from("/srv/resource"));
        assert_eq!(config.debug_log.dir, "t/");
        assert_eq!(config.debug_log.file, "mail.log");
        assert!(config.signature.enabled);
        assert_eq!(config.signature.contact.name, "Michael Mandt");
        assert_eq!(config.signature.contact.fax, "0231 000001");
        assert_eq!(config.smtp.username, "mailer");
        assert_eq!(config.smtp.password, "secret");
        assert_eq!(config.smtp.server, "smtp.example.com");
        assert_eq!(config.smtp.port, 465);
        assert_eq!(config.smtp.tls, SmtpTls::Ssl);
        assert_eq!(config.smtp.timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.sendmail.command.as_deref(), Some("/usr/sbin/sendmail"));
    }

    #[test]
    fn メーラー設定とトレーシング設定を同じ変数群から読む() {
        let vars = hashmap! {
            "MAIL_TYPE" => "debug",
            "MAIL_LOG_FORMAT" => "json",
            "MAIL_LOG_FILTER" => "lwmailer=debug",
        };

        let config = load(&vars).unwrap();
        let tracing = TracingConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.transport, TransportMode::Debug);
        assert_eq!(tracing.log_format, lwmailer_shared::observability::LogFormat::Json);
        assert_eq!(tracing.filter, "lwmailer=debug");
    }

    #[test]
    fn reply_toの省略時は送信元を使う() {
        let vars = hashmap! {
            "MAIL_TYPE" => "native",
            "MAIL_FROM" => "noreply@example.com",
        };

        let config = load(&vars).unwrap();

        assert_eq!(config.sender.reply_to, "noreply@example.com");
    }

    #[rstest]
    #[case("library")]
    #[case("native")]
    fn 送信方式によっては送信元が必須(#[case] mail_type: &str) {
        let vars = hashmap! { "MAIL_TYPE" => mail_type };

        let err = load(&vars).unwrap_err();

        assert_eq!(err, ConfigError::Missing("MAIL_FROM"));
    }

    #[test]
    fn 未知の送信方式はdebugにフォールバックする() {
        let vars = hashmap! { "MAIL_TYPE" => "carrier-pigeon" };

        let config = load(&vars).unwrap();

        assert_eq!(config.transport, TransportMode::Debug);
    }

    #[rstest]
    #[case("SMTP_PORT", "abc")]
    #[case("SMTP_SSL", "quantum")]
    #[case("SMTP_TIMEOUT_SECS", "soon")]
    #[case("MAIL_ADD_SIGNATURE", "perhaps")]
    fn パースできない値はエラー(#[case] key: &str, #[case] value: &str) {
        let vars = hashmap! { key => value };

        let err = load(&vars).unwrap_err();

        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key:   key.to_string(),
                value: value.to_string(),
            }
        );
    }
}
