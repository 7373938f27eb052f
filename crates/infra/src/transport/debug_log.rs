//! デバッグログ配送実装
//!
//! メールを実際には送信せず、ログファイルに 1 レコードとして追記する。
//! テスト環境や開発環境で使用する。
//!
//! 出力先は `<resource_dir>/lw_logs/<dir>/<file>`。ディレクトリがなければ作成し、
//! Unix ではパーミッションを `0775` にする。

use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use lwmailer_domain::{
    MailError,
    clock::{Clock, SystemClock},
    config::{DebugLogSettings, MailerConfig, SenderSettings},
    mail::MailEnvelope,
};
use tokio::{fs, io::AsyncWriteExt};

use super::MailTransport;

/// `resource_dir` 直下のログルート
pub const LOG_ROOT_DIR: &str = "lw_logs";

/// レコードの区切り行
pub const RECORD_DELIMITER: &str =
    "#######################################################################";

#[cfg(unix)]
const LOG_DIR_MODE: u32 = 0o775;

/// デバッグログ配送
pub struct DebugLogTransport {
    clock: Arc<dyn Clock>,
}

impl DebugLogTransport {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// ログディレクトリとログファイルのパスを返す
    ///
    /// 設定値からパス区切り文字（`/`, `\`）を取り除く。
    /// 取り除いた結果が `.` / `..` になる場合は拒否する。
    pub fn log_paths(settings: &DebugLogSettings) -> Result<(PathBuf, PathBuf), MailError> {
        let root = settings.resource_dir.join(LOG_ROOT_DIR);

        let dir_name = sanitize_segment(&settings.dir);
        if is_dot_segment(&dir_name) {
            return Err(invalid_segment(root.join(dir_name)));
        }
        let dir = if dir_name.is_empty() {
            root
        } else {
            root.join(dir_name)
        };

        let file_name = sanitize_segment(&settings.file);
        if file_name.is_empty() || is_dot_segment(&file_name) {
            return Err(invalid_segment(dir.join(file_name)));
        }
        let file = dir.join(file_name);

        Ok((dir, file))
    }

    /// ログ 1 レコード分の文字列を組み立てる
    pub fn format_record(
        envelope: &MailEnvelope,
        sender: &SenderSettings,
        timestamp: DateTime<Local>,
    ) -> String {
        format!(
            "{delim}\n\
             {time}\n\
             From: {from}  Reply-To:{reply_to}\n\n\
             To: {to}\n\n\
             Subject: {subject}\n\n\n\
             {body}\n\
             {delim}\n",
            delim = RECORD_DELIMITER,
            time = timestamp.format("%d.%m.%Y - %H:%M:%S"),
            from = sender.from,
            reply_to = sender.reply_to,
            to = envelope.to,
            subject = envelope.subject,
            body = envelope.body,
        )
    }
}

impl Default for DebugLogTransport {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

#[async_trait]
impl MailTransport for DebugLogTransport {
    async fn send(&self, envelope: &MailEnvelope, config: &MailerConfig) -> Result<(), MailError> {
        let (dir, file) = Self::log_paths(&config.debug_log)?;
        ensure_log_dir(&dir).await?;

        let timestamp = self.clock.now().with_timezone(&Local);
        let record = Self::format_record(envelope, &config.sender, timestamp);

        append(&file, &record)
            .await
            .map_err(|e| MailError::filesystem(&file, e))?;

        tracing::debug!(
            path = %file.display(),
            to = %envelope.to,
            "デバッグログにメールを記録"
        );

        Ok(())
    }
}

fn sanitize_segment(value: &str) -> String {
    value.chars().filter(|c| !matches!(c, '/' | '\\')).collect()
}

fn is_dot_segment(value: &str) -> bool {
    matches!(value, "." | "..")
}

fn invalid_segment(path: PathBuf) -> MailError {
    MailError::filesystem(
        path,
        io::Error::new(io::ErrorKind::InvalidInput, "ログの出力先に使えない名前です"),
    )
}

/// ログディレクトリがなければ作成する
async fn ensure_log_dir(dir: &Path) -> Result<(), MailError> {
    if fs::metadata(dir).await.is_ok_and(|m| m.is_dir()) {
        return Ok(());
    }

    fs::create_dir_all(dir)
        .await
        .map_err(|e| MailError::filesystem(dir, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(dir, std::fs::Permissions::from_mode(LOG_DIR_MODE))
            .await
            .map_err(|e| MailError::filesystem(dir, e))?;
    }

    tracing::info!(path = %dir.display(), "デバッグログのディレクトリを作成");

    Ok(())
}

/// ファイルを開いて追記し、閉じる
///
/// 途中で書き込みに失敗してもファイルはスコープを抜けた時点で閉じられる。
async fn append(path: &Path, record: &str) -> io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;

    file.write_all(record.as_bytes()).await?;
    file.flush().await
}
