use crate::config::settings::DebugLogRotation;
use crate::config::Config;
use anyhow::{Context, Result};
use regex::Regex;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "cmr-search-debug.log";

/// Keeps the background log writer alive; drop it to flush.
#[allow(dead_code)]
pub struct LogGuard(WorkerGuard);

/// Initialize debug logging.
///
/// When `debug` is enabled, logs go to `<config dir>/cmr-search/cmr-search-debug.log`
/// unless `debug_log_path` says otherwise. When disabled this is a no-op.
pub fn init(config: &Config) -> Result<Option<LogGuard>> {
    if !config.debug {
        return Ok(None);
    }

    let rotation = config.debug_log_rotation.unwrap_or(DebugLogRotation::None);
    let base = resolve_log_path(config.debug_log_path.as_deref())?;

    let (writer, guard): (NonBlocking, WorkerGuard) = match rotation {
        DebugLogRotation::None => {
            if let Some(parent) = base.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&base)
                .with_context(|| format!("Failed to open log file: {}", base.display()))?;
            tracing_appender::non_blocking(file)
        }
        DebugLogRotation::Daily => {
            let (dir, base_name) = split_dir_and_name(&base)?;
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
            prune_daily_logs(&dir, &base_name, config.debug_log_keep.unwrap_or(7))?;
            tracing_appender::non_blocking(tracing_appender::rolling::daily(&dir, &base_name))
        }
    };

    // RUST_LOG wins; otherwise debug for this crate and warn for dependencies.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("cmr_search=debug,warn"))
        .unwrap_or_else(|_| EnvFilter::new("debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer)
        .try_init()
        .ok();

    tracing::info!(log_file = %base.display(), rotation = ?rotation, "debug logging enabled");

    Ok(Some(LogGuard(guard)))
}

fn resolve_log_path(configured: Option<&str>) -> Result<PathBuf> {
    let Some(raw) = configured else {
        return Ok(crate::config::config_path()?.with_file_name(LOG_FILE_NAME));
    };

    let path = PathBuf::from(expand_tilde(raw));
    if raw.ends_with(std::path::MAIN_SEPARATOR) || path.is_dir() {
        return Ok(path.join(LOG_FILE_NAME));
    }
    Ok(path)
}

fn expand_tilde(raw: &str) -> String {
    match (raw.strip_prefix('~'), dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() || rest.starts_with('/') => {
            format!("{}{}", home.display(), rest)
        }
        _ => raw.to_string(),
    }
}

fn split_dir_and_name(path: &Path) -> Result<(PathBuf, String)> {
    let dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .context("Invalid debug_log_path: not valid UTF-8")?
        .to_string();
    Ok((dir, name))
}

/// Remove all but the newest `keep` daily files (`{base_name}.{YYYY-MM-DD}`).
fn prune_daily_logs(dir: &Path, base_name: &str, keep: usize) -> Result<()> {
    if keep == 0 {
        return Ok(());
    }

    let prefix = format!("{base_name}.");
    let mut rotated: Vec<String> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read log directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| name.starts_with(&prefix))
        .collect();

    // Date suffixes sort lexicographically
    rotated.sort_unstable_by(|a, b| b.cmp(a));

    for name in rotated.into_iter().skip(keep) {
        let path = dir.join(&name);
        if let Err(e) = std::fs::remove_file(&path) {
            tracing::debug!(error = %e, file = %path.display(), "failed to remove old log file");
        }
    }

    Ok(())
}

fn bearer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(bearer\s+)[A-Za-z0-9\-._~+/]+=*").expect("bearer pattern is valid")
    })
}

/// Best-effort redaction of bearer tokens in text headed for the logs.
pub fn redact_secrets(input: &str) -> String {
    bearer_pattern()
        .replace_all(input, "${1}***REDACTED***")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_bearer_tokens() {
        let headers = r#"[("Accept", "application/json"), ("Authorization", "Bearer abcdef123456.xyz")]"#;
        let redacted = redact_secrets(headers);
        assert!(!redacted.contains("abcdef123456"));
        assert!(redacted.contains("Bearer ***REDACTED***"));
    }

    #[test]
    fn redacts_short_tokens() {
        let headers = r#"("Authorization", "Bearer abc1234")"#;
        assert_eq!(
            redact_secrets(headers),
            r#"("Authorization", "Bearer ***REDACTED***")"#
        );
        assert_eq!(redact_secrets("bearer x"), "bearer ***REDACTED***");
    }

    #[test]
    fn leaves_other_text_alone() {
        assert_eq!(redact_secrets("no secrets here"), "no secrets here");
        assert_eq!(redact_secrets("Bearer "), "Bearer ");
    }

    #[test]
    fn prunes_old_daily_logs() {
        let dir = tempfile::TempDir::new().unwrap();
        for day in ["2024-01-01", "2024-01-02", "2024-01-03"] {
            std::fs::write(dir.path().join(format!("{LOG_FILE_NAME}.{day}")), "x").unwrap();
        }
        std::fs::write(dir.path().join("unrelated.log"), "x").unwrap();

        prune_daily_logs(dir.path(), LOG_FILE_NAME, 2).unwrap();

        assert!(!dir.path().join(format!("{LOG_FILE_NAME}.2024-01-01")).exists());
        assert!(dir.path().join(format!("{LOG_FILE_NAME}.2024-01-03")).exists());
        assert!(dir.path().join("unrelated.log").exists());
    }

    #[test]
    fn disabled_logging_is_noop() {
        let config = Config::default();
        assert!(init(&config).unwrap().is_none());
    }
}
