use std::env;
use std::path::PathBuf;

use url::Url;

use crate::error::{Error, Result};

const DEFAULT_CACHE_PATH: &str = ".cache";
const DEFAULT_NAMESPACE: &str = "gradewatch";

/// Which cache backend to use, with the settings that backend needs.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheConfig {
    Memory,
    File { path: PathBuf },
    Remote { url: Url, namespace: String },
}

/// Which delivery channel to use, with the settings that channel needs.
#[derive(Debug, Clone, PartialEq)]
pub enum NotifierConfig {
    Console,
    Telegram { token: String, chat_id: i64 },
    Email { endpoint: Url, api_key: String, from: String, to: String },
}

/// Everything the run needs, validated once at startup. Construction fails
/// with a single aggregated error listing every missing or invalid setting,
/// so nothing here has to be re-checked later.
#[derive(Debug, Clone)]
pub struct Config {
    pub username: String,
    pub password: String,
    pub cache: CacheConfig,
    pub notifier: NotifierConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut problems = Vec::new();

        let username = required(&get, &mut problems, "PORTAL_USERNAME");
        let password = required(&get, &mut problems, "PORTAL_PASSWORD");

        let cache = match setting(&get, "CACHE").as_deref().unwrap_or("file") {
            "memory" => Some(CacheConfig::Memory),
            "file" => {
                let path = setting(&get, "CACHE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_PATH));
                Some(CacheConfig::File { path })
            }
            "remote" => {
                let namespace =
                    setting(&get, "CACHE_NAMESPACE").unwrap_or_else(|| DEFAULT_NAMESPACE.into());
                parse_url(required(&get, &mut problems, "CACHE_URL"), "CACHE_URL", &mut problems)
                    .map(|url| CacheConfig::Remote { url, namespace })
            }
            other => {
                problems.push(format!("CACHE {other:?} is not one of memory, file, remote"));
                None
            }
        };

        // DRY_RUN overrides whatever notifier is configured.
        let dry_run = setting(&get, "DRY_RUN").is_some();
        let notifier = if dry_run {
            Some(NotifierConfig::Console)
        } else {
            match setting(&get, "NOTIFIER").as_deref().unwrap_or("console") {
                "console" => Some(NotifierConfig::Console),
                "telegram" => {
                    let token = required(&get, &mut problems, "TELEGRAM_BOT_TOKEN");
                    let raw_chat = required(&get, &mut problems, "TELEGRAM_CHAT_ID");
                    let chat_id = match raw_chat.parse::<i64>() {
                        Ok(id) => Some(id),
                        Err(_) => {
                            if !raw_chat.is_empty() {
                                problems
                                    .push(format!("TELEGRAM_CHAT_ID {raw_chat:?} is not numeric"));
                            }
                            None
                        }
                    };
                    chat_id.map(|chat_id| NotifierConfig::Telegram { token, chat_id })
                }
                "email" => {
                    let api_key = required(&get, &mut problems, "EMAIL_API_KEY");
                    let from = required(&get, &mut problems, "EMAIL_FROM");
                    let to = required(&get, &mut problems, "EMAIL_TO");
                    parse_url(
                        required(&get, &mut problems, "EMAIL_API_URL"),
                        "EMAIL_API_URL",
                        &mut problems,
                    )
                    .map(|endpoint| NotifierConfig::Email { endpoint, api_key, from, to })
                }
                other => {
                    problems
                        .push(format!("NOTIFIER {other:?} is not one of console, telegram, email"));
                    None
                }
            }
        };

        match (cache, notifier) {
            (Some(cache), Some(notifier)) if problems.is_empty() => {
                Ok(Config { username, password, cache, notifier })
            }
            _ => Err(Error::Configuration { problems }),
        }
    }
}

/// Empty values are treated the same as unset ones.
fn setting<F>(get: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    get(name).filter(|value| !value.is_empty())
}

fn required<F>(get: &F, problems: &mut Vec<String>, name: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match setting(get, name) {
        Some(value) => value,
        None => {
            problems.push(format!("{name} is not set"));
            String::new()
        }
    }
}

fn parse_url(raw: String, name: &str, problems: &mut Vec<String>) -> Option<Url> {
    if raw.is_empty() {
        // Missing value was already reported by required().
        return None;
    }
    match Url::parse(&raw) {
        Ok(url) => Some(url),
        Err(e) => {
            problems.push(format!("{name} {raw:?} is not a valid URL: {e}"));
            None
        }
    }
}
