// src/config.rs
//! Service configuration: selection policy, the ordered keyword rule table, store
//! backend and request timeout, loaded from TOML with env overrides.
//!
//! Lookup: `$NEWS_CONFIG_PATH`, else `config/news.toml`, else built-in defaults.
//! A present but invalid file is an error; the service refuses to start with a
//! half-read rule table.

use crate::category::Category;
use crate::classify::{Classifier, DEFAULT_RULES_VERSION};
use crate::select::SelectionPolicy;
use crate::store::{StoreKind, StoreSettings};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::{Duration, SystemTime};
use tracing::{info, warn};

// --- env defaults & names ---
pub const DEFAULT_CONFIG_PATH: &str = "config/news.toml";

pub const ENV_CONFIG_PATH: &str = "NEWS_CONFIG_PATH";
pub const ENV_RELEVANCE_THRESHOLD: &str = "NEWS_RELEVANCE_THRESHOLD";
pub const ENV_CATEGORY_APPLIES_THRESHOLD: &str = "NEWS_CATEGORY_APPLIES_THRESHOLD";
pub const ENV_STORE_PATH: &str = "NEWS_STORE_PATH";
pub const ENV_STORE_URL: &str = "NEWS_STORE_URL";
pub const ENV_HOT_RELOAD: &str = "NEWS_HOT_RELOAD";

/* ----------------------------
File schema (from TOML)
---------------------------- */

#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    rules_version: Option<u32>,
    #[serde(default)]
    selection: SelectionPolicy,
    #[serde(default)]
    service: ServiceSettings,
    #[serde(default)]
    store: StoreSettings,
    /// Priority order is file order; absent means the built-in table.
    keyword_rules: Option<Vec<RuleGroup>>,
}

#[derive(Debug, Clone, Deserialize)]
struct RuleGroup {
    category: Category,
    keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Whole-pipeline budget for one webhook call.
    pub request_timeout_ms: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            request_timeout_ms: 4_000,
        }
    }
}

/* ----------------------------
Validated config
---------------------------- */

#[derive(Debug, Clone)]
pub struct NewsConfig {
    pub rules_version: u32,
    pub selection: SelectionPolicy,
    pub service: ServiceSettings,
    pub store: StoreSettings,
    pub classifier: Classifier,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            rules_version: DEFAULT_RULES_VERSION,
            selection: SelectionPolicy::default(),
            service: ServiceSettings::default(),
            store: StoreSettings::default(),
            classifier: Classifier::default(),
        }
    }
}

impl NewsConfig {
    /// Load from `$NEWS_CONFIG_PATH` / `config/news.toml` and apply env overrides.
    pub fn load() -> Result<Self> {
        let path = config_path();
        let mut cfg = if path.exists() {
            Self::from_path(&path)?
        } else {
            warn!(
                target: "news",
                path = %path.display(),
                "config file not found; using built-in defaults"
            );
            Self::default()
        };
        cfg.apply_overrides(|k| std::env::var(k).ok());
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading news config at {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing news config at {}", path.display()))
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(toml_str)?;

        let (rules_version, classifier) = match file.keyword_rules {
            Some(groups) => {
                let classifier = Classifier::from_groups(
                    groups
                        .iter()
                        .map(|g| (g.category, g.keywords.iter().map(String::as_str))),
                )?;
                if classifier.rules().is_empty() {
                    bail!("keyword_rules is present but empty");
                }
                (file.rules_version.unwrap_or(DEFAULT_RULES_VERSION), classifier)
            }
            None => (DEFAULT_RULES_VERSION, Classifier::default()),
        };

        let cfg = Self {
            rules_version,
            selection: file.selection,
            service: file.service,
            store: file.store,
            classifier,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        let t = self.selection.relevance_threshold;
        if !(0..=100).contains(&t) {
            bail!("selection.relevance_threshold must be within 0..=100, got {t}");
        }
        if self.selection.latest_limit == 0 || self.selection.category_limit == 0 {
            bail!("selection limits must be at least 1");
        }
        if self.service.request_timeout_ms == 0 {
            bail!("service.request_timeout_ms must be positive");
        }
        Ok(())
    }

    /// Env overrides; `lookup` is `std::env::var` in production.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(t) = parse_threshold(lookup(ENV_RELEVANCE_THRESHOLD)) {
            self.selection.relevance_threshold = t;
        }
        if let Some(raw) = lookup(ENV_CATEGORY_APPLIES_THRESHOLD) {
            self.selection.category_applies_threshold = parse_flag(&raw);
        }
        if let Some(p) = lookup(ENV_STORE_PATH).filter(|s| !s.trim().is_empty()) {
            self.store.kind = StoreKind::File;
            self.store.path = Some(PathBuf::from(p.trim()));
        }
        if let Some(u) = lookup(ENV_STORE_URL).filter(|s| !s.trim().is_empty()) {
            self.store.kind = StoreKind::Http;
            self.store.url = Some(u.trim().to_string());
        }
    }
}

pub fn config_path() -> PathBuf {
    std::env::var(ENV_CONFIG_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

// parse optional integer env and clamp to <0..=100>
fn parse_threshold(raw: Option<String>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .map(|v| v.clamp(0, 100))
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Dev gate: debug build, or SHUTTLE_ENV in {local, development, dev}.
pub fn is_dev_env() -> bool {
    cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        )
}

/* ----------------------------
Thread-safe handle + hot reload
---------------------------- */

/// Shared, swappable config. Readers take an `Arc` snapshot per request so one
/// request never sees two rule tables.
#[derive(Clone)]
pub struct ConfigHandle {
    inner: Arc<RwLock<Arc<NewsConfig>>>,
}

impl ConfigHandle {
    pub fn new(cfg: NewsConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(cfg))),
        }
    }

    pub fn current(&self) -> Arc<NewsConfig> {
        match self.inner.read() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn replace(&self, cfg: NewsConfig) {
        match self.inner.write() {
            Ok(mut g) => *g = Arc::new(cfg),
            Err(poisoned) => *poisoned.into_inner() = Arc::new(cfg),
        }
    }
}

/// Returns true if we should enable hot reload (dev/local only).
fn hot_reload_enabled() -> bool {
    let want = std::env::var(ENV_HOT_RELOAD)
        .ok()
        .map(|v| v == "1")
        .unwrap_or(false);
    want && is_dev_env()
}

/// Poll `path` mtime every 2s and swap in a freshly parsed config. The store
/// backend is built once at startup and is not affected.
pub fn start_hot_reload_thread(handle: ConfigHandle, path: PathBuf) {
    if !hot_reload_enabled() {
        return;
    }

    thread::spawn(move || {
        let poll = Duration::from_secs(2);
        let mut last_mtime: Option<SystemTime> = None;

        loop {
            if let Ok(mtime) = fs::metadata(&path).and_then(|m| m.modified()) {
                let changed = match last_mtime {
                    None => {
                        last_mtime = Some(mtime);
                        false
                    }
                    Some(prev) => mtime > prev,
                };
                if changed {
                    match NewsConfig::from_path(&path) {
                        Ok(mut fresh) => {
                            fresh.apply_overrides(|k| std::env::var(k).ok());
                            info!(
                                target: "news",
                                rules_version = fresh.rules_version,
                                "config reloaded"
                            );
                            handle.replace(fresh);
                        }
                        Err(e) => {
                            warn!(
                                target: "news",
                                error = %e,
                                "config reload failed; keeping previous"
                            );
                        }
                    }
                    last_mtime = Some(mtime);
                }
            }
            thread::sleep(poll);
        }
    });
}
