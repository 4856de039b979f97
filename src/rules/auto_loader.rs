use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use parking_lot::{Mutex, RwLock};

use crate::error::{ExtractError, LoadErrorKind, Result};

use super::loader::{load_list_file, RuleLoader, DEFAULT_UPDATE_INTERVAL};
use super::RuleSet;

/// Official list location
pub const DEFAULT_LIST_URL: &str = "https://publicsuffix.org/list/public_suffix_list.dat";

/// File name used inside the data directory
pub const DEFAULT_LIST_FILENAME: &str = "public_suffix_list.dat";

/// Rule loader that keeps a local copy of the list up to date.
///
/// The cached file is downloaded when missing, empty or older than the update
/// interval. A failed download falls back to the existing file.
pub struct AutoRuleLoader {
    data_dir: Option<PathBuf>,
    path: Option<PathBuf>,
    url: Option<String>,
    update_interval: Duration,
    rules: RwLock<Option<Arc<RuleSet>>>,
    download_lock: Mutex<()>,
}

impl AutoRuleLoader {
    pub fn new() -> Self {
        Self {
            data_dir: None,
            path: None,
            url: Some(DEFAULT_LIST_URL.to_string()),
            update_interval: DEFAULT_UPDATE_INTERVAL,
            rules: RwLock::new(None),
            download_lock: Mutex::new(()),
        }
    }

    /// Directory holding `public_suffix_list.dat`
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Explicit cache file; takes precedence over the data directory
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Never download; only the cached file is used
    pub fn without_url(mut self) -> Self {
        self.url = None;
        self
    }

    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    fn list_path(&self) -> Option<PathBuf> {
        self.path
            .clone()
            .or_else(|| self.data_dir.as_ref().map(|dir| dir.join(DEFAULT_LIST_FILENAME)))
    }

    fn should_download(&self, path: &Path) -> bool {
        match fs::metadata(path) {
            Ok(meta) => {
                if meta.len() == 0 {
                    return true;
                }
                match meta.modified() {
                    Ok(mtime) => SystemTime::now()
                        .duration_since(mtime)
                        .map(|age| age > self.update_interval)
                        .unwrap_or(true),
                    Err(_) => true,
                }
            }
            Err(_) => true,
        }
    }

    fn download(&self, path: &Path, url: &str) -> Result<()> {
        let _lock = self.download_lock.lock();

        // another caller may have refreshed it while we waited
        if !self.should_download(path) {
            return Ok(());
        }

        tracing::info!(url, path = %path.display(), "Downloading suffix list");

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("tmp");

        let response = ureq::get(url).call().map_err(|e| {
            ExtractError::load(LoadErrorKind::DownloadFailed, format!("Download failed: {}", e))
        })?;

        let mut file = fs::File::create(&tmp_path)?;
        let (_, body) = response.into_parts();
        let mut reader = body.into_reader();
        std::io::copy(&mut reader, &mut file)?;
        file.flush()?;
        drop(file);

        if let Err(e) = load_list_file(&tmp_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(ExtractError::load(
                LoadErrorKind::DownloadFailed,
                format!("Verification failed: {}", e),
            ));
        }

        fs::rename(&tmp_path, path)?;

        tracing::info!(path = %path.display(), "Suffix list updated");
        Ok(())
    }

    fn ensure_downloaded(&self) -> Result<PathBuf> {
        let path = self.list_path().ok_or_else(|| {
            ExtractError::load(LoadErrorKind::NotConfigured, "Suffix list path not configured")
        })?;

        if self.should_download(&path) {
            if let Some(url) = &self.url {
                if let Err(e) = self.download(&path, url) {
                    if !path.exists() {
                        return Err(e);
                    }
                    tracing::warn!(error = %e, path = %path.display(), "Download failed, using cached suffix list");
                }
            }
        }

        Ok(path)
    }
}

impl Default for AutoRuleLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleLoader for AutoRuleLoader {
    fn load_rules(&self) -> Result<Arc<RuleSet>> {
        if let Some(rules) = self.rules.read().as_ref() {
            return Ok(Arc::clone(rules));
        }

        let path = self.ensure_downloaded()?;
        let rules = Arc::new(load_list_file(&path)?);
        tracing::debug!(path = %path.display(), rules = rules.len(), "Loaded suffix list");
        *self.rules.write() = Some(Arc::clone(&rules));
        Ok(rules)
    }
}
