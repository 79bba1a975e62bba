//! Draft-store discovery.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use directories::{BaseDirs, UserDirs};

use super::InstallError;

/// Environment variable holding extra draft-store candidates, in the
/// platform's path-list syntax (`:` on Unix, `;` on Windows).
pub const DRAFT_ROOTS_ENV: &str = "DRAFTFORGE_DRAFT_ROOTS";

/// Subpath of the editor's data folder that holds drafts.
const DRAFT_SUBDIR: &str = "User Data/Projects/com.lveditor.draft";

/// Editor data folders, newest product name first.
const EDITOR_DIRS: &[&str] = &["JianyingPro", "CapCut"];

/// An ordered list of candidate draft-store directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftStoreLocator {
    candidates: Vec<PathBuf>,
}

impl DraftStoreLocator {
    /// Use exactly `candidates`, in order.
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    /// Combine configured roots and the environment value.
    ///
    /// Configured roots come first, then the environment list. When both are
    /// empty the built-in per-platform list is used.
    pub fn from_sources(configured: &[PathBuf], env: Option<OsString>) -> Self {
        let mut candidates: Vec<PathBuf> = configured.to_vec();
        if let Some(value) = env.filter(|v| !v.is_empty()) {
            candidates.extend(std::env::split_paths(&value).filter(|p| !p.as_os_str().is_empty()));
        }
        if candidates.is_empty() {
            candidates = builtin_candidates();
        }
        Self { candidates }
    }

    /// [`from_sources`](Self::from_sources) reading [`DRAFT_ROOTS_ENV`].
    pub fn from_env(configured: &[PathBuf]) -> Self {
        Self::from_sources(configured, std::env::var_os(DRAFT_ROOTS_ENV))
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// The first candidate that exists as a directory.
    pub fn locate(&self) -> Result<PathBuf, InstallError> {
        for candidate in &self.candidates {
            if candidate.is_dir() {
                tracing::info!("Draft store: {}", candidate.display());
                return Ok(candidate.clone());
            }
            tracing::debug!("Draft store candidate missing: {}", candidate.display());
        }
        Err(InstallError::TargetNotFound {
            candidates: self.candidates.clone(),
        })
    }
}

/// Where the editor keeps drafts on this platform.
pub fn builtin_candidates() -> Vec<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        UserDirs::new().and_then(|d| d.video_dir().map(Path::to_path_buf))
    } else {
        BaseDirs::new().map(|d| d.data_local_dir().to_path_buf())
    };

    let Some(base) = base else {
        tracing::warn!("Could not resolve the user's data directory");
        return Vec::new();
    };

    EDITOR_DIRS
        .iter()
        .map(|editor| base.join(editor).join(DRAFT_SUBDIR))
        .collect()
}
