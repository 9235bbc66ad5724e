//! Source-path normalization.
//!
//! Breakpoint registration and the per-step hook must agree on a single
//! spelling for every source file: absolute, symlinks resolved, case-folded
//! when the effective case rule is insensitive. The same function runs on
//! both sides, and results are cached per engine because the hook fires for
//! every executed step.

use std::collections::HashMap;
use std::env;
use std::path::{Component, Path, PathBuf};

/// Whether this platform's filesystems compare paths case-insensitively.
pub const OS_CASE_INSENSITIVE: bool = cfg!(any(windows, target_os = "macos"));

/// Normalize one path: absolute, real path, optional case fold.
///
/// Paths that do not exist on disk (common in tests and for generated
/// sources) fall back to a lexical cleanup of the absolute spelling.
pub fn normalize_path(path: &Path, fold_case: bool) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    let resolved = absolute
        .canonicalize()
        .unwrap_or_else(|_| lexical_clean(&absolute));
    if fold_case {
        PathBuf::from(resolved.to_string_lossy().to_lowercase())
    } else {
        resolved
    }
}

/// Resolve `.` and `..` components without touching the filesystem.
fn lexical_clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Basename used as the DAP `Source.name`.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ── PathCache ─────────────────────────────────────────────────────────────────

/// Per-engine normalization cache.
#[derive(Debug)]
pub struct PathCache {
    fold_case: bool,
    cache: HashMap<PathBuf, PathBuf>,
}

impl PathCache {
    pub fn new(fold_case: bool) -> Self {
        Self {
            fold_case,
            cache: HashMap::new(),
        }
    }

    /// Normalize `path`, memoizing the result under the original spelling.
    pub fn normalize(&mut self, path: &Path) -> PathBuf {
        if let Some(normalized) = self.cache.get(path) {
            return normalized.clone();
        }
        let normalized = normalize_path(path, self.fold_case);
        self.cache.insert(path.to_path_buf(), normalized.clone());
        normalized
    }
}
