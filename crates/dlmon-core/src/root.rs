//! Installation root discovery.
//!
//! Platform knowledge lives only here: each `RootLocator` knows the usual
//! install locations for one platform family, and `platform_locator` picks
//! one at compile time. Overrides are applied by `resolve`.

use std::path::{Path, PathBuf};

use crate::error::MonitorError;

/// Environment variable that overrides discovery.
pub const ROOT_ENV: &str = "STEAM_ROOT";

/// Finds the installation root for one platform family.
pub trait RootLocator {
    /// Candidate locations, in preference order.
    fn candidates(&self) -> Vec<PathBuf>;

    /// First candidate that exists on disk.
    fn resolve_root(&self) -> Option<PathBuf> {
        self.candidates().into_iter().find(|p| p.exists())
    }
}

/// `~/.local/share/Steam`, `~/.steam/steam`, `~/.steam/root`.
#[derive(Debug, Clone)]
pub struct LinuxLocator {
    pub home: Option<PathBuf>,
}

impl RootLocator for LinuxLocator {
    fn candidates(&self) -> Vec<PathBuf> {
        let Some(home) = &self.home else {
            return Vec::new();
        };
        vec![
            home.join(".local/share/Steam"),
            home.join(".steam/steam"),
            home.join(".steam/root"),
        ]
    }
}

/// `~/Library/Application Support/Steam`.
#[derive(Debug, Clone)]
pub struct MacLocator {
    pub home: Option<PathBuf>,
}

impl RootLocator for MacLocator {
    fn candidates(&self) -> Vec<PathBuf> {
        self.home
            .iter()
            .map(|h| h.join("Library/Application Support/Steam"))
            .collect()
    }
}

/// Program Files (x86 first), then `C:\Steam`.
#[derive(Debug, Clone)]
pub struct WindowsLocator {
    pub program_files_x86: Option<PathBuf>,
    pub program_files: Option<PathBuf>,
}

impl RootLocator for WindowsLocator {
    fn candidates(&self) -> Vec<PathBuf> {
        let mut out: Vec<PathBuf> = [&self.program_files_x86, &self.program_files]
            .into_iter()
            .flatten()
            .map(|p| p.join("Steam"))
            .collect();
        out.push(PathBuf::from("C:/Steam"));
        out
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(target_os = "windows")]
pub fn platform_locator() -> Box<dyn RootLocator> {
    Box::new(WindowsLocator {
        program_files_x86: env_path("PROGRAMFILES(X86)"),
        program_files: env_path("PROGRAMFILES"),
    })
}

#[cfg(target_os = "macos")]
pub fn platform_locator() -> Box<dyn RootLocator> {
    Box::new(MacLocator {
        home: dirs::home_dir(),
    })
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub fn platform_locator() -> Box<dyn RootLocator> {
    Box::new(LinuxLocator {
        home: dirs::home_dir(),
    })
}

/// Resolve the root from explicit overrides (highest priority first), falling
/// back to `locator`. Overrides that do not exist are skipped.
pub fn resolve<'a>(
    overrides: impl IntoIterator<Item = Option<&'a Path>>,
    locator: &dyn RootLocator,
) -> Result<PathBuf, MonitorError> {
    for candidate in overrides.into_iter().flatten() {
        if candidate.exists() {
            return Ok(candidate.to_path_buf());
        }
        tracing::warn!(path = %candidate.display(), "root override does not exist; ignoring");
    }
    locator.resolve_root().ok_or(MonitorError::RootNotFound)
}

/// Precedence: `cli_root`, then `STEAM_ROOT`, then `config_root`, then discovery.
pub fn resolve_default(
    cli_root: Option<&Path>,
    config_root: Option<&Path>,
) -> Result<PathBuf, MonitorError> {
    let env_root = env_path(ROOT_ENV);
    let locator = platform_locator();
    resolve(
        [cli_root, env_root.as_deref(), config_root],
        locator.as_ref(),
    )
}
