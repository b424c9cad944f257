//! Static session configuration: debugging endpoint, profile directory,
//! viewport and timing constants. All values are fixed per invocation; env
//! overrides exist for the endpoint port, profile and Chrome executable.

use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf, time::Duration};
use which::which;

/// Default DevTools debugging port. Fixed so repeated invocations attach to
/// the same browser instance.
pub const DEFAULT_DEBUG_PORT: u16 = 21222;

/// Fixed viewport applied to every resolved page.
pub const VIEWPORT_WIDTH: u32 = 1366;
pub const VIEWPORT_HEIGHT: u32 = 768;

/// Settle delay after dispatching input events.
pub const INPUT_SETTLE: Duration = Duration::from_millis(500);

/// Settle delay after a fresh navigation.
pub const NAV_SETTLE: Duration = Duration::from_secs(3);

/// Overall budget for closing pre-existing tabs before navigating.
pub const CLOSE_PAGES_BUDGET: Duration = Duration::from_secs(2);

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Chrome/Chromium executable. Empty path means "not found"; attach may
    /// still succeed against an already-running browser.
    pub executable: PathBuf,
    /// Persistent automation profile, so cookies and logins survive across
    /// invocations.
    pub user_data_dir: PathBuf,
    pub debug_port: u16,
    pub headless: bool,
    /// Connect attempts after launching a fresh browser.
    pub connect_retries: u32,
    pub connect_retry_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            executable: detect_chrome_executable().unwrap_or_default(),
            user_data_dir: default_profile_dir(),
            debug_port: resolve_debug_port(),
            headless: true,
            connect_retries: 5,
            connect_retry_delay: Duration::from_secs(1),
        }
    }
}

impl SessionConfig {
    /// HTTP endpoint of the DevTools JSON API.
    pub fn endpoint(&self) -> String {
        format!("http://127.0.0.1:{}", self.debug_port)
    }
}

fn resolve_debug_port() -> u16 {
    match env::var("BROWSERCLI_PORT") {
        Ok(raw) => raw.trim().parse().unwrap_or(DEFAULT_DEBUG_PORT),
        Err(_) => DEFAULT_DEBUG_PORT,
    }
}

fn default_profile_dir() -> PathBuf {
    if let Ok(path) = env::var("BROWSERCLI_PROFILE") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".browsercli-user-data")
}

/// Locate a Chrome/Chromium binary: env override first, then PATH lookups,
/// then well-known per-OS install locations.
pub fn detect_chrome_executable() -> Option<PathBuf> {
    if let Ok(raw) = env::var("BROWSERCLI_CHROME") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            let candidate = PathBuf::from(trimmed);
            if candidate.exists() {
                return Some(candidate);
            }
        }
    }

    for name in chrome_executable_names() {
        if let Ok(path) = which(name) {
            return Some(path);
        }
    }

    os_specific_chrome_paths()
        .into_iter()
        .find(|candidate| candidate.exists())
}

fn chrome_executable_names() -> &'static [&'static str] {
    #[cfg(target_os = "windows")]
    {
        &["chrome.exe", "chromium.exe", "msedge.exe"]
    }

    #[cfg(any(target_os = "macos", target_os = "linux", target_os = "freebsd"))]
    {
        &[
            "google-chrome-stable",
            "google-chrome",
            "chromium",
            "chromium-browser",
        ]
    }

    #[cfg(not(any(
        target_os = "windows",
        target_os = "macos",
        target_os = "linux",
        target_os = "freebsd"
    )))]
    {
        &["chrome"]
    }
}

fn os_specific_chrome_paths() -> Vec<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let mut paths = Vec::new();
        for key in ["PROGRAMFILES", "PROGRAMFILES(X86)", "LOCALAPPDATA"] {
            if let Ok(value) = env::var(key) {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    let root = PathBuf::from(trimmed);
                    paths.push(root.join("Google/Chrome/Application/chrome.exe"));
                    paths.push(root.join("Chromium/Application/chrome.exe"));
                    paths.push(root.join("Microsoft/Edge/Application/msedge.exe"));
                }
            }
        }
        paths
    }

    #[cfg(target_os = "macos")]
    {
        vec![
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
            PathBuf::from("/Applications/Chromium.app/Contents/MacOS/Chromium"),
        ]
    }

    #[cfg(any(target_os = "linux", target_os = "freebsd"))]
    {
        vec![
            PathBuf::from("/usr/bin/google-chrome-stable"),
            PathBuf::from("/usr/bin/google-chrome"),
            PathBuf::from("/usr/bin/chromium-browser"),
            PathBuf::from("/usr/bin/chromium"),
        ]
    }

    #[cfg(not(any(
        target_os = "windows",
        target_os = "macos",
        target_os = "linux",
        target_os = "freebsd"
    )))]
    {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn endpoint_uses_configured_port() {
        let config = SessionConfig {
            debug_port: 9333,
            ..SessionConfig::default()
        };
        assert_eq!(config.endpoint(), "http://127.0.0.1:9333");
    }

    #[test]
    fn default_retry_schedule() {
        let config = SessionConfig::default();
        assert_eq!(config.connect_retries, 5);
        assert_eq!(config.connect_retry_delay, Duration::from_secs(1));
    }

    #[test]
    fn detects_chrome_from_env_var() {
        let dir = tempdir().unwrap();
        let exe_path = dir.path().join("my-chrome");
        fs::write(&exe_path, b"").unwrap();
        let original = env::var("BROWSERCLI_CHROME").ok();
        env::set_var("BROWSERCLI_CHROME", exe_path.to_string_lossy().to_string());
        let detected = detect_chrome_executable();
        if let Some(value) = original {
            env::set_var("BROWSERCLI_CHROME", value);
        } else {
            env::remove_var("BROWSERCLI_CHROME");
        }
        assert_eq!(detected, Some(exe_path));
    }

    #[test]
    fn profile_dir_defaults_under_home() {
        let original = env::var("BROWSERCLI_PROFILE").ok();
        env::remove_var("BROWSERCLI_PROFILE");
        let dir = default_profile_dir();
        if let Some(value) = original {
            env::set_var("BROWSERCLI_PROFILE", value);
        }
        assert!(dir.ends_with(".browsercli-user-data"));
    }
}
