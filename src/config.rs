use std::path::PathBuf;

// ── Keys and file names ───────────────────────────────────────────────────────

/// Host-store key holding the serialized settings map.
pub const STORE_KEY: &str = "cybershield-settings";

/// Name of the exported configuration file.
pub const EXPORT_FILE_NAME: &str = "cybershield-settings.json";

const APP_DIR: &str = "cybershield";
const STORAGE_FILE: &str = "storage.json";
const LOG_FILE: &str = "cybershield.log";

// ── Paths ─────────────────────────────────────────────────────────────────────

pub fn base_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Per-user data directory, or the executable's directory when the
/// platform has none.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(base_dir)
}

pub fn storage_file(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join(STORAGE_FILE)
}

pub fn log_file(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join(LOG_FILE)
}

// ── Header ────────────────────────────────────────────────────────────────────

pub const HEADER_LINES: &[&str] = &[
    "CYBERSHIELD SECURITY CONSOLE",
    "-- SETTINGS --",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn files_live_in_data_dir() {
        let dir = Path::new("/tmp/cs");
        assert_eq!(storage_file(dir), Path::new("/tmp/cs/storage.json"));
        assert_eq!(log_file(dir), Path::new("/tmp/cs/cybershield.log"));
    }
}
