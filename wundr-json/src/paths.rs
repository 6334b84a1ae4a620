use directories::ProjectDirs;
use std::path::PathBuf;

/// Platform data directory for the app, falling back to the working
/// directory when the platform gives us nothing.
pub fn data_root() -> PathBuf {
    ProjectDirs::from("com", "wundr", "Wundr")
        .map(|pd| pd.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Default store file plus the directory its backups rotate through.
pub fn default_store_file() -> (PathBuf, PathBuf) {
    let root = data_root();
    (root.join("wundr.json"), root.join("backups"))
}
