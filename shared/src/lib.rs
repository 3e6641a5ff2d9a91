use std::path::PathBuf;

use bevy_ecs::prelude::Resource;
use bevy_log::debug;

pub mod boat;
pub mod constants;
pub mod orbit;
pub mod sets;
pub mod viewport;
pub mod water;

pub use constants::*;

/// Where keybindings and downloaded assets are kept.
#[derive(Resource, Debug, Clone)]
pub struct DataFolderPaths {
    pub data_folder_path: PathBuf,
    /// Downloaded assets; kept under `data_folder_path` so the asset server can resolve them
    pub remote_cache_path: PathBuf,
}

pub const REMOTE_CACHE_DIR: &str = "remote";

pub fn get_data_folder_paths(data_folder_path: Option<String>) -> DataFolderPaths {
    let mut paths = default_data_folder_paths();

    if let Some(data_folder) = data_folder_path {
        paths.data_folder_path = data_folder.into();
    }

    // The asset server resolves relative roots against the executable, not the cwd
    if paths.data_folder_path.is_relative() {
        if let Ok(cwd) = std::env::current_dir() {
            paths.data_folder_path = cwd.join(&paths.data_folder_path);
        }
    }
    paths.remote_cache_path = paths.data_folder_path.join(REMOTE_CACHE_DIR);

    debug!("Data folder resolved to {}", paths.data_folder_path.display());
    paths
}

pub fn default_data_folder_paths() -> DataFolderPaths {
    DataFolderPaths {
        data_folder_path: "data".into(),
        remote_cache_path: PathBuf::from("data").join(REMOTE_CACHE_DIR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_folder_override_is_absolute() {
        let paths = get_data_folder_paths(Some("my-data".to_string()));
        assert!(paths.data_folder_path.is_absolute());
        assert!(paths.data_folder_path.ends_with("my-data"));
        assert_eq!(
            paths.remote_cache_path,
            paths.data_folder_path.join(REMOTE_CACHE_DIR)
        );
    }

    #[test]
    fn test_absolute_override_is_kept() {
        let root = std::env::temp_dir().join("sailboat-data");
        let paths = get_data_folder_paths(Some(root.display().to_string()));
        assert_eq!(paths.data_folder_path, root);
    }
}
