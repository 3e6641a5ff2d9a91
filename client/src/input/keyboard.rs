use crate::{constants::BINDS_PATH, input::KeyMap};
use bevy::prelude::*;
use ron::{from_str, ser::PrettyConfig};
use shared::{boat::BoatAction, DataFolderPaths};
use std::path::Path;
use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
    path::PathBuf,
};

fn write_keybindings_to_path(key_map: &KeyMap, binds_path: &Path) -> Result<(), std::io::Error> {
    let pretty_config = PrettyConfig::new()
        .with_depth_limit(3)
        .with_separate_tuple_members(true)
        .with_enumerate_arrays(true);

    let serialized = ron::ser::to_string_pretty(key_map, pretty_config)
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::Other, "serialization failed"))?;
    if let Some(parent) = binds_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(binds_path)?;
    file.write_all(serialized.as_bytes())
}

fn read_keybindings_from_path(binds_path: &Path) -> Option<KeyMap> {
    let content = fs::read_to_string(binds_path).ok()?;
    match from_str::<KeyMap>(&content) {
        Ok(key_map) => Some(key_map),
        Err(e) => {
            warn!("Ignoring malformed keybindings in {:?}: {}", binds_path, e);
            None
        }
    }
}

/// Resolves a physical key to the boat action bound to it, if any.
pub fn action_for_key(key_code: KeyCode, key_map: &KeyMap) -> Option<BoatAction> {
    key_map
        .map
        .iter()
        .find(|(_, key_codes)| key_codes.contains(&key_code))
        .map(|(action, _)| *action)
}

pub(crate) fn default_key_map() -> BTreeMap<BoatAction, Vec<KeyCode>> {
    let mut map = BTreeMap::new();
    map.insert(BoatAction::TurnLeft, vec![KeyCode::ArrowLeft]);
    map.insert(BoatAction::TurnRight, vec![KeyCode::ArrowRight]);
    map.insert(BoatAction::Forward, vec![KeyCode::ArrowUp]);
    map.insert(BoatAction::Backward, vec![KeyCode::ArrowDown]);
    map
}

fn load_or_create_bindings(binds_path: &Path) -> KeyMap {
    if let Some(key_map) = read_keybindings_from_path(binds_path) {
        return key_map;
    }

    let key_map = KeyMap::default();
    if let Err(e) = write_keybindings_to_path(&key_map, binds_path) {
        error!(
            "Failed to create default keybindings file at {:?}: {}",
            binds_path, e
        );
    }
    key_map
}

pub fn get_bindings(data_folder_paths: &DataFolderPaths) -> KeyMap {
    let binds_path: PathBuf = data_folder_paths.data_folder_path.join(BINDS_PATH);
    let key_map = load_or_create_bindings(&binds_path);
    info!("Keybindings loaded from {:?}", binds_path);
    key_map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "sailboat-keyboard-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_default_bindings_are_arrow_keys() {
        let key_map = KeyMap::default();
        assert_eq!(
            action_for_key(KeyCode::ArrowLeft, &key_map),
            Some(BoatAction::TurnLeft)
        );
        assert_eq!(
            action_for_key(KeyCode::ArrowRight, &key_map),
            Some(BoatAction::TurnRight)
        );
        assert_eq!(
            action_for_key(KeyCode::ArrowUp, &key_map),
            Some(BoatAction::Forward)
        );
        assert_eq!(
            action_for_key(KeyCode::ArrowDown, &key_map),
            Some(BoatAction::Backward)
        );
        assert_eq!(action_for_key(KeyCode::KeyW, &key_map), None);
        assert_eq!(action_for_key(KeyCode::Space, &key_map), None);
    }

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = scratch_dir("missing");
        let binds_path = dir.join(BINDS_PATH);

        let key_map = load_or_create_bindings(&binds_path);
        assert_eq!(key_map, KeyMap::default());
        assert!(binds_path.exists(), "defaults should be persisted");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_custom_bindings_survive_reload() {
        let dir = scratch_dir("custom");
        let binds_path = dir.join(BINDS_PATH);

        let mut custom = KeyMap::default();
        custom
            .map
            .insert(BoatAction::Forward, vec![KeyCode::ArrowUp, KeyCode::KeyW]);
        write_keybindings_to_path(&custom, &binds_path).unwrap();

        let key_map = load_or_create_bindings(&binds_path);
        assert_eq!(key_map, custom);
        assert_eq!(
            action_for_key(KeyCode::KeyW, &key_map),
            Some(BoatAction::Forward)
        );

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = scratch_dir("malformed");
        let binds_path = dir.join(BINDS_PATH);
        fs::create_dir_all(&dir).unwrap();
        fs::write(&binds_path, "this is not ron (").unwrap();

        let key_map = load_or_create_bindings(&binds_path);
        assert_eq!(key_map, KeyMap::default());

        let _ = fs::remove_dir_all(&dir);
    }
}
