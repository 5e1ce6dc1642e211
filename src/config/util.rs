//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`
///
/// ```text
/// /home/user/app/src/main/svg-png/   ← start
/// /home/user/app/densify.toml        ← found!
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_upward() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("densify.toml"), "").unwrap();

        let found = find_config_file(Path::new("densify.toml"), &nested).unwrap();
        assert_eq!(found, dir.path().join("densify.toml"));
    }

    #[test]
    fn test_find_config_nearest_wins() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("app");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("densify.toml"), "").unwrap();
        fs::write(nested.join("densify.toml"), "").unwrap();

        let found = find_config_file(Path::new("densify.toml"), &nested).unwrap();
        assert_eq!(found, nested.join("densify.toml"));
    }

    #[test]
    fn test_find_config_absolute() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        assert!(find_config_file(&path, dir.path()).is_none());
        fs::write(&path, "").unwrap();
        assert_eq!(find_config_file(&path, Path::new("/")), Some(path));
    }
}
