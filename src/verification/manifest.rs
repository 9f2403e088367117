//! `package.json` reading and package manager detection.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::PackageManager;

/// Name of the project manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// The parts of `package.json` hook detection looks at.
///
/// Every other field is ignored, whatever its shape.
#[derive(Debug, Default, Deserialize)]
pub struct PackageJson {
    /// Scripts defined in package.json; `"scripts": null` reads as none
    #[serde(default)]
    pub scripts: Option<HashMap<String, serde_json::Value>>,
}

impl PackageJson {
    /// Parse a manifest file.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let package: Self = serde_json::from_str(&content)?;
        Ok(package)
    }

    /// Check whether a script is defined with a non-empty value.
    pub fn has_script(&self, name: &str) -> bool {
        match self.scripts.as_ref().and_then(|scripts| scripts.get(name)) {
            None | Some(serde_json::Value::Null | serde_json::Value::Bool(false)) => false,
            Some(serde_json::Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }
}

/// Detect which package manager is being used from its lock file.
pub fn detect_package_manager(path: &Path) -> PackageManager {
    if path.join("pnpm-lock.yaml").exists() {
        PackageManager::Pnpm
    } else if path.join("yarn.lock").exists() {
        PackageManager::Yarn
    } else if path.join("package-lock.json").exists() {
        PackageManager::Npm
    } else {
        PackageManager::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_detect_package_manager_priority() {
        let temp = TempDir::new().unwrap();
        assert_eq!(detect_package_manager(temp.path()), PackageManager::Unknown);

        std::fs::write(temp.path().join("package-lock.json"), "{}").unwrap();
        assert_eq!(detect_package_manager(temp.path()), PackageManager::Npm);

        std::fs::write(temp.path().join("yarn.lock"), "").unwrap();
        assert_eq!(detect_package_manager(temp.path()), PackageManager::Yarn);

        std::fs::write(temp.path().join("pnpm-lock.yaml"), "").unwrap();
        assert_eq!(detect_package_manager(temp.path()), PackageManager::Pnpm);
    }

    #[test]
    fn test_parse_package_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(MANIFEST_FILE);
        std::fs::write(
            &path,
            r#"{"name": "web", "scripts": {"test": "vitest", "lint": "", "build": null}}"#,
        )
        .unwrap();

        let package = PackageJson::from_path(&path).unwrap();
        assert!(package.has_script("test"));
        assert!(!package.has_script("lint"));
        assert!(!package.has_script("build"));
        assert!(!package.has_script("typecheck"));
    }

    #[test]
    fn test_package_json_without_scripts() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(MANIFEST_FILE);
        std::fs::write(&path, r#"{"name": "bare"}"#).unwrap();

        let package = PackageJson::from_path(&path).unwrap();
        assert!(package.scripts.is_none());
        assert!(!package.has_script("test"));
    }

    #[test]
    fn test_package_json_tolerates_odd_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(MANIFEST_FILE);

        std::fs::write(&path, r#"{"name": 42, "scripts": null}"#).unwrap();
        let package = PackageJson::from_path(&path).unwrap();
        assert!(!package.has_script("test"));

        std::fs::write(&path, r#"{"name": ["web"], "scripts": {"lint": "eslint ."}}"#).unwrap();
        let package = PackageJson::from_path(&path).unwrap();
        assert!(package.has_script("lint"));
    }

    #[test]
    fn test_invalid_package_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(MANIFEST_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        assert!(PackageJson::from_path(&path).is_err());
    }
}
