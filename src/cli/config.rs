// FILE: src/cli/config.rs

use crate::error::{CompilerError, Result};
use crate::patches::Patch;
use crate::types::Platform;
use crate::CompilerOptions;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub package_prefix: Option<String>,
    pub packages: Option<HashMap<String, String>>,
    pub default_patches: Option<bool>,
    pub patches: Option<Vec<Patch>>,
    /// Platform name -> directory of GIR files
    pub inputs: Option<HashMap<String, String>>,
    pub output_directory: Option<String>,
    pub pretty: Option<bool>,
}

impl ConfigFile {
    /// Fill options from the config file; command-line values win
    pub fn apply_to(&self, options: &mut CompilerOptions) {
        if let Some(prefix) = &self.package_prefix {
            options.package_prefix = prefix.clone();
        }
        if let Some(packages) = &self.packages {
            for (namespace, package) in packages {
                options
                    .packages
                    .entry(namespace.clone())
                    .or_insert_with(|| package.clone());
            }
        }
        if let Some(default_patches) = self.default_patches {
            options.default_patches = default_patches;
        }
        if let Some(patches) = &self.patches {
            options.patches.extend(patches.iter().cloned());
        }
        if let Some(pretty) = self.pretty {
            options.pretty_json |= pretty;
        }
    }

    pub fn input_directories(&self) -> Result<Vec<(Platform, String)>> {
        let mut dirs = Vec::new();
        if let Some(inputs) = &self.inputs {
            for (name, dir) in inputs {
                let platform = Platform::parse(name).ok_or_else(|| CompilerError::InvalidFormat {
                    message: format!("Unknown platform '{}' in config inputs", name),
                })?;
                dirs.push((platform, dir.clone()));
            }
        }
        // Fixed order regardless of map iteration
        dirs.sort_by_key(|(platform, _)| platform.bits());
        Ok(dirs)
    }
}

pub fn load(config_path: &str) -> Result<ConfigFile> {
    let config_content = fs::read_to_string(config_path).map_err(|e| {
        CompilerError::FileNotFound {
            path: format!("Config file {}: {}", config_path, e),
        }
    })?;

    let config: ConfigFile = if config_path.ends_with(".json") {
        serde_json::from_str(&config_content).map_err(|e| CompilerError::InvalidFormat {
            message: format!("Invalid JSON config: {}", e),
        })?
    } else if config_path.ends_with(".toml") {
        toml::from_str(&config_content).map_err(|e| CompilerError::InvalidFormat {
            message: format!("Invalid TOML config: {}", e),
        })?
    } else {
        return Err(CompilerError::InvalidFormat {
            message: "Config file must be .json or .toml format".to_string(),
        });
    };

    log::info!("Loaded configuration from {}", config_path);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TOML_CONFIG: &str = r#"
package_prefix = "org.example"
default_patches = false
output_directory = "out"

[packages]
GLib = "org.example.glib.core"

[inputs]
linux = "gir/linux"
macos = "gir/macos"

[[patches]]
op = "rename-method"
namespace = "Gtk"
type = "Window"
old = "get_focus"
new = "get_focus_widget"
"#;

    #[test]
    fn test_load_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("girc.toml");
        fs::write(&path, TOML_CONFIG).unwrap();

        let config = load(path.to_str().unwrap()).unwrap();
        let mut options = CompilerOptions::default();
        config.apply_to(&mut options);

        assert_eq!(options.package_prefix, "org.example");
        assert!(!options.default_patches);
        assert_eq!(options.packages["GLib"], "org.example.glib.core");
        assert_eq!(
            options.patches,
            vec![Patch::rename_method("Gtk", "Window", "get_focus", "get_focus_widget")]
        );
        assert_eq!(config.output_directory.as_deref(), Some("out"));
        assert_eq!(
            config.input_directories().unwrap(),
            vec![
                (Platform::LINUX, "gir/linux".to_string()),
                (Platform::MACOS, "gir/macos".to_string()),
            ]
        );
    }

    #[test]
    fn test_load_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("girc.json");
        fs::write(
            &path,
            r#"{"patches": [{"op": "remove-type", "namespace": "Gsk", "name": "GLRenderer"}], "inputs": {"beos": "x"}}"#,
        )
        .unwrap();

        let config = load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.patches.as_ref().map(Vec::len), Some(1));
        assert!(config.input_directories().is_err());
    }

    #[test]
    fn test_malformed_config_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("girc.toml");
        fs::write(&path, "package_prefix = [unterminated").unwrap();
        match load(path.to_str().unwrap()) {
            Err(CompilerError::InvalidFormat { message }) => assert!(message.starts_with("Invalid TOML config")),
            other => panic!("unexpected result: {:?}", other),
        }

        let missing = dir.path().join("absent.json");
        assert!(matches!(
            load(missing.to_str().unwrap()),
            Err(CompilerError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("girc.yaml");
        fs::write(&path, "package_prefix: x").unwrap();
        assert!(matches!(
            load(path.to_str().unwrap()),
            Err(CompilerError::InvalidFormat { .. })
        ));
    }
}
