use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub paths: Option<PathsConfig>,
    pub extraction: Option<ExtractionConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    pub input: Option<String>,
    pub output: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub header_exclusion: Option<f32>,
    pub footer_exclusion: Option<f32>,
    pub expand_ligatures: Option<bool>,
}

impl ConfigFile {
    pub fn input(&self) -> Option<&str> {
        self.paths.as_ref().and_then(|p| p.input.as_deref())
    }

    pub fn output(&self) -> Option<&str> {
        self.paths.as_ref().and_then(|p| p.output.as_deref())
    }

    pub fn header_exclusion(&self) -> Option<f32> {
        self.extraction.as_ref().and_then(|e| e.header_exclusion)
    }

    pub fn footer_exclusion(&self) -> Option<f32> {
        self.extraction.as_ref().and_then(|e| e.footer_exclusion)
    }

    pub fn expand_ligatures(&self) -> Option<bool> {
        self.extraction.as_ref().and_then(|e| e.expand_ligatures)
    }
}

/// Platform config directory path: `<config_dir>/pagetext/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pagetext").join("config.toml"))
}

/// Load config by cascading CWD `.pagetext.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".pagetext.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        paths: Some(PathsConfig {
            input: overlay
                .input()
                .or_else(|| base.input())
                .map(str::to_string),
            output: overlay
                .output()
                .or_else(|| base.output())
                .map(str::to_string),
        }),
        extraction: Some(ExtractionConfig {
            header_exclusion: overlay
                .header_exclusion()
                .or_else(|| base.header_exclusion()),
            footer_exclusion: overlay
                .footer_exclusion()
                .or_else(|| base.footer_exclusion()),
            expand_ligatures: overlay
                .expand_ligatures()
                .or_else(|| base.expand_ligatures()),
        }),
    }
}
