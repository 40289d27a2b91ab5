use crate::collector::{
    CollectionBudget, DEFAULT_EXCLUDED_DIRS, DEFAULT_MAX_DEPTH, DEFAULT_MAX_FILES,
};
use crate::error::{AppError, Result};
use crate::messages::{Locale, Messages};
use crate::workspace::Workspace;
use byte_unit::Byte;
use log;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_CONFIG_DIR: &str = ".xtools/promptcomposer";
pub const DEFAULT_CONFIG_FILENAME: &str = "promptcomposer.toml";
pub const DEFAULT_MAX_TOTAL_BYTES: &str = "2MiB";
pub const WORKSPACE_ROOT_ENV: &str = "WORKSPACE_ROOT";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub collect: CollectConfig,
    #[serde(default)]
    pub workspace: WorkspaceConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    #[serde(default)]
    pub locale: Locale,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CollectConfig {
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    #[serde(default = "default_max_total_bytes")]
    pub max_total_bytes: String,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct WorkspaceConfig {
    /// Extra folders for display paths, relative to the workspace root unless absolute.
    #[serde(default)]
    pub roots: Vec<PathBuf>,
}

fn default_max_files() -> usize {
    DEFAULT_MAX_FILES
}
fn default_max_total_bytes() -> String {
    DEFAULT_MAX_TOTAL_BYTES.to_string()
}
fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}
fn default_exclude_dirs() -> Vec<String> {
    DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect()
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            max_files: default_max_files(),
            max_total_bytes: default_max_total_bytes(),
            max_depth: default_max_depth(),
            exclude_dirs: default_exclude_dirs(),
        }
    }
}

/// Parses sizes like `2MiB`, `512 KB` or `1048576`.
pub fn parse_byte_size(size_str: &str) -> Result<u64> {
    let byte_value = Byte::from_str(size_str).map_err(|e| {
        AppError::ByteSize(format!(
            "Invalid size '{}': {}. Use B, KiB, MiB, etc.",
            size_str, e
        ))
    })?;
    Ok(byte_value.as_u64())
}

impl Config {
    /// Budget for the collector; rejects zero file or byte limits.
    pub fn collection_budget(&self) -> Result<CollectionBudget> {
        let max_total_bytes = parse_byte_size(&self.collect.max_total_bytes)?;
        if self.collect.max_files == 0 {
            return Err(AppError::InvalidArgument(
                "collect.max_files must be greater than 0".to_string(),
            ));
        }
        if max_total_bytes == 0 {
            return Err(AppError::InvalidArgument(
                "collect.max_total_bytes must be greater than 0 bytes".to_string(),
            ));
        }
        Ok(CollectionBudget {
            max_files: self.collect.max_files,
            max_total_bytes,
            max_depth: self.collect.max_depth,
            excluded_dir_names: self.collect.exclude_dirs.clone(),
        })
    }

    /// Text catalogue for the configured locale; `env_tag` decides `auto`.
    pub fn messages(&self, env_tag: Option<&str>) -> Messages {
        Messages::new(self.general.locale, env_tag)
    }

    /// Workspace root first, then configured extra roots.
    pub fn workspace(&self, workspace_root: &Path) -> Workspace {
        let mut roots = vec![workspace_root.to_path_buf()];
        roots.extend(self.workspace.roots.iter().map(|root| {
            if root.is_absolute() {
                root.clone()
            } else {
                workspace_root.join(root)
            }
        }));
        Workspace::new(roots)
    }

    pub fn determine_workspace_root(cli_workspace_root: Option<&PathBuf>) -> Result<PathBuf> {
        let path_str_opt = cli_workspace_root
            .map(|p| p.to_string_lossy().to_string())
            .or_else(|| env::var(WORKSPACE_ROOT_ENV).ok().filter(|s| !s.is_empty()));

        let path_to_resolve = match path_str_opt {
            Some(p_str) => PathBuf::from(shellexpand::tilde(&p_str).as_ref()),
            None => env::current_dir().map_err(AppError::Io)?,
        };

        path_to_resolve.canonicalize().map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to canonicalize workspace root '{}': {}",
                    path_to_resolve.display(),
                    e
                ),
            ))
        })
    }

    pub fn resolve_config_path(
        workspace_root: &Path,
        cli_config_file: Option<&String>,
        cli_disable_config: bool,
    ) -> Result<Option<PathBuf>> {
        if cli_disable_config {
            log::debug!("Config file loading disabled via CLI flag.");
            return Ok(None);
        }

        let path_to_check = match cli_config_file {
            Some(p_str) => {
                let expanded_path_cow = shellexpand::tilde(p_str);
                let mut path = PathBuf::from(expanded_path_cow.as_ref());
                let looks_like_path = path.is_absolute()
                    || path.components().count() > 1
                    || p_str.contains(['/', '\\']);

                if looks_like_path {
                    if !path.exists() && path.extension().is_none() {
                        path.set_extension("toml");
                    }
                    if !path.exists() {
                        return Err(AppError::Config(format!(
                            "Specified config file not found at path: {}",
                            path.display()
                        )));
                    }
                    log::debug!("Using specified config file path: {}", path.display());
                    Some(path)
                } else {
                    let filename = if path.extension().is_none_or(|e| e != "toml") {
                        format!("{}.toml", path.to_string_lossy())
                    } else {
                        path.to_string_lossy().to_string()
                    };
                    let full_path = workspace_root.join(DEFAULT_CONFIG_DIR).join(filename);
                    if !full_path.exists() {
                        return Err(AppError::Config(format!(
                            "Specified config file '{}' not found in default directory: {}",
                            path.display(),
                            workspace_root.join(DEFAULT_CONFIG_DIR).display()
                        )));
                    }
                    log::debug!(
                        "Using specified config filename in default directory: {}",
                        full_path.display()
                    );
                    Some(full_path)
                }
            }
            None => {
                let default_path = workspace_root
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME);
                if default_path.exists() {
                    log::debug!("Using default config file path: {}", default_path.display());
                    Some(default_path)
                } else {
                    log::debug!(
                        "No config file specified and default not found at: {}",
                        default_path.display()
                    );
                    None
                }
            }
        };
        Ok(path_to_check)
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", config_path.display());
        let toml_content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            locator: config_path.to_string_lossy().into_owned(),
            source: e,
        })?;
        Self::from_toml_str(&toml_content).map_err(|e| {
            AppError::TomlParse(format!(
                "Error parsing config file '{}': {}. Check TOML syntax and structure.",
                config_path.display(),
                e
            ))
        })
    }

    pub fn from_toml_str(toml_content: &str) -> Result<Self> {
        toml::from_str::<Config>(toml_content).map_err(|e| AppError::TomlParse(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
