use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::DocConfig;
use crate::errors::DocError;

pub const CONFIG_FILE_NAME: &str = ".classdoc.toml";

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<DocConfig, String> {
    let mut config = toml::from_str::<DocConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))?;

    if config.global_class_name.trim().is_empty() {
        return Err("global_class_name must not be empty".to_string());
    }

    if let Some(bad) = config.ignore.iter().find(|p| glob::Pattern::new(p).is_err()) {
        return Err(format!("invalid ignore pattern '{}'", bad));
    }

    // Extensions are matched without the leading dot
    for ext in &mut config.extensions {
        *ext = ext.trim_start_matches('.').to_string();
    }

    Ok(config)
}

/// Load a configuration file that was named explicitly. Unlike the search in
/// [`load_config`], a missing or invalid file is an error here.
pub fn load_config_from_path(path: &Path) -> Result<DocConfig, DocError> {
    let contents = read_config_file(path)
        .map_err(|e| DocError::Config(format!("cannot read {}: {}", path.display(), e)))?;
    let config = parse_and_validate_config(&contents).map_err(DocError::Config)?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Pure function to try loading config from a specific path
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<DocConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// Handle file read errors with appropriate logging
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search the current directory and its ancestors for `.classdoc.toml`,
/// falling back to defaults.
pub fn load_config() -> DocConfig {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            return DocConfig::default();
        }
    };

    directory_ancestors(current, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            DocConfig::default()
        })
}
