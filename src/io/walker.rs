//! Input discovery.
//!
//! Command-line inputs may be files, directories or glob patterns. The
//! resulting list keeps the order the inputs were given in, sorts the files
//! found under each directory or pattern, and drops repeats, so the same
//! command line always yields the same file order.

use crate::errors::DocError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub struct FileWalker {
    extensions: Vec<String>,
    ignore_patterns: Vec<glob::Pattern>,
}

impl FileWalker {
    pub fn new(extensions: Vec<String>) -> Self {
        Self {
            extensions,
            ignore_patterns: Vec::new(),
        }
    }

    /// Skip files whose path matches any of `patterns`. Invalid patterns are
    /// reported as configuration errors.
    pub fn with_ignore_patterns(mut self, patterns: &[String]) -> Result<Self, DocError> {
        self.ignore_patterns = patterns
            .iter()
            .map(|p| {
                glob::Pattern::new(p)
                    .map_err(|e| DocError::Config(format!("Invalid ignore pattern '{}': {}", p, e)))
            })
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    /// Expand `inputs` into an ordered, duplicate-free file list.
    pub fn expand(&self, inputs: &[String]) -> Result<Vec<PathBuf>, DocError> {
        let mut seen = HashSet::new();
        let mut files = Vec::new();
        for input in inputs {
            for file in self.expand_one(input)? {
                if !self.is_ignored(&file) && seen.insert(file.clone()) {
                    files.push(file);
                }
            }
        }
        log::debug!("Expanded {} inputs into {} files", inputs.len(), files.len());
        Ok(files)
    }

    fn expand_one(&self, input: &str) -> Result<Vec<PathBuf>, DocError> {
        let path = Path::new(input);
        if path.is_dir() {
            return self.walk(path);
        }
        if path.is_file() {
            // Explicit files are taken whatever their extension.
            return Ok(vec![path.to_path_buf()]);
        }
        if is_glob(input) {
            return self.glob(input);
        }
        Err(DocError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or directory"),
        ))
    }

    fn walk(&self, root: &Path) -> Result<Vec<PathBuf>, DocError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                DocError::io(path, std::io::Error::other(e.to_string()))
            })?;
            if entry.file_type().is_file() && self.has_extension(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>, DocError> {
        let paths = glob::glob(pattern)
            .map_err(|e| DocError::Config(format!("Invalid input pattern '{}': {}", pattern, e)))?;
        let mut files = Vec::new();
        for path in paths {
            let path = path.map_err(|e| {
                let failed = e.path().to_path_buf();
                DocError::io(failed, e.into())
            })?;
            if path.is_file() && self.has_extension(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| {
                let ext = ext.to_string_lossy();
                self.extensions.iter().any(|e| e.trim_start_matches('.') == ext)
            })
            .unwrap_or(false)
    }

    fn is_ignored(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.ignore_patterns.iter().any(|p| p.matches(&path_str))
    }
}

fn is_glob(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

/// Expand `inputs` for `extensions`, skipping paths that match `ignore`.
pub fn find_source_files(
    inputs: &[String],
    extensions: &[String],
    ignore: &[String],
) -> Result<Vec<PathBuf>, DocError> {
    FileWalker::new(extensions.to_vec())
        .with_ignore_patterns(ignore)?
        .expand(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/view")).unwrap();
        for file in ["src/b.js", "src/a.js", "src/view/Panel.js", "src/readme.md"] {
            fs::write(dir.path().join(file), "").unwrap();
        }
        dir
    }

    fn rel(dir: &TempDir, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.strip_prefix(dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_directory_walk_is_sorted_and_filtered() {
        let dir = tree();
        let root = dir.path().join("src").display().to_string();
        let files = find_source_files(&[root], &["js".to_string()], &[]).unwrap();
        assert_eq!(rel(&dir, &files), vec!["src/a.js", "src/b.js", "src/view/Panel.js"]);
    }

    #[test]
    fn test_input_order_kept_and_duplicates_dropped() {
        let dir = tree();
        let b = dir.path().join("src/b.js").display().to_string();
        let all = dir.path().join("src").display().to_string();
        let files = find_source_files(&[b, all], &["js".to_string()], &[]).unwrap();
        assert_eq!(rel(&dir, &files), vec!["src/b.js", "src/a.js", "src/view/Panel.js"]);
    }

    #[test]
    fn test_glob_and_ignore_patterns() {
        let dir = tree();
        let pattern = dir.path().join("src/**/*.js").display().to_string();
        let walker = FileWalker::new(vec!["js".into()])
            .with_ignore_patterns(&["**/view/**".to_string()])
            .unwrap();
        let files = walker.expand(&[pattern]).unwrap();
        assert_eq!(rel(&dir, &files), vec!["src/a.js", "src/b.js"]);
    }

    #[test]
    fn test_invalid_ignore_pattern_is_config_error() {
        let dir = tree();
        let root = dir.path().join("src").display().to_string();
        let err = find_source_files(&[root], &["js".to_string()], &["[".to_string()]).unwrap_err();
        assert!(matches!(err, DocError::Config(_)));
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let err = find_source_files(&["/nonexistent/classdoc".to_string()], &["js".into()], &[])
            .unwrap_err();
        assert!(err.is_input_failure());
    }
}
