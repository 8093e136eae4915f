//! Builds a [`DetectionContext`] from a project directory on disk

use crate::detection::DetectionContext;
use crate::error::ScanError;
use crate::fs::{FileSystem, RealFileSystem};
use ignore::WalkBuilder;
use serde_json::Value;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Directories whose contents never describe the project's own stack
pub const EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    "vendor",
    ".git",
    "storage",
    "dist",
    "build",
    ".next",
    ".nuxt",
    ".output",
];

/// Configuration files recognised by name, in addition to `*.config.*`
pub const KNOWN_CONFIG_FILES: &[&str] = &[
    "tsconfig.json",
    "jsconfig.json",
    "phpstan.neon",
    "phpstan.neon.dist",
    "pint.json",
    "phpunit.xml",
    "phpunit.xml.dist",
    ".eslintrc",
    ".eslintrc.js",
    ".eslintrc.cjs",
    ".eslintrc.json",
    ".prettierrc",
    ".prettierrc.json",
    "biome.json",
];

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub max_depth: Option<usize>,
    pub max_files: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            max_files: 20_000,
        }
    }
}

pub struct ProjectScanner {
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
    config: ScanConfig,
}

impl ProjectScanner {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ScanError> {
        let root = root.into();
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem::new());

        if !fs.exists(&root) {
            return Err(ScanError::PathNotFound(root));
        }
        if !fs.is_dir(&root) {
            return Err(ScanError::NotADirectory(root));
        }
        let root = fs
            .canonicalize(&root)
            .map_err(|_| ScanError::PathNotFound(root))?;

        debug!(root = %root.display(), "ProjectScanner initialized");

        Ok(Self {
            root,
            fs,
            config: ScanConfig::default(),
        })
    }

    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn scan(&self) -> Result<DetectionContext, ScanError> {
        let start = Instant::now();
        let files = self.walk()?;

        let config_files: Vec<String> = files
            .iter()
            .filter(|path| is_config_file(file_name(path)))
            .cloned()
            .collect();

        let ctx = DetectionContext {
            project_root: self.root.clone(),
            package_json: self.read_manifest("package.json"),
            composer_json: self.read_manifest("composer.json"),
            package_lock: self.read_manifest("package-lock.json"),
            composer_lock: self.read_manifest("composer.lock"),
            files,
            config_files,
        };

        info!(
            root = %self.root.display(),
            files = ctx.files.len(),
            config_files = ctx.config_files.len(),
            scan_time_ms = start.elapsed().as_millis() as u64,
            "Project scan completed"
        );

        Ok(ctx)
    }

    fn walk(&self) -> Result<Vec<String>, ScanError> {
        let mut walker = WalkBuilder::new(&self.root);
        walker
            .hidden(false)
            .git_ignore(true)
            .require_git(false)
            .max_depth(self.config.max_depth)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(|entry| {
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                !(is_dir
                    && entry.depth() > 0
                    && entry
                        .file_name()
                        .to_str()
                        .map(|name| EXCLUDED_DIRS.contains(&name))
                        .unwrap_or(false))
            });

        let mut files = Vec::new();
        for result in walker.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) if err.depth() == Some(0) => return Err(ScanError::Walk(err.to_string())),
                Err(err) => {
                    warn!(error = %err, "Failed to read directory entry");
                    continue;
                }
            };

            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }

            if files.len() >= self.config.max_files {
                warn!(
                    max_files = self.config.max_files,
                    "Reached file limit, stopping scan"
                );
                break;
            }

            if let Some(relative) = relative_path(&self.root, entry.path()) {
                files.push(relative);
            }
        }

        Ok(files)
    }

    fn read_manifest(&self, name: &str) -> Option<Value> {
        let path = self.root.join(name);
        let content = match self.fs.read_optional(&path) {
            Ok(content) => content?,
            Err(e) => {
                warn!(manifest = name, error = %e, "Failed to read manifest");
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(manifest = name, error = %e, "Ignoring manifest with invalid JSON");
                None
            }
        }
    }
}

/// `/`-separated path of `path` below `root`.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<&str> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn is_config_file(name: &str) -> bool {
    KNOWN_CONFIG_FILES.contains(&name) || name.contains(".config.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_scan_collects_sorted_relative_files() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "composer.json", r#"{"require":{"laravel/framework":"^11.0"}}"#);
        write(temp.path(), "artisan", "#!/usr/bin/env php");
        write(temp.path(), "app/Models/User.php", "<?php");
        write(temp.path(), "vite.config.js", "export default {}");

        let ctx = ProjectScanner::new(temp.path()).unwrap().scan().unwrap();

        assert_eq!(
            ctx.files,
            vec!["app/Models/User.php", "artisan", "composer.json", "vite.config.js"]
        );
        assert_eq!(ctx.config_files, vec!["vite.config.js"]);
        assert!(ctx.has_composer_dependency("laravel/framework"));
        assert!(ctx.package_json.is_none());
    }

    #[test]
    fn test_scan_skips_dependency_directories() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "package.json", "{}");
        write(temp.path(), "node_modules/vue/package.json", "{}");
        write(temp.path(), "vendor/laravel/framework/composer.json", "{}");
        write(temp.path(), ".nuxt/app.js", "");
        write(temp.path(), "src/build.ts", "");

        let ctx = ProjectScanner::new(temp.path()).unwrap().scan().unwrap();
        assert_eq!(ctx.files, vec!["package.json", "src/build.ts"]);
    }

    #[test]
    fn test_scan_respects_gitignore_and_keeps_hidden_files() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), ".gitignore", "generated/\n");
        write(temp.path(), ".eslintrc.json", "{}");
        write(temp.path(), "generated/out.js", "");

        let ctx = ProjectScanner::new(temp.path()).unwrap().scan().unwrap();
        assert_eq!(ctx.files, vec![".eslintrc.json", ".gitignore"]);
        assert_eq!(ctx.config_files, vec![".eslintrc.json"]);
    }

    #[test]
    fn test_invalid_manifest_is_absent() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "package.json", "{ not json");

        let ctx = ProjectScanner::new(temp.path()).unwrap().scan().unwrap();
        assert!(ctx.package_json.is_none());
        assert!(ctx.has_file("package.json"));
    }

    #[test]
    fn test_max_files_limit() {
        let temp = TempDir::new().unwrap();
        for i in 0..5 {
            write(temp.path(), &format!("file{}.php", i), "<?php");
        }

        let ctx = ProjectScanner::new(temp.path())
            .unwrap()
            .with_config(ScanConfig {
                max_files: 3,
                ..Default::default()
            })
            .scan()
            .unwrap();
        assert_eq!(ctx.files.len(), 3);
    }

    #[test]
    fn test_missing_root() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        assert!(matches!(
            ProjectScanner::new(&missing),
            Err(ScanError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_file_root_is_rejected() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "composer.json", "{}");
        assert!(matches!(
            ProjectScanner::new(temp.path().join("composer.json")),
            Err(ScanError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_config_file_recognition() {
        assert!(is_config_file("tailwind.config.ts"));
        assert!(is_config_file("phpstan.neon.dist"));
        assert!(!is_config_file("config.php"));
    }
}
