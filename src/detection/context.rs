//! Read-only project snapshot handed to every module

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::PathBuf;

/// Snapshot of project metadata for one detection pass.
///
/// Paths in `files` and `config_files` are relative to `project_root` and use
/// `/` as separator regardless of platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionContext {
    pub project_root: PathBuf,
    pub files: Vec<String>,
    pub config_files: Vec<String>,
    pub package_json: Option<Value>,
    pub composer_json: Option<Value>,
    #[serde(default)]
    pub package_lock: Option<Value>,
    #[serde(default)]
    pub composer_lock: Option<Value>,
}

impl DetectionContext {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Default::default()
        }
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_config_files<I, S>(mut self, config_files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config_files = config_files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_package_json(mut self, package_json: Value) -> Self {
        self.package_json = Some(package_json);
        self
    }

    pub fn with_composer_json(mut self, composer_json: Value) -> Self {
        self.composer_json = Some(composer_json);
        self
    }

    pub fn with_package_lock(mut self, package_lock: Value) -> Self {
        self.package_lock = Some(package_lock);
        self
    }

    pub fn with_composer_lock(mut self, composer_lock: Value) -> Self {
        self.composer_lock = Some(composer_lock);
        self
    }

    pub fn has_file(&self, path: &str) -> bool {
        self.files.iter().any(|f| f == path)
    }

    pub fn has_any_file(&self, paths: &[&str]) -> bool {
        paths.iter().any(|p| self.has_file(p))
    }

    pub fn has_file_with_extension(&self, extensions: &[&str]) -> bool {
        self.files.iter().any(|f| {
            f.rsplit_once('.')
                .map(|(_, ext)| extensions.contains(&ext))
                .unwrap_or(false)
        })
    }

    /// True when some file lives under `prefix` (a directory path ending in `/`).
    pub fn has_path_prefix(&self, prefix: &str) -> bool {
        self.files.iter().any(|f| f.starts_with(prefix))
    }

    /// Matches a config file by exact name, or by `stem.*` when `name` ends in `.*`.
    pub fn has_config_file(&self, name: &str) -> bool {
        match name.strip_suffix(".*") {
            Some(stem) => self.config_files.iter().any(|c| {
                file_name(c)
                    .strip_prefix(stem)
                    .map(|rest| rest.starts_with('.'))
                    .unwrap_or(false)
            }),
            None => self.config_files.iter().any(|c| c == name || file_name(c) == name),
        }
    }

    /// Version constraint from package.json `dependencies`, then `devDependencies`.
    pub fn npm_dependency(&self, name: &str) -> Option<&str> {
        let package = self.package_json.as_ref()?;
        ["dependencies", "devDependencies"]
            .iter()
            .find_map(|section| package.get(section)?.get(name)?.as_str())
    }

    pub fn has_npm_dependency(&self, name: &str) -> bool {
        self.npm_dependency(name).is_some()
    }

    /// Version constraint from composer.json `require`, then `require-dev`.
    pub fn composer_dependency(&self, name: &str) -> Option<&str> {
        let composer = self.composer_json.as_ref()?;
        ["require", "require-dev"]
            .iter()
            .find_map(|section| composer.get(section)?.get(name)?.as_str())
    }

    pub fn has_composer_dependency(&self, name: &str) -> bool {
        self.composer_dependency(name).is_some()
    }

    /// Exact version pinned in package-lock.json, if present.
    pub fn npm_locked_version(&self, name: &str) -> Option<&str> {
        let lock = self.package_lock.as_ref()?;
        lock.get("packages")
            .and_then(|p| p.get(format!("node_modules/{}", name)))
            .and_then(|p| p.get("version"))
            .or_else(|| {
                lock.get("dependencies")
                    .and_then(|d| d.get(name))
                    .and_then(|d| d.get("version"))
            })
            .and_then(Value::as_str)
    }

    /// Exact version pinned in composer.lock, searching `packages` then `packages-dev`.
    pub fn composer_locked_version(&self, name: &str) -> Option<&str> {
        let lock = self.composer_lock.as_ref()?;
        ["packages", "packages-dev"].iter().find_map(|section| {
            lock.get(section)?
                .as_array()?
                .iter()
                .find(|pkg| pkg.get("name").and_then(Value::as_str) == Some(name))?
                .get("version")?
                .as_str()
        })
    }

    /// All declared dependency names, package.json first, in first-seen order.
    pub fn dependencies(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();

        let sections = [
            (self.package_json.as_ref(), "dependencies"),
            (self.package_json.as_ref(), "devDependencies"),
            (self.composer_json.as_ref(), "require"),
            (self.composer_json.as_ref(), "require-dev"),
        ];

        for (manifest, section) in sections {
            let Some(map) = manifest
                .and_then(|m| m.get(section))
                .and_then(Value::as_object)
            else {
                continue;
            };
            for name in map.keys() {
                if seen.insert(name.clone()) {
                    names.push(name.clone());
                }
            }
        }

        names
    }

    /// Package managers inferred from lock files and the `packageManager` field.
    pub fn package_managers(&self) -> Vec<String> {
        let mut managers: Vec<String> = Vec::new();

        if let Some(declared) = self
            .package_json
            .as_ref()
            .and_then(|p| p.get("packageManager"))
            .and_then(Value::as_str)
        {
            let name = declared.split('@').next().unwrap_or(declared);
            if matches!(name, "npm" | "yarn" | "pnpm" | "bun") {
                push_unique(&mut managers, name);
            }
        }

        let lock_files = [
            ("bun.lockb", "bun"),
            ("bun.lock", "bun"),
            ("pnpm-lock.yaml", "pnpm"),
            ("yarn.lock", "yarn"),
            ("package-lock.json", "npm"),
        ];
        for (file, manager) in lock_files {
            if self.has_file(file) {
                push_unique(&mut managers, manager);
            }
        }

        let has_js_manager = managers.iter().any(|m| m != "composer");
        if !has_js_manager && (self.package_json.is_some() || self.has_file("package.json")) {
            push_unique(&mut managers, "npm");
        }

        if self.composer_json.is_some() || self.has_any_file(&["composer.json", "composer.lock"]) {
            push_unique(&mut managers, "composer");
        }

        managers
    }
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|m| m == name) {
        list.push(name.to_string());
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
