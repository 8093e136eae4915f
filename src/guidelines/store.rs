//! Guideline body lookup

use crate::error::GuidelineError;
use crate::fs::{FileSystem, RealFileSystem};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Resolves a logical guideline path such as `laravel/guidelines/framework.md`
/// to its Markdown body.
#[cfg_attr(test, mockall::automock)]
pub trait DocumentStore: Send + Sync {
    fn load(&self, path: &str) -> Result<String, GuidelineError>;

    fn contains(&self, path: &str) -> bool {
        self.load(path).is_ok()
    }
}

const EMBEDDED_DOCUMENTS: &[(&str, &str)] = &[
    ("filament/guidelines/3/features.md", include_str!("../../guidelines/filament/guidelines/3/features.md")),
    ("filament/guidelines/tool.md", include_str!("../../guidelines/filament/guidelines/tool.md")),
    ("inertia/guidelines/2/features.md", include_str!("../../guidelines/inertia/guidelines/2/features.md")),
    ("inertia/guidelines/tool.md", include_str!("../../guidelines/inertia/guidelines/tool.md")),
    ("javascript/guidelines/language.md", include_str!("../../guidelines/javascript/guidelines/language.md")),
    ("laravel/guidelines/11/features.md", include_str!("../../guidelines/laravel/guidelines/11/features.md")),
    ("laravel/guidelines/12/features.md", include_str!("../../guidelines/laravel/guidelines/12/features.md")),
    ("laravel/guidelines/framework.md", include_str!("../../guidelines/laravel/guidelines/framework.md")),
    ("livewire/guidelines/3/features.md", include_str!("../../guidelines/livewire/guidelines/3/features.md")),
    ("livewire/guidelines/tool.md", include_str!("../../guidelines/livewire/guidelines/tool.md")),
    ("nextjs/guidelines/15/features.md", include_str!("../../guidelines/nextjs/guidelines/15/features.md")),
    ("nextjs/guidelines/framework.md", include_str!("../../guidelines/nextjs/guidelines/framework.md")),
    ("nuxt/guidelines/3/features.md", include_str!("../../guidelines/nuxt/guidelines/3/features.md")),
    ("nuxt/guidelines/framework.md", include_str!("../../guidelines/nuxt/guidelines/framework.md")),
    ("pest/guidelines/3/features.md", include_str!("../../guidelines/pest/guidelines/3/features.md")),
    ("pest/guidelines/tool.md", include_str!("../../guidelines/pest/guidelines/tool.md")),
    ("php/guidelines/8/features.md", include_str!("../../guidelines/php/guidelines/8/features.md")),
    ("php/guidelines/language.md", include_str!("../../guidelines/php/guidelines/language.md")),
    ("react/guidelines/18/features.md", include_str!("../../guidelines/react/guidelines/18/features.md")),
    ("react/guidelines/19/features.md", include_str!("../../guidelines/react/guidelines/19/features.md")),
    ("react/guidelines/framework.md", include_str!("../../guidelines/react/guidelines/framework.md")),
    ("statamic/guidelines/5/features.md", include_str!("../../guidelines/statamic/guidelines/5/features.md")),
    ("statamic/guidelines/framework.md", include_str!("../../guidelines/statamic/guidelines/framework.md")),
    ("tailwind/guidelines/3/features.md", include_str!("../../guidelines/tailwind/guidelines/3/features.md")),
    ("tailwind/guidelines/4/features.md", include_str!("../../guidelines/tailwind/guidelines/4/features.md")),
    ("tailwind/guidelines/css-framework.md", include_str!("../../guidelines/tailwind/guidelines/css-framework.md")),
    ("typescript/guidelines/5/features.md", include_str!("../../guidelines/typescript/guidelines/5/features.md")),
    ("typescript/guidelines/language.md", include_str!("../../guidelines/typescript/guidelines/language.md")),
    ("vue/guidelines/3/features.md", include_str!("../../guidelines/vue/guidelines/3/features.md")),
    ("vue/guidelines/framework.md", include_str!("../../guidelines/vue/guidelines/framework.md")),
];

/// Guideline bodies compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedDocumentStore;

impl EmbeddedDocumentStore {
    pub fn new() -> Self {
        Self
    }

    pub fn paths(&self) -> impl Iterator<Item = &'static str> {
        EMBEDDED_DOCUMENTS.iter().map(|(path, _)| *path)
    }
}

impl DocumentStore for EmbeddedDocumentStore {
    fn load(&self, path: &str) -> Result<String, GuidelineError> {
        EMBEDDED_DOCUMENTS
            .iter()
            .find(|(candidate, _)| *candidate == path)
            .map(|(_, body)| body.to_string())
            .ok_or_else(|| GuidelineError::NotFound {
                path: path.to_string(),
            })
    }

    fn contains(&self, path: &str) -> bool {
        EMBEDDED_DOCUMENTS.iter().any(|(candidate, _)| *candidate == path)
    }
}

/// Guideline bodies read from a directory laid out like the bundled set
pub struct FsDocumentStore {
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl FsDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_fs(root, Arc::new(RealFileSystem::new()))
    }

    pub fn with_fs(root: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            root: root.into(),
            fs,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, GuidelineError> {
        let relative = Path::new(path);
        let escapes = relative.components().any(|c| {
            !matches!(c, std::path::Component::Normal(_) | std::path::Component::CurDir)
        });
        if escapes {
            return Err(GuidelineError::NotFound {
                path: path.to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

impl DocumentStore for FsDocumentStore {
    fn load(&self, path: &str) -> Result<String, GuidelineError> {
        let full = self.resolve(path)?;
        if !self.fs.is_file(&full) {
            return Err(GuidelineError::NotFound {
                path: path.to_string(),
            });
        }
        self.fs
            .read_to_string(&full)
            .map_err(|e| GuidelineError::Io {
                path: path.to_string(),
                message: e.to_string(),
            })
    }

    fn contains(&self, path: &str) -> bool {
        self.resolve(path)
            .map(|full| self.fs.is_file(&full))
            .unwrap_or(false)
    }
}
