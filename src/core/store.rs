//! On-disk cache of generated sources.
//!
//! One artifact per identifier at `<root>/<id>.<ext>`. Existence alone decides a
//! cache hit: artifacts are never invalidated, compared or deleted here.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Default artifact directory, relative to the working directory.
pub const DEFAULT_ROOT: &str = "generated";

#[derive(Clone, Debug)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl Default for ArtifactStore {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deterministic artifact path for `id`.
    ///
    /// `/` or `\` in the identifier nest the artifact in subdirectories
    /// (`math/add` maps to `<root>/math/add.<ext>`). Every segment must be a
    /// plain name, so absolute paths, `.`, `..` and empty segments are rejected.
    pub fn path_for(&self, id: &str, extension: &str) -> Result<PathBuf> {
        let mut segments: Vec<&str> = id.split(['/', '\\']).collect();
        let plain = |segment: &&str| {
            let mut components = Path::new(segment).components();
            matches!(
                (components.next(), components.next()),
                (Some(Component::Normal(_)), None)
            )
        };
        let name = match segments.pop() {
            Some(name) if plain(&name) && segments.iter().all(plain) => name,
            _ => {
                return Err(Error::Signature(format!(
                    "Identifier '{id}' cannot be used as an artifact file name"
                )));
            }
        };

        let mut path = self.root.clone();
        path.extend(segments);
        path.push(format!("{name}.{extension}"));
        Ok(path)
    }

    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    /// Write `code` to `path`, creating parent directories and overwriting
    /// any previous content.
    pub async fn persist(&self, path: &Path, code: &str) -> Result<PathBuf> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| Error::Persist {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::write(path, code)
            .await
            .map_err(|source| Error::Persist {
                path: path.to_path_buf(),
                source,
            })?;
        log::info!("Persisted generated code to {}", path.display());
        Ok(path.to_path_buf())
    }

    pub async fn read(&self, path: &Path) -> Result<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| Error::Read {
                path: path.to_path_buf(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_for_is_deterministic() {
        let store = ArtifactStore::default();
        let first = store.path_for("echo", "rhai").unwrap();
        let second = store.path_for("echo", "rhai").unwrap();
        assert_eq!(first, second);
        assert_eq!(first, Path::new("generated").join("echo.rhai"));
    }

    #[test]
    fn test_path_for_rejects_escaping_ids() {
        let store = ArtifactStore::default();
        assert!(store.path_for("", "rhai").is_err());
        assert!(store.path_for("../etc/passwd", "rhai").is_err());
        assert!(store.path_for("/abs", "rhai").is_err());
        assert!(store.path_for("math//add", "rhai").is_err());
        assert!(store.path_for("math/./add", "rhai").is_err());
        assert!(store.path_for("math/", "rhai").is_err());
        assert!(store.path_for("math\\..\\..\\add", "rhai").is_err());
    }

    #[tokio::test]
    async fn test_nested_identifier_maps_to_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let path = store.path_for("math/add", "rhai").unwrap();
        assert_eq!(path, dir.path().join("math").join("add.rhai"));

        store.persist(&path, "fn run(a, b) { a + b }").await.unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("math/add.rhai")).unwrap(),
            "fn run(a, b) { a + b }"
        );
    }

    #[tokio::test]
    async fn test_persist_creates_directories_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("nested").join("generated"));
        let path = store.path_for("echo", "rhai").unwrap();

        assert!(!store.exists(&path).await);
        store.persist(&path, "fn run(x) { x }").await.unwrap();
        assert!(store.exists(&path).await);

        store.persist(&path, "fn run(x) { x + 1 }").await.unwrap();
        assert_eq!(store.read(&path).await.unwrap(), "fn run(x) { x + 1 }");
    }
}
