//! Image asset directory
//!
//! Marker images are copied into one local folder and referenced from marker
//! records by base file name only. An image whose name is already present is
//! never overwritten.

use crate::{MarkerError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Folder holding the images referenced by marker records
#[derive(Debug, Clone)]
pub struct AssetDirectory {
    root: PathBuf,
}

impl AssetDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of a stored image
    pub fn path_of(&self, image: &str) -> PathBuf {
        self.root.join(image)
    }

    /// Copy `source` into the directory under its base file name.
    ///
    /// Returns the base name to store in the marker record. If a file with that
    /// name already exists in the directory the copy is skipped.
    pub fn import(&self, source: &Path) -> Result<String> {
        profiling::scope!("AssetDirectory::import");

        let name = source
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| MarkerError::InvalidImagePath(source.to_path_buf()))?
            .to_owned();

        let target = self.root.join(&name);
        if target.exists() {
            tracing::debug!(
                "Image {} already present in {}, not copying",
                name,
                self.root.display()
            );
            return Ok(name);
        }

        let copy = || -> std::io::Result<u64> {
            fs::create_dir_all(&self.root)?;
            fs::copy(source, &target)
        };
        match copy() {
            Ok(bytes) => {
                tracing::info!("Copied image {} ({} bytes)", target.display(), bytes);
                Ok(name)
            }
            Err(source_err) => Err(MarkerError::ImageCopy {
                path: source.to_path_buf(),
                source: source_err,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_copies_under_base_name() {
        let tmp = tempfile::tempdir().unwrap();
        let source_dir = tmp.path().join("photos");
        fs::create_dir_all(&source_dir).unwrap();
        let source = source_dir.join("tower.png");
        fs::write(&source, b"png-bytes").unwrap();

        let assets = AssetDirectory::new(tmp.path().join("images"));
        let name = assets.import(&source).unwrap();

        assert_eq!(name, "tower.png");
        assert_eq!(fs::read(assets.path_of("tower.png")).unwrap(), b"png-bytes");
    }

    #[test]
    fn test_import_keeps_existing_asset() {
        let tmp = tempfile::tempdir().unwrap();
        let assets = AssetDirectory::new(tmp.path().join("images"));
        fs::create_dir_all(assets.root()).unwrap();
        fs::write(assets.path_of("tower.png"), b"original").unwrap();

        let source = tmp.path().join("tower.png");
        fs::write(&source, b"replacement").unwrap();

        assert_eq!(assets.import(&source).unwrap(), "tower.png");
        assert_eq!(fs::read(assets.path_of("tower.png")).unwrap(), b"original");
    }

    #[test]
    fn test_import_missing_source_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let assets = AssetDirectory::new(tmp.path().join("images"));

        let err = assets.import(&tmp.path().join("nope.jpg")).unwrap_err();
        assert!(matches!(err, MarkerError::ImageCopy { .. }));
        assert!(!assets.path_of("nope.jpg").exists());
    }

    #[test]
    fn test_import_rejects_path_without_file_name() {
        let assets = AssetDirectory::new("images");
        let err = assets.import(Path::new("/")).unwrap_err();
        assert!(matches!(err, MarkerError::InvalidImagePath(_)));
    }
}
