use crate::error::StemmnetError;
use log::info;
use std::io;
use std::path::{Path, PathBuf};

/// Creates `path` (and its parents) unless it already is a directory.
pub async fn ensure_dir_exists(path: &Path) -> Result<(), StemmnetError> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(StemmnetError::NotADirectory(path.to_path_buf()));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating directory: {}", path.display());
            tokio::fs::create_dir_all(path)
                .await
                .map_err(|e| StemmnetError::DirCreation(path.to_path_buf(), e))
        }
        Err(e) => Err(StemmnetError::DirCreation(path.to_path_buf(), e)),
    }
}

/// `path` resolved against the working directory, for messages shown to the
/// operator. Falls back to `path` as given if the working directory is gone.
pub fn absolute_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_ensure_dir_exists() -> Result<(), StemmnetError> {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("data").join("stations");

        ensure_dir_exists(&nested).await?;
        assert!(nested.is_dir());
        // Second call is a no-op.
        ensure_dir_exists(&nested).await?;

        let file = root.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(matches!(
            ensure_dir_exists(&file).await,
            Err(StemmnetError::NotADirectory(_))
        ));
        Ok(())
    }

    #[test]
    fn test_absolute_path_resolves_relative_dirs() {
        let resolved = absolute_path(Path::new("data"));
        assert!(resolved.is_absolute());
        assert_eq!(resolved, std::env::current_dir().unwrap().join("data"));

        let cwd = std::env::current_dir().unwrap();
        assert_eq!(absolute_path(&cwd), cwd);
    }
}
