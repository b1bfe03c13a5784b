use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{StoreError, StoreResult};

/// File extensions accepted by the upload surface and shown in the gallery
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Identifier of a stored photo. The original filename doubles as the key.
pub type PhotoId = String;

/// Check whether a filename carries one of the recognized image extensions
pub fn is_supported_image(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// A flat directory of uploaded photos
#[derive(Debug, Clone)]
pub struct PhotoStore {
    dir: PathBuf,
}

impl PhotoStore {
    /// Open a store rooted at `dir`. The directory is created lazily on the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` under `filename`, replacing any previous photo of that name
    pub fn add(&self, filename: &str, bytes: &[u8]) -> StoreResult<PhotoId> {
        validate_name(filename)?;
        if !is_supported_image(filename) {
            return Err(StoreError::UnsupportedType(filename.to_owned()));
        }

        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        fs::write(&path, bytes)?;

        log::info!("Saved photo {} ({} bytes)", path.display(), bytes.len());
        Ok(filename.to_owned())
    }

    /// Stored photos in lexicographic order
    pub fn list(&self) -> StoreResult<Vec<PhotoId>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut photos: Vec<PhotoId> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| is_supported_image(name))
            .collect();

        photos.sort();
        Ok(photos)
    }

    pub fn contains(&self, id: &str) -> bool {
        validate_name(id).is_ok() && self.dir.join(id).is_file()
    }

    /// Load the bytes of a stored photo
    pub fn read(&self, id: &str) -> StoreResult<Vec<u8>> {
        let path = self.existing_path(id)?;
        Ok(fs::read(path)?)
    }

    /// Delete a stored photo
    pub fn remove(&self, id: &str) -> StoreResult<()> {
        let path = self.existing_path(id)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                log::info!("Removed photo {}", path.display());
                Ok(())
            }
            // Lost a race with another window
            Err(err) if err.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(id.to_owned())),
            Err(err) => Err(err.into()),
        }
    }

    /// Last modification time, used to notice overwritten photos
    pub fn modified(&self, id: &str) -> StoreResult<SystemTime> {
        let path = self.existing_path(id)?;
        Ok(fs::metadata(path)?.modified()?)
    }

    pub fn path_of(&self, id: &str) -> StoreResult<PathBuf> {
        validate_name(id)?;
        Ok(self.dir.join(id))
    }

    fn existing_path(&self, id: &str) -> StoreResult<PathBuf> {
        let path = self.path_of(id)?;
        if path.is_file() {
            Ok(path)
        } else {
            Err(StoreError::NotFound(id.to_owned()))
        }
    }
}

/// Filenames must be a single plain path component
fn validate_name(name: &str) -> StoreResult<()> {
    let trimmed = name.trim();
    let invalid = trimmed.is_empty()
        || trimmed != name
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);

    if invalid {
        Err(StoreError::InvalidName(name.to_owned()))
    } else {
        Ok(())
    }
}
