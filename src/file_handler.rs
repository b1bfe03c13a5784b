use std::path::{Path, PathBuf};
use std::sync::Arc;

use eframe::egui;

use crate::photo_store::{IMAGE_EXTENSIONS, is_supported_image};

/// A file chosen in the upload widget, not yet (or already) saved to the store
#[derive(Clone, Debug, PartialEq)]
pub struct IncomingFile {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

impl IncomingFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// The upload widget's current file selection.
///
/// Files arrive by drag-and-drop or the native picker and stay staged until
/// removed. Any change to the selection raises a change notification that the
/// page uses to start a new upload batch.
#[derive(Default)]
pub struct FileHandler {
    staged: Vec<IncomingFile>,
    changed: bool,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[IncomingFile] {
        &self.staged
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Stage a file. A file with the same name replaces the staged one.
    /// Returns false (and logs) for unsupported types.
    pub fn stage(&mut self, file: IncomingFile) -> bool {
        if !is_supported_image(&file.name) {
            log::warn!("Dropped file is not a supported type: {}", file.name);
            return false;
        }

        log::info!("Staged {} ({} bytes)", file.name, file.bytes.len());
        match self.staged.iter_mut().find(|staged| staged.name == file.name) {
            Some(staged) => *staged = file,
            None => self.staged.push(file),
        }
        self.changed = true;
        true
    }

    /// Remove the staged file at `index`
    pub fn unstage(&mut self, index: usize) -> Option<IncomingFile> {
        if index >= self.staged.len() {
            return None;
        }
        self.changed = true;
        Some(self.staged.remove(index))
    }

    pub fn clear(&mut self) {
        if !self.staged.is_empty() {
            self.staged.clear();
            self.changed = true;
        }
    }

    /// Consume the change notification
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    /// Stage files dropped onto the window this frame.
    /// Returns the names that were rejected.
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> Vec<String> {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let mut rejected = Vec::new();

        for file in dropped {
            let name = dropped_file_name(&file);
            let bytes = match (&file.bytes, &file.path) {
                (Some(bytes), _) => Ok(bytes.clone()),
                (None, Some(path)) => std::fs::read(path).map(Arc::from),
                (None, None) => Err(std::io::Error::other("no data")),
            };

            match bytes {
                Ok(bytes) => {
                    if !self.stage(IncomingFile { name: name.clone(), bytes }) {
                        rejected.push(name);
                    }
                }
                Err(err) => {
                    log::error!("Failed to read dropped file {}: {}", name, err);
                    rejected.push(name);
                }
            }
        }

        rejected
    }

    /// Open the native picker and stage the chosen files.
    /// Returns the names that could not be staged.
    pub fn pick_files(&mut self) -> Vec<String> {
        let Some(paths) = rfd::FileDialog::new()
            .set_title("Upload photos")
            .add_filter("Images (JPG/PNG)", &IMAGE_EXTENSIONS)
            .pick_files()
        else {
            return Vec::new();
        };

        self.stage_paths(paths)
    }

    /// Read and stage files from disk. Returns the names that could not be staged.
    pub fn stage_paths(&mut self, paths: Vec<PathBuf>) -> Vec<String> {
        let mut rejected = Vec::new();
        for path in paths {
            let name = file_name_of(&path);
            match std::fs::read(&path) {
                Ok(bytes) => {
                    if !self.stage(IncomingFile::new(name.clone(), bytes)) {
                        rejected.push(name);
                    }
                }
                Err(err) => {
                    log::error!("Failed to read {}: {}", path.display(), err);
                    rejected.push(name);
                }
            }
        }
        rejected
    }

    /// Preview files being dragged over the application
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, FontId, Id, LayerId, Order};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let text = ctx.input(|i| {
            let mut text = "Drop photos to upload:\n".to_owned();
            for file in &i.raw.hovered_files {
                match &file.path {
                    Some(path) => text += &format!("\n{}", path.display()),
                    None if !file.mime.is_empty() => text += &format!("\n{}", file.mime),
                    None => text += "\n???",
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(20.0),
            Color32::WHITE,
        );
    }
}

fn dropped_file_name(file: &egui::DroppedFile) -> String {
    if !file.name.is_empty() {
        file.name.clone()
    } else if let Some(path) = &file.path {
        file_name_of(path)
    } else {
        "unknown".to_owned()
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_rejects_unsupported() {
        let mut handler = FileHandler::new();
        assert!(!handler.stage(IncomingFile::new("notes.txt", vec![1u8])));
        assert!(!handler.take_changed());

        assert!(handler.stage(IncomingFile::new("beach.jpg", vec![1u8])));
        assert!(handler.take_changed());
        assert!(!handler.take_changed());
    }

    #[test]
    fn test_restaging_same_name_replaces_bytes() {
        let mut handler = FileHandler::new();
        handler.stage(IncomingFile::new("beach.jpg", vec![1u8]));
        handler.stage(IncomingFile::new("park.png", vec![2u8]));
        handler.take_changed();

        assert!(handler.stage(IncomingFile::new("beach.jpg", vec![3u8])));
        assert!(handler.take_changed());
        assert_eq!(handler.files().len(), 2);
        assert_eq!(handler.files()[0].name, "beach.jpg");
        assert_eq!(&*handler.files()[0].bytes, &[3u8]);
    }

    #[test]
    fn test_unstage_and_clear_notify() {
        let mut handler = FileHandler::new();
        handler.stage(IncomingFile::new("a.png", vec![1u8]));
        handler.stage(IncomingFile::new("b.png", vec![2u8]));
        handler.take_changed();

        assert!(handler.unstage(5).is_none());
        assert!(!handler.take_changed());

        assert_eq!(handler.unstage(0).unwrap().name, "a.png");
        assert!(handler.take_changed());

        handler.clear();
        assert!(handler.is_empty());
        assert!(handler.take_changed());

        handler.clear();
        assert!(!handler.take_changed());
    }

    #[test]
    fn test_stage_paths_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("park.png");
        std::fs::write(&photo, b"png").unwrap();

        let mut handler = FileHandler::new();
        let rejected = handler.stage_paths(vec![photo, dir.path().join("missing.jpg")]);

        assert_eq!(rejected, vec!["missing.jpg".to_owned()]);
        assert_eq!(handler.files()[0].name, "park.png");
    }

    #[test]
    fn test_dropped_name_falls_back_to_path() {
        let file = egui::DroppedFile {
            path: Some(PathBuf::from("/tmp/trip/lake.jpeg")),
            ..Default::default()
        };
        assert_eq!(dropped_file_name(&file), "lake.jpeg");
    }
}
