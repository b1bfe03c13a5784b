//! The page controller drives one game session.
//!
//! It owns the per-window [`SessionContext`], talks to the [`PhotoStore`] and
//! renders/exports through a [`CanvasWidget`]. The visible step is derived
//! after every action:
//!
//! - `AwaitingPhotos`: the store is empty
//! - `Browsing`: photos exist, none selected
//! - `Drawing`: a photo is selected and the canvas is shown
//!
//! Failures never abort the page; they are turned into [`Notice`]s that the UI
//! shows until dismissed.

use crate::canvas::{CanvasConfig, CanvasResponse, CanvasWidget, DrawingOutput, PendingDownload};
use crate::error::{ControllerError, StoreError};
use crate::file_handler::IncomingFile;
use crate::photo_store::{PhotoId, PhotoStore};
use crate::session::SessionContext;

/// The step the page is currently on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    AwaitingPhotos,
    Browsing,
    Drawing { photo: PhotoId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message shown to the players
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Outcome of saving the staged upload batch
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub saved: Vec<String>,
    /// Already written during this batch
    pub skipped: Vec<String>,
    /// Write errors worth retrying, with their messages
    pub failed: Vec<(String, String)>,
    /// Refused by the store; not retried within this batch
    pub rejected: Vec<(String, String)>,
}

impl UploadReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty() || !self.rejected.is_empty()
    }

    /// Some writes failed in a way another attempt could fix
    pub fn needs_retry(&self) -> bool {
        !self.failed.is_empty()
    }
}

pub struct PageController<C: CanvasWidget> {
    store: PhotoStore,
    session: SessionContext,
    canvas: C,
    canvas_config: CanvasConfig,
    photos: Vec<PhotoId>,
    download: Option<PendingDownload>,
    notices: Vec<Notice>,
}

impl<C: CanvasWidget> PageController<C> {
    pub fn new(store: PhotoStore, canvas: C, canvas_config: CanvasConfig) -> Self {
        let mut controller = Self {
            store,
            session: SessionContext::new(),
            canvas,
            canvas_config,
            photos: Vec::new(),
            download: None,
            notices: Vec::new(),
        };
        controller.refresh();
        controller
    }

    pub fn store(&self) -> &PhotoStore {
        &self.store
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Photos currently in the store, sorted by name
    pub fn photos(&self) -> &[PhotoId] {
        &self.photos
    }

    pub fn selected_photo(&self) -> Option<&str> {
        self.session.selected_photo.as_deref()
    }

    pub fn state(&self) -> PageState {
        match &self.session.selected_photo {
            Some(photo) => PageState::Drawing { photo: photo.clone() },
            None if self.photos.is_empty() => PageState::AwaitingPhotos,
            None => PageState::Browsing,
        }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn canvas_config(&self) -> &CanvasConfig {
        &self.canvas_config
    }

    pub fn canvas_config_mut(&mut self) -> &mut CanvasConfig {
        &mut self.canvas_config
    }

    /// Swap in a different canvas. The drawing in progress is discarded.
    pub fn replace_canvas(&mut self, canvas: C) {
        log::info!("Switching canvas from {} to {}", self.canvas.name(), canvas.name());
        self.canvas = canvas;
        self.download = None;
        self.session.start_round();
    }

    /// Re-list the store and drop a selection whose photo has disappeared
    pub fn refresh(&mut self) {
        match self.store.list() {
            Ok(photos) => self.photos = photos,
            Err(err) => {
                log::error!("Failed to list photos: {}", err);
                self.notify(NoticeLevel::Error, format!("Could not list photos: {err}"));
            }
        }

        let vanished = self
            .session
            .selected_photo
            .clone()
            .filter(|selected| !self.photos.contains(selected));

        if let Some(selected) = vanished {
            log::warn!("Selected photo {} disappeared from the store", selected);
            self.notify(NoticeLevel::Warning, format!("{selected} is no longer available"));
            self.session.clear_selection();
            self.download = None;
        }
    }

    /// The upload widget's selection changed: start a new batch
    pub fn upload_selection_changed(&mut self) {
        log::debug!("Upload selection changed, forgetting {} saved names", self.session.saved_uploads.len());
        self.session.saved_uploads.reset();
    }

    /// Save every staged file not yet written in this batch.
    ///
    /// Later files replace earlier photos of the same name; a name already
    /// saved in this batch is skipped. I/O failures are not recorded, so the
    /// next sync retries them. Names the store refuses are rejected once and
    /// left alone until the selection changes.
    pub fn sync_uploads(&mut self, files: &[IncomingFile]) -> UploadReport {
        let mut report = UploadReport::default();

        for file in files {
            if self.session.saved_uploads.is_rejected(&file.name) {
                continue;
            }
            if self.session.saved_uploads.is_saved(&file.name) {
                report.skipped.push(file.name.clone());
                continue;
            }

            match self.store.add(&file.name, &file.bytes) {
                Ok(_) => {
                    self.session.saved_uploads.mark_saved(&file.name);
                    report.saved.push(file.name.clone());
                }
                Err(err @ StoreError::Io(_)) => {
                    log::error!("Failed to save upload {}: {}", file.name, err);
                    self.notify(NoticeLevel::Error, format!("Could not save {}: {err}", file.name));
                    report.failed.push((file.name.clone(), err.to_string()));
                }
                Err(err) => {
                    log::warn!("Upload {} refused: {}", file.name, err);
                    self.notify(NoticeLevel::Warning, format!("{} was not added: {err}", file.name));
                    self.session.saved_uploads.mark_rejected(&file.name);
                    report.rejected.push((file.name.clone(), err.to_string()));
                }
            }
        }

        if !report.saved.is_empty() {
            self.refresh();
        }
        report
    }

    /// Choose the photo to draw and start a fresh round
    pub fn select(&mut self, photo: &str) -> Result<(), ControllerError> {
        if !self.photos.iter().any(|p| p == photo) {
            self.notify(NoticeLevel::Warning, format!("{photo} is not in the photo store"));
            return Err(StoreError::NotFound(photo.to_owned()).into());
        }

        log::info!("Selected {} for drawing", photo);
        self.session.select(photo.to_owned());
        self.start_round();
        Ok(())
    }

    /// Delete a photo, clearing the selection if it pointed at it
    pub fn remove(&mut self, photo: &str) -> Result<(), ControllerError> {
        let result = self.store.remove(photo);

        if self.session.is_selected(photo) {
            self.session.clear_selection();
            self.download = None;
        }

        if let Err(err) = &result {
            let level = match err {
                StoreError::NotFound(_) => NoticeLevel::Warning,
                _ => NoticeLevel::Error,
            };
            log::warn!("Failed to remove {}: {}", photo, err);
            self.notify(level, format!("Could not remove {photo}: {err}"));
        }

        self.refresh();
        result.map_err(ControllerError::from)
    }

    /// Give up on the current photo and go back to the gallery
    pub fn reset(&mut self) {
        if let Some(photo) = self.session.clear_selection() {
            log::info!("Reset selection (was {})", photo);
        }
        self.download = None;
        self.refresh();
    }

    /// Wipe the canvas and withdraw any pending download
    pub fn clear_drawing(&mut self) {
        self.start_round();
    }

    /// Ask for an export. The next export cycle runs it exactly once.
    pub fn request_export(&mut self) {
        self.session.export.request();
    }

    /// Run a pending export, if any. Returns whether the canvas was asked to export.
    pub fn run_export_cycle(&mut self) -> bool {
        if !self.session.export.take() {
            return false;
        }

        let output = self
            .canvas
            .export(&self.canvas_config)
            .and_then(DrawingOutput::from_export);

        match output {
            Ok(Some(output)) => {
                log::info!("Exported drawing with {} strokes ({} bytes)", output.stroke_count, output.png.len());
                self.download = Some(output.into());
            }
            Ok(None) => {
                log::info!("Canvas returned nothing to download yet");
                self.download = None;
            }
            Err(err) => {
                log::error!("Export from {} canvas failed: {}", self.canvas.name(), err);
                self.notify(NoticeLevel::Error, format!("Could not export the drawing: {err}"));
                self.download = None;
            }
        }
        true
    }

    /// Render the canvas, then service any export request
    pub fn show_canvas(&mut self, ui: &mut egui::Ui) -> CanvasResponse {
        let response = self.canvas.show(ui, &self.canvas_config);
        self.run_export_cycle();
        response
    }

    pub fn pending_download(&self) -> Option<&PendingDownload> {
        self.download.as_ref()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn dismiss_notice(&mut self, index: usize) {
        if index < self.notices.len() {
            self.notices.remove(index);
        }
    }

    pub fn dismiss_notices(&mut self) {
        self.notices.clear();
    }

    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        let notice = Notice {
            level,
            message: message.into(),
        };
        if !self.notices.contains(&notice) {
            self.notices.push(notice);
        }
    }

    fn start_round(&mut self) {
        self.canvas.clear();
        self.download = None;
        let round = self.session.start_round();
        log::debug!("Started drawing round {}", round);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::SketchCanvas;

    fn controller(dir: &std::path::Path) -> PageController<SketchCanvas> {
        let config = CanvasConfig { width: 20, height: 10, ..CanvasConfig::default() };
        PageController::new(PhotoStore::new(dir), SketchCanvas::new(), config)
    }

    #[test]
    fn test_starts_awaiting_photos() {
        let dir = tempfile::tempdir().unwrap();
        let controller = controller(dir.path());
        assert_eq!(controller.state(), PageState::AwaitingPhotos);
        assert!(controller.notices().is_empty());
    }

    #[test]
    fn test_select_unknown_photo_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = controller(dir.path());

        assert!(matches!(
            controller.select("ghost.png"),
            Err(ControllerError::Store(StoreError::NotFound(_)))
        ));
        assert_eq!(controller.state(), PageState::AwaitingPhotos);
        assert_eq!(controller.notices()[0].level, NoticeLevel::Warning);
    }

    #[test]
    fn test_export_runs_once_per_request() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = controller(dir.path());

        assert!(!controller.run_export_cycle());
        controller.request_export();
        assert!(controller.run_export_cycle());
        assert!(controller.pending_download().is_some());
        assert!(!controller.run_export_cycle());
    }

    #[test]
    fn test_photo_removed_elsewhere_clears_selection_on_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = controller(dir.path());
        controller.sync_uploads(&[IncomingFile::new("lake.png", vec![1u8])]);
        controller.select("lake.png").unwrap();

        std::fs::remove_file(dir.path().join("lake.png")).unwrap();
        controller.refresh();

        assert_eq!(controller.state(), PageState::AwaitingPhotos);
        assert_eq!(controller.notices().len(), 1);
    }

    #[test]
    fn test_duplicate_notices_are_collapsed() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = controller(dir.path());
        controller.notify(NoticeLevel::Info, "hello");
        controller.notify(NoticeLevel::Info, "hello");
        assert_eq!(controller.notices().len(), 1);

        controller.dismiss_notice(0);
        assert!(controller.notices().is_empty());
    }
}
