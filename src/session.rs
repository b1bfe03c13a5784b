use std::collections::HashSet;

use crate::photo_store::PhotoId;

/// One-shot export request.
///
/// `take` clears the request in the same call that observes it, so a request
/// can drive at most one export cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExportRequest {
    pending: bool,
}

impl ExportRequest {
    pub fn request(&mut self) {
        self.pending = true;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the request, returning whether one was pending
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

/// Filenames already handled during the current upload batch
#[derive(Debug, Default, Clone)]
pub struct UploadBookkeeping {
    saved: HashSet<String>,
    /// Names the store refused outright; writing them again cannot succeed
    rejected: HashSet<String>,
}

impl UploadBookkeeping {
    pub fn is_saved(&self, name: &str) -> bool {
        self.saved.contains(name)
    }

    pub fn mark_saved(&mut self, name: &str) {
        self.saved.insert(name.to_owned());
    }

    pub fn is_rejected(&self, name: &str) -> bool {
        self.rejected.contains(name)
    }

    pub fn mark_rejected(&mut self, name: &str) {
        self.rejected.insert(name.to_owned());
    }

    /// Forget the batch. Called when the upload selection changes.
    pub fn reset(&mut self) {
        self.saved.clear();
        self.rejected.clear();
    }

    pub fn len(&self) -> usize {
        self.saved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }
}

/// Per-window state of one game session.
///
/// Owned by the page controller and passed around explicitly; nothing here is
/// shared between windows.
#[derive(Debug, Default, Clone)]
pub struct SessionContext {
    /// The photo being drawn. Unset means the selection step is shown.
    pub selected_photo: Option<PhotoId>,
    pub export: ExportRequest,
    pub saved_uploads: UploadBookkeeping,
    /// Bumped whenever a fresh drawing round starts
    round: u64,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, photo: PhotoId) {
        self.selected_photo = Some(photo);
    }

    /// Clear the selection, returning what was selected
    pub fn clear_selection(&mut self) -> Option<PhotoId> {
        self.selected_photo.take()
    }

    pub fn is_selected(&self, photo: &str) -> bool {
        self.selected_photo.as_deref() == Some(photo)
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn start_round(&mut self) -> u64 {
        self.round += 1;
        self.export = ExportRequest::default();
        self.round
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_request_is_one_shot() {
        let mut request = ExportRequest::default();
        assert!(!request.take());

        request.request();
        request.request();
        assert!(request.is_pending());
        assert!(request.take());
        assert!(!request.take());
        assert!(!request.is_pending());
    }

    #[test]
    fn test_bookkeeping_reset() {
        let mut book = UploadBookkeeping::default();
        book.mark_saved("beach.jpg");
        book.mark_saved("beach.jpg");
        assert_eq!(book.len(), 1);
        assert!(book.is_saved("beach.jpg"));

        book.mark_rejected(" beach.jpg");
        assert!(book.is_rejected(" beach.jpg"));

        book.reset();
        assert!(book.is_empty());
        assert!(!book.is_rejected(" beach.jpg"));
    }

    #[test]
    fn test_selection() {
        let mut session = SessionContext::new();
        assert!(session.selected_photo.is_none());

        session.select("park.png".to_owned());
        assert!(session.is_selected("park.png"));
        assert!(!session.is_selected("beach.jpg"));

        assert_eq!(session.clear_selection().as_deref(), Some("park.png"));
        assert!(session.selected_photo.is_none());
    }

    #[test]
    fn test_new_round_drops_pending_export() {
        let mut session = SessionContext::new();
        session.export.request();
        assert_eq!(session.start_round(), 1);
        assert!(!session.export.is_pending());
    }
}
