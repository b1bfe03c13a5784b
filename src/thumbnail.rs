use std::collections::{HashMap, HashSet};
use std::time::SystemTime;

use egui::{ColorImage, Context, TextureHandle, TextureOptions};
use thiserror::Error;

use crate::error::StoreError;
use crate::photo_store::{PhotoId, PhotoStore};

/// Errors that can occur while producing a thumbnail
#[derive(Error, Debug)]
pub enum ThumbnailError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Decode image bytes and shrink them so the longest edge fits `max_edge`
pub fn decode_thumbnail(bytes: &[u8], max_edge: u32) -> Result<ColorImage, ThumbnailError> {
    let image = image::load_from_memory(bytes)?;
    let image = if image.width() > max_edge || image.height() > max_edge {
        image.thumbnail(max_edge, max_edge)
    } else {
        image
    };

    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

struct CachedTexture {
    handle: TextureHandle,
    modified: Option<SystemTime>,
    last_used: u64,
}

/// Photo textures keyed by photo id, reloaded when the file changes on disk
pub struct ThumbnailCache {
    textures: HashMap<PhotoId, CachedTexture>,
    /// Files that failed to decode, so the warning is logged once per version
    failed: HashSet<(PhotoId, Option<SystemTime>)>,
    max_edge: u32,
    max_entries: usize,
    current_frame: u64,
}

impl ThumbnailCache {
    pub fn new(max_edge: u32, max_entries: usize) -> Self {
        Self {
            textures: HashMap::new(),
            failed: HashSet::new(),
            max_edge,
            max_entries: max_entries.max(1),
            current_frame: 0,
        }
    }

    /// Should be called at the start of each frame
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
    }

    /// Texture for `id`, decoding it if needed. `None` when the photo cannot be shown.
    pub fn get_or_load(&mut self, ctx: &Context, store: &PhotoStore, id: &str) -> Option<TextureHandle> {
        let modified = store.modified(id).ok();

        if let Some(cached) = self.textures.get_mut(id) {
            if cached.modified == modified {
                cached.last_used = self.current_frame;
                return Some(cached.handle.clone());
            }
        }

        let key = (id.to_owned(), modified);
        if self.failed.contains(&key) {
            return None;
        }

        match self.load(store, id) {
            Ok(image) => {
                self.prune_if_needed();
                let handle = ctx.load_texture(format!("photo_{id}_{}", self.max_edge), image, TextureOptions::LINEAR);
                self.textures.insert(
                    id.to_owned(),
                    CachedTexture {
                        handle: handle.clone(),
                        modified,
                        last_used: self.current_frame,
                    },
                );
                Some(handle)
            }
            Err(err) => {
                log::warn!("Skipping thumbnail for {}: {}", id, err);
                self.textures.remove(id);
                self.failed.insert(key);
                None
            }
        }
    }

    fn load(&self, store: &PhotoStore, id: &str) -> Result<ColorImage, ThumbnailError> {
        let bytes = store.read(id)?;
        decode_thumbnail(&bytes, self.max_edge)
    }

    /// Drop textures of photos that are no longer listed
    pub fn retain(&mut self, photos: &[PhotoId]) {
        self.textures.retain(|id, _| photos.contains(id));
        self.failed.retain(|(id, _)| photos.contains(id));
    }

    fn prune_if_needed(&mut self) {
        if self.textures.len() < self.max_entries {
            return;
        }

        let mut entries: Vec<(PhotoId, u64)> = self
            .textures
            .iter()
            .map(|(id, cached)| (id.clone(), cached.last_used))
            .collect();
        entries.sort_by_key(|(_, frame)| *frame);

        let to_remove = self.textures.len() + 1 - self.max_entries;
        for (id, _) in entries.into_iter().take(to_remove) {
            self.textures.remove(&id);
        }
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn clear(&mut self) {
        self.textures.clear();
        self.failed.clear();
    }
}
