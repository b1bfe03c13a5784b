#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod components;
pub mod config;
pub mod controller;
pub mod error;
pub mod file_handler;
pub mod panels;
pub mod photo_store;
pub mod session;
pub mod thumbnail;

pub use app::{APP_TITLE, PlaceGuessApp, Preferences};
pub use canvas::{CanvasConfig, CanvasTool, CanvasWidget, FreeDrawCanvas, SketchCanvas};
pub use config::{CanvasKind, GameConfig};
pub use controller::{Notice, NoticeLevel, PageController, PageState, UploadReport};
pub use file_handler::{FileHandler, IncomingFile};
pub use photo_store::{PhotoId, PhotoStore};
pub use session::SessionContext;
