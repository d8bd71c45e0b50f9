#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod config;
pub mod element;
pub mod error;
pub mod event;
pub mod export;
pub mod id_generator;
pub mod panels;
pub mod renderer;
pub mod session;
pub mod state;
pub mod store;
pub mod toast;
pub mod tools;
pub mod util;

pub use app::{APP_NAME, BuilderApp};
pub use command::{Command, CommandHistory};
pub use config::EditorConfig;
pub use element::{Element, ElementId, ElementKind, Position};
pub use event::{EditorEvent, HistoryStatus};
pub use renderer::Renderer;
pub use session::{Clock, EditorSession, ManualClock, SystemClock};
pub use state::{AutoSave, MemoryStorage, StorageBackend};
pub use store::ElementStore;
pub use tools::{DragDropCoordinator, DragOperation};
