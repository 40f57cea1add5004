//! SketchField Core Library
//!
//! Interaction and history controller for a freehand sketch surface: pluggable
//! drawing tools, change tracking, bounded undo/redo and resize handling.

pub mod canvas;
pub mod config;
pub mod error;
pub mod history;
pub mod input;
pub mod object;
pub mod resize;
pub mod shapes;
pub mod sketch;
pub mod surface;
pub mod tools;
pub mod tracker;

pub use canvas::{Canvas, CanvasExport, DEFAULT_SIZE};
pub use config::SketchConfig;
pub use error::{SketchError, SketchResult};
pub use history::{HistoryEntry, HistoryStore, DEFAULT_UNDO_STEPS};
pub use input::{Modifiers, MouseButton, PointerEvent, PointerInput};
pub use object::{CanvasObject, ObjectId, ObjectState, Placement, Snapshot};
pub use resize::ResizeCoordinator;
pub use sketch::{SketchField, PASTE_OFFSET};
pub use surface::{BackgroundImage, Surface, SurfaceEvent};
pub use tools::{Tool, ToolKind, ToolManager, ToolOptions};
pub use tracker::{ChangeTracker, Detached, Replay};
