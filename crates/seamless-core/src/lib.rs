//! Seamless Designer Core Library
//!
//! Platform-agnostic scene graph, transform engine and undo history for the
//! Seamless graphic design editor.

pub mod align;
pub mod config;
pub mod editor;
pub mod elements;
pub mod export;
pub mod geometry;
pub mod history;
pub mod patch;
pub mod pen;
pub mod selection;
pub mod shortcuts;
pub mod snap;
pub mod storage;
pub mod store;
pub mod template;
pub mod tools;
pub mod transform;
pub mod viewport;

pub use align::{AlignOp, DistributeAxis, align, distribute};
pub use config::EditorConfig;
pub use editor::{DrawItem, Editor, Interaction, ResolvedFill, TextEditRequest};
pub use elements::{Element, ElementId, ElementKind, MIN_ELEMENT_SIZE};
pub use export::{ExportError, ExportFormat, ExportSettings, ExportedImage, Rasterizer};
pub use geometry::{bounds, union_bounds};
pub use history::History;
pub use patch::{ElementPatch, NumericField, parse_numeric};
pub use pen::{PenEvent, PenState, PenTool};
pub use selection::Selection;
pub use shortcuts::{EditorCommand, KeyModifiers, ShortcutRegistry};
pub use snap::{GRID_SIZE, SnapLines, SnapSettings, snap_point};
pub use storage::{AutoSaveManager, Storage, StorageError, StorageResult};
pub use store::ElementStore;
pub use template::Template;
pub use tools::ToolKind;
pub use transform::{NodeTransform, bound_box, finalize_drag, finalize_transform};
pub use viewport::Viewport;
