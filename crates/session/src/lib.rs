//! Session core for solidview
//!
//! Tracks the shapes of one interactive viewer session and mediates between
//! a [`kernel::GeometryKernel`] and a [`PresentationShell`]:
//! - [`ShapeRecord`] / [`ShapeRegistry`] - handle-keyed shapes and their
//!   display attributes
//! - [`BoundingVolumeCalculator`] - adaptive two-pass bounding boxes
//! - [`SelectionController`] - neutral/face/edge/vertex selection
//! - [`TopologyEditor`] - in-place sub-shape substitution
//! - [`bulk`] - best-effort operations over every visible shape
//! - [`Session`] - owns all of the above for one session

pub mod bounds;
pub mod bulk;
pub mod editor;
pub mod error;
pub mod handle;
pub mod record;
pub mod registry;
pub mod selection;
pub mod session;
pub mod shell;

pub use bounds::BoundingVolumeCalculator;
pub use bulk::BulkReport;
pub use editor::TopologyEditor;
pub use error::SessionError;
pub use handle::{Handle, HandleAllocator};
pub use record::ShapeRecord;
pub use registry::ShapeRegistry;
pub use selection::{SelectionController, SelectionMode, SelectionSnapshot, SubElement};
pub use session::Session;
pub use shell::{PresentationShell, RecordingShell, ShellCall, ShellError};
