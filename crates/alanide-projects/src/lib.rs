//! Project discovery for Alan workspaces
//!
//! Walks workspace folders looking for marker files and classifies each
//! matching directory into a project kind. Discovery is a pure filesystem
//! read; it never spawns anything.

pub mod discovery;
pub mod registry;

pub use discovery::{discover, discover_folder, MarkerKind};
pub use registry::{Project, ProjectKind, ProjectRegistry};
