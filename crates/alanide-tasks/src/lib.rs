//! Task execution for Alan projects
//!
//! Resolves a bash-compatible shell, runs the external `alan` build/fetch/
//! package/migration scripts through it, streams their output to the host,
//! and turns their diagnostic lines into position-addressable diagnostics.
//!
//! The scripts themselves are opaque collaborators; only their textual
//! diagnostic-line conventions are part of this crate's contract.

pub mod diagnostics;
pub mod error;
pub mod migration;
pub mod roots;
pub mod runner;
pub mod shell;
pub mod tasks;

pub use diagnostics::parse_output;
pub use error::{Result, TaskError};
pub use migration::{
    generate_migration_command, migration_model_choices, migration_type_flag,
    sanitize_migration_name,
};
pub use roots::resolve_root;
pub use runner::run;
pub use shell::{resolve_shell, strip_ansi, Shell};
pub use tasks::{alan_tasks, dev_tasks, Task, TaskCommand, TaskGroup};
