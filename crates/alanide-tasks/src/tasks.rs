//! Task list construction
//!
//! Builds the tasks the host offers for an Alan project: fetch, build and
//! generate-migration everywhere, plus package when the active file is a
//! deployment `connections.alan`. Development roots (marked by
//! `project.json`) get bootstrap/build/test script tasks instead.

use std::path::{Path, PathBuf};

use crate::shell::Shell;

/// Host-side grouping of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskGroup {
    Build,
    Clean,
    Test,
}

/// What executing a task means
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    /// A ready shell command line
    Shell(String),
    /// Deferred to a named command handler (needs user input first)
    Deferred(&'static str),
}

/// One entry in the task list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub name: String,
    pub command: TaskCommand,
    pub cwd: PathBuf,
    pub group: TaskGroup,
}

/// File whose presence adds the package task
pub const DEPLOYMENT_FILE: &str = "connections.alan";

/// Tasks for a regular Alan project root
pub fn alan_tasks(shell: &Shell, alan_root: &Path, active_file: &Path) -> Vec<Task> {
    let file_dir = active_file
        .parent()
        .unwrap_or(alan_root)
        .to_path_buf();
    let alan = shell.to_shell_path(&alan_root.join("alan").to_string_lossy());

    let mut tasks = vec![
        Task {
            name: "fetch".into(),
            command: TaskCommand::Shell(format!("{alan} fetch")),
            cwd: file_dir.clone(),
            group: TaskGroup::Clean,
        },
        Task {
            name: "build".into(),
            command: TaskCommand::Shell(format!("{alan} build")),
            cwd: file_dir.clone(),
            group: TaskGroup::Build,
        },
        Task {
            name: "generate migration".into(),
            command: TaskCommand::Deferred("generate-migration"),
            cwd: file_dir.clone(),
            group: TaskGroup::Clean,
        },
    ];

    if active_file.file_name().map(|n| n.to_string_lossy()) == Some(DEPLOYMENT_FILE.into()) {
        let file_dir_shell = shell.to_shell_path(&file_dir.to_string_lossy());
        tasks.push(Task {
            name: "package".into(),
            command: TaskCommand::Shell(format!(
                "./alan package ./dist/project.pkg {file_dir_shell}"
            )),
            cwd: alan_root.to_path_buf(),
            group: TaskGroup::Build,
        });
    }

    tasks
}

/// Tasks for a development root (marked by `project.json`)
pub fn dev_tasks(shell: &Shell, dev_root: &Path) -> Vec<Task> {
    let script = |name: &str| shell.to_shell_path(&dev_root.join(name).to_string_lossy());
    vec![
        Task {
            name: "fetch".into(),
            command: TaskCommand::Shell(script("bootstrap.sh")),
            cwd: dev_root.to_path_buf(),
            group: TaskGroup::Clean,
        },
        Task {
            name: "build".into(),
            command: TaskCommand::Shell(script("build.sh")),
            cwd: dev_root.to_path_buf(),
            group: TaskGroup::Build,
        },
        Task {
            name: "test".into(),
            command: TaskCommand::Shell(script("test.sh")),
            cwd: dev_root.to_path_buf(),
            group: TaskGroup::Test,
        },
    ]
}
