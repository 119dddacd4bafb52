//! Command runner
//!
//! Runs one shell command, streaming cleaned output to the host as it
//! arrives and publishing parsed diagnostics once the process has exited.
//! Diagnostics are cleared before the run starts and replaced in a single
//! publish afterwards; they are never patched incrementally.

use std::path::Path;
use std::process::Stdio;
use std::sync::Mutex;

use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use alanide_core::{DiagnosticsSink, OutputSink, Settings};

use crate::diagnostics::parse_output;
use crate::error::{Result, TaskError};
use crate::shell::{strip_ansi, Shell};

async fn drain(
    mut reader: impl AsyncReadExt + Unpin,
    shell: &Shell,
    output: &dyn OutputSink,
    acc: &Mutex<String>,
) {
    let mut buf = [0u8; 4096];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                let chunk = String::from_utf8_lossy(&buf[..n]);
                let cleaned = strip_ansi(&shell.from_output_path(&chunk));
                output.append(&cleaned);
                if let Ok(mut acc) = acc.lock() {
                    acc.push_str(&cleaned);
                }
            }
        }
    }
}

/// Run `shell -c command_line` in `cwd`
///
/// Output is appended to `output` incrementally; on process exit the
/// accumulated output is parsed and published to `diagnostics` in one call.
/// Returns the process exit code.
pub async fn run(
    command_line: &str,
    cwd: &Path,
    shell: &Shell,
    settings: &Settings,
    output: &dyn OutputSink,
    diagnostics: &dyn DiagnosticsSink,
) -> Result<i32> {
    output.clear();
    if settings.show_task_output {
        output.reveal();
    }
    diagnostics.clear();

    output.append_line(&format!(
        "> Running '{}' in '{}'",
        command_line,
        cwd.display()
    ));
    debug!(command = %command_line, cwd = %cwd.display(), shell = %shell.path(), "Spawning task");

    let mut child = Command::new(shell.path())
        .arg("-c")
        .arg(command_line)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            warn!(command = %command_line, error = %e, "Failed to spawn task");
            output.append_line(&format!("Failure executing command '{}'.", command_line));
            TaskError::SpawnFailed {
                command: command_line.to_string(),
                source: e,
            }
        })?;

    let acc = Mutex::new(String::new());
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    tokio::join!(
        async {
            if let Some(out) = stdout {
                drain(out, shell, output, &acc).await;
            }
        },
        async {
            if let Some(err) = stderr {
                drain(err, shell, output, &acc).await;
            }
        },
    );

    let status = child.wait().await?;
    let accumulated = acc.into_inner().unwrap_or_default();
    let parsed = parse_output(&accumulated);
    info!(
        command = %command_line,
        exit = ?status.code(),
        diagnostics = parsed.iter().map(|f| f.diagnostics.len()).sum::<usize>(),
        "Task finished"
    );
    diagnostics.publish(parsed);

    Ok(status.code().unwrap_or(-1))
}
