//! Migration generation helpers
//!
//! Building the `generate_migration.sh` invocation needs three user inputs:
//! a migration name, a target model and a migration type. The interactive
//! flow runs through the host's [`UserInterface`]; the pieces are exposed
//! separately so they stay testable without a UI.

use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use alanide_core::UserInterface;

use crate::shell::Shell;

lazy_static! {
    // characters that are unsafe in a directory name on any supported platform
    static ref RE_UNSAFE: Regex = Regex::new(r#"[/\\?%*:|"<>\x00-\x1f]"#).unwrap();
}

/// Default migration name offered in the input box
pub const DEFAULT_MIGRATION_NAME: &str = "from_empty";

const MIGRATION_TYPE_BOOTSTRAP: &str = "initialization from empty dataset";
const MIGRATION_TYPE_MAPPING: &str = "mapping from target conformant dataset";

/// Strip filesystem-unsafe characters from a proposed migration name
pub fn sanitize_migration_name(raw: &str) -> String {
    RE_UNSAFE.replace_all(raw.trim(), "").into_owned()
}

/// Models eligible as migration targets: `systems/*/model.lib.link` entries
pub fn migration_model_choices(alan_root: &Path) -> Vec<String> {
    let systems = alan_root.join("systems");
    let mut choices: Vec<String> = match std::fs::read_dir(&systems) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().join("model.lib.link").is_file())
            .map(|e| format!("{}/model.lib.link", e.file_name().to_string_lossy()))
            .collect(),
        Err(_) => Vec::new(),
    };
    choices.sort();
    choices
}

/// The flag for a migration type choice
pub fn migration_type_flag(is_bootstrap: bool) -> &'static str {
    if is_bootstrap {
        "--bootstrap"
    } else {
        ""
    }
}

/// Interactively collect inputs and build the full migration command line
///
/// Returns `None` when the user dismisses any prompt.
pub async fn generate_migration_command(
    shell: &Shell,
    alan_root: &Path,
    ui: &dyn UserInterface,
) -> Option<String> {
    let name_raw = ui
        .input(
            "For example: <git commit id of 'from' model>",
            DEFAULT_MIGRATION_NAME,
        )
        .await?;
    let name = sanitize_migration_name(&name_raw);
    let name_path =
        shell.to_shell_path(&alan_root.join("migrations").join(&name).to_string_lossy());

    let models = migration_model_choices(alan_root);
    let model_idx = ui.pick(&models, "migration target model").await?;
    let model = models.get(model_idx)?;
    let model_path =
        shell.to_shell_path(&alan_root.join("systems").join(model).to_string_lossy());

    let types = vec![
        MIGRATION_TYPE_BOOTSTRAP.to_string(),
        MIGRATION_TYPE_MAPPING.to_string(),
    ];
    let type_idx = ui.pick(&types, "migration type").await?;
    let type_flag = migration_type_flag(type_idx == 0);

    let script = shell.to_shell_path(
        &alan_root
            .join(".alan/dataenv/system-types/datastore/scripts/generate_migration.sh")
            .to_string_lossy(),
    );
    let command = format!("{script} {name_path} {model_path} {type_flag}");
    debug!(command = %command, "Built migration command");
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::fs;
    use std::sync::Mutex;

    #[test]
    fn test_sanitize_strips_unsafe_characters() {
        assert_eq!(sanitize_migration_name("a/b\\c:d"), "abcd");
        assert_eq!(sanitize_migration_name("  from_2024  "), "from_2024");
        assert_eq!(sanitize_migration_name("x<y>|z?"), "xyz");
    }

    #[test]
    fn test_model_choices_require_link_file() {
        let dir = tempfile::tempdir().unwrap();
        let systems = dir.path().join("systems");
        fs::create_dir_all(systems.join("server")).unwrap();
        fs::create_dir_all(systems.join("client")).unwrap();
        fs::write(systems.join("server").join("model.lib.link"), "").unwrap();

        let choices = migration_model_choices(dir.path());
        assert_eq!(choices, vec!["server/model.lib.link".to_string()]);
    }

    #[test]
    fn test_model_choices_missing_systems_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(migration_model_choices(dir.path()).is_empty());
    }

    #[test]
    fn test_type_flag() {
        assert_eq!(migration_type_flag(true), "--bootstrap");
        assert_eq!(migration_type_flag(false), "");
    }

    struct ScriptedUi {
        inputs: Mutex<Vec<Option<String>>>,
        picks: Mutex<Vec<Option<usize>>>,
    }

    #[async_trait]
    impl UserInterface for ScriptedUi {
        async fn pick(&self, _items: &[String], _placeholder: &str) -> Option<usize> {
            self.picks.lock().unwrap().remove(0)
        }
        async fn input(&self, _prompt: &str, _default: &str) -> Option<String> {
            self.inputs.lock().unwrap().remove(0)
        }
        fn status_message(&self, _message: &str) {}
        fn error_message(&self, _message: &str) {}
    }

    #[tokio::test]
    async fn test_full_command_construction() {
        let dir = tempfile::tempdir().unwrap();
        let systems = dir.path().join("systems").join("server");
        fs::create_dir_all(&systems).unwrap();
        fs::write(systems.join("model.lib.link"), "").unwrap();

        let ui = ScriptedUi {
            inputs: Mutex::new(vec![Some("from_empty".into())]),
            picks: Mutex::new(vec![Some(0), Some(0)]),
        };
        let shell = Shell::new(crate::shell::DEFAULT_BASH);
        let command = generate_migration_command(&shell, dir.path(), &ui)
            .await
            .unwrap();

        assert!(command.contains("generate_migration.sh"));
        assert!(command.contains("migrations/from_empty"));
        assert!(command.contains("systems/server/model.lib.link"));
        assert!(command.ends_with("--bootstrap"));
    }

    #[tokio::test]
    async fn test_dismissed_prompt_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let ui = ScriptedUi {
            inputs: Mutex::new(vec![None]),
            picks: Mutex::new(vec![]),
        };
        let shell = Shell::new(crate::shell::DEFAULT_BASH);
        assert!(generate_migration_command(&shell, dir.path(), &ui)
            .await
            .is_none());
    }
}
