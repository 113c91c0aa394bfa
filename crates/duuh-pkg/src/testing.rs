//! Scripted executor and filesystem fixtures for tests

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use duuh_exec::result::render_command;
use duuh_exec::{CommandExecutor, CommandResult, ExecError};
use tempfile::TempDir;

use crate::traits::ManagerContext;

/// Answers commands by suffix match and records every call
#[derive(Default)]
pub struct ScriptedExecutor {
    responses: Vec<(String, i32, String)>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn respond(mut self, suffix: &str, status: i32, stdout: &str) -> Self {
        self.responses
            .push((suffix.to_string(), status, stdout.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandResult, ExecError> {
        let command = render_command(program, args);
        self.calls.lock().unwrap().push(command.clone());

        let (_, status, stdout) = self
            .responses
            .iter()
            .find(|(suffix, _, _)| command.ends_with(suffix.as_str()))
            .cloned()
            .unwrap_or_else(|| panic!("unexpected command: {command}"));

        Ok(CommandResult {
            command,
            status,
            stdout,
            stderr: if status == 0 {
                String::new()
            } else {
                "scripted failure".to_string()
            },
            duration: Duration::from_millis(1),
        })
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        _timeout: Duration,
    ) -> Result<CommandResult, ExecError> {
        self.run(program, args).await
    }

    fn executor_type(&self) -> &'static str {
        "scripted"
    }
}

/// Fake root filesystem containing the given marker paths
pub fn fake_root(markers: &[&str]) -> TempDir {
    let root = TempDir::new().unwrap();
    for marker in markers {
        let path = root.path().join(marker.trim_start_matches('/'));
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"").unwrap();
    }
    root
}

pub fn context(executor: &Arc<ScriptedExecutor>, root: &Path) -> ManagerContext {
    ManagerContext::new(executor.clone()).with_root(root)
}
