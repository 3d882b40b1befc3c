use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::TranslateError;

/// Captured result of a finished subprocess
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs an external program to completion
#[async_trait::async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
        cancel: CancellationToken,
    ) -> Result<CommandOutput, TranslateError>;
}

/// Spawns real processes. Arguments go straight to the program, no shell involved.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait::async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
        cancel: CancellationToken,
    ) -> Result<CommandOutput, TranslateError> {
        tracing::debug!("Spawning {} with {} args", program, args.len());

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the wait future below must not leave the process behind
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| TranslateError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let output = tokio::select! {
            output = child.wait_with_output() => output.map_err(|source| TranslateError::Spawn {
                program: program.to_string(),
                source,
            })?,
            _ = tokio::time::sleep(timeout) => {
                tracing::info!("{} did not finish within {:?}, killing it", program, timeout);
                return Err(TranslateError::Timeout(timeout));
            }
            _ = cancel.cancelled() => {
                tracing::debug!("{} cancelled", program);
                return Err(TranslateError::Cancelled);
            }
        };

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[tokio::test]
    async fn test_captures_stdout_and_exit_code() {
        let output = ProcessRunner
            .run(
                "sh",
                &sh("printf 'bonjour\\n'"),
                Duration::from_secs(5),
                CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(output.success());
        assert_eq!(output.stdout, "bonjour\n");
        assert!(output.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_not_an_error() {
        let output = ProcessRunner
            .run(
                "sh",
                &sh("echo boom >&2; exit 3"),
                Duration::from_secs(5),
                CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(output.code, Some(3));
        assert_eq!(output.stderr.trim(), "boom");
    }

    #[tokio::test]
    async fn test_arguments_are_not_shell_expanded() {
        let args = vec![
            "-c".to_string(),
            "printf '%s' \"$1\"".to_string(),
            "sh".to_string(),
            "$(echo injected); ls".to_string(),
        ];
        let output = ProcessRunner
            .run("sh", &args, Duration::from_secs(5), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(output.stdout, "$(echo injected); ls");
    }

    #[tokio::test]
    async fn test_missing_program() {
        let result = ProcessRunner
            .run(
                "klaro-definitely-not-installed",
                &[],
                Duration::from_secs(5),
                CancellationToken::new(),
            )
            .await;

        assert!(matches!(result, Err(TranslateError::Spawn { .. })));
    }

    #[tokio::test]
    async fn test_timeout() {
        let start = std::time::Instant::now();
        let result = ProcessRunner
            .run(
                "sh",
                &sh("sleep 10"),
                Duration::from_millis(100),
                CancellationToken::new(),
            )
            .await;

        assert!(matches!(result, Err(TranslateError::Timeout(_))));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_cancel() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let result = ProcessRunner
            .run("sh", &sh("sleep 10"), Duration::from_secs(30), cancel)
            .await;

        assert!(matches!(result, Err(TranslateError::Cancelled)));
    }
}
