use std::time::Duration;

use async_trait::async_trait;
use klaro_config::translator::TranslatorConfig;
use klaro_types::{Language, LanguagePair};
use tokio_util::sync::CancellationToken;

use crate::listing::parse_listing;
use crate::runner::{CommandOutput, CommandRunner, ProcessRunner};
use crate::{ProviderMetadata, TranslateError, Translation, Translator};

/// translate-shell (`trans`) driven as a subprocess
pub struct TransShell<R = ProcessRunner> {
    runner: R,
    program: String,
    list_flag: String,
    brief_flag: String,
    timeout: Duration,
}

impl TransShell<ProcessRunner> {
    pub fn new(config: &TranslatorConfig) -> Self {
        Self::with_runner(config, ProcessRunner)
    }
}

impl<R: CommandRunner> TransShell<R> {
    pub fn with_runner(config: &TranslatorConfig, runner: R) -> Self {
        Self {
            runner,
            program: config.program.clone(),
            list_flag: config.list_flag.clone(),
            brief_flag: config.brief_flag.clone(),
            timeout: config.timeout(),
        }
    }

    /// Options first, then `--` so text starting with `-` is never read as a flag
    fn translate_args(&self, text: &str, pair: &LanguagePair) -> Vec<String> {
        vec![
            self.brief_flag.clone(),
            pair.to_arg(),
            "--".to_string(),
            text.to_string(),
        ]
    }

    fn check(&self, output: CommandOutput) -> Result<String, TranslateError> {
        if output.success() {
            Ok(output.stdout)
        } else {
            tracing::debug!(
                "{} exited with {:?}: {}",
                self.program,
                output.code,
                output.stderr.trim()
            );
            Err(TranslateError::ExternalTool {
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            })
        }
    }
}

#[async_trait]
impl<R: CommandRunner> Translator for TransShell<R> {
    async fn translate(
        &self,
        text: &str,
        pair: &LanguagePair,
        cancel: CancellationToken,
    ) -> Result<Translation, TranslateError> {
        let args = self.translate_args(text, pair);
        tracing::info!("Translating {} chars ({})", text.chars().count(), args[1]);

        let output = self
            .runner
            .run(&self.program, &args, self.timeout, cancel)
            .await?;
        let stdout = self.check(output)?;

        Ok(Translation {
            text: stdout.trim().to_string(),
            pair: pair.clone(),
            provider: self.program.clone(),
        })
    }

    async fn list_languages(
        &self,
        cancel: CancellationToken,
    ) -> Result<Vec<Language>, TranslateError> {
        let args = vec![self.list_flag.clone()];
        let output = self
            .runner
            .run(&self.program, &args, self.timeout, cancel)
            .await?;
        let stdout = self.check(output)?;

        let languages = parse_listing(&stdout);
        tracing::debug!(
            "Parsed {} languages from {} listing lines",
            languages.len(),
            stdout.lines().count()
        );
        Ok(languages)
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "translate-shell".to_string(),
            program: self.program.clone(),
        }
    }
}
