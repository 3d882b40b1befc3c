use std::io::Write;

use anyhow::{Context, bail};
use kanal::{AsyncReceiver, AsyncSender};
use klaro_types::{AUTO_DETECT, AppEvent, ErrorKind, TranslationRequest};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};

use crate::cli::Command;

const SHELL_HELP: &str = "\
Type text to translate it. Commands:
  :from NAME        source language (\"Auto detect\" to let the tool guess)
  :to NAME          target language
  :swap             exchange source and target
  :english on|off   English or native language names
  :languages        list languages
  :refresh          reload the language list
  :copy             copy the last translation
  :prefs            show current selection
  :quit             leave (Ctrl+D works too)
Start a line with '::' to translate text beginning with ':'.
Ctrl+C cancels a running translation.";

/// What the front-end knows about the backend, updated from notifications only
#[derive(Debug, Default, Clone)]
pub struct UiState {
    pub languages: Vec<String>,
    pub input_language: String,
    pub output_language: String,
    pub use_english_names: bool,
    pub last_translation: Option<String>,
}

/// Terminal consumer of the translation backend
pub struct Frontend {
    ui_to_app_tx: AsyncSender<AppEvent>,
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    state: UiState,
}

impl Frontend {
    pub fn new(ui_to_app_tx: AsyncSender<AppEvent>, app_to_ui_rx: AsyncReceiver<AppEvent>) -> Self {
        Self {
            ui_to_app_tx,
            app_to_ui_rx,
            state: UiState::default(),
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub async fn run(&mut self, command: Command) -> anyhow::Result<()> {
        self.wait_ready().await?;

        match command {
            Command::Languages => {
                for name in &self.state.languages {
                    println!("{name}");
                }
            }
            Command::Translate {
                from,
                to,
                copy,
                text,
            } => {
                let text = if text.is_empty() {
                    read_stdin().await?
                } else {
                    text.join(" ")
                };
                let from = from.unwrap_or_else(|| self.state.input_language.clone());
                let to = to.unwrap_or_else(|| self.state.output_language.clone());

                match self.translate(&text, &from, &to).await? {
                    Some(translation) => {
                        println!("{translation}");
                        if copy {
                            self.copy(translation).await?;
                        }
                    }
                    None => eprintln!("Cancelled"),
                }
            }
            Command::Prefs {
                input,
                output,
                english_names,
            } => {
                // Mode first, so the names below are read in the new mode
                if let Some(value) = english_names {
                    self.send(AppEvent::SetUseEnglishNames(value)).await?;
                }
                if let Some(name) = input {
                    self.send(AppEvent::SetInputLanguage(name)).await?;
                }
                if let Some(name) = output {
                    self.send(AppEvent::SetOutputLanguage(name)).await?;
                }
                self.flush().await?;
                self.print_prefs();
            }
            Command::Shell => self.shell().await?,
        }

        Ok(())
    }

    async fn shell(&mut self) -> anyhow::Result<()> {
        let interactive = atty::is(atty::Stream::Stdin);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        if interactive {
            println!("Type :help for commands");
        }

        loop {
            if interactive {
                print!(
                    "{} -> {} > ",
                    self.state.input_language, self.state.output_language
                );
                std::io::stdout().flush()?;
            }

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match ShellCommand::parse(&line) {
                ShellCommand::Empty => {}
                ShellCommand::Quit => break,
                ShellCommand::Help => println!("{SHELL_HELP}"),
                ShellCommand::Translate(text) => {
                    let from = self.state.input_language.clone();
                    let to = self.state.output_language.clone();
                    match self.translate(&text, &from, &to).await {
                        Ok(Some(translation)) => println!("{translation}"),
                        Ok(None) => eprintln!("Cancelled"),
                        Err(e) => eprintln!("error: {e}"),
                    }
                }
                ShellCommand::From(name) => {
                    self.warn_unknown(&name);
                    self.send(AppEvent::SetInputLanguage(name)).await?;
                    self.flush().await?;
                }
                ShellCommand::To(name) => {
                    self.warn_unknown(&name);
                    self.send(AppEvent::SetOutputLanguage(name)).await?;
                    self.flush().await?;
                }
                ShellCommand::Swap => {
                    if self.state.input_language == AUTO_DETECT {
                        eprintln!("Pick a source language before swapping");
                    }
                    self.send(AppEvent::SwapLanguages).await?;
                    self.flush().await?;
                }
                ShellCommand::English(value) => {
                    self.send(AppEvent::SetUseEnglishNames(value)).await?;
                    self.flush().await?;
                }
                ShellCommand::Languages => {
                    println!("{}", self.state.languages.join("\n"));
                }
                ShellCommand::Refresh => {
                    self.send(AppEvent::RefreshLanguages).await?;
                    self.flush().await?;
                    println!("{} languages", self.state.languages.len().saturating_sub(1));
                }
                ShellCommand::Copy => match self.state.last_translation.clone() {
                    Some(text) => {
                        if let Err(e) = self.copy(text).await {
                            eprintln!("error: {e}");
                        }
                    }
                    None => eprintln!("Nothing translated yet"),
                },
                ShellCommand::Prefs => self.print_prefs(),
                ShellCommand::Invalid(line) => {
                    eprintln!("Unknown command: {line} (try :help)");
                }
            }
        }

        Ok(())
    }

    /// Send one translation and wait for its outcome. `Ok(None)` when cancelled.
    pub async fn translate(
        &mut self,
        text: &str,
        from: &str,
        to: &str,
    ) -> anyhow::Result<Option<String>> {
        let request = TranslationRequest::new(text, from, to);
        let id = request.id;
        self.send(AppEvent::Translate(request)).await?;

        loop {
            tokio::select! {
                event = self.next_event() => match event? {
                    AppEvent::TranslationFinished { id: done, text } if done == id => {
                        return Ok(Some(text));
                    }
                    AppEvent::TranslationCancelled { id: done } if done == id => return Ok(None),
                    AppEvent::Error(notice) if notice.request == Some(id) => bail!(notice.message),
                    _ => {}
                },
                _ = tokio::signal::ctrl_c() => {
                    self.send(AppEvent::CancelTranslation(id)).await?;
                }
            }
        }
    }

    pub async fn copy(&mut self, text: String) -> anyhow::Result<()> {
        self.send(AppEvent::CopyToClipboard(text)).await?;
        loop {
            match self.next_event().await? {
                AppEvent::Copied => return Ok(()),
                AppEvent::Error(notice) if notice.kind == ErrorKind::Clipboard => {
                    bail!(notice.message)
                }
                _ => {}
            }
        }
    }

    /// Wait until the backend has handled everything sent so far
    pub async fn flush(&mut self) -> anyhow::Result<()> {
        self.send(AppEvent::Flush).await?;
        while !matches!(self.next_event().await?, AppEvent::Flushed) {}
        Ok(())
    }

    pub async fn wait_ready(&mut self) -> anyhow::Result<()> {
        while !matches!(self.next_event().await?, AppEvent::BackendReady) {}
        Ok(())
    }

    pub async fn send(&self, event: AppEvent) -> anyhow::Result<()> {
        self.ui_to_app_tx
            .send(event)
            .await
            .context("Backend stopped")
    }

    async fn next_event(&mut self) -> anyhow::Result<AppEvent> {
        let event = self.app_to_ui_rx.recv().await.context("Backend stopped")?;
        self.apply(&event);
        Ok(event)
    }

    fn apply(&mut self, event: &AppEvent) {
        match event {
            AppEvent::LanguagesChanged(names) => self.state.languages = names.clone(),
            AppEvent::UseEnglishNamesChanged(value) => self.state.use_english_names = *value,
            AppEvent::InputLanguageChanged(name) => self.state.input_language = name.clone(),
            AppEvent::OutputLanguageChanged(name) => self.state.output_language = name.clone(),
            AppEvent::TranslationFinished { text, .. } => {
                self.state.last_translation = Some(text.clone());
            }
            AppEvent::Error(notice)
                if matches!(notice.kind, ErrorKind::Fetch | ErrorKind::Preferences) =>
            {
                eprintln!("error: {}", notice.message);
            }
            _ => {}
        }
    }

    fn warn_unknown(&self, name: &str) {
        if !self.state.languages.iter().any(|l| l == name) {
            eprintln!("warning: {name} is not in the language list");
        }
    }

    fn print_prefs(&self) {
        println!("input:         {}", self.state.input_language);
        println!("output:        {}", self.state.output_language);
        println!("english names: {}", self.state.use_english_names);
    }
}

async fn read_stdin() -> anyhow::Result<String> {
    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .context("Failed to read stdin")?;
    Ok(text)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Empty,
    Translate(String),
    From(String),
    To(String),
    Swap,
    English(bool),
    Languages,
    Refresh,
    Copy,
    Prefs,
    Help,
    Quit,
    Invalid(String),
}

impl ShellCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        if let Some(text) = line.strip_prefix("::") {
            return Self::Translate(format!(":{text}"));
        }
        let Some(rest) = line.strip_prefix(':') else {
            return Self::Translate(line.to_string());
        };

        let (cmd, arg) = match rest.split_once(char::is_whitespace) {
            Some((cmd, arg)) => (cmd, arg.trim()),
            None => (rest, ""),
        };

        match (cmd, arg) {
            ("from", name) if !name.is_empty() => Self::From(name.to_string()),
            ("to", name) if !name.is_empty() => Self::To(name.to_string()),
            ("swap", "") => Self::Swap,
            ("english", "on" | "true" | "yes") => Self::English(true),
            ("english", "off" | "false" | "no") => Self::English(false),
            ("languages" | "langs", "") => Self::Languages,
            ("refresh", "") => Self::Refresh,
            ("copy", "") => Self::Copy,
            ("prefs", "") => Self::Prefs,
            ("help" | "?", "") => Self::Help,
            ("quit" | "q" | "exit", "") => Self::Quit,
            _ => Self::Invalid(line.to_string()),
        }
    }
}
