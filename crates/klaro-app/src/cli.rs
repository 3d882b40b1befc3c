use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "klaro", version, about = "Translate text through translate-shell")]
pub struct Cli {
    /// Keep preferences in memory, nothing is written to disk
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List available languages in the current display mode
    Languages,

    /// Translate text once. Reads stdin when no text is given.
    Translate {
        /// Source language name, defaults to the stored input language
        #[arg(long)]
        from: Option<String>,
        /// Target language name, defaults to the stored output language
        #[arg(long)]
        to: Option<String>,
        /// Also copy the result to the clipboard
        #[arg(long)]
        copy: bool,
        text: Vec<String>,
    },

    /// Show or change stored preferences
    Prefs {
        #[arg(long)]
        input: Option<String>,
        #[arg(long)]
        output: Option<String>,
        /// Show English names instead of native ones
        #[arg(long)]
        english_names: Option<bool>,
    },

    /// Interactive translation shell (default)
    Shell,
}
