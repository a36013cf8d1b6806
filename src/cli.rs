use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "topicnav")]
#[command(
    author,
    version,
    about = "Telegram bot that keeps a navigation menu pinned to the bottom of forum topics",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot (long polling)
    Run,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
