//! Bot instance creation and command definitions

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::utils::command::{BotCommands, ParseError};

use crate::core::config;

/// Accepts the raw argument text as-is, including the empty string.
/// A bare `/add` must still reach the handler, which substitutes the
/// fallback button title.
fn parse_title(input: String) -> Result<(String,), ParseError> {
    Ok((input,))
}

/// Slash commands understood by the bot.
///
/// `delete N` / `delete all` are deliberately plain text, not slash
/// commands; they are matched by the router (see `handlers::schema`).
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Topic navigation:")]
pub enum Command {
    #[command(description = "how to set up and use the bot")]
    Start,
    #[command(
        description = "reply to a post with /add <title> to add a menu button",
        parse_with = parse_title
    )]
    Add(String),
    #[command(description = "list this topic's buttons with their numbers")]
    List,
    #[command(description = "show your Telegram id for the admin allow-list")]
    Myid,
}

/// Creates the Bot instance with an explicit request timeout.
///
/// # Errors
/// Fails when BOT_TOKEN is unset; a bot without credentials is a
/// misconfiguration we refuse to start with.
pub fn create_bot() -> anyhow::Result<Bot> {
    let token = config::BOT_TOKEN.clone();
    if token.is_empty() {
        anyhow::bail!("BOT_TOKEN environment variable is not set");
    }

    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    Ok(Bot::with_client(token, client))
}

/// Registers the slash commands in the Telegram UI.
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    use teloxide::types::BotCommand;

    bot.set_my_commands(vec![
        BotCommand::new("start", "how to set up and use the bot"),
        BotCommand::new("add", "reply to a post with /add <title> to add a menu button"),
        BotCommand::new("list", "list this topic's buttons with their numbers"),
        BotCommand::new("myid", "show your Telegram id for the admin allow-list"),
    ])
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn command_descriptions_cover_all_commands() {
        let descriptions = format!("{}", Command::descriptions());

        assert!(descriptions.contains("Topic navigation"));
        assert!(descriptions.contains("start"));
        assert!(descriptions.contains("add"));
        assert!(descriptions.contains("list"));
        assert!(descriptions.contains("myid"));
    }

    #[test]
    fn add_command_captures_the_title() {
        let cmd = Command::parse("/add Intro post", "topicnavbot").unwrap();
        assert_eq!(cmd, Command::Add("Intro post".to_string()));

        let cmd = Command::parse("/add", "topicnavbot").unwrap();
        assert_eq!(cmd, Command::Add(String::new()));
    }
}
