//! Console Bot Example
//!
//! Every line typed on stdin becomes a chat message from `--user` in
//! `--channel`, and everything the bot sends is printed back.
//!
//! Mention the bot to address it outside direct messages, or use a channel
//! id starting with `D` to talk to it directly:
//!
//! ```text
//! $ cargo run --package console-bot -- --channel C1
//! <@UBOT> help
//! [C1] <@U1>: The available commands are:
//! ...
//! <@UBOT> add 2 40
//! [C1] <@U1>: 42
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use pewter::prelude::*;
use pewter::runtime::RuntimeBuilder;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "console-bot", about = "Talk to a Pewter bot from the terminal")]
struct Args {
    /// User id the bot connects as.
    #[arg(long, default_value = "UBOT")]
    bot_id: String,

    /// Channel the typed messages arrive on.
    #[arg(long, default_value = "D1")]
    channel: String,

    /// User id the typed messages come from.
    #[arg(long, default_value = "U1")]
    user: String,

    /// Prefix for every command, e.g. `!`.
    #[arg(long)]
    prefix: Option<String>,

    /// Only answer messages that mention the bot or arrive by direct message.
    #[arg(long)]
    reply_only: bool,

    /// Configuration file to load.
    #[arg(long)]
    config: Option<PathBuf>,
}

// ============================================================================
// Handler Functions
// ============================================================================

async fn ping(convo: Conversation) {
    let _ = convo.reply("pong").await;
}

async fn echo(convo: Conversation) {
    let text = convo.string("text").unwrap_or_default().to_string();
    let _ = convo.reply(text).await;
}

async fn add(convo: Conversation) {
    let result = match (convo.integer("a"), convo.integer("b")) {
        (Ok(a), Ok(b)) => a.checked_add(b).map(|sum| sum.to_string()),
        _ => None,
    };
    let _ = convo
        .reply(result.unwrap_or_else(|| "those numbers are too big".to_string()))
        .await;
}

async fn deploy(convo: Conversation) {
    let app = convo.string("app").unwrap_or_default().to_string();
    let env = convo.string("env").unwrap_or_default().to_string();
    let _ = reply!(convo, "deploying *{}* to *{}*", app, env).await;
}

async fn unknown(convo: Conversation) {
    let _ = reply!(convo, "I don't know `{}`. Try `help`.", convo.message().text()).await;
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn builder(args: &Args, client: LocalClient) -> RuntimeBuilder<LocalClient> {
    let mut builder = BotRuntime::builder(client).set("bot.drain_on_shutdown", true);
    if let Some(path) = &args.config {
        builder = builder.config_file(path);
    }
    if let Some(prefix) = &args.prefix {
        builder = builder.set("bot.command_prefix", prefix.as_str());
    }
    if args.reply_only {
        builder = builder.set("bot.reply_only", true);
    }
    builder
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (client, mut handle) = local_client(64);

    let mut bot = builder(&args, client).build()?;
    bot.command_with_description("ping", "Check that the bot is alive", ping)?
        .command_with_description("echo <text>", "Repeat one word", echo)?
        .command_with_description(
            "add <a:integer> <b:integer>",
            "Add two integers",
            add,
        )?
        .command_with_description("deploy <app> to <env>", "Pretend to deploy", deploy)?
        .unknown_command(unknown);

    // Log everything said in the channel, addressed to the bot or not
    let queue = bot.channel(&args.channel).messages();
    tokio::spawn(async move {
        loop {
            let message = queue.recv().await;
            info!(user = %message.user(), text = %message.text(), "Channel message");
        }
    });

    let token = CancellationToken::new();
    let listener = tokio::spawn(bot.listen(token.clone()));
    handle.connect(&args.bot_id).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) if !line.trim().is_empty() => {
                    handle.message(&args.channel, &args.user, line).await?;
                }
                Some(_) => {}
                None => break,
            },
            sent = handle.next_sent() => match sent {
                Some(sent) => println!("[{}] {}", sent.channel, sent.text),
                None => break,
            },
        }
    }

    token.cancel();
    listener.await??;

    while let Some(sent) = handle.try_next_sent() {
        println!("[{}] {}", sent.channel, sent.text);
    }

    Ok(())
}
