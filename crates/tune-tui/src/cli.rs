//! One-shot subcommands: talk to the backend once, print, exit.

use anyhow::Context;
use clap::Subcommand;
use serde::Serialize;

use tune_core::api::{HttpSongApi, SongApi};
use tune_core::config::Config;
use tune_core::error::ApiError;
use tune_core::song::Song;
use tune_core::token::{access_token, FileTokenStore, TokenStore, ACCESS_TOKEN_KEY};

use crate::widgets::progress_bar::fmt_time;
use crate::widgets::song_list::fit_width;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one search request and print the page.
    Search {
        /// Search text; an empty string lists the default catalogue.
        query: String,
        /// Zero-based page number.
        #[arg(long, default_value_t = 0)]
        page: u32,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Print the signed-in user's liked songs.
    Liked {
        #[arg(long)]
        json: bool,
    },
    /// Print the signed-in user.
    Whoami,
    /// Manage the stored access token.
    Token {
        #[command(subcommand)]
        action: TokenCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Store an access token.
    Set { token: String },
    /// Forget the stored access token.
    Clear,
}

pub async fn run(command: Command, config: &Config) -> anyhow::Result<()> {
    let tokens = FileTokenStore::new(config.paths.token_file.clone());

    match command {
        Command::Token { action } => token(action, &tokens).await,
        Command::Search { query, page, json } => {
            let api = client(config)?;
            let result = api
                .search(&query, page)
                .await
                .with_context(|| format!("searching {:?} (page {})", query, page))?;
            if json {
                return print_json(&result.content);
            }
            print_songs(&result.content);
            let end = if result.is_last { ", last" } else { "" };
            println!("-- page {}{}", result.page_number, end);
            Ok(())
        }
        Command::Liked { json } => {
            let api = client(config)?;
            let token = require_token(&tokens).await?;
            let songs = api
                .liked_songs(&token)
                .await
                .context("fetching liked songs")?;
            if json {
                return print_json(&songs);
            }
            if songs.is_empty() {
                println!("No liked songs");
            }
            print_songs(&songs);
            Ok(())
        }
        Command::Whoami => {
            let api = client(config)?;
            let token = require_token(&tokens).await?;
            let user = api.me(&token).await.context("fetching current user")?;
            println!("id:    {}", user.id);
            println!("name:  {}", user.full_name.as_deref().unwrap_or("-"));
            println!("email: {}", user.email.as_deref().unwrap_or("-"));
            Ok(())
        }
    }
}

fn client(config: &Config) -> anyhow::Result<HttpSongApi> {
    HttpSongApi::from_config(&config.api).context("building HTTP client")
}

async fn require_token(tokens: &FileTokenStore) -> anyhow::Result<String> {
    access_token(tokens)
        .await
        .ok_or(ApiError::MissingCredential)
        .context("run `tune token set <TOKEN>` first")
}

async fn token(action: TokenCommand, tokens: &FileTokenStore) -> anyhow::Result<()> {
    match action {
        TokenCommand::Set { token } => {
            tokens.set(ACCESS_TOKEN_KEY, token.trim()).await?;
            println!("token stored in {}", tokens.path().display());
        }
        TokenCommand::Clear => {
            tokens.remove(ACCESS_TOKEN_KEY).await?;
            println!("token cleared");
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_songs(songs: &[Song]) {
    for song in songs {
        println!("{}", song_line(song));
    }
}

fn song_line(song: &Song) -> String {
    format!(
        "{:>8}  {}  {}  {:>6}",
        song.id,
        fit_width(&song.title, 36),
        fit_width(song.display_artist(), 24),
        fmt_time(song.duration as f64)
    )
}
