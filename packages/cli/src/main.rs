//! `lacquer` — command-line companion for the LacQuer learning platform.
//!
//! Signs in against the real backend, keeps the session in a JSON file
//! under the user's config directory, and exposes the dictionary, tag,
//! deck, and badge surfaces for poking at from a terminal.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::Password;
use tracing_subscriber::EnvFilter;

use lacquer_client::{
    ApiConfig, FileStorage, LacquerClient, Language, ProfileUpdate, Redirect, StaticCaptcha,
    TagForm, Word,
};

#[derive(Parser)]
#[command(name = "lacquer", about = "LacQuer learning platform CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the session locally
    Login {
        /// Account email
        email: String,
    },
    /// Sign out and clear the stored session
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Register a new account
    Signup {
        username: String,
        email: String,
    },
    /// Re-send the verification email
    Resend {
        email: String,
    },
    /// Show or update the profile
    Profile {
        /// New display name
        #[arg(long)]
        username: Option<String>,
        /// New about text
        #[arg(long)]
        about: Option<String>,
    },
    /// List tags
    Tags,
    /// Create a tag
    TagAdd {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a tag
    TagRm {
        tag_id: String,
    },
    /// List decks
    Decks {
        /// Show universal decks instead of your own
        #[arg(long)]
        universal: bool,
    },
    /// List badges
    Badges,
    /// Look up a word
    Lookup {
        word: String,
        /// Language: en or vn
        #[arg(long, default_value = "en")]
        lang: String,
    },
    /// Fetch a random word
    Random {
        /// Language: en or vn
        #[arg(long, default_value = "en")]
        lang: String,
    },
}

fn session_path() -> PathBuf {
    if let Ok(path) = std::env::var("LACQUER_SESSION_FILE") {
        return PathBuf::from(path);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".config/lacquer/session.json")
}

fn parse_language(lang: &str) -> Result<Language> {
    match lang {
        "en" => Ok(Language::English),
        "vn" => Ok(Language::Vietnamese),
        other => anyhow::bail!("unknown language '{other}', expected 'en' or 'vn'"),
    }
}

fn build_client() -> Result<LacquerClient> {
    // The hosted backend skips challenge verification for trusted tokens;
    // override with a real one when pointing at production.
    let captcha_token =
        std::env::var("LACQUER_CAPTCHA_TOKEN").unwrap_or_else(|_| "cli".to_string());

    let client = LacquerClient::new(
        ApiConfig::from_env(),
        Arc::new(FileStorage::new(session_path())),
        Arc::new(StaticCaptcha::new(captcha_token)),
    )?;

    let client = client.with_redirect_hook(Arc::new(|target| match target {
        Redirect::LoginSessionExpired => {
            eprintln!(
                "{}",
                "Your session has expired. Run `lacquer login` to sign in again.".yellow()
            );
        }
        Redirect::Login => {}
    }));

    client.bootstrap();
    Ok(client)
}

fn print_word(word: &Word) {
    match word {
        Word::English(entry) => {
            println!("{}", entry.word.bold());
            if let Some(pronunciation) = &entry.pronunciation {
                println!("  {}", pronunciation.dimmed());
            }
            for word_type in &entry.word_types {
                println!("  {}", word_type.kind.cyan());
                for (i, definition) in word_type.definitions.iter().enumerate() {
                    println!("    {}. {}", i + 1, definition);
                }
                for example in &word_type.examples {
                    println!("       {}", format!("\"...{example}\"").italic());
                }
            }
        }
        Word::Vietnamese(entry) => {
            println!("{}", entry.word.bold());
            for pronunciation in &entry.pronunciations {
                println!("  {}", pronunciation.dimmed());
            }
            for meaning in &entry.meanings {
                println!("  {}", meaning.part_of_speech.kind.cyan());
                for (i, definition) in meaning.definitions.iter().enumerate() {
                    println!("    {}. {}", i + 1, definition.text);
                    for example in &definition.examples {
                        println!("       {}", format!("\"{example}\"").italic());
                    }
                }
            }
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let client = build_client()?;

    match cli.command {
        Command::Login { email } => {
            let password = Password::new()
                .with_prompt("Password")
                .interact()
                .context("failed to read password")?;

            if client.login(&email, &password).await {
                let state = client.state();
                println!(
                    "{} Signed in as {}",
                    "✓".green(),
                    state.username.unwrap_or_default().bold()
                );
            } else {
                let reason = client
                    .state()
                    .error
                    .unwrap_or_else(|| "Login failed".to_string());
                anyhow::bail!(reason);
            }
        }
        Command::Logout => {
            client.logout();
            println!("{} Signed out", "✓".green());
        }
        Command::Whoami => {
            let state = client.state();
            if state.is_authenticated() {
                println!(
                    "{} ({})",
                    state.username.unwrap_or_default().bold(),
                    state.user_id.unwrap_or_default()
                );
            } else {
                println!("Not signed in");
            }
        }
        Command::Signup { username, email } => {
            let password = Password::new()
                .with_prompt("Password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()
                .context("failed to read password")?;

            let outcome = client.signup(&username, &email, &password).await;
            if outcome.success {
                println!("{} {}", "✓".green(), outcome.message);
            } else {
                anyhow::bail!(outcome.message);
            }
        }
        Command::Resend { email } => {
            let outcome = client.resend_verification(&email).await;
            if outcome.success {
                println!("{} {}", "✓".green(), outcome.message);
            } else {
                anyhow::bail!(outcome.message);
            }
        }
        Command::Profile { username, about } => {
            if username.is_none() && about.is_none() {
                let profile = client
                    .get_profile()
                    .await
                    .context("could not load profile — are you signed in?")?;
                println!("{}", profile.username.bold());
                println!("  email: {}", profile.email);
                if !profile.about.is_empty() {
                    println!("  about: {}", profile.about);
                }
            } else {
                let profile = client
                    .update_profile(ProfileUpdate {
                        username,
                        about,
                        ..Default::default()
                    })
                    .await
                    .context("profile update failed")?;
                println!("{} Profile updated: {}", "✓".green(), profile.username);
            }
        }
        Command::Tags => {
            let tags = client.list_tags().await?;
            println!("{} tags", tags.count);
            for tag in tags.data {
                match tag.description {
                    Some(description) => {
                        println!("  {} — {}", tag.name.bold(), description)
                    }
                    None => println!("  {}", tag.name.bold()),
                }
            }
        }
        Command::TagAdd { name, description } => {
            let tag = client.create_tag(&TagForm { name, description }).await?;
            println!("{} Created tag {}", "✓".green(), tag.name.bold());
        }
        Command::TagRm { tag_id } => {
            let message = client.delete_tag(&tag_id).await?;
            println!("{} {}", "✓".green(), message);
        }
        Command::Decks { universal } => {
            let decks = if universal {
                client.list_universal_decks().await?
            } else {
                client.list_decks().await?
            };
            for deck in decks.data {
                let marker = if deck.is_finished { "✓" } else { " " };
                println!(
                    "{} {} ({} cards)",
                    marker.green(),
                    deck.title.bold(),
                    deck.cards.len()
                );
            }
        }
        Command::Badges => {
            for badge in client.list_badges().await? {
                println!("  {}", badge.name.bold());
            }
        }
        Command::Lookup { word, lang } => {
            let language = parse_language(&lang)?;
            let entry = client.lookup_word(language, &word).await?;
            print_word(&entry);
        }
        Command::Random { lang } => {
            let language = parse_language(&lang)?;
            let entry = client.random_word(language).await?;
            print_word(&entry);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    run(Cli::parse()).await
}
