//! Interactive payment-link form
//!
//! Reads commands from stdin and renders the form after each one.

use paylink::{Config, FormAction, FormSession, SessionError, view};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "\
Commands:
  set <field> <value>   edit currency, amount, description or expiryDate
  submit                validate and generate a link
  dismiss               close the result and reset the form
  show                  print the form
  help                  print this help
  quit                  end the session";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paylink=info,paylink_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(?config, "Configuration loaded");

    let session = FormSession::start(config.home_currency.clone(), config.environment()).await?;

    let mut results = session.subscribe();
    tokio::spawn(async move {
        while let Ok(action) = results.recv().await {
            match action {
                FormAction::CurrenciesLoaded(currencies) => {
                    println!("\n{} currencies available", currencies.len());
                },
                FormAction::CurrenciesUnavailable { .. } => {
                    println!("\nCurrencies unavailable, any currency code is accepted");
                },
                _ => {},
            }
        }
    });

    println!("=== Payment Link Generator ===\n");
    println!("{HELP}\n");
    println!("{}\n", view::render(&session.snapshot().await));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut parts = line.trim().splitn(3, ' ');
        let command = parts.next().unwrap_or_default();

        match command {
            "" => continue,
            "set" => {
                let (Some(name), value) = (parts.next(), parts.next().unwrap_or_default()) else {
                    println!("usage: set <field> <value>");
                    continue;
                };
                match session.update_field_by_name(name, value).await {
                    Ok(()) => {},
                    Err(SessionError::UnknownField(error)) => {
                        println!("{error}");
                        continue;
                    },
                    Err(error) => return Err(error.into()),
                }
            },
            "submit" => {
                let mut handle = session.submit().await?;
                if session.submission().await.is_submitting() {
                    println!("{}", view::submit_label(&session.submission().await));
                }
                if handle.wait_with_timeout(Duration::from_secs(30)).await.is_err() {
                    println!("Still generating, use `show` to check again");
                }
            },
            "dismiss" => session.dismiss_result().await?,
            "show" => {},
            "help" => {
                println!("{HELP}");
                continue;
            },
            "quit" | "exit" => break,
            other => {
                println!("unknown command: {other} (try `help`)");
                continue;
            },
        }

        println!("{}\n", view::render(&session.snapshot().await));
    }

    session.end();
    Ok(())
}
