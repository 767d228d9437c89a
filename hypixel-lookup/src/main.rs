use anyhow::{bail, Context};
use clap::Parser;
use hypixel_sdk::{Hypixel, Outcome, Payload};
use tracing_subscriber::EnvFilter;

use self::config::{Cli, Command};

mod config;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        // disable printing the name of the module in every log line.
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let client = Hypixel::builder(config::parse_keys(&cli.keys)?)
        .host(cli.host.as_str())
        .build()
        .context("Failed to set up Hypixel client")?;
    tracing::debug!(keys = client.keys().len(), host = %cli.host, "Client ready");

    let outcome = match &cli.command {
        Command::Player { search } => client.get_player(search).outcome().await,
        Command::Guild { search } => client.get_guild_outcome(search).await,
        Command::Friends { uuid } => client.get_friends(uuid).outcome().await,
        Command::Session { uuid } => client.get_session(uuid).outcome().await,
        Command::Count => client.get_online_players().outcome().await,
        Command::Watchdog => client.get_watchdog_stats().outcome().await,
        Command::Boosters => client.get_boosters().outcome().await,
        Command::Leaderboards => client.get_leaderboards().outcome().await,
        Command::Key => client.get_key_info().outcome().await,
    };

    match settle(outcome).with_context(|| format!("Request failed: {:?}", cli.command))? {
        Payload::Player(player) => println!("{}", render::player(&player, &cli.tz)),
        Payload::Guild(guild) => println!("{}", render::guild(&guild)),
        Payload::Value(serde_json::Value::Null) => println!("Nothing found"),
        Payload::Value(value) | Payload::Unsuccessful(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?)
        }
    }
    Ok(())
}

/// The API's own `cause` wins over the transport error that came with it,
/// so a throttled or rejected key reports why.
fn settle(outcome: Outcome) -> anyhow::Result<Payload> {
    if let Some(data) = outcome.data.as_ref().filter(|data| data.is_unsuccessful()) {
        match &outcome.error {
            Some(e) => bail!(
                "Hypixel API error: {} ({})",
                data.cause().unwrap_or("no cause given"),
                e
            ),
            None => bail!(
                "Hypixel API error: {}",
                data.cause().unwrap_or("no cause given")
            ),
        }
    }
    Ok(outcome.into_result()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hypixel_sdk::Error;
    use serde_json::json;

    fn unsuccessful(cause: &str) -> Option<Payload> {
        Some(Payload::Unsuccessful(json!({"success": false, "cause": cause})))
    }

    #[test]
    fn cause_is_reported_next_to_status_error() {
        let err = settle(Outcome {
            error: Some(Error::Forbidden),
            data: unsuccessful("Invalid API key"),
        })
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Hypixel API error: Invalid API key (API key is invalid)"
        );
    }

    #[test]
    fn cause_is_reported_without_status_error() {
        let err = settle(Outcome {
            error: None,
            data: unsuccessful("Key throttle"),
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Hypixel API error: Key throttle");
    }

    #[test]
    fn plain_errors_and_data_pass_through() {
        let err = settle(Outcome {
            error: Some(Error::EmptyResponse),
            data: None,
        })
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::EmptyResponse)
        ));

        let payload = settle(Outcome {
            error: None,
            data: Some(Payload::Value(json!(1234))),
        })
        .unwrap();
        assert_eq!(payload, Payload::Value(json!(1234)));
    }
}
