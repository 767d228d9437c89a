use clap::{Parser, Subcommand};
use hypixel_sdk::KeySource;
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(name = "hypixel-lookup", version, about = "Look up Hypixel players and guilds")]
pub struct Cli {
    #[arg(
        long,
        env = "HYPIXEL_API_KEYS",
        hide_env_values = true,
        help = "API keys, comma separated or as a JSON array"
    )]
    pub keys: String,
    #[arg(long, env = "HYPIXEL_API_HOST", default_value = hypixel_sdk::path::API_HOST)]
    pub host: String,
    #[arg(
        long,
        env = "HYPIXEL_TZ",
        default_value = "UTC",
        help = "Timezone used for login times"
    )]
    pub tz: chrono_tz::Tz,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Player by name or UUID
    Player { search: String },
    /// Guild by id, name, member name or member UUID
    Guild { search: String },
    Friends { uuid: String },
    Session { uuid: String },
    /// Number of players online
    Count,
    Watchdog,
    Boosters,
    Leaderboards,
    /// Usage of the first key
    Key,
}

/// A JSON string or array is taken as is; anything that is not JSON is read as
/// a comma separated list.
pub fn parse_keys(raw: &str) -> hypixel_sdk::Result<KeySource> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => KeySource::try_from(&value),
        Err(_) => Ok(KeySource::Many(
            raw.split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect(),
        )),
    }
}
