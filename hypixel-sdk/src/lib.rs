pub mod dispatch;
pub mod enrich;
pub mod guild;
pub mod keys;
pub mod path;
pub mod player;
pub mod transport;
pub mod util;

pub use crate::dispatch::{Endpoint, Outcome, RequestBuilder};
pub use crate::enrich::{EntityKind, Payload};
pub use crate::guild::Guild;
pub use crate::keys::{KeyRing, KeySource};
pub use crate::player::Player;
pub use crate::transport::{Exchange, ReqwestTransport, Transport};

use crate::path::Query;
use reqwest::{StatusCode, Url};
use std::fmt::Display;
use std::sync::Arc;
use tokio::task::JoinHandle;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Bad or missing keys, or an unusable host. Raised while building a client.
    Configuration(String),
    EmptyResponse,
    InvalidResponse(serde_json::Error),
    HttpError(reqwest::Error),
    TooManyRequests,
    Forbidden,
    Unauthorized,
    BadRequest,
    HypixelError(StatusCode),
    /// A callback request was started outside of a tokio runtime
    NoRuntime,
}

impl Error {
    /// Maps a non-success HTTP status to the error reported next to the body.
    pub fn from_status(status: StatusCode) -> Option<Self> {
        match status {
            StatusCode::BAD_REQUEST => Some(Error::BadRequest),
            StatusCode::UNAUTHORIZED => Some(Error::Unauthorized),
            StatusCode::FORBIDDEN => Some(Error::Forbidden),
            StatusCode::TOO_MANY_REQUESTS => Some(Error::TooManyRequests),
            s if s.is_server_error() => Some(Error::HypixelError(s)),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Error::Configuration(msg) => msg.as_str(),
            Error::EmptyResponse => "No response body",
            Error::InvalidResponse(e) => return write!(f, "Request returned invalid json: {}", e),
            Error::HttpError(e) => return e.fmt(f),
            Error::TooManyRequests => "Too many requests",
            Error::Forbidden => "API key is invalid",
            Error::Unauthorized => "Unauthorized",
            Error::BadRequest => "Bad request to Hypixel API",
            Error::HypixelError(status) => return write!(f, "Hypixel API error ({})", status),
            Error::NoRuntime => "No tokio runtime to run the request on",
        };
        write!(f, "{}", msg)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidResponse(e) => Some(e),
            Error::HttpError(e) => Some(e),
            _ => None,
        }
    }
}
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::HttpError(e)
    }
}
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidResponse(e)
    }
}

pub struct Handle {
    pub keys: KeyRing,
    pub host: Url,
    pub transport: Box<dyn Transport>,
}

pub struct ClientBuilder {
    keys: KeySource,
    host: String,
    transport: Option<Box<dyn Transport>>,
}

impl ClientBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }
    pub fn build(self) -> Result<Hypixel> {
        let keys = KeyRing::new(self.keys)?;
        let host = Url::parse(&self.host)
            .map_err(|e| Error::Configuration(format!("Invalid API host {}: {}", self.host, e)))?;
        if host.cannot_be_a_base() {
            return Err(Error::Configuration(format!(
                "API host {} cannot carry a path",
                self.host
            )));
        }
        let transport = match self.transport {
            Some(transport) => transport,
            None => Box::new(ReqwestTransport::new()?),
        };
        Ok(Hypixel {
            handle: Arc::new(Handle {
                keys,
                host,
                transport,
            }),
        })
    }
}

/// Client for the Hypixel public API
///
/// Every request authenticates with the next key of the ring, so spreading
/// several keys over one client spreads their quota.
pub struct Hypixel {
    handle: Arc<Handle>,
}

impl Hypixel {
    pub fn new(keys: impl Into<KeySource>) -> Result<Self> {
        Self::builder(keys).build()
    }
    pub fn with_transport(
        keys: impl Into<KeySource>,
        transport: impl Transport + 'static,
    ) -> Result<Self> {
        Self::builder(keys).transport(transport).build()
    }
    pub fn builder(keys: impl Into<KeySource>) -> ClientBuilder {
        ClientBuilder {
            keys: keys.into(),
            host: path::API_HOST.to_string(),
            transport: None,
        }
    }

    /// Copy of the validated keys, in rotation order
    pub fn keys(&self) -> Vec<String> {
        self.handle.keys.keys()
    }

    /// Raw access to any endpoint. `result_field` of `None` yields the whole envelope.
    pub fn request(&self, path: &str, query: Query, result_field: Option<&str>) -> RequestBuilder {
        RequestBuilder::new(
            self.handle.clone(),
            path,
            query,
            result_field.map(str::to_string),
        )
    }
    pub fn endpoint(&self, endpoint: Endpoint, query: Query) -> RequestBuilder {
        self.request(endpoint.path(), query, endpoint.result_field())
    }

    pub fn get_key_info(&self) -> RequestBuilder {
        self.endpoint(Endpoint::Key, Query::new())
    }
    pub fn get_boosters(&self) -> RequestBuilder {
        self.endpoint(Endpoint::Boosters, Query::new())
    }
    pub fn get_leaderboards(&self) -> RequestBuilder {
        self.endpoint(Endpoint::Leaderboards, Query::new())
    }
    pub fn get_online_players(&self) -> RequestBuilder {
        self.endpoint(Endpoint::PlayerCount, Query::new())
    }
    pub fn get_watchdog_stats(&self) -> RequestBuilder {
        self.endpoint(Endpoint::WatchdogStats, Query::new())
    }
    pub fn get_guild_by_name(&self, name: &str) -> RequestBuilder {
        self.endpoint(Endpoint::Guild, path::query([("name", name)]))
    }
    pub fn get_guild_by_player(&self, player: &str) -> RequestBuilder {
        self.endpoint(Endpoint::Guild, path::query([("player", util::clean(player))]))
    }
    pub fn get_guild_by_id(&self, id: &str) -> RequestBuilder {
        self.endpoint(Endpoint::Guild, path::query([("id", id)]))
    }
    pub fn get_friends(&self, player: &str) -> RequestBuilder {
        self.endpoint(Endpoint::Friends, path::query([("player", player)]))
    }
    pub fn get_session(&self, player: &str) -> RequestBuilder {
        self.endpoint(Endpoint::Session, path::query([("uuid", player)]))
    }
    /// Looks a player up by UUID when `search` is UUID shaped, by name otherwise
    pub fn get_player(&self, search: &str) -> RequestBuilder {
        let query = if util::is_uuid(search) {
            path::query([("uuid", util::clean(search))])
        } else {
            path::query([("name", search)])
        };
        self.endpoint(Endpoint::Player, query)
    }

    /// Resolves a guild from a guild id, a player UUID, a guild name or a player name.
    ///
    /// A name that matches no guild is retried as a player name, and the guild of
    /// that player is returned.
    pub async fn get_guild(&self, search: &str) -> Result<Payload> {
        self.get_guild_outcome(search).await.into_result()
    }
    pub fn get_guild_with<F>(&self, search: &str, callback: F) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Option<Error>, Option<Payload>) + Send + 'static,
    {
        let client = self.clone();
        let search = search.to_string();
        dispatch::spawn_with_callback(
            async move { client.get_guild_outcome(&search).await },
            callback,
        )
    }

    /// `get_guild` with the error and data of the final lookup kept side by side
    pub async fn get_guild_outcome(&self, search: &str) -> Outcome {
        if util::is_guild_id(search) {
            return self.get_guild_by_id(search).outcome().await;
        }
        if util::is_uuid(search) {
            return self.get_guild_by_player(search).outcome().await;
        }
        let by_name = self.get_guild_by_name(search).outcome().await;
        if by_name.error.is_some() || !matches!(by_name.data, Some(Payload::Value(ref v)) if v.is_null())
        {
            return by_name;
        }

        tracing::debug!(search, "No guild by that name, trying it as a player");
        let player = self.get_player(search).outcome().await;
        // a failed player lookup is reported as is, not as "no guild"
        if player.error.is_some()
            || player.data.as_ref().map_or(false, Payload::is_unsuccessful)
        {
            return player;
        }
        match player.data {
            Some(Payload::Player(ref p)) => match p.uuid() {
                Some(uuid) => self.get_guild_by_player(uuid).outcome().await,
                None => by_name,
            },
            _ => by_name,
        }
    }
}

impl Clone for Hypixel {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
        }
    }
}
