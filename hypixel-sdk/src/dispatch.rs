use crate::enrich::{enrich, EntityKind, Payload};
use crate::path::{build_path, Query};
use crate::{Error, Handle, Result};
use serde_json::Value;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// The fixed set of endpoints and the envelope field each one answers with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Key,
    Boosters,
    Leaderboards,
    PlayerCount,
    WatchdogStats,
    Guild,
    Friends,
    Session,
    Player,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Key => "key",
            Endpoint::Boosters => "boosters",
            Endpoint::Leaderboards => "leaderboards",
            Endpoint::PlayerCount => "playerCount",
            Endpoint::WatchdogStats => "watchdogstats",
            Endpoint::Guild => "guild",
            Endpoint::Friends => "friends",
            Endpoint::Session => "session",
            Endpoint::Player => "player",
        }
    }
    /// `None` means the caller gets the whole envelope
    pub fn result_field(&self) -> Option<&'static str> {
        match self {
            Endpoint::Key => Some("record"),
            Endpoint::Boosters => Some("boosters"),
            Endpoint::Leaderboards => Some("leaderboards"),
            Endpoint::PlayerCount => Some("playerCount"),
            Endpoint::WatchdogStats => None,
            Endpoint::Guild => Some("guild"),
            Endpoint::Friends => Some("records"),
            Endpoint::Session => Some("session"),
            Endpoint::Player => Some("player"),
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Error and data of one dispatch, both of which may be present.
///
/// An unsuccessful envelope comes back as data, next to whatever error the
/// transport reported for it.
#[derive(Debug)]
pub struct Outcome {
    pub error: Option<Error>,
    pub data: Option<Payload>,
}

impl Outcome {
    fn failed(error: Error) -> Self {
        Self {
            error: Some(error),
            data: None,
        }
    }
    pub fn into_result(self) -> Result<Payload> {
        match (self.error, self.data) {
            (Some(e), _) => Err(e),
            (None, Some(data)) => Ok(data),
            (None, None) => Ok(Payload::Value(Value::Null)),
        }
    }
}

pub(crate) async fn dispatch(
    handle: &Handle,
    path: &str,
    query: &[(String, String)],
    result_field: Option<&str>,
) -> Outcome {
    let slot = handle.keys.rotate();
    let url = build_path(&handle.host, path, query, handle.keys.key(slot));
    debug!(endpoint = path, key_slot = slot, "Requesting Hypixel API");

    let exchange = handle.transport.get(url).await;
    let body = match exchange.body {
        Some(body) if !body.is_empty() => body,
        _ => {
            if let Some(e) = exchange.error {
                warn!(endpoint = path, "Dropping transport error, no body: {}", e);
            }
            return Outcome::failed(Error::EmptyResponse);
        }
    };

    let envelope = match serde_json::from_str::<Value>(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(endpoint = path, status = ?exchange.status, "Response is not json: {}", e);
            return Outcome::failed(e.into());
        }
    };

    if envelope.get("success").and_then(Value::as_bool) != Some(true) {
        debug!(
            endpoint = path,
            cause = envelope.get("cause").and_then(serde_json::Value::as_str),
            "Unsuccessful response"
        );
        return Outcome {
            error: exchange.error,
            data: Some(Payload::Unsuccessful(envelope)),
        };
    }

    let data = match result_field {
        None => Payload::Value(envelope),
        Some(field) => {
            let mut envelope = envelope;
            let value = envelope
                .get_mut(field)
                .map(Value::take)
                .unwrap_or(Value::Null);
            match EntityKind::from_field(field) {
                Some(kind) if !value.is_null() => enrich(value, kind),
                _ => Payload::Value(value),
            }
        }
    };
    Outcome {
        error: exchange.error,
        data: Some(data),
    }
}

/// Runs `outcome` on the current runtime and hands its result to `callback`, once.
///
/// Without a runtime nothing is sent: the callback gets `Error::NoRuntime` right
/// away and no task handle is returned.
pub(crate) fn spawn_with_callback<Fut, F>(outcome: Fut, callback: F) -> Option<JoinHandle<()>>
where
    Fut: Future<Output = Outcome> + Send + 'static,
    F: FnOnce(Option<Error>, Option<Payload>) + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(runtime) => Some(runtime.spawn(async move {
            let Outcome { error, data } = outcome.await;
            callback(error, data);
        })),
        Err(e) => {
            warn!("Cannot start request: {}", e);
            callback(Some(Error::NoRuntime), None);
            None
        }
    }
}

/// One pending request. Nothing is sent, and no key is used, until it is
/// awaited through `send`/`outcome` or handed a callback through `then`.
pub struct RequestBuilder {
    handle: Arc<Handle>,
    path: String,
    query: Query,
    result_field: Option<String>,
}

impl RequestBuilder {
    pub fn new(
        handle: Arc<Handle>,
        path: &str,
        query: Query,
        result_field: Option<String>,
    ) -> Self {
        Self {
            handle,
            path: path.to_string(),
            query,
            result_field,
        }
    }
    pub fn param(mut self, name: &str, value: &str) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    pub async fn outcome(self) -> Outcome {
        dispatch(
            &self.handle,
            &self.path,
            &self.query,
            self.result_field.as_deref(),
        )
        .await
    }
    pub async fn send(self) -> Result<Payload> {
        self.outcome().await.into_result()
    }
    /// Callback form of `send`, run as a task on the current tokio runtime.
    pub fn then<F>(self, callback: F) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Option<Error>, Option<Payload>) + Send + 'static,
    {
        spawn_with_callback(self.outcome(), callback)
    }
}
