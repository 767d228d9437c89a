use crate::{Error, Result};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;

/// Keys handed to a client: one key, or several to rotate through
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    Single(String),
    Many(Vec<String>),
}

impl From<&str> for KeySource {
    fn from(key: &str) -> Self {
        KeySource::Single(key.to_string())
    }
}
impl From<String> for KeySource {
    fn from(key: String) -> Self {
        KeySource::Single(key)
    }
}
impl From<Vec<String>> for KeySource {
    fn from(keys: Vec<String>) -> Self {
        KeySource::Many(keys)
    }
}
impl From<Vec<&str>> for KeySource {
    fn from(keys: Vec<&str>) -> Self {
        KeySource::Many(keys.into_iter().map(str::to_string).collect())
    }
}
impl From<&[&str]> for KeySource {
    fn from(keys: &[&str]) -> Self {
        KeySource::Many(keys.iter().map(|k| k.to_string()).collect())
    }
}

/// Accepts a JSON string or a JSON array. Non-string array items are dropped
/// like any other malformed key.
impl TryFrom<&Value> for KeySource {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::String(key) => Ok(KeySource::Single(key.clone())),
            Value::Array(items) => Ok(KeySource::Many(
                items
                    .iter()
                    .map(|item| item.as_str().unwrap_or_default().to_string())
                    .collect(),
            )),
            Value::Object(_) => Err(Error::Configuration(
                "Objects are not supported, you must use an array.".to_string(),
            )),
            _ => Err(Error::Configuration(
                "Keys must be a string or an array of keys.".to_string(),
            )),
        }
    }
}

/// Checks the `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx` key shape, lowercase alphanumerics only.
///
/// The whole candidate must have that shape. A string that merely contains a
/// key-shaped run, like `" <key>"` or `"<key>-0000"`, is rejected.
pub fn is_valid_key(candidate: &str) -> bool {
    let groups = candidate.split('-').collect::<Vec<_>>();
    groups.len() == 5
        && groups.iter().zip([8, 4, 4, 4, 12]).all(|(group, len)| {
            group.len() == len
                && group
                    .bytes()
                    .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
        })
}

/// Round-robin set of API keys.
///
/// The key list never changes after construction. The cursor is advanced with a
/// single atomic update, so concurrent callers never share or skip a slot.
#[derive(Debug)]
pub struct KeyRing {
    keys: Vec<String>,
    cursor: AtomicUsize,
}

impl KeyRing {
    pub fn new(source: impl Into<KeySource>) -> Result<Self> {
        let candidates = match source.into() {
            KeySource::Single(key) => vec![key],
            KeySource::Many(keys) => keys,
        };
        let total = candidates.len();
        let keys = candidates
            .into_iter()
            .filter(|key| is_valid_key(key))
            .collect::<Vec<_>>();

        if keys.len() < total {
            warn!(
                dropped = total - keys.len(),
                kept = keys.len(),
                "Ignoring malformed API keys"
            );
        }
        if keys.is_empty() {
            return Err(Error::Configuration(
                "No valid keys were provided.".to_string(),
            ));
        }
        Ok(Self {
            keys,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Advances the cursor and returns the key it lands on.
    ///
    /// Rotation starts by advancing, so with several keys the first call returns the second key.
    pub fn next_key(&self) -> &str {
        let slot = self.rotate();
        self.key(slot)
    }

    pub(crate) fn rotate(&self) -> usize {
        let len = self.keys.len();
        let previous = self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| Some((c + 1) % len))
            .unwrap_or_else(|c| c);
        (previous + 1) % len
    }

    pub(crate) fn key(&self, slot: usize) -> &str {
        &self.keys[slot]
    }

    pub fn keys(&self) -> Vec<String> {
        self.keys.clone()
    }
    pub fn len(&self) -> usize {
        self.keys.len()
    }
    // always false, an empty ring cannot be built
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
