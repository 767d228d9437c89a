use crate::guild::Guild;
use crate::player::Player;
use serde::Serialize;
use serde_json::Value;

/// Records that get derived attributes attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Guild,
}

impl EntityKind {
    pub fn from_field(field: &str) -> Option<Self> {
        match field {
            "player" => Some(EntityKind::Player),
            "guild" => Some(EntityKind::Guild),
            _ => None,
        }
    }
}

/// Result of one request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Player(Player),
    Guild(Guild),
    /// Any other result field, a missing record (`null`), or a whole envelope
    Value(Value),
    /// Raw envelope of a response whose `success` flag was not true
    Unsuccessful(Value),
}

impl Payload {
    pub fn into_player(self) -> Option<Player> {
        match self {
            Payload::Player(player) => Some(player),
            _ => None,
        }
    }
    pub fn into_guild(self) -> Option<Guild> {
        match self {
            Payload::Guild(guild) => Some(guild),
            _ => None,
        }
    }
    pub fn into_value(self) -> Value {
        match self {
            Payload::Player(player) => Value::Object(player.into_raw()),
            Payload::Guild(guild) => Value::Object(guild.into_raw()),
            Payload::Value(value) | Payload::Unsuccessful(value) => value,
        }
    }
    pub fn is_unsuccessful(&self) -> bool {
        matches!(self, Payload::Unsuccessful(_))
    }
    /// The API's own explanation of an unsuccessful response
    pub fn cause(&self) -> Option<&str> {
        match self {
            Payload::Unsuccessful(envelope) => envelope.get("cause").and_then(Value::as_str),
            _ => None,
        }
    }
}

/// Wraps an object record so its derived attributes can be called on it.
/// Non-object values pass through unchanged.
pub fn enrich(record: Value, kind: EntityKind) -> Payload {
    match record {
        Value::Object(raw) => match kind {
            EntityKind::Player => Payload::Player(Player::from(raw)),
            EntityKind::Guild => Payload::Guild(Guild::from(raw)),
        },
        other => Payload::Value(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fields_survive_enrichment() {
        let record = json!({"displayname": "Notch", "networkExp": 2500.5, "stats": {"Bedwars": {}}});
        let payload = enrich(record.clone(), EntityKind::Player);
        assert!(matches!(payload, Payload::Player(_)));
        assert_eq!(serde_json::to_value(&payload).unwrap(), record);
        assert_eq!(payload.into_value(), record);
    }

    #[test]
    fn non_objects_pass_through() {
        assert_eq!(
            enrich(json!("Notch"), EntityKind::Player),
            Payload::Value(json!("Notch"))
        );
        assert_eq!(
            enrich(json!([1, 2]), EntityKind::Guild),
            Payload::Value(json!([1, 2]))
        );
    }

    #[test]
    fn kinds_by_field() {
        assert_eq!(EntityKind::from_field("player"), Some(EntityKind::Player));
        assert_eq!(EntityKind::from_field("guild"), Some(EntityKind::Guild));
        assert_eq!(EntityKind::from_field("session"), None);
    }

    #[test]
    fn accessors() {
        let guild = enrich(json!({"name": "Foo"}), EntityKind::Guild);
        assert!(guild.clone().into_player().is_none());
        assert_eq!(guild.into_guild().unwrap().name(), Some("Foo"));

        let failed = Payload::Unsuccessful(json!({"success": false, "cause": "nope"}));
        assert!(failed.is_unsuccessful());
        assert_eq!(failed.cause(), Some("nope"));
        assert_eq!(Payload::Value(json!({"cause": "x"})).cause(), None);
    }
}
