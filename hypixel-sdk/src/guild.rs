use crate::util::clean;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Experience needed for each of the first guild levels
const EXP_NEEDED: [u64; 14] = [
    100_000, 150_000, 250_000, 500_000, 750_000, 1_000_000, 1_250_000, 1_500_000, 2_000_000,
    2_500_000, 2_500_000, 2_500_000, 2_500_000, 2_500_000,
];
// ...and for every level after those
const EXP_PER_LATER_LEVEL: u64 = 3_000_000;

pub fn guild_level(exp: u64) -> u64 {
    let mut remaining = exp;
    for (level, needed) in EXP_NEEDED.iter().enumerate() {
        if remaining < *needed {
            return level as u64;
        }
        remaining -= needed;
    }
    EXP_NEEDED.len() as u64 + remaining / EXP_PER_LATER_LEVEL
}

/// Guild record from the `guild` endpoint with its derived attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Guild {
    raw: Map<String, Value>,
}

impl Guild {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.raw.get(field)
    }
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }
    pub fn into_raw(self) -> Map<String, Value> {
        self.raw
    }

    pub fn id(&self) -> Option<&str> {
        self.raw.get("_id").and_then(Value::as_str)
    }
    pub fn name(&self) -> Option<&str> {
        self.raw.get("name").and_then(Value::as_str)
    }
    pub fn tag(&self) -> Option<&str> {
        self.raw.get("tag").and_then(Value::as_str)
    }
    pub fn exp(&self) -> u64 {
        self.raw
            .get("exp")
            .and_then(|v| v.as_u64().or_else(|| v.as_f64().map(|f| f.max(0.0) as u64)))
            .unwrap_or_default()
    }
    pub fn members(&self) -> &[Value] {
        self.raw
            .get("members")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn level(&self) -> u64 {
        guild_level(self.exp())
    }
    pub fn member_count(&self) -> usize {
        self.members().len()
    }
    /// Guild rank of the member with this UUID, dashed or not
    pub fn member_rank(&self, uuid: &str) -> Option<&str> {
        let uuid = clean(uuid);
        self.members()
            .iter()
            .find(|m| {
                let member = m.get("uuid").and_then(Value::as_str).map(clean);
                member.as_deref() == Some(uuid.as_str())
            })
            .and_then(|m| m.get("rank"))
            .and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for Guild {
    fn from(raw: Map<String, Value>) -> Self {
        Self { raw }
    }
}
