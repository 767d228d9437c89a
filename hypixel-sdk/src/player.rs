use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const BASE: f64 = 10_000.0;
const GROWTH: f64 = 2_500.0;
const REVERSE_PQ_PREFIX: f64 = -(BASE - 0.5 * GROWTH) / GROWTH;
const REVERSE_CONST: f64 = REVERSE_PQ_PREFIX * REVERSE_PQ_PREFIX;
const GROWTH_DIVIDES_2: f64 = 2.0 / GROWTH;

/// Network level for an amount of network experience.
///
/// Inverts the cumulative experience curve (each level costs `GROWTH` more than
/// the previous one) and floors the result. Negative experience means "below
/// the first level" and reads as level 1.
pub fn network_level(experience: f64) -> u64 {
    if experience < 0.0 {
        return 1;
    }
    (1.0 + REVERSE_PQ_PREFIX + (REVERSE_CONST + GROWTH_DIVIDES_2 * experience).sqrt()).floor()
        as u64
}

/// Equal timestamps count as offline.
pub fn is_online(last_login: i64, last_logout: i64) -> bool {
    last_login > last_logout
}

/// The one rank system a record's display rank is read from.
///
/// Hypixel exposes several overlapping rank fields; they are checked in the
/// order of the variants here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankSource<'a> {
    /// Custom chat prefix, with color codes
    Prefix(&'a str),
    /// Staff and special ranks (`rank`), anything but `NORMAL`
    Legacy(&'a str),
    /// Purchased rank (`newPackageRank`), upgraded by `monthlyPackageRank`
    Package {
        package: Option<&'a str>,
        monthly: Option<&'a str>,
    },
}

impl<'a> RankSource<'a> {
    pub fn resolve(record: &'a Map<String, Value>) -> Self {
        let field = move |name: &str| {
            record
                .get(name)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        };
        if let Some(prefix) = field("prefix") {
            return RankSource::Prefix(prefix);
        }
        if let Some(rank) = field("rank").filter(|rank| *rank != "NORMAL") {
            return RankSource::Legacy(rank);
        }
        RankSource::Package {
            package: field("newPackageRank"),
            monthly: field("monthlyPackageRank"),
        }
    }

    /// Bare rank text, empty when the source names no known rank
    pub fn text(&self) -> String {
        match self {
            RankSource::Prefix(prefix) => strip_formatting(prefix),
            // unknown legacy ranks are rankless, not an error
            RankSource::Legacy(rank) => match *rank {
                "MODERATOR" => "MOD",
                "YOUTUBER" => "Youtuber",
                "HELPER" => "Helper",
                "ADMIN" => "Admin",
                _ => "",
            }
            .to_string(),
            RankSource::Package { package, monthly } => match *package {
                Some("MVP_PLUS") if *monthly == Some("SUPERSTAR") => "MVP++",
                Some("MVP_PLUS") => "MVP+",
                Some("MVP") => "MVP",
                Some("VIP_PLUS") => "VIP+",
                Some("VIP") => "VIP",
                _ => "",
            }
            .to_string(),
        }
    }
}

/// Drops `§x` color codes and square brackets.
fn strip_formatting(prefix: &str) -> String {
    let mut out = String::with_capacity(prefix.len());
    let mut chars = prefix.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '[' | ']' => {}
            '§' if chars
                .peek()
                .map_or(false, |c| c.is_ascii_digit() || c.is_ascii_lowercase() || *c == '|') =>
            {
                chars.next();
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Display rank of a player record.
///
/// With `formatting` the bare rank is returned (`MVP+`), without it the rank is
/// wrapped in brackets (`[MVP+]`). A record with no rank yields an empty string
/// either way.
pub fn rank_label(record: &Map<String, Value>, formatting: bool) -> String {
    let rank = RankSource::resolve(record).text();
    if rank.is_empty() || formatting {
        rank
    } else {
        format!("[{}]", rank)
    }
}

fn as_millis(value: Option<&Value>) -> i64 {
    value
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .unwrap_or_default()
}

/// Player record from the `player` endpoint with its derived attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Player {
    raw: Map<String, Value>,
}

impl Player {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.raw.get(field)
    }
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }
    pub fn into_raw(self) -> Map<String, Value> {
        self.raw
    }

    pub fn uuid(&self) -> Option<&str> {
        self.raw.get("uuid").and_then(Value::as_str)
    }
    pub fn display_name(&self) -> Option<&str> {
        self.raw.get("displayname").and_then(Value::as_str)
    }
    pub fn network_exp(&self) -> f64 {
        self.raw
            .get("networkExp")
            .and_then(Value::as_f64)
            .unwrap_or_default()
    }
    /// Epoch millis, 0 when the player hides it
    pub fn last_login(&self) -> i64 {
        as_millis(self.raw.get("lastLogin"))
    }
    pub fn last_logout(&self) -> i64 {
        as_millis(self.raw.get("lastLogout"))
    }

    pub fn level(&self) -> u64 {
        network_level(self.network_exp())
    }
    pub fn is_online(&self) -> bool {
        is_online(self.last_login(), self.last_logout())
    }
    pub fn rank(&self, formatting: bool) -> String {
        rank_label(&self.raw, formatting)
    }
}

impl From<Map<String, Value>> for Player {
    fn from(raw: Map<String, Value>) -> Self {
        Self { raw }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[rstest]
    #[case(-1.0, 1)]
    #[case(-25_000.0, 1)]
    #[case(0.0, 1)]
    #[case(2_500.0, 1)]
    #[case(7_500.0, 1)]
    #[case(10_000.0, 2)]
    #[case(15_000.0, 2)]
    #[case(22_500.0, 3)]
    #[case(30_000.0, 3)]
    #[case(37_500.0, 4)]
    #[case(55_000.0, 5)]
    #[case(1_200_000.0, 28)]
    #[case(10_000_000.0, 87)]
    fn level_from_experience(#[case] experience: f64, #[case] level: u64) {
        assert_eq!(network_level(experience), level);
    }

    #[test]
    fn online_status() {
        assert!(is_online(100, 50));
        assert!(!is_online(50, 100));
        assert!(!is_online(100, 100));
    }

    #[rstest]
    #[case(json!({"prefix": "§6[MVP§c+§6]"}), true, "MVP+")]
    #[case(json!({"prefix": "§c[OWNER]", "rank": "ADMIN"}), true, "OWNER")]
    #[case(json!({"prefix": "§d[PIG§b+++§d]"}), false, "[PIG+++]")]
    #[case(json!({"prefix": "", "rank": "HELPER"}), true, "Helper")]
    #[case(json!({"rank": "ADMIN"}), false, "[Admin]")]
    #[case(json!({"rank": "MODERATOR"}), true, "MOD")]
    #[case(json!({"rank": "YOUTUBER"}), true, "Youtuber")]
    #[case(json!({"rank": "GAME_MASTER", "newPackageRank": "MVP"}), true, "")]
    #[case(json!({"rank": "GAME_MASTER"}), false, "")]
    #[case(json!({"rank": "NORMAL", "newPackageRank": "VIP_PLUS"}), true, "VIP+")]
    #[case(json!({"newPackageRank": "MVP_PLUS", "monthlyPackageRank": "SUPERSTAR"}), true, "MVP++")]
    #[case(json!({"newPackageRank": "MVP_PLUS", "monthlyPackageRank": "NONE"}), true, "MVP+")]
    #[case(json!({"newPackageRank": "MVP_PLUS"}), true, "MVP+")]
    #[case(json!({"newPackageRank": "MVP"}), false, "[MVP]")]
    #[case(json!({"newPackageRank": "VIP"}), true, "VIP")]
    #[case(json!({"newPackageRank": "NONE"}), false, "")]
    #[case(json!({}), true, "")]
    #[case(json!({}), false, "")]
    fn rank_precedence(#[case] value: Value, #[case] formatting: bool, #[case] expected: &str) {
        assert_eq!(rank_label(&record(value), formatting), expected);
    }

    #[test]
    fn rank_source_order() {
        let raw = record(json!({"prefix": "[X]", "rank": "ADMIN", "newPackageRank": "MVP"}));
        assert_eq!(RankSource::resolve(&raw), RankSource::Prefix("[X]"));

        let raw = record(json!({"rank": "ADMIN", "newPackageRank": "MVP"}));
        assert_eq!(RankSource::resolve(&raw), RankSource::Legacy("ADMIN"));

        let raw = record(json!({"rank": 5, "newPackageRank": "MVP"}));
        assert_eq!(
            RankSource::resolve(&raw),
            RankSource::Package {
                package: Some("MVP"),
                monthly: None
            }
        );
    }

    #[test]
    fn player_accessors_default_when_missing() {
        let player = Player::default();
        assert_eq!(player.level(), 1);
        assert!(!player.is_online());
        assert_eq!(player.rank(false), "");
        assert_eq!(player.uuid(), None);

        let player = Player::from(record(
            json!({"lastLogin": 1.6e12, "lastLogout": 1_500_000_000_000i64, "networkExp": 22_500}),
        ));
        assert!(player.is_online());
        assert_eq!(player.last_login(), 1_600_000_000_000);
        assert_eq!(player.level(), 3);
    }
}
