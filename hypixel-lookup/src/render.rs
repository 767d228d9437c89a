use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use hypixel_sdk::{Guild, Player};

pub fn timestamp(millis: i64, tz: &Tz) -> String {
    if millis <= 0 {
        return "never".to_string();
    }
    match Utc.timestamp_millis_opt(millis).single() {
        Some(time) => time.with_timezone(tz).format("%Y-%m-%d %H:%M %Z").to_string(),
        None => "never".to_string(),
    }
}

pub fn player(player: &Player, tz: &Tz) -> String {
    let name = player.display_name().unwrap_or("unknown");
    let rank = player.rank(false);
    let head = if rank.is_empty() {
        name.to_string()
    } else {
        format!("{} {}", rank, name)
    };
    let status = if player.is_online() { "online" } else { "offline" };
    format!(
        "{}\n  level: {}\n  status: {}\n  last login: {}",
        head,
        player.level(),
        status,
        timestamp(player.last_login(), tz)
    )
}

pub fn guild(guild: &Guild) -> String {
    let name = guild.name().unwrap_or("unknown");
    let head = match guild.tag() {
        Some(tag) => format!("{} [{}]", name, tag),
        None => name.to_string(),
    };
    format!(
        "{}\n  level: {}\n  members: {}",
        head,
        guild.level(),
        guild.member_count()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn timestamps() {
        assert_eq!(timestamp(0, &Tz::UTC), "never");
        assert_eq!(timestamp(1_600_000_000_000, &Tz::UTC), "2020-09-13 12:26 UTC");
        assert_eq!(
            timestamp(1_600_000_000_000, &chrono_tz::Asia::Tokyo),
            "2020-09-13 21:26 JST"
        );
    }

    #[test]
    fn player_summary() {
        let player: Player = serde_json::from_value(json!({
            "displayname": "Notch",
            "newPackageRank": "MVP_PLUS",
            "networkExp": 22_500,
            "lastLogin": 1_600_000_000_000i64,
            "lastLogout": 1_500_000_000_000i64
        }))
        .unwrap();
        assert_eq!(
            super::player(&player, &Tz::UTC),
            "[MVP+] Notch\n  level: 3\n  status: online\n  last login: 2020-09-13 12:26 UTC"
        );
    }

    #[test]
    fn guild_summary() {
        let guild: Guild = serde_json::from_value(json!({
            "name": "Foo",
            "exp": 100_000,
            "members": [{"uuid": "a"}, {"uuid": "b"}]
        }))
        .unwrap();
        assert_eq!(super::guild(&guild), "Foo\n  level: 1\n  members: 2");
    }
}
