//! Shape checks and normalization for search terms

fn is_hex(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Minecraft UUID, either 32 hex digits or dashed 8-4-4-4-12. Case-insensitive.
pub fn is_uuid(search: &str) -> bool {
    match search.len() {
        32 => is_hex(search),
        36 => {
            let groups = search.split('-').collect::<Vec<_>>();
            groups.len() == 5
                && groups
                    .iter()
                    .zip([8, 4, 4, 4, 12])
                    .all(|(group, len)| group.len() == len && is_hex(group))
        }
        _ => false,
    }
}

/// Guild ids are 24 hex digit object ids
pub fn is_guild_id(search: &str) -> bool {
    search.len() == 24 && is_hex(search)
}

/// Trims and undashes an identifier and lowercases it, so `069A79F4-44E9-...`
/// and `069a79f444e9...` query the same record.
pub fn clean(search: &str) -> String {
    search
        .trim()
        .chars()
        .filter(|c| *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_shapes() {
        assert!(is_uuid("069a79f444e94726a5befca90e38aaf5"));
        assert!(is_uuid("069a79f4-44e9-4726-a5be-fca90e38aaf5"));
        assert!(is_uuid("069A79F4-44E9-4726-A5BE-FCA90E38AAF5"));
        assert!(!is_uuid("069a79f4-44e94726-a5be-fca90e38aaf5-"));
        assert!(!is_uuid("069a79f444e94726a5befca90e38aaz5"));
        assert!(!is_uuid("Notch"));
        assert!(!is_uuid(""));
    }

    #[test]
    fn guild_id_shape() {
        assert!(is_guild_id("52e5719684ae51ed0c716c69"));
        assert!(!is_guild_id("52e5719684ae51ed0c716c6"));
        assert!(!is_guild_id("52e5719684ae51ed0c716c6g"));
        assert!(!is_guild_id("069a79f444e94726a5befca90e38aaf5"));
    }

    #[test]
    fn cleaning() {
        assert_eq!(
            clean(" 069A79F4-44E9-4726-A5BE-FCA90E38AAF5 "),
            "069a79f444e94726a5befca90e38aaf5"
        );
        assert_eq!(clean("Notch"), "notch");
    }
}
