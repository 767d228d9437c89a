use reqwest::Url;

pub const API_HOST: &str = "https://api.hypixel.net";

/// Query parameters of one request, in the order they are sent
pub type Query = Vec<(String, String)>;

pub fn query<I, K, V>(pairs: I) -> Query
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Builds `host/path?query&key=...`, form-encoding every parameter.
///
/// `host` must be a base URL, which the client builder checks.
pub fn build_path(host: &Url, path: &str, query: &[(String, String)], key: &str) -> Url {
    let mut url = host.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(path);
    }
    url.query_pairs_mut()
        .clear()
        .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .append_pair("key", key);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0123abcd-0000-1111-2222-333344445555";

    fn host() -> Url {
        Url::parse(API_HOST).unwrap()
    }

    #[test]
    fn key_is_the_only_param_without_query() {
        let url = build_path(&host(), "boosters", &[], KEY);
        assert_eq!(
            url.as_str(),
            "https://api.hypixel.net/boosters?key=0123abcd-0000-1111-2222-333344445555"
        );
    }

    #[test]
    fn params_come_before_key() {
        let url = build_path(&host(), "guild", &query([("name", "Foo")]), KEY);
        assert_eq!(
            url.as_str(),
            "https://api.hypixel.net/guild?name=Foo&key=0123abcd-0000-1111-2222-333344445555"
        );
    }

    #[test]
    fn values_are_encoded() {
        let url = build_path(&host(), "player", &query([("name", "a b&c=d/é?")]), KEY);
        assert_eq!(
            url.query(),
            Some("name=a+b%26c%3Dd%2F%C3%A9%3F&key=0123abcd-0000-1111-2222-333344445555")
        );
        let decoded = url.query_pairs().collect::<Vec<_>>();
        assert_eq!(decoded[0].1, "a b&c=d/é?");
        assert_eq!(decoded[1].1, KEY);
    }

    #[test]
    fn host_with_path_prefix() {
        let host = Url::parse("http://localhost:8080/proxy/").unwrap();
        let url = build_path(&host, "player", &query([("uuid", "abc")]), KEY);
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/proxy/player?uuid=abc&key=0123abcd-0000-1111-2222-333344445555"
        );
    }

    #[test]
    fn host_query_is_replaced() {
        let host = Url::parse("http://localhost:8080/?key=stale").unwrap();
        let url = build_path(&host, "key", &[], KEY);
        assert_eq!(url.query_pairs().count(), 1);
        assert_eq!(url.path(), "/key");
    }
}
