//! Property-based tests for the compatibility rules

use proptest::prelude::*;
use trashdrop::client::{evaluate, PageEnvironment};

const CHROME_UA: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Safari/537.36";
const SAFARI_UA: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_5) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15";

fn user_agent() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(CHROME_UA), Just(SAFARI_UA)]
}

fn page_path() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("/"),
        Just("/login"),
        Just("/signup"),
        Just("/dashboard"),
        Just("/dashboard.html"),
        Just("/request-pickup"),
    ]
}

fn env(
    agent: &str,
    host: &str,
    protocol: &str,
    path: &str,
    port: Option<u16>,
    query: Option<String>,
    fragment: Option<String>,
) -> PageEnvironment {
    PageEnvironment {
        user_agent: agent.to_string(),
        hostname: host.to_string(),
        protocol: protocol.to_string(),
        path: path.to_string(),
        query,
        fragment,
        port,
    }
}

proptest! {
    #[test]
    fn test_public_hosts_are_untouched(
        agent in user_agent(),
        host in "[a-z]{1,12}\\.(com|org|net|app)",
        secure in any::<bool>(),
        path in page_path(),
        port in proptest::option::of(1024u16..65535),
    ) {
        let protocol = if secure { "https:" } else { "http:" };
        let decision = evaluate(&env(agent, &host, protocol, path, port, None, None));
        prop_assert!(decision.is_noop(), "unexpected decision {:?}", decision);
    }

    #[test]
    fn test_localhost_https_downgrade_keeps_location(
        port in 1024u16..65535,
        query in proptest::option::of("[a-z]{1,8}=[a-z0-9]{1,8}"),
        fragment in proptest::option::of("[a-z]{1,8}"),
    ) {
        let page = env(CHROME_UA, "localhost", "https:", "/dashboard", Some(port), query.clone(), fragment.clone());
        let redirect = evaluate(&page).redirect.expect("https on localhost must redirect");

        let mut expected = format!("http://localhost:{}/dashboard", port);
        if let Some(q) = &query {
            expected.push('?');
            expected.push_str(q);
        }
        if let Some(f) = &fragment {
            expected.push('#');
            expected.push_str(f);
        }
        prop_assert_eq!(redirect.url, expected);
    }

    #[test]
    fn test_safari_dashboard_moves_to_loopback_ip(
        port in 1024u16..65535,
        secure in any::<bool>(),
        query in proptest::option::of("[a-z]{1,8}=[a-z0-9]{1,8}"),
    ) {
        let protocol = if secure { "https:" } else { "http:" };
        let page = env(SAFARI_UA, "localhost", protocol, "/dashboard", Some(port), query.clone(), None);
        let redirect = evaluate(&page).redirect.expect("Safari on localhost must redirect");

        let url = reqwest::Url::parse(&redirect.url).unwrap();
        prop_assert_eq!(url.scheme(), "http");
        prop_assert_eq!(url.host_str(), Some("127.0.0.1"));
        prop_assert_eq!(url.port(), Some(port));
        prop_assert_eq!(url.path(), "/dashboard");
        prop_assert_eq!(url.query().map(str::to_string), query);
        prop_assert!(evaluate(&PageEnvironment::from_url(SAFARI_UA, &redirect.url).unwrap()).is_noop());
    }

    #[test]
    fn test_evaluation_is_idempotent_after_redirect(
        agent in user_agent(),
        host in prop_oneof![Just("localhost"), Just("127.0.0.1")],
        secure in any::<bool>(),
        path in page_path(),
        port in 1024u16..65535,
    ) {
        // Following redirects must settle, never loop
        let protocol = if secure { "https:" } else { "http:" };
        let mut url = env(agent, host, protocol, path, Some(port), None, None).href();
        let mut hops = 0;
        loop {
            let page = PageEnvironment::from_url(agent, &url).unwrap();
            match evaluate(&page).redirect {
                Some(redirect) => {
                    url = redirect.url;
                    hops += 1;
                    prop_assert!(hops <= 3, "redirect loop at {}", url);
                }
                None => break,
            }
        }
    }
}
