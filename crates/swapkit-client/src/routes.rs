//! Transport routes: the ordered ways of reaching the processing service.
//!
//! Each route maps a logical target URL to the concrete URL actually called.
//! Order encodes cost and reliability: the premium relay (highest bypass
//! success rate) first, then a direct call, then the public passthrough
//! relays as a last resort.

use swapkit_core::TransportConfig;

const PREMIUM_RELAY_BASE: &str = "https://api.scraperapi.com";

/// One way of reaching a remote endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// Paid relay with elevated bypass parameters.
    PremiumRelay { api_key: String },
    /// Call the target URL as-is.
    Direct,
    /// Public relay that appends the encoded target to a fixed prefix.
    Passthrough { name: String, prefix: String },
}

impl Route {
    pub fn passthrough(name: &str, prefix: &str) -> Self {
        Route::Passthrough {
            name: name.to_string(),
            prefix: prefix.to_string(),
        }
    }

    /// Short label for attempt records and logs.
    pub fn label(&self) -> &str {
        match self {
            Route::PremiumRelay { .. } => "premium-relay",
            Route::Direct => "direct",
            Route::Passthrough { name, .. } => name,
        }
    }

    /// Map the logical target URL to the concrete URL for this route.
    pub fn resolve(&self, target_url: &str) -> String {
        match self {
            Route::PremiumRelay { api_key } => format!(
                "{}?api_key={}&keep_headers=true&country_code=us&url={}",
                PREMIUM_RELAY_BASE,
                api_key,
                urlencoding::encode(target_url)
            ),
            Route::Direct => target_url.to_string(),
            Route::Passthrough { prefix, .. } => {
                format!("{}{}", prefix, urlencoding::encode(target_url))
            }
        }
    }
}

/// The standard route order for the processing service. An empty premium
/// relay key drops that route.
pub fn standard_routes(transport: &TransportConfig) -> Vec<Route> {
    let mut routes = Vec::with_capacity(5);
    if !transport.premium_relay_key.is_empty() {
        routes.push(Route::PremiumRelay {
            api_key: transport.premium_relay_key.clone(),
        });
    }
    routes.push(Route::Direct);
    routes.push(Route::passthrough(
        "allorigins",
        "https://api.allorigins.win/raw?url=",
    ));
    routes.push(Route::passthrough("corsproxy", "https://corsproxy.io/?url="));
    routes.push(Route::passthrough(
        "codetabs",
        "https://api.codetabs.com/v1/proxy?quest=",
    ));
    routes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(key: &str) -> TransportConfig {
        TransportConfig {
            premium_relay_key: key.to_string(),
            attempt_timeout_secs: 45,
        }
    }

    #[test]
    fn test_standard_route_order() {
        let routes = standard_routes(&transport("k"));
        let labels: Vec<&str> = routes.iter().map(|r| r.label()).collect();
        assert_eq!(
            labels,
            vec!["premium-relay", "direct", "allorigins", "corsproxy", "codetabs"]
        );
    }

    #[test]
    fn test_empty_key_drops_premium_relay() {
        let routes = standard_routes(&transport(""));
        assert_eq!(routes[0], Route::Direct);
        assert_eq!(routes.len(), 4);
    }

    #[test]
    fn test_direct_resolves_identity() {
        let url = "https://svc.example/processor/v1/task/query";
        assert_eq!(Route::Direct.resolve(url), url);
    }

    #[test]
    fn test_premium_relay_encodes_target() {
        let route = Route::PremiumRelay {
            api_key: "secret".to_string(),
        };
        let concrete = route.resolve("https://svc.example/a?b=c");
        assert!(concrete.starts_with("https://api.scraperapi.com?api_key=secret"));
        assert!(concrete.contains("keep_headers=true"));
        assert!(concrete.contains("country_code=us"));
        assert!(concrete.ends_with("url=https%3A%2F%2Fsvc.example%2Fa%3Fb%3Dc"));
    }

    #[test]
    fn test_passthrough_appends_encoded_target() {
        let route = Route::passthrough("allorigins", "https://api.allorigins.win/raw?url=");
        assert_eq!(
            route.resolve("https://svc.example/x"),
            "https://api.allorigins.win/raw?url=https%3A%2F%2Fsvc.example%2Fx"
        );
    }
}
