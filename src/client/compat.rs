//! Environment Compatibility Rules
//!
//! Decides, once per page load and before anything else runs, whether the
//! page must be reloaded somewhere else to dodge browser/host quirks:
//!
//! - Safari upgrades `localhost` to HTTPS on its own and then fails the TLS
//!   handshake against the dev server, so Safari is steered to `127.0.0.1`.
//! - Loopback pages served over `https:` are sent back to `http:`.
//!
//! Navigation rules live in [`NAVIGATION_RULES`], evaluated in order; the
//! first rule whose predicate matches decides the outcome. Tunnel domains
//! never redirect; they get element-level substitutions instead.
//!
//! Everything here is a pure function of [`PageEnvironment`].

use crate::client::page::Page;
use crate::shared::error::SharedError;
use reqwest::Url;

/// Port the dev server listens on when the URL carries none
pub const DEFAULT_DEV_PORT: u16 = 3000;

/// Where Safari is sent when it lands on a loopback login page
pub const SAFARI_LOOPBACK_LOGIN_URL: &str = "http://127.0.0.1:3000/login";

const LOOPBACK_IP: &str = "127.0.0.1";
const LOOPBACK_NAME: &str = "localhost";

const TUNNEL_SUFFIXES: [&str; 3] = [".ngrok.io", ".ngrok-free.app", ".ngrok.app"];

/// Agent tokens that rule out Safari even though they mention it
const NON_SAFARI_TOKENS: [&str; 6] = ["chrome", "chromium", "crios", "fxios", "edg", "android"];

/// Inputs of the compatibility decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEnvironment {
    pub user_agent: String,
    pub hostname: String,
    /// Scheme with trailing colon, as `location.protocol` reports it
    pub protocol: String,
    pub path: String,
    /// Query without the leading `?`
    pub query: Option<String>,
    /// Fragment without the leading `#`
    pub fragment: Option<String>,
    pub port: Option<u16>,
}

impl PageEnvironment {
    /// Build the environment from the agent string and the full page URL
    pub fn from_url(user_agent: impl Into<String>, url: &str) -> Result<Self, SharedError> {
        let parsed = Url::parse(url).map_err(|e| SharedError::validation("url", e.to_string()))?;
        let hostname = parsed
            .host_str()
            .ok_or_else(|| SharedError::validation("url", "URL has no host"))?
            .to_string();
        Ok(Self {
            user_agent: user_agent.into(),
            hostname,
            protocol: format!("{}:", parsed.scheme()),
            path: parsed.path().to_string(),
            query: parsed.query().map(str::to_string),
            fragment: parsed.fragment().map(str::to_string),
            port: parsed.port(),
        })
    }

    pub fn is_safari(&self) -> bool {
        let agent = self.user_agent.to_ascii_lowercase();
        agent.contains("safari") && !NON_SAFARI_TOKENS.iter().any(|token| agent.contains(token))
    }

    pub fn is_loopback(&self) -> bool {
        self.hostname == LOOPBACK_NAME || self.hostname == LOOPBACK_IP
    }

    pub fn is_tunnel(&self) -> bool {
        let host = self.hostname.to_ascii_lowercase();
        TUNNEL_SUFFIXES.iter().any(|suffix| host.ends_with(suffix))
    }

    pub fn is_secure(&self) -> bool {
        self.protocol == "https:"
    }

    pub fn is_login_page(&self) -> bool {
        matches!(self.path.as_str(), "/login" | "/login.html")
    }

    pub fn is_dashboard_page(&self) -> bool {
        matches!(self.path.as_str(), "/dashboard" | "/dashboard.html")
    }

    /// Current URL, reassembled
    pub fn href(&self) -> String {
        self.url_with(&self.protocol, &self.hostname, self.port)
    }

    /// This page's path, query and fragment on another origin
    fn url_with(&self, protocol: &str, host: &str, port: Option<u16>) -> String {
        let mut url = format!("{}//{}", protocol, host);
        if let Some(port) = port {
            url.push_str(&format!(":{}", port));
        }
        url.push_str(&self.path);
        if let Some(query) = &self.query {
            url.push('?');
            url.push_str(query);
        }
        if let Some(fragment) = &self.fragment {
            url.push('#');
            url.push_str(fragment);
        }
        url
    }
}

/// One navigation rule: when `applies`, replace the page with `target`
pub struct CompatRule {
    pub name: &'static str,
    pub applies: fn(&PageEnvironment) -> bool,
    pub target: fn(&PageEnvironment) -> String,
}

impl std::fmt::Debug for CompatRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompatRule").field("name", &self.name).finish()
    }
}

/// Navigation rules in priority order
pub const NAVIGATION_RULES: &[CompatRule] = &[
    CompatRule {
        name: "safari-login-loopback",
        applies: |env| env.is_safari() && env.is_loopback() && env.is_login_page(),
        target: |_| SAFARI_LOOPBACK_LOGIN_URL.to_string(),
    },
    CompatRule {
        name: "safari-dashboard-ip",
        applies: |env| env.is_safari() && env.hostname == LOOPBACK_NAME && env.is_dashboard_page(),
        target: |env| env.url_with("http:", LOOPBACK_IP, Some(env.port.unwrap_or(DEFAULT_DEV_PORT))),
    },
    CompatRule {
        name: "loopback-https-downgrade",
        applies: |env| env.is_loopback() && env.is_secure(),
        target: |env| {
            let host = if env.is_safari() { LOOPBACK_IP } else { env.hostname.as_str() };
            env.url_with("http:", host, Some(env.port.unwrap_or(DEFAULT_DEV_PORT)))
        },
    },
];

/// Full-page replacement chosen by a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub rule: &'static str,
    pub url: String,
}

/// Element-level fixes applied on tunnel domains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomSubstitution {
    /// Swap the form's submit button for a plain button whose click runs
    /// the submit handler directly
    ClickThroughSubmit {
        form_id: &'static str,
        button_id: &'static str,
    },
}

/// Outcome of evaluating the rules for one page load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompatDecision {
    pub redirect: Option<Redirect>,
    pub substitutions: Vec<DomSubstitution>,
}

impl CompatDecision {
    pub fn is_noop(&self) -> bool {
        self.redirect.is_none() && self.substitutions.is_empty()
    }

    /// Perform the redirect, if any. Returns true when the page navigated.
    pub fn apply(&self, page: &dyn Page) -> bool {
        match &self.redirect {
            Some(redirect) => {
                tracing::info!("Compatibility redirect ({}): {}", redirect.rule, redirect.url);
                page.replace_location(&redirect.url);
                true
            }
            None => false,
        }
    }
}

fn tunnel_substitutions(env: &PageEnvironment) -> Vec<DomSubstitution> {
    match env.path.as_str() {
        "/login" | "/login.html" => vec![DomSubstitution::ClickThroughSubmit {
            form_id: "login-form",
            button_id: "login-button",
        }],
        "/signup" | "/signup.html" => vec![DomSubstitution::ClickThroughSubmit {
            form_id: "signup-form",
            button_id: "signup-button",
        }],
        _ => Vec::new(),
    }
}

/// Decide what to do for this page load
pub fn evaluate(env: &PageEnvironment) -> CompatDecision {
    let redirect = NAVIGATION_RULES
        .iter()
        .find(|rule| (rule.applies)(env))
        .and_then(|rule| {
            let url = (rule.target)(env);
            if url == env.href() {
                tracing::debug!("Rule {} matched but page is already at {}", rule.name, url);
                None
            } else {
                Some(Redirect { rule: rule.name, url })
            }
        });

    let substitutions = if redirect.is_none() && env.is_tunnel() {
        tunnel_substitutions(env)
    } else {
        Vec::new()
    };

    CompatDecision {
        redirect,
        substitutions,
    }
}

/// Elements that are never rendered in a given environment
#[derive(Debug, Clone, Default)]
pub struct RenderFilter {
    hidden: Vec<&'static str>,
}

impl RenderFilter {
    /// The install-app banner cannot complete over a tunnel, so it is left
    /// out there.
    pub fn for_environment(env: &PageEnvironment) -> Self {
        let hidden = if env.is_tunnel() {
            vec!["install-app-banner"]
        } else {
            Vec::new()
        };
        Self { hidden }
    }

    pub fn is_hidden(&self, element_id: &str) -> bool {
        self.hidden.contains(&element_id)
    }

    /// Drop hidden elements from a render list
    pub fn retain<T>(&self, elements: Vec<T>, element_id: impl Fn(&T) -> &str) -> Vec<T> {
        elements
            .into_iter()
            .filter(|element| !self.is_hidden(element_id(element)))
            .collect()
    }
}
