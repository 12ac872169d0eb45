use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DbConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub supabase: SupabaseConfig,
    #[serde(default)]
    pub spotify: Option<ProviderConfig>,
    #[serde(default)]
    pub instagram: Option<ProviderConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_host")]
    pub host: String,
    #[serde(default = "default_api_port")]
    pub port: u16,
    /// Origin used for redirects back to the web app, e.g. `https://vynce.app`.
    #[serde(default)]
    pub public_url: Option<String>,
    #[serde(default)]
    pub environment: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_api_host(),
            port: default_api_port(),
            public_url: None,
            environment: None,
        }
    }
}

fn default_api_host() -> String {
    "0.0.0.0".into()
}

fn default_api_port() -> u16 {
    8080
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupabaseConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub anon_key: Option<String>,
    #[serde(default)]
    pub service_role_key: Option<String>,

    // HS256 secret shared with GoTrue (legacy Supabase projects)
    #[serde(default)]
    pub jwt_secret: Option<String>,

    // JWKS configuration (asymmetric signing keys)
    #[serde(default)]
    pub jwks_url: Option<String>,
    #[serde(default)]
    pub issuer: Option<String>,
}

impl SupabaseConfig {
    pub fn has_url(&self) -> bool {
        is_set(&self.url)
    }

    pub fn has_anon_key(&self) -> bool {
        is_set(&self.anon_key)
    }

    pub fn has_service_role_key(&self) -> bool {
        is_set(&self.service_role_key)
    }
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Client registration for an account-linking provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    #[serde(default)]
    pub authorize_url: Option<String>,
    #[serde(default)]
    pub token_url: Option<String>,
    // Instagram only: long-lived token exchange host
    #[serde(default)]
    pub graph_url: Option<String>,
}

impl Config {
    /// Load YAML from disk, substitute $(VAR)/${VAR} with env vars, then parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, anyhow::Error> {
        let expanded = expand_env_placeholders(raw)?;
        let mut cfg: Self = serde_yaml::from_str(&expanded)?;

        // Optional: allow DATABASE_URL env to override whatever YAML had
        if let Ok(url) = std::env::var("DATABASE_URL") {
            cfg.database.url = url;
        }

        if let Ok(jwt_secret) = std::env::var("SUPABASE_JWT_SECRET") {
            cfg.supabase.jwt_secret = Some(jwt_secret);
        }

        Ok(cfg)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

/// Expand $(VAR) and ${VAR} placeholders using environment variables.
fn expand_env_placeholders(input: &str) -> Result<String, anyhow::Error> {
    use anyhow::Context;

    let mut out = String::with_capacity(input.len());
    let mut it = input.chars().peekable();

    while let Some(c) = it.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        let close = match it.peek().copied() {
            Some('$') => {
                // Escape "$$" -> "$"
                it.next();
                out.push('$');
                continue;
            }
            Some('(') => ')',
            Some('{') => '}',
            _ => {
                out.push('$');
                continue;
            }
        };

        it.next();
        let var = read_until(&mut it, close)
            .with_context(|| format!("unterminated env placeholder: missing '{}'", close))?;
        let val = std::env::var(&var)
            .with_context(|| format!("missing environment variable: {}", var))?;
        out.push_str(&val);
    }

    Ok(out)
}

/// Read characters until we hit `end`, returning the collected string.
fn read_until<I>(it: &mut std::iter::Peekable<I>, end: char) -> Option<String>
where
    I: Iterator<Item = char>,
{
    let mut buf = String::new();
    for ch in it.by_ref() {
        if ch == end {
            return Some(buf);
        }
        buf.push(ch);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_parenthesised_placeholder() {
        std::env::set_var("VYNCE_TEST_DB_USER", "vynce");
        let out = expand_env_placeholders("postgres://$(VYNCE_TEST_DB_USER)@db").unwrap();
        assert_eq!(out, "postgres://vynce@db");
    }

    #[test]
    fn test_expand_braced_placeholder() {
        std::env::set_var("VYNCE_TEST_ANON", "anon-key");
        let out = expand_env_placeholders("anon_key: ${VYNCE_TEST_ANON}").unwrap();
        assert_eq!(out, "anon_key: anon-key");
    }

    #[test]
    fn test_expand_escaped_and_bare_dollar() {
        let out = expand_env_placeholders("price: $$5 and $x").unwrap();
        assert_eq!(out, "price: $5 and $x");
    }

    #[test]
    fn test_expand_missing_variable_fails() {
        let err = expand_env_placeholders("${VYNCE_TEST_DEFINITELY_UNSET}").unwrap_err();
        assert!(err.to_string().contains("VYNCE_TEST_DEFINITELY_UNSET"));
    }

    #[test]
    fn test_expand_unterminated_fails() {
        assert!(expand_env_placeholders("$(OPEN").is_err());
        assert!(expand_env_placeholders("${OPEN").is_err());
    }

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let cfg: Config = serde_yaml::from_str("database:\n  url: postgres://localhost/vynce\n").unwrap();

        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.api.host, "0.0.0.0");
        assert_eq!(cfg.api.port, 8080);
        assert!(cfg.spotify.is_none());
        assert!(cfg.instagram.is_none());
        assert!(!cfg.supabase.has_url());
        assert_eq!(cfg.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_parse_provider_section() {
        let yaml = r#"
database:
  url: postgres://localhost/vynce
spotify:
  client_id: abc
  client_secret: shh
  redirect_uri: http://localhost:8080/api/auth/spotify
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        let spotify = cfg.spotify.unwrap();
        assert_eq!(spotify.client_id, "abc");
        assert!(spotify.token_url.is_none());
    }

    #[test]
    fn test_blank_supabase_values_count_as_missing() {
        let supabase = SupabaseConfig {
            url: Some("  ".into()),
            anon_key: Some("key".into()),
            ..Default::default()
        };
        assert!(!supabase.has_url());
        assert!(supabase.has_anon_key());
        assert!(!supabase.has_service_role_key());
    }
}
