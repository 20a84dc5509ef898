//! Named configuration lookup used for credential and flag fallbacks.
//!
//! Keys are namespaced per protocol (`sftp.username`, `http.ignoreSSL`, ...).
//! Values are plain strings; interpretation (e.g. booleans) is up to the caller.

use std::collections::HashMap;

pub const SFTP_USERNAME: &str = "sftp.username";
pub const SFTP_PASSWORD: &str = "sftp.password";
pub const SFTP_HOST_CHECKING: &str = "sftp.hostChecking";
pub const SMB_DOMAIN: &str = "smb.domain";
pub const SMB_USERNAME: &str = "smb.username";
pub const SMB_PASSWORD: &str = "smb.password";
pub const HTTP_USERNAME: &str = "http.username";
pub const HTTP_PASSWORD: &str = "http.password";
pub const HTTP_IGNORE_SSL: &str = "http.ignoreSSL";

/// Source of named configuration values.
pub trait ConfigLookup: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

impl<F> ConfigLookup for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn get(&self, key: &str) -> Option<String> {
        self(key)
    }
}

/// Parses a boolean leniently. Absent or unrecognised values yield `default`.
pub fn parse_bool(value: Option<&str>, default: bool) -> bool {
    let Some(raw) = value else {
        return default;
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "y" | "t" | "1" => true,
        "false" | "no" | "off" | "n" | "f" | "0" => false,
        _ => default,
    }
}

/// Looks up `key` and parses it with [`parse_bool`].
pub fn get_bool(lookup: &dyn ConfigLookup, key: &str, default: bool) -> bool {
    parse_bool(lookup.get(key).as_deref(), default)
}

/// Lookup that never has a value.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

impl ConfigLookup for NoLookup {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }
}

/// In-memory lookup.
#[derive(Debug, Clone, Default)]
pub struct MapLookup {
    values: HashMap<String, String>,
}

impl MapLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl ConfigLookup for MapLookup {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Environment variable lookup: `sftp.hostChecking` → `FETCHR_SFTP_HOSTCHECKING`.
#[derive(Debug, Clone)]
pub struct EnvLookup {
    prefix: String,
}

impl EnvLookup {
    pub fn new() -> Self {
        Self::with_prefix("FETCHR")
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn var_name(&self, key: &str) -> String {
        let mut name = String::with_capacity(self.prefix.len() + key.len() + 1);
        name.push_str(&self.prefix);
        name.push('_');
        for c in key.chars() {
            if c.is_ascii_alphanumeric() {
                name.push(c.to_ascii_uppercase());
            } else {
                name.push('_');
            }
        }
        name
    }
}

impl Default for EnvLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLookup for EnvLookup {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(self.var_name(key)).ok()
    }
}

/// TOML document flattened to dotted keys (`[sftp] username = "x"` → `sftp.username`).
/// Scalars are stringified; arrays are skipped.
#[derive(Debug, Clone, Default)]
pub struct TomlLookup {
    values: HashMap<String, String>,
}

impl TomlLookup {
    pub fn from_table(table: &toml::Table) -> Self {
        let mut values = HashMap::new();
        flatten("", table, &mut values);
        Self { values }
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let table: toml::Table = toml::from_str(text)?;
        Ok(Self::from_table(&table))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn flatten(prefix: &str, table: &toml::Table, out: &mut HashMap<String, String>) {
    for (k, v) in table {
        let key = if prefix.is_empty() {
            k.clone()
        } else {
            format!("{}.{}", prefix, k)
        };
        match v {
            toml::Value::Table(t) => flatten(&key, t, out),
            toml::Value::String(s) => {
                out.insert(key, s.clone());
            }
            toml::Value::Integer(i) => {
                out.insert(key, i.to_string());
            }
            toml::Value::Float(f) => {
                out.insert(key, f.to_string());
            }
            toml::Value::Boolean(b) => {
                out.insert(key, b.to_string());
            }
            toml::Value::Datetime(d) => {
                out.insert(key, d.to_string());
            }
            toml::Value::Array(_) => {}
        }
    }
}

impl ConfigLookup for TomlLookup {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Asks each layer in order; the first value found wins.
#[derive(Default)]
pub struct LayeredLookup {
    layers: Vec<Box<dyn ConfigLookup>>,
}

impl LayeredLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer(mut self, lookup: impl ConfigLookup + 'static) -> Self {
        self.layers.push(Box::new(lookup));
        self
    }
}

impl ConfigLookup for LayeredLookup {
    fn get(&self, key: &str) -> Option<String> {
        self.layers.iter().find_map(|l| l.get(key))
    }
}

impl std::fmt::Debug for LayeredLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredLookup")
            .field("layers", &self.layers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_bool_parsing() {
        assert!(parse_bool(Some("true"), false));
        assert!(parse_bool(Some(" YES "), false));
        assert!(parse_bool(Some("on"), false));
        assert!(!parse_bool(Some("false"), true));
        assert!(!parse_bool(Some("Off"), true));
        assert!(!parse_bool(Some("0"), true));
        // Absent or garbage falls back to the default, never an error.
        assert!(parse_bool(None, true));
        assert!(!parse_bool(None, false));
        assert!(parse_bool(Some("maybe"), true));
        assert!(!parse_bool(Some(""), false));
    }

    #[test]
    fn map_lookup_and_get_bool() {
        let lookup = MapLookup::new()
            .with(HTTP_IGNORE_SSL, "false")
            .with(SFTP_USERNAME, "deploy");
        assert_eq!(lookup.get(SFTP_USERNAME).as_deref(), Some("deploy"));
        assert_eq!(lookup.get(SFTP_PASSWORD), None);
        assert!(!get_bool(&lookup, HTTP_IGNORE_SSL, true));
        assert!(get_bool(&lookup, SFTP_HOST_CHECKING, true));
    }

    #[test]
    fn env_var_names() {
        let env = EnvLookup::new();
        assert_eq!(env.var_name(SFTP_HOST_CHECKING), "FETCHR_SFTP_HOSTCHECKING");
        assert_eq!(env.var_name(HTTP_IGNORE_SSL), "FETCHR_HTTP_IGNORESSL");
        assert_eq!(
            EnvLookup::with_prefix("AEM").var_name(SMB_DOMAIN),
            "AEM_SMB_DOMAIN"
        );
    }

    #[test]
    fn env_lookup_reads_process_env() {
        let env = EnvLookup::with_prefix("FETCHR_LOOKUP_TEST");
        std::env::set_var("FETCHR_LOOKUP_TEST_SMB_USERNAME", "svc");
        assert_eq!(env.get(SMB_USERNAME).as_deref(), Some("svc"));
        assert_eq!(env.get(SMB_PASSWORD), None);
        std::env::remove_var("FETCHR_LOOKUP_TEST_SMB_USERNAME");
    }

    #[test]
    fn toml_lookup_flattens_tables() {
        let lookup = TomlLookup::parse(
            r#"
            download_dir = "/var/cache/fetchr"
            tags = ["a", "b"]

            [sftp]
            username = "deploy"
            hostChecking = true

            [http]
            ignoreSSL = "false"
            "#,
        )
        .unwrap();
        assert_eq!(lookup.get(SFTP_USERNAME).as_deref(), Some("deploy"));
        assert_eq!(lookup.get(SFTP_HOST_CHECKING).as_deref(), Some("true"));
        assert_eq!(lookup.get(HTTP_IGNORE_SSL).as_deref(), Some("false"));
        assert_eq!(lookup.get("download_dir").as_deref(), Some("/var/cache/fetchr"));
        assert_eq!(lookup.get("tags"), None);
        assert_eq!(lookup.len(), 4);
    }

    #[test]
    fn layered_lookup_first_hit_wins() {
        let lookup = LayeredLookup::new()
            .layer(MapLookup::new().with(HTTP_USERNAME, "override"))
            .layer(
                MapLookup::new()
                    .with(HTTP_USERNAME, "base")
                    .with(HTTP_PASSWORD, "secret"),
            );
        assert_eq!(lookup.get(HTTP_USERNAME).as_deref(), Some("override"));
        assert_eq!(lookup.get(HTTP_PASSWORD).as_deref(), Some("secret"));
        assert_eq!(lookup.get(SMB_DOMAIN), None);
    }

    #[test]
    fn closures_are_lookups() {
        let lookup = |key: &str| (key == SMB_DOMAIN).then(|| "CORP".to_string());
        assert_eq!(ConfigLookup::get(&lookup, SMB_DOMAIN).as_deref(), Some("CORP"));
        assert_eq!(NoLookup.get(SMB_DOMAIN), None);
    }
}
