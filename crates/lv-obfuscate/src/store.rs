//! Consistency store: per-category substitute caches.
//!
//! Keys are the original matched text (or the literal number); values are
//! the substitutes. The first substitute recorded for a key is the one every
//! later lookup returns until the store is cleared.

use crate::config::ObfuscatorConfig;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Schema version for exported mapping snapshots.
pub const MAPPINGS_SCHEMA_VERSION: &str = "1.0.0";

/// Identifier category, one cache each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Ip,
    Hostname,
    ReplicaSet,
    /// Emails, namespaces and FQDNs share one map.
    Name,
    Ssn,
    Mac,
    Phone,
    Card,
    Int,
    Float,
}

impl Category {
    /// All categories, in export order.
    pub const ALL: [Category; 10] = [
        Category::Card,
        Category::Hostname,
        Category::Ip,
        Category::Mac,
        Category::Name,
        Category::Phone,
        Category::ReplicaSet,
        Category::Ssn,
        Category::Int,
        Category::Float,
    ];

    /// Stable lowercase name, used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Ip => "ip",
            Category::Hostname => "hostname",
            Category::ReplicaSet => "replset",
            Category::Name => "name",
            Category::Ssn => "ssn",
            Category::Mac => "mac",
            Category::Phone => "phone",
            Category::Card => "card",
            Category::Int => "int",
            Category::Float => "number",
        }
    }

    /// Whether the category keeps `substitute -> substitute` entries.
    pub fn keeps_self_mappings(&self) -> bool {
        matches!(
            self,
            Category::Name | Category::Hostname | Category::ReplicaSet
        )
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Named substitute caches owned by one engine.
#[derive(Debug, Clone, Default)]
pub struct ConsistencyStore {
    ip: HashMap<String, String>,
    hostname: HashMap<String, String>,
    replica_set: HashMap<String, String>,
    name: HashMap<String, String>,
    ssn: HashMap<String, String>,
    mac: HashMap<String, String>,
    phone: HashMap<String, String>,
    card: HashMap<String, String>,
    int: HashMap<i64, i64>,
    float: HashMap<String, f64>,
}

impl ConsistencyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn text_map(&self, category: Category) -> Option<&HashMap<String, String>> {
        match category {
            Category::Ip => Some(&self.ip),
            Category::Hostname => Some(&self.hostname),
            Category::ReplicaSet => Some(&self.replica_set),
            Category::Name => Some(&self.name),
            Category::Ssn => Some(&self.ssn),
            Category::Mac => Some(&self.mac),
            Category::Phone => Some(&self.phone),
            Category::Card => Some(&self.card),
            Category::Int | Category::Float => None,
        }
    }

    fn text_map_mut(&mut self, category: Category) -> Option<&mut HashMap<String, String>> {
        match category {
            Category::Ip => Some(&mut self.ip),
            Category::Hostname => Some(&mut self.hostname),
            Category::ReplicaSet => Some(&mut self.replica_set),
            Category::Name => Some(&mut self.name),
            Category::Ssn => Some(&mut self.ssn),
            Category::Mac => Some(&mut self.mac),
            Category::Phone => Some(&mut self.phone),
            Category::Card => Some(&mut self.card),
            Category::Int | Category::Float => None,
        }
    }

    /// Cached substitute for a text key. Numeric categories always miss.
    pub fn lookup(&self, category: Category, key: &str) -> Option<&str> {
        self.text_map(category)
            .and_then(|map| map.get(key))
            .map(String::as_str)
    }

    /// Record a substitute for a text key, keeping any earlier entry.
    ///
    /// Categories that keep self-mappings also record `value -> value`.
    /// Returns the substitute now stored for `key`.
    pub fn remember(&mut self, category: Category, key: &str, value: String) -> String {
        let Some(map) = self.text_map_mut(category) else {
            return value;
        };
        let stored = map.entry(key.to_string()).or_insert(value).clone();
        if category.keeps_self_mappings() {
            map.entry(stored.clone()).or_insert_with(|| stored.clone());
        }
        stored
    }

    /// Cached substitute for an integer.
    pub fn lookup_int(&self, key: i64) -> Option<i64> {
        self.int.get(&key).copied()
    }

    /// Record an integer substitute, keeping any earlier entry.
    pub fn remember_int(&mut self, key: i64, value: i64) -> i64 {
        *self.int.entry(key).or_insert(value)
    }

    /// Cached substitute for a float, keyed by its fixed-precision text.
    pub fn lookup_float(&self, key: &str) -> Option<f64> {
        self.float.get(key).copied()
    }

    /// Record a float substitute, keeping any earlier entry.
    pub fn remember_float(&mut self, key: &str, value: f64) -> f64 {
        *self.float.entry(key.to_string()).or_insert(value)
    }

    /// Number of entries in a category, self-mappings included.
    pub fn len(&self, category: Category) -> usize {
        match category {
            Category::Int => self.int.len(),
            Category::Float => self.float.len(),
            other => self.text_map(other).map_or(0, HashMap::len),
        }
    }

    /// Total entries across every category.
    pub fn total_len(&self) -> usize {
        Category::ALL.iter().map(|c| self.len(*c)).sum()
    }

    /// True when no category holds an entry.
    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }

    /// Drop every entry, starting a fresh consistency domain.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Export every category. Self-mappings are filtered out.
    pub fn snapshot(&self, config: &ObfuscatorConfig) -> Mappings {
        fn filtered(map: &HashMap<String, String>) -> BTreeMap<String, String> {
            map.iter()
                .filter(|(k, v)| k != v)
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        }
        fn sorted(map: &HashMap<String, String>) -> BTreeMap<String, String> {
            map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
        }

        Mappings {
            schema_version: MAPPINGS_SCHEMA_VERSION.to_string(),
            exported_at: Some(chrono::Utc::now().to_rfc3339()),
            coefficient: config.coefficient,
            date_offset_days: config.date_offset_days,
            card_map: sorted(&self.card),
            hostname_map: filtered(&self.hostname),
            ip_map: sorted(&self.ip),
            mac_map: sorted(&self.mac),
            name_map: filtered(&self.name),
            phone_map: sorted(&self.phone),
            replset_map: filtered(&self.replica_set),
            ssn_map: sorted(&self.ssn),
            int_map: self.int.iter().map(|(k, v)| (*k, *v)).collect(),
            // JSON has no form for inf or NaN
            number_map: self
                .float
                .iter()
                .filter(|(_, v)| v.is_finite())
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
        }
    }

    /// Load a snapshot on top of the current entries.
    ///
    /// Existing entries win over snapshot entries for the same key.
    pub fn restore(&mut self, mappings: &Mappings) {
        let text_maps = [
            (Category::Card, &mappings.card_map),
            (Category::Hostname, &mappings.hostname_map),
            (Category::Ip, &mappings.ip_map),
            (Category::Mac, &mappings.mac_map),
            (Category::Name, &mappings.name_map),
            (Category::Phone, &mappings.phone_map),
            (Category::ReplicaSet, &mappings.replset_map),
            (Category::Ssn, &mappings.ssn_map),
        ];
        for (category, map) in text_maps {
            for (key, value) in map {
                self.remember(category, key, value.clone());
            }
        }
        for (key, value) in &mappings.int_map {
            self.remember_int(*key, *value);
        }
        for (key, value) in &mappings.number_map {
            self.remember_float(key, *value);
        }
    }
}

/// Exported view of every category map, for audit or cross-run reuse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mappings {
    /// Snapshot schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// When the snapshot was taken (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<String>,

    /// Coefficient in effect at export time.
    pub coefficient: f64,

    /// Date offset in effect at export time.
    pub date_offset_days: i64,

    #[serde(default)]
    pub card_map: BTreeMap<String, String>,
    #[serde(default)]
    pub hostname_map: BTreeMap<String, String>,
    #[serde(default)]
    pub ip_map: BTreeMap<String, String>,
    #[serde(default)]
    pub mac_map: BTreeMap<String, String>,
    #[serde(default)]
    pub name_map: BTreeMap<String, String>,
    #[serde(default)]
    pub phone_map: BTreeMap<String, String>,
    #[serde(default)]
    pub replset_map: BTreeMap<String, String>,
    #[serde(default)]
    pub ssn_map: BTreeMap<String, String>,
    #[serde(default)]
    pub int_map: BTreeMap<i64, i64>,
    #[serde(default)]
    pub number_map: BTreeMap<String, f64>,
}

fn default_schema_version() -> String {
    MAPPINGS_SCHEMA_VERSION.to_string()
}

impl Mappings {
    /// Number of mapping entries across all categories.
    pub fn total_entries(&self) -> usize {
        self.card_map.len()
            + self.hostname_map.len()
            + self.ip_map.len()
            + self.mac_map.len()
            + self.name_map.len()
            + self.phone_map.len()
            + self.replset_map.len()
            + self.ssn_map.len()
            + self.int_map.len()
            + self.number_map.len()
    }

    /// Nested JSON view of the snapshot.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Load a snapshot from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mappings: Mappings = serde_json::from_str(&content)?;
        Ok(mappings)
    }

    /// Save the snapshot as pretty JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
