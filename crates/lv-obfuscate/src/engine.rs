//! Main obfuscation engine.
//!
//! The [`Obfuscator`] owns one configuration and one [`ConsistencyStore`].
//! Every category operation is total: input that does not match the
//! category comes back unchanged. Matches are looked up in the store first,
//! so a value seen twice in one session always gets the same substitute.

use crate::{
    hash::{digest, hash_hex, hash_index, hash_octet},
    names::{city_for, flower_for},
    patterns::{
        contains_date, contains_ip, count_digits, find_credit_card_no, find_phone_no,
        has_path_separator, is_namespace, RE_DATE, RE_EMAIL, RE_FQDN, RE_IP, RE_MAC,
        RE_NAMESPACE, RE_PORT, RE_SSN,
    },
    Category, ConsistencyStore, IpStyle, Mapping, Mappings, NameStyle, ObfuscatorConfig, Result,
    Value,
};
use regex::Captures;
use tracing::{debug, info, trace};

/// Addresses that identify nobody and are never rewritten.
const UNROUTED_ADDRESSES: [&str; 2] = ["0.0.0.0", "127.0.0.1"];

/// Leading digits of a phone number kept verbatim.
const PHONE_KEPT_DIGITS: usize = 5;

/// Trailing digits of a card number left visible.
const CARD_VISIBLE_DIGITS: usize = 4;

/// Deterministic obfuscator for one anonymization session.
#[derive(Debug, Clone, Default)]
pub struct Obfuscator {
    /// Engine settings.
    config: ObfuscatorConfig,

    /// Substitutes handed out so far.
    store: ConsistencyStore,
}

impl Obfuscator {
    /// Create an obfuscator with the given config.
    pub fn new(config: ObfuscatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            store: ConsistencyStore::new(),
        })
    }

    /// Get the active config.
    pub fn config(&self) -> &ObfuscatorConfig {
        &self.config
    }

    /// Replace the config. Existing mappings are kept.
    pub fn set_config(&mut self, config: ObfuscatorConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Get the consistency store.
    pub fn store(&self) -> &ConsistencyStore {
        &self.store
    }

    /// Export every category map, self-mappings filtered out.
    pub fn mappings(&self) -> Mappings {
        self.store.snapshot(&self.config)
    }

    /// Re-seed the store from an exported snapshot.
    pub fn restore(&mut self, mappings: &Mappings) {
        self.store.restore(mappings);
        debug!(
            entries = mappings.total_entries(),
            "restored obfuscation mappings"
        );
    }

    /// Clear every mapping, keeping the config.
    pub fn reset(&mut self) {
        let dropped = self.store.total_len();
        self.store.clear();
        info!(dropped, "obfuscation mappings reset");
    }

    fn remember(&mut self, category: Category, key: &str, value: String) -> String {
        let stored = self.store.remember(category, key, value);
        trace!(
            category = %category,
            size = self.store.len(category),
            "new mapping"
        );
        stored
    }

    // --- Addresses and names ---

    /// Obfuscate the first IPv4 address in `value`.
    ///
    /// Unrouted addresses leave the input untouched; a CIDR suffix stays in place.
    /// Other copies of the address are rewritten only where they stand alone,
    /// never inside a longer dotted number.
    pub fn obfuscate_ip(&mut self, value: &str) -> String {
        let Some(m) = RE_IP.find(value) else {
            return value.to_string();
        };
        let matched = m.as_str();
        if UNROUTED_ADDRESSES.contains(&matched) {
            return value.to_string();
        }
        if let Some(cached) = self.store.lookup(Category::Ip, matched) {
            return replace_address(value, m.start(), matched, cached);
        }

        let octets: Vec<&str> = matched.split('.').collect();
        if octets.len() != 4 {
            return value.to_string();
        }

        let new_ip = match self.config.ip_style {
            IpStyle::PrivateRange => {
                let hash = digest(matched);
                format!("10.{}.{}.{}", hash[0], hash[1], hash[2])
            }
            IpStyle::KeepEnds => format!(
                "{}.{}.{}.{}",
                octets[0],
                hash_octet(matched, 1),
                hash_octet(matched, 2),
                octets[3]
            ),
        };

        let new_ip = self.remember(Category::Ip, matched, new_ip);
        replace_address(value, m.start(), matched, &new_ip)
    }

    /// Obfuscate a whole hostname.
    pub fn obfuscate_hostname(&mut self, hostname: &str) -> String {
        if hostname.is_empty() {
            return String::new();
        }
        if let Some(cached) = self.store.lookup(Category::Hostname, hostname) {
            return cached.to_string();
        }

        let obfuscated = match self.config.name_style {
            NameStyle::HashPrefixed => format!("host-{}.local", hash_hex(hostname, 8)),
            NameStyle::Readable => {
                format!("{}.{}.local", flower_for(hostname), city_for(hostname)).to_lowercase()
            }
        };

        self.remember(Category::Hostname, hostname, obfuscated)
    }

    /// Obfuscate `host:port`, keeping the port.
    ///
    /// Anything that does not split into exactly two parts is treated as a
    /// plain hostname.
    pub fn obfuscate_host_port(&mut self, value: &str) -> String {
        let parts: Vec<&str> = value.split(':').collect();
        if parts.len() != 2 {
            return self.obfuscate_hostname(value);
        }

        let (host, port) = (parts[0], parts[1]);
        let host = if contains_ip(host) {
            self.obfuscate_ip(host)
        } else {
            self.obfuscate_hostname(host)
        };
        format!("{}:{}", host, port)
    }

    /// Obfuscate a replica set name.
    pub fn obfuscate_replica_set(&mut self, name: &str) -> String {
        if name.is_empty() {
            return String::new();
        }
        if let Some(cached) = self.store.lookup(Category::ReplicaSet, name) {
            return cached.to_string();
        }

        let obfuscated = match self.config.name_style {
            NameStyle::HashPrefixed => format!("rs-{}", hash_hex(name, 8)),
            NameStyle::Readable => format!("rs-{}", city_for(name)).to_lowercase(),
        };

        self.remember(Category::ReplicaSet, name, obfuscated)
    }

    /// Obfuscate the first email address in `value`.
    pub fn obfuscate_email(&mut self, value: &str) -> String {
        let Some(m) = RE_EMAIL.find(value) else {
            return value.to_string();
        };
        let matched = m.as_str();
        if let Some(cached) = self.store.lookup(Category::Name, matched) {
            return value.replace(matched, cached);
        }

        let new_value = format!("{}@{}.com", flower_for(matched), city_for(matched)).to_lowercase();
        let new_value = self.remember(Category::Name, matched, new_value);
        value.replace(matched, &new_value)
    }

    /// Obfuscate the first fully qualified domain name in `value`.
    ///
    /// Values holding a path separator are left alone.
    pub fn obfuscate_fqdn(&mut self, value: &str) -> String {
        if has_path_separator(value) {
            return value.to_string();
        }
        let Some(m) = RE_FQDN.find(value) else {
            return value.to_string();
        };
        self.replace_name(value, m.as_str())
    }

    /// Obfuscate a namespace such as `db.collection`.
    ///
    /// Only applies when the whole value looks like a namespace and holds
    /// something besides digits and dots.
    pub fn obfuscate_namespace(&mut self, value: &str) -> String {
        if !is_namespace(value) {
            return value.to_string();
        }
        if value.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return value.to_string();
        }
        let Some(m) = RE_NAMESPACE.find(value) else {
            return value.to_string();
        };
        self.replace_name(value, m.as_str())
    }

    fn replace_name(&mut self, value: &str, matched: &str) -> String {
        if let Some(cached) = self.store.lookup(Category::Name, matched) {
            return value.replace(matched, cached);
        }
        let new_value = generate_name(matched);
        let new_value = self.remember(Category::Name, matched, new_value);
        value.replace(matched, &new_value)
    }

    // --- Personal identifiers ---

    /// Obfuscate the first SSN in `value` by shuffling its digits.
    pub fn obfuscate_ssn(&mut self, value: &str) -> String {
        let Some(m) = RE_SSN.find(value) else {
            return value.to_string();
        };
        let matched = m.as_str();
        if let Some(cached) = self.store.lookup(Category::Ssn, matched) {
            return value.replace(matched, cached);
        }

        let mut digits: Vec<char> = matched.chars().filter(char::is_ascii_digit).collect();
        if digits.len() != 9 {
            return value.to_string();
        }
        for i in (1..digits.len()).rev() {
            let j = hash_index(&format!("{}{}", matched, i), i + 1);
            digits.swap(i, j);
        }

        let digits: String = digits.into_iter().collect();
        let new_value = format!("{}-{}-{}", &digits[..3], &digits[3..5], &digits[5..]);
        let new_value = self.remember(Category::Ssn, matched, new_value);
        value.replace(matched, &new_value)
    }

    /// Obfuscate the first MAC address in `value`, keeping the vendor prefix.
    pub fn obfuscate_mac(&mut self, value: &str) -> String {
        let Some(m) = RE_MAC.find(value) else {
            return value.to_string();
        };
        let matched = m.as_str();
        if let Some(cached) = self.store.lookup(Category::Mac, matched) {
            return value.replace(matched, cached);
        }

        let sep = if matched.contains('-') { "-" } else { ":" };
        let parts: Vec<&str> = matched.split([':', '-']).collect();
        if parts.len() != 6 {
            return value.to_string();
        }

        let mut new_parts: Vec<String> = parts[..3].iter().map(|p| p.to_string()).collect();
        for i in 3..6 {
            new_parts.push(format!("{:02X}", hash_octet(matched, i)));
        }

        let new_value = self.remember(Category::Mac, matched, new_parts.join(sep));
        value.replace(matched, &new_value)
    }

    /// Obfuscate the first phone number in `value`.
    ///
    /// The first five digits and all punctuation are kept.
    pub fn obfuscate_phone_no(&mut self, value: &str) -> String {
        let Some(matched) = find_phone_no(value) else {
            return value.to_string();
        };
        if let Some(cached) = self.store.lookup(Category::Phone, matched) {
            return value.replace(matched, cached);
        }

        let mut seen = 0;
        let new_value: String = matched
            .char_indices()
            .map(|(i, c)| {
                if !c.is_ascii_digit() {
                    return c;
                }
                seen += 1;
                if seen <= PHONE_KEPT_DIGITS {
                    return c;
                }
                let digit = hash_index(&format!("{}{}", matched, i), 10);
                char::from(b'0' + digit as u8)
            })
            .collect();

        let new_value = self.remember(Category::Phone, matched, new_value);
        value.replace(matched, &new_value)
    }

    /// Mask the first card number in `value`, leaving the last four digits.
    pub fn obfuscate_credit_card_no(&mut self, value: &str) -> String {
        let Some(matched) = find_credit_card_no(value) else {
            return value.to_string();
        };
        if matched.len() < CARD_VISIBLE_DIGITS {
            return value.to_string();
        }
        if let Some(cached) = self.store.lookup(Category::Card, matched) {
            return value.replace(matched, cached);
        }

        let masked_digits = count_digits(matched).saturating_sub(CARD_VISIBLE_DIGITS);
        let mut seen = 0;
        let new_value: String = matched
            .chars()
            .map(|c| {
                if !c.is_ascii_digit() {
                    return c;
                }
                seen += 1;
                if seen <= masked_digits {
                    '*'
                } else {
                    c
                }
            })
            .collect();

        let new_value = self.remember(Category::Card, matched, new_value);
        value.replace(matched, &new_value)
    }

    // --- Dates and numbers ---

    /// Shift every `YYYY-MM-DD` date in `value` by the configured offset.
    pub fn obfuscate_date(&self, value: &str) -> String {
        if !contains_date(value) {
            return value.to_string();
        }
        let offset = self.config.date_offset_days;
        RE_DATE
            .replace_all(value, |caps: &Captures| shift_date(&caps[0], offset))
            .into_owned()
    }

    /// Scale an integer by the coefficient. Values up to 1 are kept.
    pub fn obfuscate_int(&mut self, value: i64) -> i64 {
        if value <= 1 {
            return value;
        }
        if let Some(cached) = self.store.lookup_int(value) {
            return cached;
        }
        let new_value = (value as f64 * self.config.coefficient) as i64;
        self.store.remember_int(value, new_value)
    }

    /// Scale a float by the coefficient.
    pub fn obfuscate_float(&mut self, value: f64) -> f64 {
        let key = format!("{:.6}", value);
        if let Some(cached) = self.store.lookup_float(&key) {
            return cached;
        }
        let new_value = value * self.config.coefficient;
        self.store.remember_float(&key, new_value)
    }

    /// Scale the first `:port` in `value` by the coefficient.
    ///
    /// Every occurrence of the matched text is rewritten. Not cached.
    pub fn obfuscate_port(&self, value: &str) -> String {
        let Some(m) = RE_PORT.find(value) else {
            return value.to_string();
        };
        let matched = m.as_str();
        let port: f64 = matched[1..].parse().unwrap_or(0.0);
        let scaled = (port * self.config.coefficient) as i64;
        value.replace(matched, &format!(":{}", scaled))
    }

    // --- Traversal ---

    /// Run every string rule over `value`.
    ///
    /// The order is fixed: narrower categories claim their text before the
    /// broader ones that could also match it.
    pub fn obfuscate_string(&mut self, value: &str) -> String {
        let mut value = self.obfuscate_port(value);
        value = self.obfuscate_credit_card_no(&value);
        value = self.obfuscate_email(&value);
        value = self.obfuscate_namespace(&value);
        value = self.obfuscate_fqdn(&value);
        value = self.obfuscate_ip(&value);
        value = self.obfuscate_mac(&value);
        value = self.obfuscate_ssn(&value);
        value = self.obfuscate_phone_no(&value);
        self.obfuscate_date(&value)
    }

    /// Obfuscate any document value, recursing into containers.
    pub fn obfuscate_value(&mut self, value: &Value) -> Value {
        match value {
            Value::Mapping(map) => Value::Mapping(self.obfuscate_mapping(map)),
            Value::Sequence(items) => Value::Sequence(self.obfuscate_sequence(items)),
            Value::String(s) => Value::String(self.obfuscate_string(s)),
            Value::Integer(i) => Value::Integer(self.obfuscate_int(*i)),
            Value::Float(f) => Value::Float(self.obfuscate_float(*f)),
            Value::Other(other) => Value::Other(other.clone()),
        }
    }

    /// Obfuscate every value of a mapping. Keys are kept.
    pub fn obfuscate_mapping(&mut self, map: &Mapping) -> Mapping {
        map.iter()
            .map(|(k, v)| (k.clone(), self.obfuscate_value(v)))
            .collect()
    }

    /// Obfuscate every element of a sequence.
    pub fn obfuscate_sequence(&mut self, items: &[Value]) -> Vec<Value> {
        items.iter().map(|v| self.obfuscate_value(v)).collect()
    }

    /// Obfuscate a decoded JSON document.
    pub fn obfuscate_json(&mut self, doc: &serde_json::Value) -> serde_json::Value {
        let value = Value::from(doc.clone());
        serde_json::Value::from(self.obfuscate_value(&value))
    }
}

/// Replace the address at `start` and every standalone copy of it.
fn replace_address(value: &str, start: usize, address: &str, substitute: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut last = 0;
    for (i, _) in value.match_indices(address) {
        let end = i + address.len();
        if i != start && !stands_alone(value, i, end) {
            continue;
        }
        out.push_str(&value[last..i]);
        out.push_str(substitute);
        last = end;
    }
    out.push_str(&value[last..]);
    out
}

/// Whether `value[start..end]` is not glued to neighbouring digits.
fn stands_alone(value: &str, start: usize, end: usize) -> bool {
    let joins = |c: Option<char>, beyond: Option<char>| match c {
        Some(c) if c.is_ascii_digit() => true,
        Some('.') => beyond.is_some_and(|b| b.is_ascii_digit()),
        _ => false,
    };
    let mut before = value[..start].chars().rev();
    let mut after = value[end..].chars();
    !joins(before.next(), before.next()) && !joins(after.next(), after.next())
}

/// Build a `<flower>.<city>[.<tail>]` substitute for a dotted name.
///
/// Names with more than two parts keep their last part.
fn generate_name(matched: &str) -> String {
    let head = format!("{}.{}", flower_for(matched), city_for(matched)).to_lowercase();
    let parts: Vec<&str> = matched.split('.').collect();
    if parts.len() > 2 {
        format!("{}.{}", head, parts[parts.len() - 1])
    } else {
        head
    }
}

/// Shift a `YYYY-MM-DD` date by `offset` days.
///
/// Months are treated as 30 days going back and 28 days going forward;
/// the result is not calendar-accurate.
fn shift_date(date: &str, offset: i64) -> String {
    let field = |range: std::ops::Range<usize>| -> i64 {
        date.get(range).and_then(|s| s.parse().ok()).unwrap_or(0)
    };
    let mut year = field(0..4);
    let mut month = field(5..7);
    let mut day = field(8..10) + offset;

    while day < 1 {
        month -= 1;
        if month < 1 {
            month = 12;
            year -= 1;
        }
        day += 30;
    }
    while day > 28 {
        day -= 28;
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
    }

    format!("{:04}-{:02}-{:02}", year, month, day)
}
