//! # Discovery Document Model
//!
//! The discovery document is an arbitrary JSON tree of which only one path is
//! understood: `Detail.host_list`, an ordered array of host entries shaped
//! like `{ "host": { "ip_v4_address": "...", "nmap_output": "..." } }`.
//!
//! Everything else is opaque. The wrappers below keep the original
//! [`Value`] around so that unknown fields (and their order) survive a
//! load → merge → encode cycle untouched.

use serde_json::{Map, Value};

use crate::error::{DocumentError, DocumentResult, HostError};

pub const DETAIL_KEY: &str = "Detail";
pub const HOST_LIST_KEY: &str = "host_list";
pub const HOST_KEY: &str = "host";
pub const ADDRESS_KEY: &str = "ip_v4_address";
pub const OUTPUT_KEY: &str = "nmap_output";

/// Captured standard output of one scan, keyed by the address scanned.
///
/// `raw` holds the bytes exactly as the tool wrote them and is what lands in
/// the artifact. `output` is its UTF-8 rendition (invalid sequences
/// replaced) and is what gets merged into the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub address: String,
    pub output: String,
    pub raw: Vec<u8>,
}

impl ScanResult {
    pub fn new(address: impl Into<String>, output: impl Into<String>) -> Self {
        let output: String = output.into();
        Self {
            address: address.into(),
            raw: output.clone().into_bytes(),
            output,
        }
    }

    pub fn from_bytes(address: impl Into<String>, raw: Vec<u8>) -> Self {
        Self {
            address: address.into(),
            output: String::from_utf8_lossy(&raw).into_owned(),
            raw,
        }
    }
}

/// A schema-checked discovery document.
///
/// Holding a `DiscoveryDocument` guarantees that `Detail.host_list` exists
/// and is an array. Individual entries are not checked.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryDocument {
    root: Value,
}

impl DiscoveryDocument {
    /// Checks the shape of a generic JSON tree and wraps it.
    pub fn from_value(root: Value) -> DocumentResult<Self> {
        let detail = root
            .as_object()
            .ok_or_else(|| DocumentError::Schema("document root is not an object".into()))?
            .get(DETAIL_KEY)
            .ok_or_else(|| DocumentError::Schema(format!("missing `{DETAIL_KEY}`")))?;

        let host_list = detail
            .as_object()
            .ok_or_else(|| DocumentError::Schema(format!("`{DETAIL_KEY}` is not an object")))?
            .get(HOST_LIST_KEY)
            .ok_or_else(|| {
                DocumentError::Schema(format!("missing `{DETAIL_KEY}.{HOST_LIST_KEY}`"))
            })?;

        if !host_list.is_array() {
            return Err(DocumentError::Schema(format!(
                "`{DETAIL_KEY}.{HOST_LIST_KEY}` is not an array"
            )));
        }

        Ok(Self { root })
    }

    /// Ordered view over `Detail.host_list`.
    pub fn host_list(&self) -> &[Value] {
        self.root[DETAIL_KEY][HOST_LIST_KEY]
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Owned host entries in document order.
    pub fn hosts(&self) -> Vec<HostEntry> {
        self.host_list().iter().cloned().map(HostEntry::new).collect()
    }

    pub(crate) fn host_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        self.root
            .get_mut(DETAIL_KEY)
            .and_then(|detail| detail.get_mut(HOST_LIST_KEY))
            .and_then(Value::as_array_mut)
    }

    /// Overwrites `host.nmap_output` of the first entry whose address equals
    /// `address`. Returns `false` when nothing matched.
    pub fn set_first_output(&mut self, address: &str, output: &str) -> bool {
        let Some(hosts) = self.host_list_mut() else {
            return false;
        };

        let Some(entry) = hosts
            .iter_mut()
            .find(|entry| address_of(entry) == Some(address))
        else {
            return false;
        };

        if let Some(host) = entry.get_mut(HOST_KEY).and_then(Value::as_object_mut) {
            host.insert(OUTPUT_KEY.to_string(), Value::String(output.to_string()));
            return true;
        }
        false
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }
}

/// One element of `host_list`. Its fields are read lazily.
#[derive(Debug, Clone, PartialEq)]
pub struct HostEntry {
    raw: Value,
}

impl HostEntry {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    /// Builds a minimal `{ "host": { "ip_v4_address": .. } }` entry.
    pub fn with_address(address: &str) -> Self {
        let mut host = Map::new();
        host.insert(ADDRESS_KEY.to_string(), Value::String(address.to_string()));

        let mut entry = Map::new();
        entry.insert(HOST_KEY.to_string(), Value::Object(host));
        Self::new(Value::Object(entry))
    }

    /// Reads `host.ip_v4_address`. A `null` field counts as missing.
    pub fn address(&self) -> Result<&str, HostError> {
        match self.raw.get(HOST_KEY).and_then(|host| host.get(ADDRESS_KEY)) {
            None | Some(Value::Null) => Err(HostError::MissingAddress),
            Some(Value::String(address)) => Ok(address),
            Some(_) => Err(HostError::AddressNotString),
        }
    }

    pub fn nmap_output(&self) -> Option<&str> {
        self.raw
            .get(HOST_KEY)
            .and_then(|host| host.get(OUTPUT_KEY))
            .and_then(Value::as_str)
    }

    pub fn as_value(&self) -> &Value {
        &self.raw
    }
}

fn address_of(entry: &Value) -> Option<&str> {
    entry
        .get(HOST_KEY)
        .and_then(|host| host.get(ADDRESS_KEY))
        .and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "Scan": { "id": 7 },
            "Detail": {
                "site": "lab",
                "host_list": [
                    { "host": { "ip_v4_address": "10.0.0.1", "name": "a" }, "tags": ["x"] },
                    { "host": { "ip_v4_address": "10.0.0.2", "nmap_output": "old" } },
                    { "host": {} },
                    { "host": { "ip_v4_address": 42 } }
                ]
            }
        })
    }

    #[test]
    fn accepts_documents_with_a_host_list() {
        let doc = DiscoveryDocument::from_value(sample()).unwrap();
        assert_eq!(doc.host_list().len(), 4);
        assert_eq!(doc.as_value(), &sample());
    }

    #[test]
    fn rejects_missing_or_misshapen_host_list() {
        let cases = [
            json!([]),
            json!({}),
            json!({ "Detail": [] }),
            json!({ "Detail": {} }),
            json!({ "Detail": { "host_list": {} } }),
            json!({ "Detail": { "host_list": "10.0.0.1" } }),
        ];

        for case in cases {
            assert!(
                matches!(
                    DiscoveryDocument::from_value(case.clone()),
                    Err(DocumentError::Schema(_))
                ),
                "expected schema error for {case}"
            );
        }
    }

    #[test]
    fn host_entry_address_states() {
        let hosts = DiscoveryDocument::from_value(sample()).unwrap().hosts();

        assert_eq!(hosts[0].address().unwrap(), "10.0.0.1");
        assert_eq!(hosts[1].nmap_output(), Some("old"));
        assert!(matches!(hosts[2].address(), Err(HostError::MissingAddress)));
        assert!(matches!(hosts[3].address(), Err(HostError::AddressNotString)));
        assert!(matches!(
            HostEntry::new(json!({ "host": { "ip_v4_address": null } })).address(),
            Err(HostError::MissingAddress)
        ));
        assert!(matches!(
            HostEntry::new(json!("10.0.0.1")).address(),
            Err(HostError::MissingAddress)
        ));
    }

    #[test]
    fn set_first_output_updates_first_match_only() {
        let mut doc = DiscoveryDocument::from_value(json!({
            "Detail": { "host_list": [
                { "host": { "ip_v4_address": "10.0.0.1" } },
                { "host": { "ip_v4_address": "10.0.0.1", "nmap_output": "keep" } }
            ]}
        }))
        .unwrap();

        assert!(doc.set_first_output("10.0.0.1", "new"));
        assert!(!doc.set_first_output("10.0.0.9", "none"));

        let hosts = doc.hosts();
        assert_eq!(hosts[0].nmap_output(), Some("new"));
        assert_eq!(hosts[1].nmap_output(), Some("keep"));
    }

    #[test]
    fn raw_bytes_survive_lossy_rendition() {
        let result = ScanResult::from_bytes("10.0.0.1", b"ssh \xff\xfe\n".to_vec());

        assert_eq!(result.raw, b"ssh \xff\xfe\n");
        assert_eq!(result.output, "ssh \u{FFFD}\u{FFFD}\n");
        assert_eq!(ScanResult::new("10.0.0.1", "plain").raw, b"plain");
    }

    #[test]
    fn with_address_builds_nested_entry() {
        let entry = HostEntry::with_address("1.2.3.4");
        assert_eq!(entry.as_value(), &json!({ "host": { "ip_v4_address": "1.2.3.4" } }));
    }
}
