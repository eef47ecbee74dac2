//! Site identity and the caller-facing checkout context.

use std::collections::HashMap;

/// A storefront. Gateway credentials and policies are resolved per
/// site; remote objects are tagged with the site domain.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Site {
    pub id: u64,
    /// Domain is the stable join key used in remote metadata tags.
    pub domain: String,
    pub name: String,
}

/// Display data handed back to the web layer before a charge:
/// publishable keys, client secrets and the like. Free-form on
/// purpose; the web layer owns the rendering.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CheckoutContext(pub HashMap<String, serde_json::Value>);

impl CheckoutContext {
    pub fn insert(&mut self, key: &str, value: impl Into<serde_json::Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }
}
