//! Customer identity and addresses.

/// A postal address owned by a profile.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Address {
    pub id: u64,
    pub profile_id: u64,
    pub name: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// Local identity bound 1:1 (per site) to a user. Owns its invoices,
/// addresses, receipts and subscriptions; deleting a profile cascades
/// to those, while payments survive with soft-delete only.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CustomerProfile {
    pub id: u64,
    pub site_id: u64,
    pub email: String,
    pub name: String,
    /// Gateway-assigned customer id, cached after synchronization.
    /// This is the join key between the local and remote worlds;
    /// absence means the profile still needs a sync pass.
    pub remote_customer_id: Option<String>,
    pub addresses: Vec<Address>,
    pub deleted: bool,
}

impl CustomerProfile {
    pub fn is_linked(&self) -> bool {
        self.remote_customer_id.is_some()
    }
}
