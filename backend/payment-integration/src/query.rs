//! Builder for the gateway's search-filter language.
//!
//! State-free: an ordered clause list either renders to one complete
//! filter string or, on the first invalid clause, to the empty string.
//! Partial queries are never returned.

use common_enums::GatewayObjectKind;

/// Comparison operators the gateway filter language supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperator {
    /// `:` exact-match
    ExactMatch,
    /// `=` equality
    Equals,
    /// `>` strictly greater
    GreaterThan,
    /// `<` strictly less
    LessThan,
}

impl QueryOperator {
    fn as_str(self) -> &'static str {
        match self {
            Self::ExactMatch => ":",
            Self::Equals => "=",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
        }
    }
}

/// Boolean joiner appended after a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextOperator {
    And,
    Or,
}

impl NextOperator {
    fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// Clause values: strings render quoted, numbers render bare.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Text(String),
    Number(i64),
}

impl QueryValue {
    fn render(&self) -> String {
        match self {
            Self::Text(value) => format!("\"{value}\""),
            Self::Number(value) => value.to_string(),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        Self::Number(value as i64)
    }
}

/// One filter clause. `key` is required only for `metadata` fields.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryClause {
    pub field: String,
    pub operator: QueryOperator,
    pub key: Option<String>,
    pub value: QueryValue,
    pub next_operator: Option<NextOperator>,
}

impl QueryClause {
    /// Plain field clause.
    pub fn field(
        field: &str,
        operator: QueryOperator,
        value: impl Into<QueryValue>,
    ) -> Self {
        Self {
            field: field.to_string(),
            operator,
            key: None,
            value: value.into(),
            next_operator: None,
        }
    }

    /// Metadata clause keyed by `key`.
    pub fn metadata(
        key: &str,
        operator: QueryOperator,
        value: impl Into<QueryValue>,
    ) -> Self {
        Self {
            field: "metadata".to_string(),
            operator,
            key: Some(key.to_string()),
            value: value.into(),
            next_operator: None,
        }
    }

    /// Attach a trailing joiner.
    pub fn joined(mut self, next: NextOperator) -> Self {
        self.next_operator = Some(next);
        self
    }
}

/// Searchable fields per object kind. Kinds absent here have no valid
/// fields, so every query against them fails closed.
fn valid_fields(kind: GatewayObjectKind) -> &'static [&'static str] {
    match kind {
        GatewayObjectKind::Customer => &["email", "name", "phone", "metadata"],
        GatewayObjectKind::Product => &["name", "active", "description", "metadata"],
        GatewayObjectKind::Price => &["product", "currency", "active", "metadata"],
        GatewayObjectKind::Charge => &["amount", "status", "customer", "metadata"],
        GatewayObjectKind::Subscription => &["status", "metadata"],
        GatewayObjectKind::Coupon
        | GatewayObjectKind::PaymentMethod
        | GatewayObjectKind::SetupIntent => &[],
    }
}

/// Render `clauses` into one gateway filter string. Returns `""` on
/// the first invalid clause; the error is logged, never raised.
pub fn build_search_query(kind: GatewayObjectKind, clauses: &[QueryClause]) -> String {
    let allowed = valid_fields(kind);
    let mut query = String::new();

    for clause in clauses {
        if !allowed.contains(&clause.field.as_str()) {
            tracing::error!(
                object_kind = %kind,
                field = %clause.field,
                "invalid search field, discarding query"
            );
            return String::new();
        }

        if clause.field == "metadata" {
            let Some(key) = clause.key.as_deref() else {
                tracing::error!(object_kind = %kind, "metadata clause without key, discarding query");
                return String::new();
            };
            query.push_str(&format!(
                "metadata[\"{key}\"]{}{}",
                clause.operator.as_str(),
                clause.value.render()
            ));
        } else {
            query.push_str(&format!(
                "{}{}{}",
                clause.field,
                clause.operator.as_str(),
                clause.value.render()
            ));
        }

        if let Some(next) = clause.next_operator {
            query.push_str(&format!(" {} ", next.as_str()));
        }
    }

    query
}
