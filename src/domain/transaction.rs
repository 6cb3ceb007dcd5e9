use super::amount::Amount;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const FIELD_EVENT: &str = "event";
pub const FIELD_TRANSACTION_ID: &str = "transaction_id";
pub const FIELD_AMOUNT: &str = "amount";
pub const FIELD_CURRENCY: &str = "currency";
pub const FIELD_TIMESTAMP: &str = "timestamp";

/// Keys every inbound payload must carry, in the order they are reported.
pub const REQUIRED_FIELDS: [&str; 4] = [
    FIELD_EVENT,
    FIELD_TRANSACTION_ID,
    FIELD_AMOUNT,
    FIELD_CURRENCY,
];

/// The untrusted body of an inbound webhook.
///
/// Kept as the raw JSON object so that extra keys survive and the exact
/// payload can be forwarded downstream on confirm or cancel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionPayload(Map<String, Value>);

impl TransactionPayload {
    /// Parses a request body. Anything other than a JSON object is rejected.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Whether the payload names a transaction worth notifying about, even if
    /// it failed validation.
    pub fn has_transaction_id(&self) -> bool {
        self.get(FIELD_TRANSACTION_ID).is_some_and(is_truthy)
    }
}

impl From<Map<String, Value>> for TransactionPayload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for TransactionPayload {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// A payload that passed every validation rule.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTransaction {
    pub event: String,
    pub transaction_id: String,
    pub amount: Amount,
    pub currency: String,
    /// Informational only; never validated.
    pub timestamp: Option<Value>,
    /// The original payload, forwarded verbatim on dispatch.
    pub payload: TransactionPayload,
}

/// Why a payload was rejected. One variant per validation rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("invalid event: {0}")]
    InvalidEvent(String),
    #[error("invalid transaction id")]
    InvalidTransactionId,
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("invalid currency: {0}")]
    InvalidCurrency(String),
}

impl RejectionReason {
    /// Stable machine-readable tag for the failing rule.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingFields(_) => "missing_fields",
            Self::InvalidEvent(_) => "invalid_event",
            Self::InvalidTransactionId => "invalid_transaction_id",
            Self::InvalidAmount(_) => "invalid_amount",
            Self::InvalidCurrency(_) => "invalid_currency",
        }
    }
}

/// Renders a payload value for a rejection message: strings bare, everything
/// else as JSON.
pub(crate) fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
