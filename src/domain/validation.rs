use super::amount::{Amount, AmountBounds};
use super::transaction::{
    FIELD_AMOUNT, FIELD_CURRENCY, FIELD_EVENT, FIELD_TIMESTAMP, FIELD_TRANSACTION_ID,
    NormalizedTransaction, REQUIRED_FIELDS, RejectionReason, TransactionPayload, render_value,
};
use serde_json::Value;
use std::collections::BTreeSet;

/// Pure rule chain classifying a payload as valid or rejected.
///
/// Rules run in a fixed order and the first failure wins:
/// required fields, event, transaction id, amount, currency.
#[derive(Debug, Clone)]
pub struct Validator {
    valid_events: BTreeSet<String>,
    valid_currencies: BTreeSet<String>,
    bounds: AmountBounds,
}

impl Validator {
    pub fn new(
        valid_events: BTreeSet<String>,
        valid_currencies: BTreeSet<String>,
        bounds: AmountBounds,
    ) -> Self {
        Self {
            valid_events,
            valid_currencies,
            bounds,
        }
    }

    pub fn validate(
        &self,
        payload: &TransactionPayload,
    ) -> Result<NormalizedTransaction, RejectionReason> {
        check_required_fields(payload)?;

        let event = field(payload, FIELD_EVENT);
        let event = member_of(event, &self.valid_events)
            .ok_or_else(|| RejectionReason::InvalidEvent(render_value(event)))?;

        let transaction_id = match field(payload, FIELD_TRANSACTION_ID) {
            Value::String(id) if !id.trim().is_empty() => id.clone(),
            _ => return Err(RejectionReason::InvalidTransactionId),
        };

        let amount = field(payload, FIELD_AMOUNT);
        let amount = Amount::from_json(amount, &self.bounds)
            .ok_or_else(|| RejectionReason::InvalidAmount(render_value(amount)))?;

        let currency = field(payload, FIELD_CURRENCY);
        let currency = member_of(currency, &self.valid_currencies)
            .ok_or_else(|| RejectionReason::InvalidCurrency(render_value(currency)))?;

        Ok(NormalizedTransaction {
            event,
            transaction_id,
            amount,
            currency,
            timestamp: payload.get(FIELD_TIMESTAMP).cloned(),
            payload: payload.clone(),
        })
    }
}

fn check_required_fields(payload: &TransactionPayload) -> Result<(), RejectionReason> {
    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|name| !payload.contains_key(name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(RejectionReason::MissingFields(missing))
    }
}

// Only called after the required-fields rule has passed.
fn field<'a>(payload: &'a TransactionPayload, name: &str) -> &'a Value {
    payload.get(name).unwrap_or(&Value::Null)
}

fn member_of(value: &Value, allowed: &BTreeSet<String>) -> Option<String> {
    value
        .as_str()
        .filter(|s| allowed.contains(*s))
        .map(str::to_string)
}
