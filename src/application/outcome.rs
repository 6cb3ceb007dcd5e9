use crate::domain::transaction::RejectionReason;

/// Terminal result of handling one webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    Accepted,
    Unauthorized,
    Malformed,
    BodyTooLarge,
    Invalid(RejectionReason),
    Duplicate,
    ConfirmFailed,
    /// Carries the fault detail for logs; never shown to the caller.
    InternalFault(String),
}

impl WebhookOutcome {
    /// HTTP status code reported to the caller.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Accepted => 200,
            Self::Unauthorized => 401,
            Self::Malformed | Self::BodyTooLarge | Self::Invalid(_) | Self::Duplicate => 400,
            Self::ConfirmFailed | Self::InternalFault(_) => 500,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub fn message(&self) -> String {
        match self {
            Self::Accepted => "transaction confirmed".to_string(),
            Self::Unauthorized => "invalid token".to_string(),
            Self::Malformed => "malformed JSON body".to_string(),
            Self::BodyTooLarge => "request body too large".to_string(),
            Self::Invalid(reason) => format!("invalid transaction: {reason}"),
            Self::Duplicate => "duplicate transaction".to_string(),
            Self::ConfirmFailed => "failed to confirm transaction".to_string(),
            Self::InternalFault(_) => "internal error".to_string(),
        }
    }
}
