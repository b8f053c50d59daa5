//! Derivative transaction records parsed from Form 4 ownership documents.

use crate::domain::classifier::{
    classify, Action, ClassificationInput, OptionKind, TradeCategory,
};
use crate::domain::filing::FilingDate;

pub const IDENTITY_DEFAULT: &str = "N/A";

/// Issuer and reporting-owner fields, present once per document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipIdentity {
    pub issuer_cik: String,
    pub issuer_name: String,
    pub owner_cik: String,
    pub owner_name: String,
    pub owner_title: String,
}

impl Default for OwnershipIdentity {
    fn default() -> Self {
        Self {
            issuer_cik: IDENTITY_DEFAULT.to_string(),
            issuer_name: IDENTITY_DEFAULT.to_string(),
            owner_cik: IDENTITY_DEFAULT.to_string(),
            owner_name: IDENTITY_DEFAULT.to_string(),
            owner_title: IDENTITY_DEFAULT.to_string(),
        }
    }
}

/// A classified derivative transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDetail {
    pub security_title: String,
    pub code: String,
    pub acquired_disposed: String,
    pub option_kind: OptionKind,
    pub action: Action,
    pub category: TradeCategory,
}

impl TransactionDetail {
    pub fn classify(security_title: &str, code: &str, acquired_disposed: &str) -> Self {
        let input = ClassificationInput::from_fields(security_title, code, acquired_disposed);
        Self {
            security_title: security_title.to_string(),
            code: input.code.to_string(),
            acquired_disposed: acquired_disposed.trim().to_string(),
            option_kind: input.option_kind,
            action: input.action,
            category: classify(&input),
        }
    }
}

/// One row of a parsed ownership document. `detail` is `None` for the
/// placeholder emitted when a located filing has no derivative transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub identity: OwnershipIdentity,
    pub filing_date: FilingDate,
    pub detail: Option<TransactionDetail>,
}

impl TransactionRecord {
    pub fn placeholder(identity: OwnershipIdentity, filing_date: FilingDate) -> Self {
        Self {
            identity,
            filing_date,
            detail: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.detail.is_none()
    }

    pub fn category(&self) -> Option<TradeCategory> {
        self.detail.as_ref().map(|d| d.category)
    }
}
