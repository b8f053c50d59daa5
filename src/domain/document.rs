//! Structured sub-document parsing.
//!
//! Two document shapes are understood:
//! - 13F-HR information tables: `<informationTable>` holding `<infoTable>` entries.
//! - Form 4 ownership documents: `<ownershipDocument>` holding
//!   `<derivativeTransaction>` entries plus issuer/owner identity once per document.
//!
//! Every extracted field is described by a [`FieldSpec`] whose [`FieldPolicy`]
//! says whether absence fails the document or resolves to a default. Tags are
//! matched by local name, so namespace prefixes do not matter.

use crate::domain::error::FilingscopeError;
use crate::domain::filing::{DocumentKind, FilingReference};
use crate::domain::holding::HoldingRecord;
use crate::domain::transaction::{
    OwnershipIdentity, TransactionDetail, TransactionRecord, IDENTITY_DEFAULT,
};
use roxmltree::{Document, Node};

pub const UNKNOWN_ISSUER: &str = "Unknown";

pub const HOLDINGS_CONTAINER: &str = "informationTable";
pub const HOLDINGS_ENTRY: &str = "infoTable";
pub const OWNERSHIP_CONTAINER: &str = "ownershipDocument";
pub const OWNERSHIP_ENTRY: &str = "derivativeTransaction";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Absence fails the whole document.
    Required,
    /// Absence resolves to this value.
    Default(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Nested tag names; each step searches the previous node's descendants.
    pub path: &'static [&'static str],
    pub policy: FieldPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Present(String),
    Defaulted(&'static str),
}

impl FieldValue {
    pub fn as_str(&self) -> &str {
        match self {
            FieldValue::Present(s) => s,
            FieldValue::Defaulted(s) => s,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, FieldValue::Defaulted(_))
    }
}

pub const ISSUER_NAME: FieldSpec = FieldSpec {
    name: "nameOfIssuer",
    path: &["nameOfIssuer"],
    policy: FieldPolicy::Default(UNKNOWN_ISSUER),
};

pub const VALUE: FieldSpec = FieldSpec {
    name: "value",
    path: &["value"],
    policy: FieldPolicy::Default("0"),
};

pub const SHARES: FieldSpec = FieldSpec {
    name: "sshPrnamt",
    path: &["shrsOrPrnAmt", "sshPrnamt"],
    policy: FieldPolicy::Default("0"),
};

pub const SECURITY_TITLE: FieldSpec = FieldSpec {
    name: "securityTitle",
    path: &["securityTitle", "value"],
    policy: FieldPolicy::Required,
};

pub const TRANSACTION_CODE: FieldSpec = FieldSpec {
    name: "transactionCode",
    path: &["transactionCoding", "transactionCode"],
    policy: FieldPolicy::Required,
};

pub const ACQUIRED_DISPOSED: FieldSpec = FieldSpec {
    name: "transactionAcquiredDisposedCode",
    path: &["transactionAcquiredDisposedCode", "value"],
    policy: FieldPolicy::Required,
};

pub const ISSUER_CIK: FieldSpec = FieldSpec {
    name: "issuerCik",
    path: &["issuer", "issuerCik"],
    policy: FieldPolicy::Default(IDENTITY_DEFAULT),
};

pub const ISSUER_NAME_FORM4: FieldSpec = FieldSpec {
    name: "issuerName",
    path: &["issuer", "issuerName"],
    policy: FieldPolicy::Default(IDENTITY_DEFAULT),
};

pub const OWNER_CIK: FieldSpec = FieldSpec {
    name: "rptOwnerCik",
    path: &["reportingOwner", "reportingOwnerId", "rptOwnerCik"],
    policy: FieldPolicy::Default(IDENTITY_DEFAULT),
};

pub const OWNER_NAME: FieldSpec = FieldSpec {
    name: "rptOwnerName",
    path: &["reportingOwner", "reportingOwnerId", "rptOwnerName"],
    policy: FieldPolicy::Default(IDENTITY_DEFAULT),
};

pub const OWNER_TITLE: FieldSpec = FieldSpec {
    name: "officerTitle",
    path: &["reportingOwner", "reportingOwnerRelationship", "officerTitle"],
    policy: FieldPolicy::Default(IDENTITY_DEFAULT),
};

/// Output of [`parse_document`], shaped by the reference's document kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedDocument {
    Holdings(Vec<HoldingRecord>),
    Transactions(Vec<TransactionRecord>),
}

pub fn parse_document(
    text: &str,
    reference: &FilingReference,
) -> Result<ParsedDocument, FilingscopeError> {
    match reference.kind {
        DocumentKind::Holdings => parse_holdings(text, reference).map(ParsedDocument::Holdings),
        DocumentKind::Ownership => {
            parse_transactions(text, reference).map(ParsedDocument::Transactions)
        }
    }
}

/// Parses a 13F information table into holding records, in document order.
pub fn parse_holdings(
    text: &str,
    reference: &FilingReference,
) -> Result<Vec<HoldingRecord>, FilingscopeError> {
    let doc = load(text, reference)?;
    let container = find_container(&doc, HOLDINGS_CONTAINER, reference)?;

    let records = children_named(container, HOLDINGS_ENTRY)
        .map(|entry| {
            let issuer = resolve(entry, &ISSUER_NAME, reference);
            let value = resolve_amount(entry, &VALUE, reference);
            let shares = resolve_amount(entry, &SHARES, reference);
            HoldingRecord {
                issuer: issuer.as_str().to_string(),
                value,
                shares,
                filing_date: reference.filing_date.clone(),
            }
        })
        .collect();

    Ok(records)
}

/// Parses a Form 4 ownership document. A document with no derivative
/// transactions yields a single identity-only placeholder record.
pub fn parse_transactions(
    text: &str,
    reference: &FilingReference,
) -> Result<Vec<TransactionRecord>, FilingscopeError> {
    let doc = load(text, reference)?;
    let container = find_container(&doc, OWNERSHIP_CONTAINER, reference)?;
    let identity = parse_identity(container, reference);

    let mut records = Vec::new();
    for (i, entry) in children_named(container, OWNERSHIP_ENTRY).enumerate() {
        let title = require(entry, &SECURITY_TITLE, i, reference)?;
        let code = require(entry, &TRANSACTION_CODE, i, reference)?;
        let indicator = require(entry, &ACQUIRED_DISPOSED, i, reference)?;

        records.push(TransactionRecord {
            identity: identity.clone(),
            filing_date: reference.filing_date.clone(),
            detail: Some(TransactionDetail::classify(&title, &code, &indicator)),
        });
    }

    if records.is_empty() {
        log::debug!("{}: no derivative transactions, emitting placeholder", reference.url);
        records.push(TransactionRecord::placeholder(
            identity,
            reference.filing_date.clone(),
        ));
    }

    Ok(records)
}

fn parse_identity(container: Node<'_, '_>, reference: &FilingReference) -> OwnershipIdentity {
    OwnershipIdentity {
        issuer_cik: resolve(container, &ISSUER_CIK, reference).as_str().to_string(),
        issuer_name: resolve(container, &ISSUER_NAME_FORM4, reference).as_str().to_string(),
        owner_cik: resolve(container, &OWNER_CIK, reference).as_str().to_string(),
        owner_name: resolve(container, &OWNER_NAME, reference).as_str().to_string(),
        owner_title: resolve(container, &OWNER_TITLE, reference).as_str().to_string(),
    }
}

/// Looks up `spec` under `node`. Returns `None` only for an absent
/// [`FieldPolicy::Required`] field.
pub fn extract_field(node: Node<'_, '_>, spec: &FieldSpec) -> Option<FieldValue> {
    match find_path(node, spec.path) {
        Some(found) => Some(FieldValue::Present(text_of(found))),
        None => match spec.policy {
            FieldPolicy::Required => None,
            FieldPolicy::Default(value) => Some(FieldValue::Defaulted(value)),
        },
    }
}

/// Parses an amount field: trimmed, `,` separators removed, non-negative integer.
pub fn parse_amount(text: &str) -> Option<u64> {
    let cleaned: String = text.trim().chars().filter(|&c| c != ',').collect();
    cleaned.parse().ok()
}

fn load<'a>(text: &'a str, reference: &FilingReference) -> Result<Document<'a>, FilingscopeError> {
    Document::parse(text).map_err(|e| FilingscopeError::MalformedDocument {
        document: reference.url.clone(),
        reason: e.to_string(),
    })
}

fn find_container<'a, 'input>(
    doc: &'a Document<'input>,
    name: &str,
    reference: &FilingReference,
) -> Result<Node<'a, 'input>, FilingscopeError> {
    doc.descendants()
        .find(|n| n.is_element() && n.tag_name().name() == name)
        .ok_or_else(|| FilingscopeError::StructureNotFound {
            document: reference.url.clone(),
            container: name.to_string(),
        })
}

fn children_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants()
        .skip(1)
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn find_path<'a, 'input>(node: Node<'a, 'input>, path: &[&str]) -> Option<Node<'a, 'input>> {
    path.iter().try_fold(node, |current, step| {
        current
            .descendants()
            .skip(1)
            .find(|n| n.is_element() && n.tag_name().name() == *step)
    })
}

fn text_of(node: Node<'_, '_>) -> String {
    let text: String = node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    text.trim().to_string()
}

fn resolve(node: Node<'_, '_>, spec: &FieldSpec, reference: &FilingReference) -> FieldValue {
    let value = extract_field(node, spec).unwrap_or(FieldValue::Defaulted(""));
    if value.is_defaulted() {
        log::debug!(
            "{}: {} missing, using {:?}",
            reference.url,
            spec.name,
            value.as_str()
        );
    }
    value
}

fn resolve_amount(node: Node<'_, '_>, spec: &FieldSpec, reference: &FilingReference) -> u64 {
    let value = resolve(node, spec, reference);
    match parse_amount(value.as_str()) {
        Some(n) => n,
        None => {
            log::warn!(
                "{}: {} is not a whole number ({:?}), using 0",
                reference.url,
                spec.name,
                value.as_str()
            );
            0
        }
    }
}

fn require(
    node: Node<'_, '_>,
    spec: &FieldSpec,
    entry: usize,
    reference: &FilingReference,
) -> Result<String, FilingscopeError> {
    match extract_field(node, spec) {
        Some(value) => Ok(value.as_str().to_string()),
        None => Err(FilingscopeError::MissingRequiredField {
            document: reference.url.clone(),
            entry,
            field: spec.name.to_string(),
        }),
    }
}
