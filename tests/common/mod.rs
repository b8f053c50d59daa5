#![allow(dead_code)]

use chrono::NaiveDate;
use filingscope::domain::error::FilingscopeError;
use filingscope::domain::filing::{DateRange, DocumentKind, FilerId, FilingDate, FilingReference};
use filingscope::ports::filing_locator::FilingLocator;
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory locator. Documents are returned newest first, as a real
/// locator would.
pub struct MockLocator {
    pub documents: Vec<(FilingReference, String)>,
    pub errors: HashMap<String, String>,
    pub retrieved: RefCell<Vec<String>>,
}

impl MockLocator {
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
            errors: HashMap::new(),
            retrieved: RefCell::new(Vec::new()),
        }
    }

    pub fn with_document(mut self, filer: &str, kind: DocumentKind, filed: &str, body: &str) -> Self {
        let filer = FilerId::parse(filer).unwrap();
        let url = format!("mock://{}/{}/{}", filer, kind.dir_name(), filed);
        self.documents.push((
            FilingReference::new(filer, FilingDate::parse(filed), url, kind),
            body.to_string(),
        ));
        self
    }

    /// Every call for `filer` fails with a retrieval error.
    pub fn with_error(mut self, filer: &str, reason: &str) -> Self {
        let filer = FilerId::parse(filer).unwrap();
        self.errors.insert(filer.to_string(), reason.to_string());
        self
    }

    pub fn retrieval_count(&self) -> usize {
        self.retrieved.borrow().len()
    }
}

impl FilingLocator for MockLocator {
    fn locate(
        &self,
        filer: &FilerId,
        kind: DocumentKind,
        range: &DateRange,
    ) -> Result<Vec<FilingReference>, FilingscopeError> {
        if let Some(reason) = self.errors.get(filer.as_str()) {
            return Err(FilingscopeError::Retrieval {
                filer: filer.to_string(),
                reason: reason.clone(),
            });
        }
        let mut refs: Vec<FilingReference> = self
            .documents
            .iter()
            .map(|(r, _)| r)
            .filter(|r| &r.filer == filer && r.kind == kind && range.contains(&r.filing_date))
            .cloned()
            .collect();
        refs.sort_by(|a, b| b.filing_date.date().cmp(&a.filing_date.date()));
        Ok(refs)
    }

    fn retrieve(&self, reference: &FilingReference) -> Result<String, FilingscopeError> {
        self.retrieved.borrow_mut().push(reference.url.clone());
        self.documents
            .iter()
            .find(|(r, _)| r.url == reference.url)
            .map(|(_, body)| body.clone())
            .ok_or_else(|| FilingscopeError::Retrieval {
                filer: reference.filer.to_string(),
                reason: format!("no document at {}", reference.url),
            })
    }
}

pub fn info_table(issuer: &str, value: &str, shares: &str) -> String {
    format!(
        "<infoTable><nameOfIssuer>{issuer}</nameOfIssuer><value>{value}</value>\
         <shrsOrPrnAmt><sshPrnamt>{shares}</sshPrnamt><sshPrnamtType>SH</sshPrnamtType></shrsOrPrnAmt>\
         </infoTable>"
    )
}

/// A 13F information table with one `infoTable` per `(issuer, value, shares)`.
pub fn holdings_xml(entries: &[(&str, u64, u64)]) -> String {
    let body: String = entries
        .iter()
        .map(|(issuer, value, shares)| info_table(issuer, &value.to_string(), &shares.to_string()))
        .collect();
    format!(
        "<?xml version=\"1.0\"?>\
         <informationTable xmlns=\"http://www.sec.gov/edgar/document/thirteenf/informationtable\">{body}</informationTable>"
    )
}

pub fn derivative_transaction(title: &str, code: &str, acquired_disposed: &str) -> String {
    format!(
        "<derivativeTransaction>\
         <securityTitle><value>{title}</value></securityTitle>\
         <transactionCoding><transactionFormType>4</transactionFormType>\
         <transactionCode>{code}</transactionCode></transactionCoding>\
         <transactionAmounts><transactionAcquiredDisposedCode><value>{acquired_disposed}</value>\
         </transactionAcquiredDisposedCode></transactionAmounts>\
         </derivativeTransaction>"
    )
}

/// A Form 4 ownership document for Apple with one reporting owner.
pub fn ownership_xml(transactions: &[(&str, &str, &str)]) -> String {
    let body: String = transactions
        .iter()
        .map(|(title, code, ad)| derivative_transaction(title, code, ad))
        .collect();
    format!(
        "<?xml version=\"1.0\"?><ownershipDocument>\
         <issuer><issuerCik>0000320193</issuerCik><issuerName>Apple Inc.</issuerName></issuer>\
         <reportingOwner><reportingOwnerId><rptOwnerCik>0001214128</rptOwnerCik>\
         <rptOwnerName>COOK TIMOTHY D</rptOwnerName></reportingOwnerId>\
         <reportingOwnerRelationship><officerTitle>Chief Executive Officer</officerTitle>\
         </reportingOwnerRelationship></reportingOwner>\
         <derivativeTable>{body}</derivativeTable></ownershipDocument>"
    )
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn filer(id: &str) -> FilerId {
    FilerId::parse(id).unwrap()
}
