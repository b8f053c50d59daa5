//! filingscope: holdings and insider-trade analysis over SEC 13F-HR and
//! Form 4 filings.
//!
//! Hexagonal architecture: parsing, classification and aggregation in
//! [`domain`], port traits in [`ports`], concrete implementations in
//! [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
