//! Port traits: the boundary between the core and its collaborators.

pub mod config_port;
pub mod filing_locator;
pub mod identifier_lookup;
pub mod report_port;
