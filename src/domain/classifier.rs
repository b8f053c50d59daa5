//! Derivative transaction classification.
//!
//! A transaction is reduced to a [`ClassificationInput`] (option kind, code,
//! action) and run through [`RULES`] top-down. The first rule whose predicate
//! holds decides the [`TradeCategory`]. Rules overlap, so table order is the
//! contract: a "Put Option" title with code `S` is a Sell, not a Put Option.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    Put,
    Call,
    Other,
}

impl OptionKind {
    /// Case-insensitive substring match on the security title. "put option"
    /// is checked before the call patterns.
    pub fn from_security_title(title: &str) -> Self {
        let lower = title.to_lowercase();
        if lower.contains("put option") {
            OptionKind::Put
        } else if lower.contains("call option") || lower.contains("stock option") {
            OptionKind::Call
        } else {
            OptionKind::Other
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionKind::Put => write!(f, "PUT"),
            OptionKind::Call => write!(f, "CALL"),
            OptionKind::Other => write!(f, "OTHER"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Acquired,
    Disposed,
    Unknown,
}

impl Action {
    pub fn from_indicator(indicator: &str) -> Self {
        match indicator.trim() {
            "A" => Action::Acquired,
            "D" => Action::Disposed,
            _ => Action::Unknown,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Acquired => write!(f, "Acquired"),
            Action::Disposed => write!(f, "Disposed"),
            Action::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeCategory {
    SellAfterExercisingOption,
    Buy,
    Sell,
    Awarded,
    PutOption,
    Other,
}

impl TradeCategory {
    pub const ALL: [TradeCategory; 6] = [
        TradeCategory::SellAfterExercisingOption,
        TradeCategory::Buy,
        TradeCategory::Sell,
        TradeCategory::Awarded,
        TradeCategory::PutOption,
        TradeCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TradeCategory::SellAfterExercisingOption => "Sell after Exercising Option",
            TradeCategory::Buy => "Buy",
            TradeCategory::Sell => "Sell",
            TradeCategory::Awarded => "Awarded",
            TradeCategory::PutOption => "Put Option",
            TradeCategory::Other => "Other",
        }
    }
}

impl fmt::Display for TradeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationInput<'a> {
    pub option_kind: OptionKind,
    pub code: &'a str,
    pub action: Action,
}

impl<'a> ClassificationInput<'a> {
    /// Derives option kind and action from the raw document fields.
    pub fn from_fields(security_title: &str, code: &'a str, indicator: &str) -> Self {
        Self {
            option_kind: OptionKind::from_security_title(security_title),
            code: code.trim(),
            action: Action::from_indicator(indicator),
        }
    }
}

pub struct ClassificationRule {
    pub priority: u8,
    pub name: &'static str,
    pub predicate: fn(&ClassificationInput<'_>) -> bool,
    pub category: TradeCategory,
}

impl fmt::Debug for ClassificationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassificationRule")
            .field("priority", &self.priority)
            .field("name", &self.name)
            .field("category", &self.category)
            .finish()
    }
}

fn exercised_call_disposed(i: &ClassificationInput<'_>) -> bool {
    i.option_kind == OptionKind::Call && i.code == "M" && i.action == Action::Disposed
}

fn open_market_purchase(i: &ClassificationInput<'_>) -> bool {
    i.code == "P" && i.action == Action::Acquired
}

fn open_market_sale(i: &ClassificationInput<'_>) -> bool {
    i.code == "S"
}

fn grant_or_award(i: &ClassificationInput<'_>) -> bool {
    i.code == "A"
}

fn put_option(i: &ClassificationInput<'_>) -> bool {
    i.option_kind == OptionKind::Put
}

fn always(_: &ClassificationInput<'_>) -> bool {
    true
}

pub static RULES: [ClassificationRule; 6] = [
    ClassificationRule {
        priority: 1,
        name: "exercised call disposed",
        predicate: exercised_call_disposed,
        category: TradeCategory::SellAfterExercisingOption,
    },
    ClassificationRule {
        priority: 2,
        name: "open market purchase",
        predicate: open_market_purchase,
        category: TradeCategory::Buy,
    },
    ClassificationRule {
        priority: 3,
        name: "open market sale",
        predicate: open_market_sale,
        category: TradeCategory::Sell,
    },
    ClassificationRule {
        priority: 4,
        name: "grant or award",
        predicate: grant_or_award,
        category: TradeCategory::Awarded,
    },
    ClassificationRule {
        priority: 5,
        name: "put option",
        predicate: put_option,
        category: TradeCategory::PutOption,
    },
    ClassificationRule {
        priority: 6,
        name: "fallback",
        predicate: always,
        category: TradeCategory::Other,
    },
];

/// The first rule in [`RULES`] whose predicate holds.
pub fn matching_rule(input: &ClassificationInput<'_>) -> &'static ClassificationRule {
    RULES
        .iter()
        .find(|rule| (rule.predicate)(input))
        .unwrap_or(&RULES[RULES.len() - 1])
}

pub fn classify(input: &ClassificationInput<'_>) -> TradeCategory {
    matching_rule(input).category
}
