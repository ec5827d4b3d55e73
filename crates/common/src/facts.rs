//! Rule fact vocabulary
//!
//! Controllers name the facts behind a rule firing with short symbolic
//! identifiers (`JURS`, `RATING_PROGRAM_CODE`, ...). Before a fact is
//! persisted the symbol is resolved against the closed table below into the
//! canonical business-rule key. Symbols outside the table are rejected.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Canonical business-rule vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FactKey {
    Jurisdiction,
    RatingProgramCode,
    UserDistributionChannel,
    DropDownValues,
    Page,
    Field,
    TransactionType,
    Customer,
    UserLocation,
    Purchase,
    Account,
    Discount,
}

const VOCABULARY: [(&str, FactKey); 12] = [
    ("JURS", FactKey::Jurisdiction),
    ("RATING_PROGRAM_CODE", FactKey::RatingProgramCode),
    ("USER_DISTRIBUTION_CHANNEL", FactKey::UserDistributionChannel),
    ("DROP_DOWN_VALUES", FactKey::DropDownValues),
    ("PAGE", FactKey::Page),
    ("FIELD", FactKey::Field),
    ("TRANSACTION_TYPE", FactKey::TransactionType),
    ("CUSTOMER", FactKey::Customer),
    ("USER_LOCATION", FactKey::UserLocation),
    ("PURCHASE", FactKey::Purchase),
    ("ACCOUNT", FactKey::Account),
    ("DISCOUNT", FactKey::Discount),
];

impl FactKey {
    /// Resolve a symbolic identifier
    pub fn from_symbol(symbol: &str) -> Result<Self> {
        VOCABULARY
            .iter()
            .find(|(candidate, _)| *candidate == symbol)
            .map(|(_, key)| *key)
            .ok_or_else(|| Error::UnknownFactKey(symbol.to_string()))
    }

    pub fn symbol(&self) -> &'static str {
        VOCABULARY
            .iter()
            .find(|(_, key)| key == self)
            .map(|(symbol, _)| *symbol)
            .unwrap_or_default()
    }

    /// Key written to the rule log
    pub fn canonical(&self) -> &'static str {
        match self {
            FactKey::Jurisdiction => "jurisdiction",
            FactKey::RatingProgramCode => "ratingProgramCode",
            FactKey::UserDistributionChannel => "userDistributionChannel",
            FactKey::DropDownValues => "dropDownValues",
            FactKey::Page => "page",
            FactKey::Field => "field",
            FactKey::TransactionType => "transactionType",
            FactKey::Customer => "customer",
            FactKey::UserLocation => "userLocation",
            FactKey::Purchase => "purchase",
            FactKey::Account => "account",
            FactKey::Discount => "discount",
        }
    }
}

/// One resolved `{key, value}` pair as persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

/// A rule firing and the ordered facts that decided it.
///
/// Equality and hashing are structural and order sensitive, which makes a
/// `RuleFact` its own deduplication key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleFact {
    rule_number: u32,
    facts: Vec<(FactKey, String)>,
}

impl RuleFact {
    /// Build a fact set from symbolic keys, failing on the first unknown one
    pub fn new(rule_number: u32, pairs: &[(&str, &str)]) -> Result<Self> {
        let facts = pairs
            .iter()
            .map(|(symbol, value)| Ok((FactKey::from_symbol(symbol)?, value.to_string())))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rule_number, facts })
    }

    pub fn rule_number(&self) -> u32 {
        self.rule_number
    }

    pub fn facts(&self) -> &[(FactKey, String)] {
        &self.facts
    }

    /// Value of the first fact with `key`
    pub fn get(&self, key: FactKey) -> Option<&str> {
        self.facts
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn key_value_pairs(&self) -> Vec<KeyValue> {
        self.facts
            .iter()
            .map(|(key, value)| KeyValue {
                key: key.canonical().to_string(),
                value: value.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_round_trip() {
        for (symbol, key) in VOCABULARY {
            assert_eq!(FactKey::from_symbol(symbol).unwrap(), key);
            assert_eq!(key.symbol(), symbol);
        }
    }

    #[test]
    fn test_unknown_symbol_fails_fast() {
        let err = RuleFact::new(8, &[("JURS", "WI"), ("STATE", "WI")]).unwrap_err();
        assert!(matches!(err, Error::UnknownFactKey(ref key) if key == "STATE"));
    }

    #[test]
    fn test_symbol_lookup_is_case_sensitive() {
        assert!(FactKey::from_symbol("jurs").is_err());
    }

    #[test]
    fn test_canonical_pairs_keep_order() {
        let fact = RuleFact::new(
            15,
            &[("RATING_PROGRAM_CODE", "OM1"), ("JURS", "WI")],
        )
        .unwrap();
        let pairs = fact.key_value_pairs();
        assert_eq!(pairs[0].key, "ratingProgramCode");
        assert_eq!(pairs[1].key, "jurisdiction");
        assert_eq!(fact.get(FactKey::Jurisdiction), Some("WI"));
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let a = RuleFact::new(1, &[("JURS", "WI"), ("PAGE", "QuoteSummary")]).unwrap();
        let b = RuleFact::new(1, &[("PAGE", "QuoteSummary"), ("JURS", "WI")]).unwrap();
        assert_ne!(a, b);
    }
}
