use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_TICKER_LEN: usize = 10;
const MAX_EXCHANGE_LEN: usize = 4;

/// Upper-cased exchange ticker, optionally carrying a `.EXCHANGE` suffix.
///
/// Karachi listings are short alphanumeric codes (`OGDC`, `HUBC`, `786`);
/// the provider addresses them as `OGDC.KA`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Bare ticker as a client sends it. Dots are rejected so a caller cannot
    /// smuggle in an exchange of its own.
    pub fn ticker(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_ascii_uppercase();
        validate_ticker(&normalized)?;
        Ok(Self(normalized))
    }

    /// Provider symbol: `TICKER` or `TICKER.EXCHANGE`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_ascii_uppercase();
        match normalized.split_once('.') {
            Some((ticker, exchange)) => {
                validate_ticker(ticker)?;
                validate_exchange(exchange)?;
            }
            None => validate_ticker(&normalized)?,
        }
        Ok(Self(normalized))
    }

    /// Attach an exchange suffix such as `.KA` to a bare ticker.
    pub fn with_suffix(&self, suffix: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidExchange {
            value: suffix.to_owned(),
        };
        if self.exchange().is_some() {
            return Err(invalid());
        }
        let exchange = suffix
            .strip_prefix('.')
            .ok_or_else(invalid)?
            .to_ascii_uppercase();
        validate_exchange(&exchange)?;
        Ok(Self(format!("{}.{}", self.0, exchange)))
    }

    pub fn exchange(&self) -> Option<&str> {
        self.0.split_once('.').map(|(_, exchange)| exchange)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn validate_ticker(ticker: &str) -> Result<(), ValidationError> {
    if ticker.is_empty() {
        return Err(ValidationError::EmptySymbol);
    }
    let len = ticker.chars().count();
    if len > MAX_TICKER_LEN {
        return Err(ValidationError::SymbolTooLong {
            len,
            max: MAX_TICKER_LEN,
        });
    }
    match ticker
        .chars()
        .enumerate()
        .find(|(_, ch)| !ch.is_ascii_alphanumeric())
    {
        Some((index, ch)) => Err(ValidationError::SymbolInvalidChar { ch, index }),
        None => Ok(()),
    }
}

fn validate_exchange(exchange: &str) -> Result<(), ValidationError> {
    let valid = !exchange.is_empty()
        && exchange.len() <= MAX_EXCHANGE_LEN
        && exchange.chars().all(|ch| ch.is_ascii_alphabetic());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidExchange {
            value: exchange.to_owned(),
        })
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_is_trimmed_and_upper_cased() {
        let ticker = Symbol::ticker(" ogdc ").expect("ticker");
        assert_eq!(ticker.as_str(), "OGDC");
        assert_eq!(ticker.exchange(), None);
    }

    #[test]
    fn numeric_listings_are_tickers() {
        assert_eq!(Symbol::ticker("786").expect("ticker").as_str(), "786");
    }

    #[test]
    fn appends_exchange_suffix() {
        let listed = Symbol::ticker("hbl")
            .and_then(|ticker| ticker.with_suffix(".KA"))
            .expect("listed symbol");
        assert_eq!(listed.as_str(), "HBL.KA");
        assert_eq!(listed.exchange(), Some("KA"));
    }

    #[test]
    fn client_cannot_choose_the_exchange() {
        let err = Symbol::ticker("OGDC.L").expect_err("dot in ticker");
        assert_eq!(err, ValidationError::SymbolInvalidChar { ch: '.', index: 4 });

        let listed = Symbol::parse("OGDC.KA").expect("provider symbol");
        let err = listed.with_suffix(".KA").expect_err("already listed");
        assert!(matches!(err, ValidationError::InvalidExchange { .. }));
    }

    #[test]
    fn rejects_long_or_malformed_tickers() {
        assert_eq!(Symbol::ticker("  "), Err(ValidationError::EmptySymbol));
        assert!(matches!(
            Symbol::ticker("ABCDEFGHIJK"),
            Err(ValidationError::SymbolTooLong { len: 11, max: 10 })
        ));
        assert!(matches!(
            Symbol::ticker("LUCK$"),
            Err(ValidationError::SymbolInvalidChar { ch: '$', index: 4 })
        ));
    }

    #[test]
    fn provider_symbol_needs_alphabetic_exchange() {
        assert!(Symbol::parse("PSO.KA").is_ok());
        for bad in ["PSO.", "PSO.K1", "PSO.KARACHI", ".KA"] {
            assert!(Symbol::parse(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn serde_round_trip_goes_through_validation() {
        let symbol: Symbol = serde_json::from_str("\"mcb.ka\"").expect("deserialize");
        assert_eq!(symbol.as_str(), "MCB.KA");
        assert!(serde_json::from_str::<Symbol>("\"MCB KA\"").is_err());
    }
}
