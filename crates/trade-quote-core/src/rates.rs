//! Currency normalization into the canonical calculation currency (USD).
//!
//! Every monetary input is converted independently to USD instead of being
//! daisy-chained through the display currency, which keeps the conversion
//! graph flat and auditable when one quote mixes EUR logistics, RUB
//! brokerage and TRY product pricing.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::QuoteError;
use crate::types::{Currency, Money, MoneyValue, RateSource};
use crate::QuoteResult;

/// A single resolved rate from a provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateQuote {
    /// Units of USD per one unit of the source currency.
    pub rate: Decimal,
    pub as_of: DateTime<Utc>,
    pub source: RateSource,
}

/// A rate actually consumed by a calculation, kept for the audit snapshot
/// that an immutable quote version persists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsedRate {
    pub from: Currency,
    pub to: Currency,
    pub rate: Decimal,
    pub as_of: DateTime<Utc>,
    pub source: RateSource,
}

/// Source of exchange rates for one calculation. Implementations are
/// request-scoped: one snapshot serves every product and phase of a quote,
/// so all legs are normalized against the same rates.
pub trait RateProvider {
    /// USD per one unit of `from`. `None` when no rate is obtainable.
    fn usd_quote(&self, from: Currency) -> Option<RateQuote>;
}

/// In-memory rate table: organization-configured manual overrides take
/// priority, external daily rates are the fallback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateTable {
    #[serde(default = "Utc::now")]
    pub as_of: DateTime<Utc>,
    #[serde(default)]
    pub live: HashMap<Currency, Decimal>,
    #[serde(default)]
    pub manual: HashMap<Currency, Decimal>,
}

impl RateTable {
    pub fn new(as_of: DateTime<Utc>) -> Self {
        Self { as_of, live: HashMap::new(), manual: HashMap::new() }
    }

    pub fn with_live(mut self, currency: Currency, rate: Decimal) -> Self {
        self.live.insert(currency, rate);
        self
    }

    pub fn with_manual(mut self, currency: Currency, rate: Decimal) -> Self {
        self.manual.insert(currency, rate);
        self
    }
}

impl RateProvider for RateTable {
    fn usd_quote(&self, from: Currency) -> Option<RateQuote> {
        if from == Currency::Usd {
            return Some(RateQuote {
                rate: Decimal::ONE,
                as_of: self.as_of,
                source: RateSource::Identity,
            });
        }
        if let Some(&rate) = self.manual.get(&from) {
            return Some(RateQuote { rate, as_of: self.as_of, source: RateSource::Manual });
        }
        self.live
            .get(&from)
            .map(|&rate| RateQuote { rate, as_of: self.as_of, source: RateSource::Live })
    }
}

/// Converts tagged values into canonical USD and records which rates were
/// used. One normalizer lives for exactly one quote calculation.
pub struct Normalizer<'a> {
    provider: &'a dyn RateProvider,
    used: Vec<UsedRate>,
}

impl<'a> Normalizer<'a> {
    pub fn new(provider: &'a dyn RateProvider) -> Self {
        Self { provider, used: Vec::new() }
    }

    /// Convert a value to USD.
    ///
    /// Zero values convert to zero without a rate lookup, so a deal with no
    /// rate for an unused currency does not fail. A non-zero value with no
    /// obtainable rate fails loudly; a silently substituted rate would
    /// corrupt every downstream phase.
    pub fn to_usd(&mut self, value: MoneyValue) -> QuoteResult<Money> {
        if value.amount.is_zero() {
            return Ok(Decimal::ZERO);
        }
        let quote = self.lookup(value.currency)?;
        self.record(value.currency, Currency::Usd, quote);
        Ok(value.amount * quote.rate)
    }

    /// USD -> `to` rate for projecting results into the display currency.
    /// The inverse of the currency's USD quote; identity for USD itself.
    pub fn usd_to(&mut self, to: Currency) -> QuoteResult<Decimal> {
        let quote = self.lookup(to)?;
        if quote.rate.is_zero() {
            return Err(QuoteError::DivisionByZero {
                context: format!("inverting {to} rate for display projection"),
            });
        }
        let inverted = RateQuote { rate: Decimal::ONE / quote.rate, ..quote };
        self.record(Currency::Usd, to, inverted);
        Ok(inverted.rate)
    }

    /// The rates consumed so far, deduplicated, for the audit snapshot.
    pub fn into_snapshot(self) -> Vec<UsedRate> {
        self.used
    }

    fn lookup(&self, currency: Currency) -> QuoteResult<RateQuote> {
        self.provider
            .usd_quote(currency)
            .ok_or(QuoteError::NoExchangeRate { currency })
    }

    fn record(&mut self, from: Currency, to: Currency, quote: RateQuote) {
        let already = self.used.iter().any(|u| u.from == from && u.to == to);
        if !already {
            self.used.push(UsedRate {
                from,
                to,
                rate: quote.rate,
                as_of: quote.as_of,
                source: quote.source,
            });
        }
    }
}
