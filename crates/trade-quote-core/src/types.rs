use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Currency of a monetary input. `Usd` is the canonical calculation
/// currency; everything is normalized into it before any arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Rub,
    Try,
    Cny,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Rub => "RUB",
            Currency::Try => "TRY",
            Currency::Cny => "CNY",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Supplier country. Determines whether the base price carries a local VAT
/// component that must be stripped before the purchase price is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Country {
    Turkey,
    Russia,
    China,
    Germany,
    Italy,
}

impl Country {
    /// Standard VAT rate embedded in supplier price lists, where the tax
    /// regime quotes prices VAT-inclusive. `None` means the input price is
    /// already VAT-exclusive (e.g. Chinese export pricing).
    pub fn vat_removal_rate(&self) -> Option<Rate> {
        match self {
            Country::Turkey => Some(dec!(0.20)),
            Country::Russia => Some(dec!(0.20)),
            Country::Germany => Some(dec!(0.19)),
            Country::Italy => Some(dec!(0.22)),
            Country::China => None,
        }
    }
}

/// Commercial structure of the deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleType {
    Supply,
    Transit,
    Export,
    Fintransit,
}

/// Delivery terms. Only the closed set below is accepted; anything else
/// fails input validation at deserialization time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Incoterms {
    Exw,
    Fca,
    Fob,
    Cif,
    Cpt,
    Dap,
    Ddp,
}

/// Selling legal entity. Carried through to the output for audit purposes;
/// does not participate in the arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegalEntity {
    RussiaLlc,
    TurkeyAs,
    HongKongLtd,
}

/// Provenance of an exchange rate used during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    Live,
    Manual,
    Identity,
}

/// An explicit amount + currency pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoneyValue {
    pub amount: Money,
    pub currency: Currency,
}

impl MoneyValue {
    pub fn new(amount: Money, currency: Currency) -> Self {
        Self { amount, currency }
    }
}

/// A monetary input field. Accepts either an explicit `{amount, currency}`
/// pair or a bare number; bare numbers are interpreted in the quote's
/// display currency and normalized exactly the same way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MoneyField {
    Tagged(MoneyValue),
    Bare(Money),
}

impl MoneyField {
    /// Resolve to an explicit pair, filling in the fallback currency for
    /// bare numbers.
    pub fn resolve(&self, fallback: Currency) -> MoneyValue {
        match *self {
            MoneyField::Tagged(value) => value,
            MoneyField::Bare(amount) => MoneyValue::new(amount, fallback),
        }
    }

    pub fn amount(&self) -> Money {
        match *self {
            MoneyField::Tagged(value) => value.amount,
            MoneyField::Bare(amount) => amount,
        }
    }
}

impl Default for MoneyField {
    fn default() -> Self {
        MoneyField::Bare(Decimal::ZERO)
    }
}

/// Non-fatal policy findings. Reported alongside results, never blocking
/// the calculation; acting on them is a caller concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BusinessRuleWarning {
    UnusualVatRate { rate: Rate },
    MarkupBelowPolicy { product: String, markup: Rate },
    DealMakerFeeExceedsMargin { product: String, fee: Money, margin: Money },
    NegativeIntermediate { product: String, field: String, value: Money },
}

impl fmt::Display for BusinessRuleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusinessRuleWarning::UnusualVatRate { rate } => {
                write!(f, "VAT rate {rate} is outside the usual range")
            }
            BusinessRuleWarning::MarkupBelowPolicy { product, markup } => {
                write!(f, "markup {markup} on '{product}' is below the policy floor")
            }
            BusinessRuleWarning::DealMakerFeeExceedsMargin { product, fee, margin } => {
                write!(f, "deal-maker fee {fee} on '{product}' exceeds its margin {margin}")
            }
            BusinessRuleWarning::NegativeIntermediate { product, field, value } => {
                write!(f, "'{product}' has negative {field}: {value}")
            }
        }
    }
}
