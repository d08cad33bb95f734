//! Input data model for a quote calculation.
//!
//! Inputs are assembled fresh per calculation request and treated as
//! immutable once the engine starts; the persisted quote version that
//! snapshots them is an external collaborator.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::QuoteError;
use crate::types::{
    Country, Currency, Incoterms, LegalEntity, MoneyField, Rate, SaleType,
};
use crate::QuoteResult;

/// Fee owed to the person who sourced the deal. A fixed amount is a
/// quote-level sum distributed across products by purchase weight; a
/// percentage applies to each product's own margin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealMakerFee {
    Fixed(MoneyField),
    PercentOfMargin(Rate),
}

impl Default for DealMakerFee {
    fn default() -> Self {
        DealMakerFee::Fixed(MoneyField::default())
    }
}

/// One product line of the quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    /// Price per unit as quoted by the supplier, inclusive of the seller
    /// country's VAT where that regime applies.
    pub base_price: MoneyField,
    pub quantity: u32,
    #[serde(default)]
    pub weight_kg: Decimal,
    /// Customs tariff code (HS code).
    #[serde(default)]
    pub customs_code: String,
    /// Per-product overrides; take precedence over the quote defaults.
    #[serde(default)]
    pub supplier_country: Option<Country>,
    #[serde(default)]
    pub markup_pct: Option<Rate>,
    #[serde(default)]
    pub discount_pct: Option<Rate>,
}

impl ProductInput {
    pub fn supplier_country(&self, quote: &QuoteParameters) -> Country {
        self.supplier_country.unwrap_or(quote.supplier_country)
    }

    pub fn markup_pct(&self, quote: &QuoteParameters) -> Rate {
        self.markup_pct.unwrap_or(quote.markup_pct)
    }

    pub fn discount_pct(&self, quote: &QuoteParameters) -> Rate {
        self.discount_pct.unwrap_or(quote.discount_pct)
    }
}

/// Quote-wide parameters and defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteParameters {
    pub legal_entity: LegalEntity,
    pub sale_type: SaleType,
    pub incoterms: Incoterms,
    /// Currency the client sees on the quotation. Calculation is always in
    /// USD; this only drives the projected rendering and the fallback for
    /// bare monetary fields.
    pub display_currency: Currency,
    pub supplier_country: Country,
    pub markup_pct: Rate,
    #[serde(default)]
    pub discount_pct: Rate,
    #[serde(default)]
    pub forex_reserve_pct: Rate,
    #[serde(default)]
    pub deal_maker_fee: DealMakerFee,

    /// Fraction of the revenue the client pays in advance.
    pub client_advance_pct: Rate,
    /// Fraction of the purchase price prepaid to the supplier.
    pub supplier_advance_pct: Rate,
    /// Days from deal start until the client advance arrives.
    pub days_to_advance: u32,
    /// Delivery lead time in days.
    pub delivery_days: u32,
    /// Client credit period: days from delivery to final settlement.
    pub days_to_settlement: u32,

    pub import_tariff_pct: Rate,
    #[serde(default)]
    pub excise_per_unit: MoneyField,
    pub vat_rate: Rate,

    // Logistics legs and border costs. Each carries its own currency tag,
    // independent of the display currency.
    #[serde(default)]
    pub logistics_supplier_to_hub: MoneyField,
    #[serde(default)]
    pub logistics_hub_to_customs: MoneyField,
    #[serde(default)]
    pub logistics_customs_to_client: MoneyField,
    #[serde(default)]
    pub hub_brokerage: MoneyField,
    #[serde(default)]
    pub documentation_fees: MoneyField,
}

/// Admin-controlled financial constants; not entered per quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Daily loan interest rate used for all financing-cost compounding.
    pub daily_interest_rate: Rate,
    /// Financing agent's fee as a fraction of the sale-price base.
    pub financing_agent_fee_pct: Rate,
    /// Cargo insurance as a fraction of the purchase price.
    #[serde(default)]
    pub insurance_pct: Rate,
}

/// The full input set for one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteInput {
    pub parameters: QuoteParameters,
    pub products: Vec<ProductInput>,
}

fn invalid(field: &str, reason: impl Into<String>) -> QuoteError {
    QuoteError::InvalidInput { field: field.to_string(), reason: reason.into() }
}

/// Reject inputs the engine must not attempt to calculate. Runs before any
/// normalization or arithmetic; a failure here means no work was started.
pub fn validate(input: &QuoteInput) -> QuoteResult<()> {
    if input.products.is_empty() {
        return Err(invalid("products", "a quote needs at least one product"));
    }

    for product in &input.products {
        if product.quantity == 0 {
            return Err(invalid(
                "quantity",
                format!("'{}' has zero quantity", product.name),
            ));
        }
        if product.base_price.amount() <= Decimal::ZERO {
            return Err(invalid(
                "base_price",
                format!("'{}' has a non-positive base price", product.name),
            ));
        }
        if let Some(discount) = product.discount_pct {
            validate_fraction("discount_pct", discount)?;
        }
    }

    let p = &input.parameters;
    validate_fraction("client_advance_pct", p.client_advance_pct)?;
    validate_fraction("supplier_advance_pct", p.supplier_advance_pct)?;
    validate_fraction("discount_pct", p.discount_pct)?;
    if p.vat_rate < Decimal::ZERO {
        return Err(invalid("vat_rate", "VAT rate cannot be negative"));
    }
    if p.import_tariff_pct < Decimal::ZERO {
        return Err(invalid("import_tariff_pct", "import tariff cannot be negative"));
    }
    if p.forex_reserve_pct < Decimal::ZERO {
        return Err(invalid("forex_reserve_pct", "forex reserve cannot be negative"));
    }

    Ok(())
}

/// System constants are configured out-of-band but still guarded here.
pub fn validate_config(config: &SystemConfig) -> QuoteResult<()> {
    if config.daily_interest_rate < Decimal::ZERO {
        return Err(invalid("daily_interest_rate", "interest rate cannot be negative"));
    }
    if config.financing_agent_fee_pct < Decimal::ZERO {
        return Err(invalid("financing_agent_fee_pct", "agent fee cannot be negative"));
    }
    Ok(())
}

fn validate_fraction(field: &str, value: Rate) -> QuoteResult<()> {
    if value < Decimal::ZERO || value > dec!(1) {
        return Err(invalid(field, format!("{value} is not a fraction in [0, 1]")));
    }
    Ok(())
}
