pub mod engine;
pub mod error;
pub mod financing;
pub mod model;
pub mod product;
pub mod projector;
pub mod quote;
pub mod rates;
pub mod types;

pub use engine::{calculate_quote, CalculationOutcome, ProductCalculationResult};
pub use error::QuoteError;
pub use model::{DealMakerFee, ProductInput, QuoteInput, QuoteParameters, SystemConfig};
pub use quote::QuoteFinancingSummary;
pub use rates::{Normalizer, RateProvider, RateQuote, RateTable, UsedRate};
pub use types::*;

/// Standard result type for all engine operations.
pub type QuoteResult<T> = Result<T, QuoteError>;

#[cfg(test)]
pub(crate) mod test_support {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::model::{DealMakerFee, ProductInput, QuoteInput, QuoteParameters, SystemConfig};
    use crate::types::{
        Country, Currency, Incoterms, LegalEntity, MoneyField, MoneyValue, SaleType,
    };

    /// Quote defaults shared across unit tests: Turkey supplier, DDP,
    /// 50% client advance, supplier prepaid in full.
    pub fn quote_parameters() -> QuoteParameters {
        QuoteParameters {
            legal_entity: LegalEntity::TurkeyAs,
            sale_type: SaleType::Supply,
            incoterms: Incoterms::Ddp,
            display_currency: Currency::Usd,
            supplier_country: Country::Turkey,
            markup_pct: dec!(0.20),
            discount_pct: Decimal::ZERO,
            forex_reserve_pct: Decimal::ZERO,
            deal_maker_fee: DealMakerFee::default(),
            client_advance_pct: dec!(0.5),
            supplier_advance_pct: dec!(1),
            days_to_advance: 5,
            delivery_days: 30,
            days_to_settlement: 15,
            import_tariff_pct: dec!(0.10),
            excise_per_unit: MoneyField::default(),
            vat_rate: dec!(0.20),
            logistics_supplier_to_hub: MoneyField::default(),
            logistics_hub_to_customs: MoneyField::default(),
            logistics_customs_to_client: MoneyField::default(),
            hub_brokerage: MoneyField::default(),
            documentation_fees: MoneyField::default(),
        }
    }

    pub fn system_config() -> SystemConfig {
        SystemConfig {
            daily_interest_rate: dec!(0.0005),
            financing_agent_fee_pct: Decimal::ZERO,
            insurance_pct: Decimal::ZERO,
        }
    }

    /// One Turkish product, USD pricing, USD logistics: the reference
    /// single-product quote.
    pub fn turkey_quote() -> QuoteInput {
        let mut parameters = quote_parameters();
        parameters.logistics_supplier_to_hub = MoneyField::Bare(dec!(800));
        parameters.logistics_hub_to_customs = MoneyField::Bare(dec!(200));
        parameters.logistics_customs_to_client = MoneyField::Bare(dec!(300));
        parameters.hub_brokerage = MoneyField::Bare(dec!(150));
        parameters.documentation_fees = MoneyField::Bare(dec!(50));
        parameters.deal_maker_fee =
            DealMakerFee::Fixed(MoneyField::Tagged(MoneyValue::new(dec!(1000), Currency::Usd)));

        QuoteInput {
            parameters,
            products: vec![ProductInput {
                name: "ball valve".to_string(),
                base_price: MoneyField::Tagged(MoneyValue::new(dec!(1200), Currency::Usd)),
                quantity: 10,
                weight_kg: dec!(4.5),
                customs_code: "848180".to_string(),
                supplier_country: None,
                markup_pct: None,
                discount_pct: None,
            }],
        }
    }
}
