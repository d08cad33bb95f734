//! Per-product calculation phases.
//!
//! Each phase produces a small typed struct rather than a string-keyed map,
//! so a field renamed in one phase cannot silently drift in another. The
//! flat [`ProductFigures`] assembled at the end is what serialization
//! layers consume; they must not re-derive any of these figures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{ProductInput, QuoteParameters};
use crate::rates::Normalizer;
use crate::types::{Money, Rate, SaleType};
use crate::QuoteResult;

/// Purchase price after VAT removal, discount and currency normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PurchasePrice {
    /// Per-unit price in USD before the supplier discount.
    pub unit_before_discount: Money,
    pub unit: Money,
    pub total: Money,
}

/// Compute the purchase price for one product: strip the seller country's
/// VAT where its regime requires it, apply the supplier discount, convert
/// to USD with the product's own rate, multiply by quantity.
pub fn purchase_price(
    product: &ProductInput,
    quote: &QuoteParameters,
    normalizer: &mut Normalizer<'_>,
) -> QuoteResult<PurchasePrice> {
    let base = product.base_price.resolve(quote.display_currency);

    let ex_vat = match product.supplier_country(quote).vat_removal_rate() {
        Some(vat) => base.amount / (Decimal::ONE + vat),
        None => base.amount,
    };

    let unit_before_discount =
        normalizer.to_usd(crate::types::MoneyValue::new(ex_vat, base.currency))?;
    let unit = unit_before_discount * (Decimal::ONE - product.discount_pct(quote));
    let total = unit * Decimal::from(product.quantity);

    Ok(PurchasePrice { unit_before_discount, unit, total })
}

/// This product's slice of the quote-level logistics totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticsShare {
    /// Supplier -> hub -> customs, including hub brokerage, documentation
    /// fees and cargo insurance.
    pub first_leg: Money,
    /// Customs -> client.
    pub last_leg: Money,
    pub total: Money,
}

impl LogisticsShare {
    pub fn new(first_leg: Money, last_leg: Money) -> Self {
        Self { first_leg, last_leg, total: first_leg + last_leg }
    }
}

/// Customs duties and excise. Strictly per-product: the duty basis depends
/// on the product's own customs code and value, so nothing here is
/// distributed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Duties {
    /// Customs value: purchase total plus the cost of bringing the goods
    /// to the border.
    pub dutiable_value: Money,
    pub customs_fee: Money,
    pub excise_total: Money,
    pub total: Money,
}

pub fn duties(
    purchase_total: Money,
    first_leg_share: Money,
    import_tariff_pct: Rate,
    excise_per_unit_usd: Money,
    quantity: u32,
) -> Duties {
    let dutiable_value = purchase_total + first_leg_share;
    let customs_fee = dutiable_value * import_tariff_pct;
    let excise_total = excise_per_unit_usd * Decimal::from(quantity);
    Duties { dutiable_value, customs_fee, excise_total, total: customs_fee + excise_total }
}

/// Cost of goods sold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cogs {
    pub unit: Money,
    pub total: Money,
}

pub fn cost_of_goods(
    purchase_total: Money,
    logistics_total: Money,
    duties_total: Money,
    financing_share: Money,
    quantity: u32,
) -> Cogs {
    let total = purchase_total + logistics_total + duties_total + financing_share;
    Cogs { unit: total / Decimal::from(quantity), total }
}

/// Pre-VAT sale price and its components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalePrice {
    /// Cost-plus margin. Zero for transit deals.
    pub margin: Money,
    /// Commission on the transacted value; populated only for transit
    /// deals, which carry no inventory risk and earn no cost-plus margin.
    pub transit_commission: Money,
    pub deal_maker_fee: Money,
    pub credit_interest_share: Money,
    pub forex_risk_reserve: Money,
    pub financing_agent_fee: Money,
    pub net_unit: Money,
    pub net_total: Money,
}

/// How the deal-maker fee reaches this product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DealMakerComponent {
    /// Pre-distributed share of a quote-level fixed fee.
    FixedShare(Money),
    /// Percentage of this product's margin (or transit commission).
    PercentOfMargin(Rate),
}

#[allow(clippy::too_many_arguments)]
pub fn sale_price(
    cogs: &Cogs,
    purchase_total: Money,
    sale_type: SaleType,
    markup_pct: Rate,
    deal_maker: DealMakerComponent,
    credit_interest_share: Money,
    forex_reserve_pct: Rate,
    financing_agent_fee_pct: Rate,
    quantity: u32,
) -> SalePrice {
    let (margin, transit_commission) = match sale_type {
        SaleType::Transit => (Decimal::ZERO, purchase_total * markup_pct),
        SaleType::Supply | SaleType::Export | SaleType::Fintransit => {
            (cogs.total * markup_pct, Decimal::ZERO)
        }
    };

    let deal_maker_fee = match deal_maker {
        DealMakerComponent::FixedShare(share) => share,
        DealMakerComponent::PercentOfMargin(pct) => (margin + transit_commission) * pct,
    };

    let base = cogs.total + margin + transit_commission + deal_maker_fee + credit_interest_share;
    let forex_risk_reserve = base * forex_reserve_pct;
    let financing_agent_fee = base * financing_agent_fee_pct;
    let net_total = base + forex_risk_reserve + financing_agent_fee;

    SalePrice {
        margin,
        transit_commission,
        deal_maker_fee,
        credit_interest_share,
        forex_risk_reserve,
        financing_agent_fee,
        net_unit: net_total / Decimal::from(quantity),
        net_total,
    }
}

/// VAT on the sale and on the import, and their net difference. The net
/// figure is a compliance output; it is never added to the client-facing
/// price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VatFigures {
    pub on_sale: Money,
    pub on_import: Money,
    pub net: Money,
    pub gross_unit: Money,
    pub gross_total: Money,
}

pub fn vat(
    sale: &SalePrice,
    duty: &Duties,
    vat_rate: Rate,
    quantity: u32,
) -> VatFigures {
    let on_sale = sale.net_total * vat_rate;
    let on_import = (duty.dutiable_value + duty.customs_fee + duty.excise_total) * vat_rate;
    let gross_total = sale.net_total + on_sale;
    VatFigures {
        on_sale,
        on_import,
        net: on_sale - on_import,
        gross_unit: gross_total / Decimal::from(quantity),
        gross_total,
    }
}

/// The full derived field set for one product, in a single currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductFigures {
    /// Share of quote-level totals attributed to this product. Unitless;
    /// identical in the canonical and display renderings.
    pub distribution_weight: Rate,

    pub purchase_price_before_discount: Money,
    pub purchase_price_unit: Money,
    pub purchase_price_total: Money,

    pub logistics_first_leg: Money,
    pub logistics_last_leg: Money,
    pub logistics_total: Money,

    pub dutiable_value: Money,
    pub customs_fee: Money,
    pub excise_total: Money,
    pub duties_total: Money,

    pub financing_cost_share: Money,
    pub credit_interest_share: Money,

    pub cogs_unit: Money,
    pub cogs_total: Money,

    pub margin: Money,
    pub transit_commission: Money,
    pub deal_maker_fee: Money,
    pub forex_risk_reserve: Money,
    pub financing_agent_fee: Money,

    pub sale_price_net_unit: Money,
    pub sale_price_net_total: Money,

    pub vat_on_sale: Money,
    pub vat_on_import: Money,
    pub vat_net: Money,

    pub sale_price_gross_unit: Money,
    pub sale_price_gross_total: Money,
}

impl ProductFigures {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn assemble(
        weight: Rate,
        purchase: &PurchasePrice,
        logistics: &LogisticsShare,
        duty: &Duties,
        financing_share: Money,
        cogs: &Cogs,
        sale: &SalePrice,
        vat: &VatFigures,
    ) -> Self {
        Self {
            distribution_weight: weight,
            purchase_price_before_discount: purchase.unit_before_discount,
            purchase_price_unit: purchase.unit,
            purchase_price_total: purchase.total,
            logistics_first_leg: logistics.first_leg,
            logistics_last_leg: logistics.last_leg,
            logistics_total: logistics.total,
            dutiable_value: duty.dutiable_value,
            customs_fee: duty.customs_fee,
            excise_total: duty.excise_total,
            duties_total: duty.total,
            financing_cost_share: financing_share,
            credit_interest_share: sale.credit_interest_share,
            cogs_unit: cogs.unit,
            cogs_total: cogs.total,
            margin: sale.margin,
            transit_commission: sale.transit_commission,
            deal_maker_fee: sale.deal_maker_fee,
            forex_risk_reserve: sale.forex_risk_reserve,
            financing_agent_fee: sale.financing_agent_fee,
            sale_price_net_unit: sale.net_unit,
            sale_price_net_total: sale.net_total,
            vat_on_sale: vat.on_sale,
            vat_on_import: vat.on_import,
            vat_net: vat.net,
            sale_price_gross_unit: vat.gross_unit,
            sale_price_gross_total: vat.gross_total,
        }
    }

    /// Re-express every monetary field at `usd_to_display`. Weights are
    /// unitless and stay put; the canonical figures are never altered.
    pub fn scale(&self, usd_to_display: Decimal) -> Self {
        let s = |v: Money| v * usd_to_display;
        Self {
            distribution_weight: self.distribution_weight,
            purchase_price_before_discount: s(self.purchase_price_before_discount),
            purchase_price_unit: s(self.purchase_price_unit),
            purchase_price_total: s(self.purchase_price_total),
            logistics_first_leg: s(self.logistics_first_leg),
            logistics_last_leg: s(self.logistics_last_leg),
            logistics_total: s(self.logistics_total),
            dutiable_value: s(self.dutiable_value),
            customs_fee: s(self.customs_fee),
            excise_total: s(self.excise_total),
            duties_total: s(self.duties_total),
            financing_cost_share: s(self.financing_cost_share),
            credit_interest_share: s(self.credit_interest_share),
            cogs_unit: s(self.cogs_unit),
            cogs_total: s(self.cogs_total),
            margin: s(self.margin),
            transit_commission: s(self.transit_commission),
            deal_maker_fee: s(self.deal_maker_fee),
            forex_risk_reserve: s(self.forex_risk_reserve),
            financing_agent_fee: s(self.financing_agent_fee),
            sale_price_net_unit: s(self.sale_price_net_unit),
            sale_price_net_total: s(self.sale_price_net_total),
            vat_on_sale: s(self.vat_on_sale),
            vat_on_import: s(self.vat_on_import),
            vat_net: s(self.vat_net),
            sale_price_gross_unit: s(self.sale_price_gross_unit),
            sale_price_gross_total: s(self.sale_price_gross_total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::{Normalizer, RateTable};
    use crate::types::{Country, Currency, MoneyField, MoneyValue};
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn quote_params() -> QuoteParameters {
        crate::test_support::quote_parameters()
    }

    fn product(price: MoneyField, quantity: u32) -> ProductInput {
        ProductInput {
            name: "pump".to_string(),
            base_price: price,
            quantity,
            weight_kg: dec!(12),
            customs_code: "841370".to_string(),
            supplier_country: None,
            markup_pct: None,
            discount_pct: None,
        }
    }

    #[test]
    fn turkish_vat_is_stripped_from_the_base_price() {
        let table = RateTable::new(Utc::now());
        let mut normalizer = Normalizer::new(&table);
        let quote = quote_params();
        let input = product(MoneyField::Tagged(MoneyValue::new(dec!(1200), Currency::Usd)), 10);

        let price = purchase_price(&input, &quote, &mut normalizer).unwrap();
        // 1200 / 1.20 = 1000 per unit, 10_000 total.
        assert_eq!(price.unit, dec!(1000));
        assert_eq!(price.total, dec!(10000));
    }

    #[test]
    fn chinese_prices_pass_through_unchanged() {
        let table = RateTable::new(Utc::now()).with_live(Currency::Cny, dec!(0.14));
        let mut normalizer = Normalizer::new(&table);
        let quote = quote_params();
        let mut input =
            product(MoneyField::Tagged(MoneyValue::new(dec!(500), Currency::Cny)), 4);
        input.supplier_country = Some(Country::China);

        let price = purchase_price(&input, &quote, &mut normalizer).unwrap();
        // No VAT removal: 500 * 0.14 = 70 USD per unit.
        assert_eq!(price.unit, dec!(70.00));
        assert_eq!(price.total, dec!(280.00));
    }

    #[test]
    fn supplier_discount_applies_after_vat_removal() {
        let table = RateTable::new(Utc::now());
        let mut normalizer = Normalizer::new(&table);
        let quote = quote_params();
        let mut input =
            product(MoneyField::Tagged(MoneyValue::new(dec!(1200), Currency::Usd)), 10);
        input.discount_pct = Some(dec!(0.10));

        let price = purchase_price(&input, &quote, &mut normalizer).unwrap();
        assert_eq!(price.unit_before_discount, dec!(1000));
        assert_eq!(price.unit, dec!(900.0));
        assert_eq!(price.total, dec!(9000.0));
    }

    #[test]
    fn duty_basis_includes_the_first_leg() {
        let duty = duties(dec!(10000), dec!(1200), dec!(0.10), Decimal::ZERO, 10);
        assert_eq!(duty.dutiable_value, dec!(11200));
        assert_eq!(duty.customs_fee, dec!(1120.000));
        assert_eq!(duty.excise_total, Decimal::ZERO);
        assert_eq!(duty.total, dec!(1120.000));
    }

    #[test]
    fn excise_scales_with_quantity() {
        let duty = duties(dec!(10000), Decimal::ZERO, Decimal::ZERO, dec!(2.5), 10);
        assert_eq!(duty.excise_total, dec!(25.0));
    }

    #[test]
    fn cogs_sums_all_cost_components() {
        let cogs = cost_of_goods(dec!(10000), dec!(1500), dec!(1120), dec!(380), 10);
        assert_eq!(cogs.total, dec!(13000));
        assert_eq!(cogs.unit, dec!(1300));
    }

    #[test]
    fn supply_sale_earns_cost_plus_margin() {
        let cogs = Cogs { unit: dec!(1300), total: dec!(13000) };
        let sale = sale_price(
            &cogs,
            dec!(10000),
            SaleType::Supply,
            dec!(0.20),
            DealMakerComponent::FixedShare(dec!(1000)),
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
            10,
        );
        assert_eq!(sale.margin, dec!(2600.00));
        assert_eq!(sale.transit_commission, Decimal::ZERO);
        assert_eq!(sale.net_total, dec!(16600.00));
        assert_eq!(sale.net_unit, dec!(1660.00));
    }

    #[test]
    fn transit_sale_bypasses_the_margin() {
        let cogs = Cogs { unit: dec!(1300), total: dec!(13000) };
        let sale = sale_price(
            &cogs,
            dec!(10000),
            SaleType::Transit,
            dec!(0.20),
            DealMakerComponent::FixedShare(Decimal::ZERO),
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
            10,
        );
        assert_eq!(sale.margin, Decimal::ZERO);
        assert_eq!(sale.transit_commission, dec!(2000.00));
        assert_eq!(sale.net_total, dec!(15000.00));
    }

    #[test]
    fn percent_of_margin_fee_uses_the_commission_for_transit() {
        let cogs = Cogs { unit: dec!(1300), total: dec!(13000) };
        let sale = sale_price(
            &cogs,
            dec!(10000),
            SaleType::Transit,
            dec!(0.20),
            DealMakerComponent::PercentOfMargin(dec!(0.10)),
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
            10,
        );
        assert_eq!(sale.deal_maker_fee, dec!(200.000));
    }

    #[test]
    fn reserves_apply_to_the_sale_base() {
        let cogs = Cogs { unit: dec!(1000), total: dec!(10000) };
        let sale = sale_price(
            &cogs,
            dec!(8000),
            SaleType::Supply,
            dec!(0.20),
            DealMakerComponent::FixedShare(Decimal::ZERO),
            Decimal::ZERO,
            dec!(0.01),
            dec!(0.005),
            10,
        );
        // base = 12_000; reserve 120; agent 60.
        assert_eq!(sale.forex_risk_reserve, dec!(120.0000));
        assert_eq!(sale.financing_agent_fee, dec!(60.00000));
        assert_eq!(sale.net_total, dec!(12180.00000));
    }

    #[test]
    fn vat_tracks_sale_and_import_sides_separately() {
        let sale = SalePrice {
            margin: Decimal::ZERO,
            transit_commission: Decimal::ZERO,
            deal_maker_fee: Decimal::ZERO,
            credit_interest_share: Decimal::ZERO,
            forex_risk_reserve: Decimal::ZERO,
            financing_agent_fee: Decimal::ZERO,
            net_unit: dec!(1660),
            net_total: dec!(16600),
        };
        let duty = Duties {
            dutiable_value: dec!(11200),
            customs_fee: dec!(1120),
            excise_total: Decimal::ZERO,
            total: dec!(1120),
        };
        let figures = vat(&sale, &duty, dec!(0.20), 10);
        assert_eq!(figures.on_sale, dec!(3320.00));
        assert_eq!(figures.on_import, dec!(2464.00));
        assert_eq!(figures.net, dec!(856.00));
        assert_eq!(figures.gross_total, dec!(19920.00));
        assert_eq!(figures.gross_unit, dec!(1992.00));
    }

    #[test]
    fn scaling_keeps_the_weight_untouched() {
        let figures = ProductFigures {
            distribution_weight: dec!(0.4),
            purchase_price_before_discount: dec!(10),
            purchase_price_unit: dec!(10),
            purchase_price_total: dec!(100),
            logistics_first_leg: dec!(5),
            logistics_last_leg: dec!(5),
            logistics_total: dec!(10),
            dutiable_value: dec!(105),
            customs_fee: dec!(10.5),
            excise_total: Decimal::ZERO,
            duties_total: dec!(10.5),
            financing_cost_share: dec!(1),
            credit_interest_share: dec!(0.5),
            cogs_unit: dec!(12.15),
            cogs_total: dec!(121.5),
            margin: dec!(24.3),
            transit_commission: Decimal::ZERO,
            deal_maker_fee: Decimal::ZERO,
            forex_risk_reserve: Decimal::ZERO,
            financing_agent_fee: Decimal::ZERO,
            sale_price_net_unit: dec!(14.63),
            sale_price_net_total: dec!(146.3),
            vat_on_sale: dec!(29.26),
            vat_on_import: dec!(23.1),
            vat_net: dec!(6.16),
            sale_price_gross_unit: dec!(17.556),
            sale_price_gross_total: dec!(175.56),
        };
        let scaled = figures.scale(dec!(2));
        assert_eq!(scaled.distribution_weight, dec!(0.4));
        assert_eq!(scaled.purchase_price_total, dec!(200));
        assert_eq!(scaled.sale_price_gross_total, dec!(351.12));
    }
}
