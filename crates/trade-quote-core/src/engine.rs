//! Multi-product orchestrator.
//!
//! Sequences the per-product phases and the quote-level aggregation in a
//! fixed order: normalize -> purchase prices for every product ->
//! distribution weights (hard barrier) -> logistics and duties ->
//! quote-level financing -> distribution -> COGS/sale/VAT per product ->
//! display projection. A failure in validating or normalizing any single
//! field aborts the whole quote; no partial results are ever returned.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::model::{validate, validate_config, DealMakerFee, QuoteInput, SystemConfig};
use crate::product::{self, DealMakerComponent, LogisticsShare, ProductFigures};
use crate::projector::DisplayProjection;
use crate::quote::{
    distribute, distribute_proportional, distribution_weights, financing_costs, reconcile,
    revenue_estimates, QuoteFinancingSummary,
};
use crate::rates::{Normalizer, RateProvider, UsedRate};
use crate::types::{BusinessRuleWarning, Currency, Money};
use crate::QuoteResult;

/// Markups below this fraction are flagged for review.
const POLICY_MARKUP_FLOOR: Decimal = dec!(0.05);
/// VAT rates above this fraction are flagged as unusual.
const USUAL_VAT_CEILING: Decimal = dec!(0.25);

/// The derived field set for one product, in both renderings, plus the
/// quote-level figures that are identical across all products of the quote
/// (computed once and copied, never recomputed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCalculationResult {
    pub name: String,
    pub canonical: ProductFigures,
    pub display: ProductFigures,
    pub quote_revenue_estimate: Money,
    pub quote_financing_total: Money,
    pub quote_credit_interest: Money,
}

/// Everything a caller (API serialization, PDF/Excel rendering) consumes.
/// Downstream layers must not re-derive any of these figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationOutcome {
    pub display_currency: Currency,
    pub products: Vec<ProductCalculationResult>,
    /// Canonical-USD quote totals.
    pub summary: QuoteFinancingSummary,
    /// The same totals in the display currency.
    pub summary_display: QuoteFinancingSummary,
    /// Exchange rates actually consumed, for the immutable quote-version
    /// snapshot.
    pub rates_used: Vec<UsedRate>,
    pub warnings: Vec<BusinessRuleWarning>,
}

/// Run the full quote calculation.
///
/// Pure and synchronous: same inputs and rates, same output. The rate
/// provider is request-scoped and queried through one normalizer, so every
/// leg of the quote is normalized against the same snapshot.
pub fn calculate_quote(
    input: &QuoteInput,
    config: &SystemConfig,
    provider: &dyn RateProvider,
) -> QuoteResult<CalculationOutcome> {
    validate(input)?;
    validate_config(config)?;

    let quote = &input.parameters;
    let display = quote.display_currency;
    let mut normalizer = Normalizer::new(provider);
    let mut warnings: Vec<BusinessRuleWarning> = Vec::new();

    // -- Normalize every quote-level monetary field up front (fail-fast) --
    let supplier_to_hub =
        normalizer.to_usd(quote.logistics_supplier_to_hub.resolve(display))?;
    let hub_to_customs = normalizer.to_usd(quote.logistics_hub_to_customs.resolve(display))?;
    let customs_to_client =
        normalizer.to_usd(quote.logistics_customs_to_client.resolve(display))?;
    let hub_brokerage = normalizer.to_usd(quote.hub_brokerage.resolve(display))?;
    let documentation_fees = normalizer.to_usd(quote.documentation_fees.resolve(display))?;
    let excise_per_unit = normalizer.to_usd(quote.excise_per_unit.resolve(display))?;
    let fixed_deal_maker_fee = match quote.deal_maker_fee {
        DealMakerFee::Fixed(field) => Some(normalizer.to_usd(field.resolve(display))?),
        DealMakerFee::PercentOfMargin(_) => None,
    };

    // -- Purchase price for every product, then the weights barrier --
    let purchases = input
        .products
        .iter()
        .map(|p| product::purchase_price(p, quote, &mut normalizer))
        .collect::<QuoteResult<Vec<_>>>()?;

    let weights = distribution_weights(&purchases)?;
    let purchase_sum: Money = purchases.iter().map(|p| p.total).sum();

    // -- Logistics legs, distributed once by weight --
    let insurance = purchase_sum * config.insurance_pct;
    let first_leg_total =
        supplier_to_hub + hub_to_customs + hub_brokerage + documentation_fees + insurance;
    let last_leg_total = customs_to_client;

    let first_leg_shares = distribute(first_leg_total, &weights);
    let last_leg_shares = distribute(last_leg_total, &weights);
    reconcile("first-leg logistics", first_leg_total, &first_leg_shares)?;
    reconcile("last-leg logistics", last_leg_total, &last_leg_shares)?;

    let logistics: Vec<LogisticsShare> = first_leg_shares
        .iter()
        .zip(&last_leg_shares)
        .map(|(&first, &last)| LogisticsShare::new(first, last))
        .collect();

    // -- Duties: strictly per-product, never distributed --
    let duties: Vec<product::Duties> = input
        .products
        .iter()
        .zip(&purchases)
        .zip(&first_leg_shares)
        .map(|((p, purchase), &first_leg)| {
            product::duties(
                purchase.total,
                first_leg,
                quote.import_tariff_pct,
                excise_per_unit,
                p.quantity,
            )
        })
        .collect();

    // -- Quote-level financing over the payment calendar --
    let logistics_totals: Vec<Money> = logistics.iter().map(|l| l.total).collect();
    let duties_totals: Vec<Money> = duties.iter().map(|d| d.total).collect();
    let duties_sum: Money = duties_totals.iter().copied().sum();
    let cost_base = purchase_sum + first_leg_total + last_leg_total + duties_sum;

    let revenues =
        revenue_estimates(&input.products, quote, &purchases, &logistics_totals, &duties_totals);
    let revenue_estimate: Money = revenues.iter().copied().sum();

    let financing = financing_costs(purchase_sum, cost_base, revenue_estimate, quote, config);

    // -- Distribute financing: operational by purchase weight, credit
    //    interest by revenue share --
    let operational_shares = distribute(financing.operational_total(), &weights);
    reconcile("operational financing", financing.operational_total(), &operational_shares)?;

    let credit_shares = distribute_proportional(financing.credit_interest, &revenues)?;
    reconcile("credit interest", financing.credit_interest, &credit_shares)?;

    let deal_maker_shares = fixed_deal_maker_fee.map(|total| distribute(total, &weights));

    // -- Remaining per-product phases --
    if quote.vat_rate > USUAL_VAT_CEILING {
        warnings.push(BusinessRuleWarning::UnusualVatRate { rate: quote.vat_rate });
    }

    let mut canonical_figures = Vec::with_capacity(input.products.len());
    for (i, p) in input.products.iter().enumerate() {
        let markup = p.markup_pct(quote);
        if markup < POLICY_MARKUP_FLOOR {
            warnings.push(BusinessRuleWarning::MarkupBelowPolicy {
                product: p.name.clone(),
                markup,
            });
        }

        let cogs = product::cost_of_goods(
            purchases[i].total,
            logistics[i].total,
            duties[i].total,
            operational_shares[i],
            p.quantity,
        );

        let deal_maker = match &deal_maker_shares {
            Some(shares) => DealMakerComponent::FixedShare(shares[i]),
            None => match quote.deal_maker_fee {
                DealMakerFee::PercentOfMargin(pct) => DealMakerComponent::PercentOfMargin(pct),
                // Unreachable: a fixed fee always yields pre-distributed shares.
                DealMakerFee::Fixed(_) => DealMakerComponent::FixedShare(Decimal::ZERO),
            },
        };

        let sale = product::sale_price(
            &cogs,
            purchases[i].total,
            quote.sale_type,
            markup,
            deal_maker,
            credit_shares[i],
            quote.forex_reserve_pct,
            config.financing_agent_fee_pct,
            p.quantity,
        );

        if sale.margin < Decimal::ZERO {
            warnings.push(BusinessRuleWarning::NegativeIntermediate {
                product: p.name.clone(),
                field: "margin".to_string(),
                value: sale.margin,
            });
        }
        let margin_basis = sale.margin + sale.transit_commission;
        if sale.deal_maker_fee > margin_basis {
            warnings.push(BusinessRuleWarning::DealMakerFeeExceedsMargin {
                product: p.name.clone(),
                fee: sale.deal_maker_fee,
                margin: margin_basis,
            });
        }

        let vat = product::vat(&sale, &duties[i], quote.vat_rate, p.quantity);

        canonical_figures.push(ProductFigures::assemble(
            weights[i],
            &purchases[i],
            &logistics[i],
            &duties[i],
            operational_shares[i],
            &cogs,
            &sale,
            &vat,
        ));
    }

    let summary = QuoteFinancingSummary {
        purchase_total: purchase_sum,
        logistics_total: first_leg_total + last_leg_total,
        duties_total: duties_sum,
        cost_base,
        revenue_estimate,
        supplier_financing: financing.supplier_financing,
        operational_financing: financing.operational_financing,
        credit_interest: financing.credit_interest,
        financing_total: financing.total,
    };

    // -- Display projection: rendering only, calculation stays in USD --
    let projection = DisplayProjection::resolve(&mut normalizer, display)?;
    let products = input
        .products
        .iter()
        .zip(canonical_figures)
        .map(|(p, canonical)| ProductCalculationResult {
            name: p.name.clone(),
            display: projection.product(&canonical),
            canonical,
            quote_revenue_estimate: revenue_estimate,
            quote_financing_total: financing.total,
            quote_credit_interest: financing.credit_interest,
        })
        .collect();

    Ok(CalculationOutcome {
        display_currency: display,
        products,
        summary,
        summary_display: projection.summary(&summary),
        rates_used: normalizer.into_snapshot(),
        warnings,
    })
}
