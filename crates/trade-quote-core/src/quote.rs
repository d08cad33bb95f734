//! Quote-level aggregation, financing and distribution.
//!
//! Everything here runs exactly once per quote, after every product's
//! purchase price is known. The distribution weight computed from those
//! purchase prices is the single mechanism that turns quote-level totals
//! into per-product shares; distributed shares must sum back to their
//! quote-level total exactly.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::QuoteError;
use crate::financing::financing_cost;
use crate::model::{ProductInput, QuoteParameters, SystemConfig};
use crate::product::PurchasePrice;
use crate::types::{Money, Rate, SaleType};
use crate::QuoteResult;

/// Reconciliation tolerance for distributed monetary totals.
pub const CENT_TOLERANCE: Decimal = dec!(0.01);

/// Distribution weights: each product's purchase total over the quote
/// purchase total. The last weight absorbs the division remainder so the
/// weights sum to exactly one.
pub fn distribution_weights(purchases: &[PurchasePrice]) -> QuoteResult<Vec<Rate>> {
    let purchase_sum: Money = purchases.iter().map(|p| p.total).sum();
    if purchase_sum.is_zero() {
        return Err(QuoteError::DivisionByZero {
            context: "distribution weights over a zero purchase total".to_string(),
        });
    }

    let mut weights = Vec::with_capacity(purchases.len());
    let mut allocated = Decimal::ZERO;
    for purchase in &purchases[..purchases.len() - 1] {
        let weight = purchase.total / purchase_sum;
        allocated += weight;
        weights.push(weight);
    }
    weights.push(Decimal::ONE - allocated);
    Ok(weights)
}

/// Split a quote-level total into per-product shares by weight. The last
/// share is the remainder, so the shares always sum back to `total` with
/// no cent leakage.
pub fn distribute(total: Money, weights: &[Rate]) -> Vec<Money> {
    if weights.is_empty() {
        return Vec::new();
    }
    let mut shares = Vec::with_capacity(weights.len());
    let mut allocated = Decimal::ZERO;
    for weight in &weights[..weights.len() - 1] {
        let share = total * weight;
        allocated += share;
        shares.push(share);
    }
    shares.push(total - allocated);
    shares
}

/// Verify that distributed shares reconcile with their quote-level total.
///
/// A violation is an engine bug, never bad user input: it hard-fails under
/// test builds and is reported (not swallowed) in release builds.
pub fn reconcile(context: &str, total: Money, shares: &[Money]) -> QuoteResult<()> {
    let sum: Money = shares.iter().copied().sum();
    let delta = (sum - total).abs();
    if delta > CENT_TOLERANCE {
        tracing::error!(context, %total, %sum, %delta, "distribution failed to reconcile");
        debug_assert!(false, "distribution invariant violated in {context}: off by {delta}");
        return Err(QuoteError::DistributionInvariant {
            context: context.to_string(),
            delta,
        });
    }
    Ok(())
}

/// Split a total proportionally to a series of reference amounts (used for
/// credit interest, which follows revenue share rather than purchase
/// weight). Remainder to the last product, as with [`distribute`].
pub fn distribute_proportional(total: Money, amounts: &[Money]) -> QuoteResult<Vec<Money>> {
    if total.is_zero() {
        return Ok(vec![Decimal::ZERO; amounts.len()]);
    }
    let basis: Money = amounts.iter().copied().sum();
    if basis.is_zero() {
        return Err(QuoteError::DivisionByZero {
            context: "proportional distribution over a zero basis".to_string(),
        });
    }

    let mut shares = Vec::with_capacity(amounts.len());
    let mut allocated = Decimal::ZERO;
    for amount in &amounts[..amounts.len() - 1] {
        let share = total * (amount / basis);
        allocated += share;
        shares.push(share);
    }
    shares.push(total - allocated);
    Ok(shares)
}

/// Quote-level totals carried into every product's result and the final
/// outcome. Computed once and copied, never recomputed downstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteFinancingSummary {
    /// Sum of all purchase totals.
    pub purchase_total: Money,
    pub logistics_total: Money,
    pub duties_total: Money,
    /// Purchase + logistics + duties; the operational financing basis.
    pub cost_base: Money,
    pub revenue_estimate: Money,
    pub supplier_financing: Money,
    pub operational_financing: Money,
    pub credit_interest: Money,
    pub financing_total: Money,
}

impl QuoteFinancingSummary {
    pub fn scale(&self, usd_to_display: Decimal) -> Self {
        let s = |v: Money| v * usd_to_display;
        Self {
            purchase_total: s(self.purchase_total),
            logistics_total: s(self.logistics_total),
            duties_total: s(self.duties_total),
            cost_base: s(self.cost_base),
            revenue_estimate: s(self.revenue_estimate),
            supplier_financing: s(self.supplier_financing),
            operational_financing: s(self.operational_financing),
            credit_interest: s(self.credit_interest),
            financing_total: s(self.financing_total),
        }
    }
}

/// Quote-level cash estimates and financing costs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancingCosts {
    /// Cash the seller must advance to the supplier.
    pub supplier_payment: Money,
    /// Estimated total deal revenue; the principal basis for the client
    /// advance and credit interest.
    pub revenue_estimate: Money,
    /// Cost of prepaying the supplier before delivery.
    pub supplier_financing: Money,
    /// Cost of carrying the cost base: the advance-covered slice until the
    /// client advance arrives, the uncovered remainder until final
    /// settlement.
    pub operational_financing: Money,
    /// Interest on the post-delivery client credit period. Distributed by
    /// revenue share, not by purchase weight.
    pub credit_interest: Money,
    /// Sum of all three financing costs.
    pub total: Money,
}

impl FinancingCosts {
    /// The portion distributed to products by purchase weight and fed
    /// into COGS. Credit interest is excluded; it has its own
    /// distribution and lands in the sale price instead.
    pub fn operational_total(&self) -> Money {
        self.supplier_financing + self.operational_financing
    }
}

/// Estimated revenue per product: cost so far plus the product's margin
/// (or transit commission). Returned per product so credit interest can be
/// distributed by revenue share.
pub fn revenue_estimates(
    products: &[ProductInput],
    quote: &QuoteParameters,
    purchases: &[PurchasePrice],
    logistics_totals: &[Money],
    duties_totals: &[Money],
) -> Vec<Money> {
    products
        .iter()
        .enumerate()
        .map(|(i, product)| {
            let cost = purchases[i].total + logistics_totals[i] + duties_totals[i];
            let markup = product.markup_pct(quote);
            match quote.sale_type {
                SaleType::Transit => cost + purchases[i].total * markup,
                _ => cost * (Decimal::ONE + markup),
            }
        })
        .collect()
}

/// Compute the three quote-level financing costs from the deal's payment
/// calendar, compounding at the system's daily loan rate.
pub fn financing_costs(
    purchase_sum: Money,
    cost_base: Money,
    revenue_estimate: Money,
    quote: &QuoteParameters,
    config: &SystemConfig,
) -> FinancingCosts {
    let rate = config.daily_interest_rate;
    let client_advance = revenue_estimate * quote.client_advance_pct;

    // Supplier prepayment gap: cash out at day 0, goods at delivery.
    let supplier_prepayment = purchase_sum * quote.supplier_advance_pct;
    let supplier_financing = financing_cost(supplier_prepayment, rate, quote.delivery_days);

    // Operational cash gap: the advance-covered slice of the cost base is
    // bridged until the advance lands; whatever the advance does not cover
    // is carried until final settlement.
    let covered = cost_base.min(client_advance).max(Decimal::ZERO);
    let uncovered = (cost_base - client_advance).max(Decimal::ZERO);
    let operational_financing = financing_cost(covered, rate, quote.days_to_advance)
        + financing_cost(uncovered, rate, quote.delivery_days + quote.days_to_settlement);

    // Client credit period: the balance of the revenue arrives only at
    // settlement.
    let credit_principal = (revenue_estimate - client_advance).max(Decimal::ZERO);
    let credit_interest = financing_cost(credit_principal, rate, quote.days_to_settlement);

    FinancingCosts {
        supplier_payment: purchase_sum,
        revenue_estimate,
        supplier_financing,
        operational_financing,
        credit_interest,
        total: supplier_financing + operational_financing + credit_interest,
    }
}
