//! Projection of canonical-USD results into the client's display currency.
//!
//! Projection is a rendering concern: it scales finished figures with one
//! USD -> display rate and never feeds back into the calculation.

use rust_decimal::Decimal;

use crate::product::ProductFigures;
use crate::quote::QuoteFinancingSummary;
use crate::rates::Normalizer;
use crate::types::Currency;
use crate::QuoteResult;

/// One resolved display projection for a whole quote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayProjection {
    pub currency: Currency,
    /// USD -> display rate; 1 for USD display.
    pub rate: Decimal,
}

impl DisplayProjection {
    /// Resolve the projection rate through the same request-scoped
    /// normalizer as the inputs, so it lands in the audit snapshot.
    pub fn resolve(
        normalizer: &mut Normalizer<'_>,
        currency: Currency,
    ) -> QuoteResult<Self> {
        let rate = normalizer.usd_to(currency)?;
        Ok(Self { currency, rate })
    }

    pub fn product(&self, figures: &ProductFigures) -> ProductFigures {
        figures.scale(self.rate)
    }

    pub fn summary(&self, summary: &QuoteFinancingSummary) -> QuoteFinancingSummary {
        summary.scale(self.rate)
    }
}
