use std::fmt;

use devis_catalog::HttpCatalogFactory;
use devis_core::calculations::{InvoiceDraft, QuoteTotals};
use devis_core::catalog::CatalogRegistry;
use devis_core::{DiscountPercent, LineItem, PriceCatalog};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::price_list::StaticCatalogFactory;
use crate::state::{LookupOutcome, QuoteFormState};

/// Registry with every catalog backend this binary ships.
pub fn build_registry() -> CatalogRegistry {
    let mut registry = CatalogRegistry::new();
    registry.register(Box::new(HttpCatalogFactory));
    registry.register(Box::new(StaticCatalogFactory));
    registry
}

/// Tally of a price refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RefreshSummary {
    pub applied: usize,
    pub not_found: usize,
    pub failed: usize,
}

impl RefreshSummary {
    fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a LookupOutcome>) -> Self {
        outcomes
            .into_iter()
            .fold(Self::default(), |mut summary, outcome| {
                match outcome {
                    LookupOutcome::Applied => summary.applied += 1,
                    LookupOutcome::NotFound => summary.not_found += 1,
                    LookupOutcome::Failed(_) => summary.failed += 1,
                    LookupOutcome::Skipped | LookupOutcome::Stale | LookupOutcome::LineRemoved => {}
                }
                summary
            })
    }
}

/// Everything the CLI prints about a quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteReport {
    pub lines: Vec<LineItem>,
    pub discount: DiscountPercent,
    pub totals: QuoteTotals,
    pub refresh: Option<RefreshSummary>,
    /// `None` when the quote can be submitted, else the reason it cannot.
    pub submit_blocked: Option<String>,
    pub invoice: Option<InvoiceDraft>,
}

/// Optionally refreshes prices from `catalog`, then computes the report.
///
/// `deposit` adds an invoice preview for the quote total.
pub async fn build_report(
    state: &mut QuoteFormState,
    catalog: Option<&dyn PriceCatalog>,
    discount: DiscountPercent,
    deposit: Option<Decimal>,
) -> QuoteReport {
    let refresh = match catalog {
        Some(catalog) => {
            let outcomes = state.load_all_prices(catalog).await;
            let summary = RefreshSummary::from_outcomes(outcomes.iter().map(|(_, o)| o));
            info!(
                applied = summary.applied,
                not_found = summary.not_found,
                failed = summary.failed,
                "prices refreshed"
            );
            Some(summary)
        }
        None => None,
    };

    let totals = state.totals(discount);
    let invoice = deposit.map(|deposit| InvoiceDraft::from_quote(totals.total_incl_tax, deposit));

    QuoteReport {
        lines: state.lines().to_vec(),
        discount,
        totals,
        refresh,
        submit_blocked: state.validate_submit().err().map(|e| e.to_string()),
        invoice,
    }
}

impl fmt::Display for QuoteReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            "{:<3} {:<20} {:<12} {:<30} {:>6} {:<6} {:>10} {:>6} {:>10}",
            "#", "Tâche", "Véhicule", "Description", "Qté", "Code", "PU HT", "TVA%", "Total TTC"
        )?;
        for (idx, line) in self.lines.iter().enumerate() {
            writeln!(
                f,
                "{:<3} {:<20} {:<12} {:<30} {:>6} {:<6} {:>10} {:>6} {:>10}",
                idx + 1,
                line.task.label(),
                line.vehicle,
                line.description,
                line.quantity,
                line.unit_code,
                line.unit_price_excl_tax,
                line.tax_percent,
                line.total_incl_tax.round_dp(2)
            )?;
        }
        writeln!(f)?;

        if let Some(refresh) = &self.refresh {
            writeln!(
                f,
                "Prix catalogue: {} appliqué(s), {} introuvable(s), {} en échec",
                refresh.applied, refresh.not_found, refresh.failed
            )?;
        }
        writeln!(f, "Remise: {}", self.discount)?;
        writeln!(f, "{}", self.totals)?;

        if let Some(invoice) = &self.invoice {
            writeln!(f)?;
            writeln!(f, "{invoice}")?;
        }

        writeln!(f)?;
        match &self.submit_blocked {
            None => write!(f, "Le devis peut être enregistré."),
            Some(reason) => write!(f, "{reason}"),
        }
    }
}
