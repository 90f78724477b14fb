//! Editable state of the quote form.
//!
//! [`QuoteFormState`] owns the ordered quote lines and is the only place they
//! are mutated. Totals are derived on demand from the lines and a discount the
//! caller reads from the surrounding form.
//!
//! Catalog lookups run asynchronously and may overlap with each other and
//! with user edits. Each line carries a generation counter that is bumped by
//! every new lookup and by every edit of a field a lookup reads or writes
//! (code, price, description, task, VAT). A lookup result is only applied when
//! the line's generation still matches the one captured when the lookup
//! began, so a slow response can never overwrite newer input. Vehicle and
//! quantity edits leave in-flight lookups valid.

use devis_core::calculations::{QuoteCalculator, QuoteTotals, recompute_line};
use devis_core::{
    CatalogError, CatalogPrice, DEFAULT_QUANTITY, DEFAULT_TAX_PERCENT, DiscountPercent, LineItem,
    PriceCatalog, Task,
};
use futures::future::join_all;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::models::LineInput;
use crate::utils::parse_decimal_or;

/// Message shown to the user when a quote without lines is submitted.
pub const EMPTY_QUOTE_MESSAGE: &str = "Veuillez ajouter au moins une ligne au devis.";

/// Stable identity of a line within one form state.
///
/// Unlike an index, an id keeps pointing at the same line when lines before
/// it are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineKey {
    id: LineId,
    generation: u64,
}

/// A single field edit coming from the form.
///
/// Numeric fields carry the raw input text; unparsable or negative input
/// falls back to the field's default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEdit {
    Task(Task),
    Vehicle(String),
    Description(String),
    Quantity(String),
    UnitCode(String),
    UnitPrice(String),
    TaxPercent(String),
}

impl LineEdit {
    /// Returns `true` when the edit touches a field a catalog lookup reads or
    /// writes, making any lookup in flight for the line stale.
    pub fn invalidates_lookup(&self) -> bool {
        !matches!(self, Self::Vehicle(_) | Self::Quantity(_))
    }
}

/// Submission was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("{}", EMPTY_QUOTE_MESSAGE)]
    EmptyQuote,
}

/// A catalog lookup in flight for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceLookup {
    pub line: LineId,
    pub code: String,
    generation: u64,
}

/// What became of a catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The line has no unit code; nothing was requested.
    Skipped,
    /// Price, description and task were copied onto the line.
    Applied,
    /// The catalog has no entry for the code; the line is unchanged.
    NotFound,
    /// The request failed; the line is unchanged.
    Failed(CatalogError),
    /// The code, price, description, task or VAT of the line was edited, or
    /// the line was looked up again, while the request was in flight.
    Stale,
    /// The line was removed while the request was in flight.
    LineRemoved,
}

/// Ordered quote lines plus the bookkeeping for in-flight lookups.
#[derive(Debug, Clone, Default)]
pub struct QuoteFormState {
    lines: Vec<LineItem>,
    keys: Vec<LineKey>,
    next_id: u64,
}

impl QuoteFormState {
    /// Builds the form from the lines of a saved quote (or none for a new one).
    pub fn new(existing: Vec<LineInput>) -> Self {
        let lines: Vec<LineItem> = existing
            .into_iter()
            .map(LineInput::into_line_item)
            .collect();
        debug!(count = lines.len(), "quote form initialised");
        Self::with_lines(lines)
    }

    /// Builds the form from lines that are already typed.
    pub fn with_lines(lines: Vec<LineItem>) -> Self {
        let mut state = Self::default();
        for line in lines {
            state.push(line);
        }
        state
    }

    fn push(&mut self, line: LineItem) -> LineId {
        let id = LineId(self.next_id);
        self.next_id += 1;
        self.lines.push(line);
        self.keys.push(LineKey { id, generation: 0 });
        id
    }

    fn position(&self, id: LineId) -> Option<usize> {
        self.keys.iter().position(|key| key.id == id)
    }

    // ── read access ──────────────────────────────────────────────────────

    /// Lines in display order.
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, id: LineId) -> Option<&LineItem> {
        self.position(id).map(|index| &self.lines[index])
    }

    /// Id of the line currently displayed at `index`.
    pub fn id_at(&self, index: usize) -> Option<LineId> {
        self.keys.get(index).map(|key| key.id)
    }

    /// Ids in display order.
    pub fn ids(&self) -> Vec<LineId> {
        self.keys.iter().map(|key| key.id).collect()
    }

    // ── totals ───────────────────────────────────────────────────────────

    pub fn calculator(&self) -> QuoteCalculator<'_> {
        QuoteCalculator::new(&self.lines)
    }

    pub fn total_excl_tax(&self) -> Decimal {
        self.calculator().total_excl_tax()
    }

    pub fn discount_amount(
        &self,
        discount: DiscountPercent,
    ) -> Decimal {
        self.calculator().discount_amount(discount)
    }

    pub fn total_excl_tax_after_discount(
        &self,
        discount: DiscountPercent,
    ) -> Decimal {
        self.calculator().total_excl_tax_after_discount(discount)
    }

    pub fn total_tax(
        &self,
        discount: DiscountPercent,
    ) -> Decimal {
        self.calculator().total_tax(discount)
    }

    pub fn total_incl_tax(
        &self,
        discount: DiscountPercent,
    ) -> Decimal {
        self.calculator().total_incl_tax(discount)
    }

    pub fn totals(
        &self,
        discount: DiscountPercent,
    ) -> QuoteTotals {
        self.calculator().calculate(discount)
    }

    // ── mutations ────────────────────────────────────────────────────────

    /// Appends a blank line (quantity 1, VAT 20%).
    pub fn add_line(&mut self) -> LineId {
        let id = self.push(LineItem::default());
        debug!(?id, "line added");
        id
    }

    /// Removes the line at `index`, shifting later lines up.
    ///
    /// An out-of-range index leaves the form untouched and returns `None`.
    pub fn remove_line(
        &mut self,
        index: usize,
    ) -> Option<LineItem> {
        if index >= self.lines.len() {
            warn!(index, len = self.lines.len(), "remove_line index out of range");
            return None;
        }
        let key = self.keys.remove(index);
        debug!(id = ?key.id, index, "line removed");
        Some(self.lines.remove(index))
    }

    pub fn remove_line_by_id(
        &mut self,
        id: LineId,
    ) -> Option<LineItem> {
        let index = self.position(id)?;
        self.remove_line(index)
    }

    /// Applies one field edit and refreshes the line total.
    ///
    /// The unit code is stored as typed.
    ///
    /// Returns `false` when no line has this id.
    pub fn update_line(
        &mut self,
        id: LineId,
        edit: LineEdit,
    ) -> bool {
        let Some(index) = self.position(id) else {
            warn!(?id, "update for unknown line ignored");
            return false;
        };

        if edit.invalidates_lookup() {
            self.keys[index].generation += 1;
        }
        let line = &mut self.lines[index];
        match edit {
            LineEdit::Task(task) => line.task = task,
            LineEdit::Vehicle(vehicle) => line.vehicle = vehicle,
            LineEdit::Description(description) => line.description = description,
            LineEdit::Quantity(raw) => line.quantity = parse_decimal_or(&raw, DEFAULT_QUANTITY),
            LineEdit::UnitCode(code) => line.unit_code = code,
            LineEdit::UnitPrice(raw) => {
                line.unit_price_excl_tax = parse_decimal_or(&raw, Decimal::ZERO)
            }
            LineEdit::TaxPercent(raw) => {
                line.tax_percent = parse_decimal_or(&raw, DEFAULT_TAX_PERCENT)
            }
        }
        recompute_line(line);
        true
    }

    // ── catalog lookups ──────────────────────────────────────────────────

    /// Starts a lookup for the line's unit code.
    ///
    /// Returns `None` when the line is unknown or has no unit code.
    /// Starting a lookup invalidates any lookup already in flight for the
    /// same line.
    pub fn begin_price_lookup(
        &mut self,
        id: LineId,
    ) -> Option<PriceLookup> {
        let index = self.position(id)?;
        let code = &self.lines[index].unit_code;
        if code.is_empty() {
            return None;
        }

        let key = &mut self.keys[index];
        key.generation += 1;
        Some(PriceLookup {
            line: id,
            code: code.clone(),
            generation: key.generation,
        })
    }

    /// Applies the result of a lookup started with [`Self::begin_price_lookup`].
    pub fn apply_price_lookup(
        &mut self,
        lookup: &PriceLookup,
        result: Result<CatalogPrice, CatalogError>,
    ) -> LookupOutcome {
        let Some(index) = self.position(lookup.line) else {
            debug!(code = %lookup.code, "lookup result for removed line dropped");
            return LookupOutcome::LineRemoved;
        };
        if self.keys[index].generation != lookup.generation {
            debug!(code = %lookup.code, "stale lookup result dropped");
            return LookupOutcome::Stale;
        }

        match result {
            Ok(price) => {
                let line = &mut self.lines[index];
                line.unit_price_excl_tax = price.price;
                line.task = price.task();
                line.description = price.description.unwrap_or_default();
                if line.tax_percent.is_zero() {
                    line.tax_percent = DEFAULT_TAX_PERCENT;
                }
                recompute_line(line);
                debug!(code = %lookup.code, price = %line.unit_price_excl_tax, "catalog price applied");
                LookupOutcome::Applied
            }
            Err(CatalogError::NotFound(code)) => {
                warn!(%code, "no catalog price for code");
                LookupOutcome::NotFound
            }
            Err(e) => {
                error!(code = %lookup.code, error = %e, "catalog lookup failed");
                LookupOutcome::Failed(e)
            }
        }
    }

    /// Fetches the catalog price for one line and applies it.
    pub async fn load_price_for_line<C>(
        &mut self,
        id: LineId,
        catalog: &C,
    ) -> LookupOutcome
    where
        C: PriceCatalog + ?Sized,
    {
        let Some(lookup) = self.begin_price_lookup(id) else {
            return LookupOutcome::Skipped;
        };
        let result = catalog.lookup_price(&lookup.code).await;
        self.apply_price_lookup(&lookup, result)
    }

    /// Looks up every line that has a unit code, all requests in flight at
    /// once. Results come back in display order.
    pub async fn load_all_prices<C>(
        &mut self,
        catalog: &C,
    ) -> Vec<(LineId, LookupOutcome)>
    where
        C: PriceCatalog + ?Sized,
    {
        let lookups: Vec<PriceLookup> = self
            .ids()
            .into_iter()
            .filter_map(|id| self.begin_price_lookup(id))
            .collect();

        let results = join_all(
            lookups
                .iter()
                .map(|lookup| catalog.lookup_price(&lookup.code)),
        )
        .await;

        lookups
            .iter()
            .zip(results)
            .map(|(lookup, result)| (lookup.line, self.apply_price_lookup(lookup, result)))
            .collect()
    }

    // ── submission ───────────────────────────────────────────────────────

    /// Refuses submission of a quote without lines.
    pub fn validate_submit(&self) -> Result<(), SubmitError> {
        if self.lines.is_empty() {
            warn!("submission blocked: quote has no lines");
            return Err(SubmitError::EmptyQuote);
        }
        Ok(())
    }
}
