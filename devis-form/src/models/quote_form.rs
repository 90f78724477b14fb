use std::fmt;

use chrono::{Days, NaiveDate};
use devis_core::calculations::common::round_half_up;
use devis_core::calculations::numbering::next_quote_number;
use devis_core::{DiscountPercent, QuoteStatus};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::state::{EMPTY_QUOTE_MESSAGE, QuoteFormState};

pub const DEFAULT_VALIDITY_DAYS: u32 = 30;

/// Header fields of the quote form, alongside the lines held by
/// [`QuoteFormState`].
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteFormModel {
    pub number: String,
    pub date: NaiveDate,
    pub client_id: Option<i64>,
    /// Serial number or registration of the vehicle.
    pub registration: String,
    pub inventory: String,
    pub validity_days: u32,
    pub discount: DiscountPercent,
    /// Deposit (`acompte`) already received, TTC.
    pub deposit: Decimal,
    pub status: QuoteStatus,
    /// Set when an invoice was already issued from this quote.
    pub has_invoice: bool,
}

/// Payload posted when the quote is saved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteSubmission {
    pub numero: String,
    pub date: NaiveDate,
    pub client_id: Option<i64>,
    pub numero_serie: String,
    pub inventaire: String,
    pub validite_jours: u32,
    pub remise_pourcent: Decimal,
    pub acompte: Decimal,
    pub statut: QuoteStatus,
    /// Lines serialized as a JSON array, in display order.
    pub lignes_json: String,
    /// Excluding tax, after discount.
    pub total_ht: Decimal,
    pub total_ttc: Decimal,
}

impl QuoteFormModel {
    /// A blank draft numbered after the last quote on file.
    pub fn new(
        last_number: Option<&str>,
        today: NaiveDate,
    ) -> Self {
        Self {
            number: next_quote_number(last_number),
            date: today,
            client_id: None,
            registration: String::new(),
            inventory: String::new(),
            validity_days: DEFAULT_VALIDITY_DAYS,
            discount: DiscountPercent::ZERO,
            deposit: Decimal::ZERO,
            status: QuoteStatus::default(),
            has_invoice: false,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.status.is_locked(self.has_invoice)
    }

    /// Last day the quote is valid. `None` if the date overflows.
    pub fn expiry_date(&self) -> Option<NaiveDate> {
        self.date
            .checked_add_days(Days::new(u64::from(self.validity_days)))
    }

    /// Collects every reason the quote cannot be saved.
    pub fn validate_for_submit(
        &self,
        state: &QuoteFormState,
    ) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.is_locked() {
            errors.push(if self.has_invoice {
                "Ce devis a déjà été facturé et ne peut plus être modifié.".to_string()
            } else {
                "Un devis accepté ne peut plus être modifié.".to_string()
            });
        }
        if self.client_id.is_none() {
            errors.push("Le client est requis".to_string());
        }
        if self.validity_days < 1 {
            errors.push("La validité doit être au moins 1 jour".to_string());
        }
        if !self.discount.is_in_range() {
            errors.push("La remise doit être entre 0 et 100%".to_string());
        }
        if self.deposit < Decimal::ZERO {
            errors.push("L'acompte doit être positif".to_string());
        }
        if state.validate_submit().is_err() {
            errors.push(EMPTY_QUOTE_MESSAGE.to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            tracing::warn!(count = errors.len(), number = %self.number, "quote form invalid");
            Err(errors)
        }
    }

    /// Validates the form and builds the payload to post.
    pub fn to_submission(
        &self,
        state: &QuoteFormState,
    ) -> Result<QuoteSubmission, Vec<String>> {
        self.validate_for_submit(state)?;

        let lignes_json = serde_json::to_string(state.lines())
            .map_err(|e| vec![format!("lignes illisibles: {e}")])?;
        let totals = state.totals(self.discount).rounded();

        Ok(QuoteSubmission {
            numero: self.number.clone(),
            date: self.date,
            client_id: self.client_id,
            numero_serie: self.registration.clone(),
            inventaire: self.inventory.clone(),
            validite_jours: self.validity_days,
            remise_pourcent: self.discount.percent(),
            acompte: round_half_up(self.deposit),
            statut: self.status,
            lignes_json,
            total_ht: totals.total_excl_tax_after_discount,
            total_ttc: totals.total_incl_tax,
        })
    }
}

impl fmt::Display for QuoteFormModel {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Devis {} du {}", self.number, self.date.format("%d/%m/%Y"))?;
        if let Some(expiry) = self.expiry_date() {
            writeln!(f, "  Valable jusqu'au : {}", expiry.format("%d/%m/%Y"))?;
        }
        writeln!(f, "  Statut           : {}", self.status.label())?;
        if !self.registration.is_empty() {
            writeln!(f, "  Immatriculation  : {}", self.registration)?;
        }
        writeln!(f, "  Remise           : {}", self.discount)?;
        write!(f, "  Acompte          : {} €", round_half_up(self.deposit))
    }
}
