//! Turning an accepted quote into an invoice and recording payments on it.
//!
//! All amounts are rounded half-up to the cent as they are recorded. An
//! invoice whose remaining balance falls to one cent or less is considered
//! paid in full and its balance is zeroed.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::calculations::common::round_half_up;

/// Remaining balance at or under which an invoice counts as paid.
pub const PAID_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Errors that can occur while recording a payment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettlementError {
    /// Payments must be strictly positive once rounded to the cent.
    #[error("payment amount must be greater than zero, got {0}")]
    NonPositivePayment(Decimal),

    /// The invoice has already been paid in full.
    #[error("invoice is already paid")]
    AlreadyPaid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentState {
    #[default]
    #[serde(rename = "En attente")]
    Pending,
    #[serde(rename = "Paiement partiel")]
    PartiallyPaid,
    #[serde(rename = "Payé")]
    Paid,
}

impl PaymentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "En attente",
            Self::PartiallyPaid => "Paiement partiel",
            Self::Paid => "Payé",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "Paiement par virement")]
    BankTransfer,
    #[serde(rename = "Espèces")]
    Cash,
    #[serde(rename = "Chèque")]
    Cheque,
    #[serde(rename = "Carte bancaire")]
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BankTransfer => "Paiement par virement",
            Self::Cash => "Espèces",
            Self::Cheque => "Chèque",
            Self::Card => "Carte bancaire",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Paiement par virement" => Some(Self::BankTransfer),
            "Espèces" => Some(Self::Cash),
            "Chèque" => Some(Self::Cheque),
            "Carte bancaire" => Some(Self::Card),
            _ => None,
        }
    }
}

/// Amounts of an invoice issued from a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub amount_incl_tax: Decimal,
    /// Deposit plus every payment recorded so far.
    pub paid: Decimal,
    pub remaining: Decimal,
    pub state: PaymentState,
    pub payment_method: Option<PaymentMethod>,
    pub paid_on: Option<NaiveDate>,
}

impl InvoiceDraft {
    /// Builds the invoice for a quote total (TTC) and the deposit already
    /// received on the quote.
    pub fn from_quote(
        total_incl_tax: Decimal,
        deposit: Decimal,
    ) -> Self {
        let amount_incl_tax = round_half_up(total_incl_tax);
        let paid = round_half_up(deposit);

        Self {
            amount_incl_tax,
            paid,
            remaining: round_half_up(total_incl_tax.saturating_sub(deposit)),
            state: PaymentState::Pending,
            payment_method: None,
            paid_on: None,
        }
    }

    /// Records a payment and returns the resulting payment state.
    ///
    /// # Errors
    ///
    /// * [`SettlementError::NonPositivePayment`] when the amount rounds to
    ///   zero or less.
    /// * [`SettlementError::AlreadyPaid`] when the invoice is settled.
    pub fn record_payment(
        &mut self,
        amount: Decimal,
        method: PaymentMethod,
        on: NaiveDate,
    ) -> Result<PaymentState, SettlementError> {
        let amount = round_half_up(amount);
        if amount <= Decimal::ZERO {
            return Err(SettlementError::NonPositivePayment(amount));
        }
        if self.state == PaymentState::Paid {
            return Err(SettlementError::AlreadyPaid);
        }

        self.paid = round_half_up(self.paid.saturating_add(amount));
        self.remaining = round_half_up(self.amount_incl_tax.saturating_sub(self.paid));

        if self.remaining <= PAID_TOLERANCE {
            self.state = PaymentState::Paid;
            self.payment_method = Some(method);
            self.paid_on = Some(on);
            self.remaining = Decimal::ZERO;
            info!(
                amount = %self.amount_incl_tax,
                method = method.as_str(),
                "invoice paid in full"
            );
        } else {
            self.state = PaymentState::PartiallyPaid;
            debug!(%amount, remaining = %self.remaining, "partial payment recorded");
        }

        Ok(self.state)
    }
}

impl fmt::Display for InvoiceDraft {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Montant TTC:    {}", self.amount_incl_tax)?;
        writeln!(f, "Déjà réglé:     {}", self.paid)?;
        writeln!(f, "Reste à payer:  {}", self.remaining)?;
        write!(f, "État:           {}", self.state.as_str())
    }
}
