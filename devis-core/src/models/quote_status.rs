use serde::{Deserialize, Serialize};

/// Workflow status of a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QuoteStatus {
    #[default]
    #[serde(rename = "brouillon")]
    Draft,
    #[serde(rename = "envoye")]
    Sent,
    #[serde(rename = "accepte")]
    Accepted,
    #[serde(rename = "refuse")]
    Refused,
}

impl QuoteStatus {
    pub fn all() -> &'static [QuoteStatus] {
        &[
            QuoteStatus::Draft,
            QuoteStatus::Sent,
            QuoteStatus::Accepted,
            QuoteStatus::Refused,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "brouillon",
            Self::Sent => "envoye",
            Self::Accepted => "accepte",
            Self::Refused => "refuse",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "brouillon" => Some(Self::Draft),
            "envoye" => Some(Self::Sent),
            "accepte" => Some(Self::Accepted),
            "refuse" => Some(Self::Refused),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Brouillon",
            Self::Sent => "Envoyé",
            Self::Accepted => "Accepté",
            Self::Refused => "Refusé",
        }
    }

    /// An accepted quote, or one already turned into an invoice, can no
    /// longer be edited.
    pub fn is_locked(&self, has_invoice: bool) -> bool {
        has_invoice || matches!(self, Self::Accepted)
    }
}
