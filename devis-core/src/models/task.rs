use serde::{Deserialize, Serialize};

/// Kind of bodywork a quote line bills for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Task {
    #[serde(rename = "TOLERIE_CARROSSERIE")]
    TolerieCarrosserie,
    #[serde(rename = "DEBOSSELAGE")]
    Debosselage,
    #[default]
    #[serde(rename = "")]
    Unassigned,
}

impl Task {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TolerieCarrosserie => "TOLERIE_CARROSSERIE",
            Self::Debosselage => "DEBOSSELAGE",
            Self::Unassigned => "",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "TOLERIE_CARROSSERIE" => Some(Self::TolerieCarrosserie),
            "DEBOSSELAGE" => Some(Self::Debosselage),
            "" => Some(Self::Unassigned),
            _ => None,
        }
    }

    /// Maps a catalog category onto a line task.
    ///
    /// Only `TOLERIE_CARROSSERIE` is recognised; every other category,
    /// including unknown ones, is billed as dent removal.
    pub fn from_category(category: &str) -> Self {
        if category == "TOLERIE_CARROSSERIE" {
            Self::TolerieCarrosserie
        } else {
            Self::Debosselage
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::TolerieCarrosserie => "Tôlerie / Carrosserie",
            Self::Debosselage => "Débosselage",
            Self::Unassigned => "Non assignée",
        }
    }
}
