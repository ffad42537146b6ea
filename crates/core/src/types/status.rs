//! Status enums for the quote lifecycle.

use serde::{Deserialize, Serialize};

/// Progress of the one-shot commit of a draft.
///
/// Transitions:
/// - `Idle -> InFlight` when a commit starts
/// - `InFlight -> Succeeded` when remote storage acknowledged the quote
/// - `InFlight -> Failed` when validation passed but submission failed
/// - `InFlight -> Idle` when the commit was abandoned before it finished
/// - `Failed -> InFlight` / `Succeeded -> InFlight` on a user-initiated retry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CommitStatus {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

impl CommitStatus {
    /// Whether a commit is currently running.
    #[must_use]
    pub const fn is_in_flight(self) -> bool {
        matches!(self, Self::InFlight)
    }
}

impl std::fmt::Display for CommitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::InFlight => write!(f, "in_flight"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Editable field of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineItemField {
    Description,
    Quantity,
    PricePerUnit,
}

impl std::fmt::Display for LineItemField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Description => write!(f, "description"),
            Self::Quantity => write!(f, "quantity"),
            Self::PricePerUnit => write!(f, "price"),
        }
    }
}

impl std::str::FromStr for LineItemField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "description" | "descripcion" => Ok(Self::Description),
            "quantity" | "cantidad" => Ok(Self::Quantity),
            "price" | "pricePerUnit" | "precio" => Ok(Self::PricePerUnit),
            _ => Err(format!("invalid line item field: {s}")),
        }
    }
}
