//! Status and classification enums shared across the storefront.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Wire values are the backend's Portuguese names; [`OrderStatus::label`]
/// provides the English text shown in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pendente,
    Confirmado,
    Enviado,
    Entregue,
    Cancelado,
}

impl OrderStatus {
    /// Customer-visible label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pendente => "Pending",
            Self::Confirmado => "Confirmed",
            Self::Enviado => "Shipped",
            Self::Entregue => "Delivered",
            Self::Cancelado => "Cancelled",
        }
    }

    /// CSS badge class used by order templates.
    #[must_use]
    pub const fn badge_class(&self) -> &'static str {
        match self {
            Self::Pendente => "status-pending",
            Self::Confirmado => "status-confirmed",
            Self::Enviado => "status-shipped",
            Self::Entregue => "status-delivered",
            Self::Cancelado => "status-cancelled",
        }
    }

    /// Whether the customer may still cancel an order in this status.
    ///
    /// The backend enforces the same rule; this only controls whether the
    /// cancel button is offered.
    #[must_use]
    pub const fn is_cancellable(&self) -> bool {
        matches!(self, Self::Pendente | Self::Confirmado)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let wire = match self {
            Self::Pendente => "pendente",
            Self::Confirmado => "confirmado",
            Self::Enviado => "enviado",
            Self::Entregue => "entregue",
            Self::Cancelado => "cancelado",
        };
        write!(f, "{wire}")
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendente" => Ok(Self::Pendente),
            "confirmado" => Ok(Self::Confirmado),
            "enviado" => Ok(Self::Enviado),
            "entregue" => Ok(Self::Entregue),
            "cancelado" => Ok(Self::Cancelado),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Catalog gender segment.
///
/// Wire values match the backend catalog (`masculino`, `feminino`,
/// `unissex`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Masculino,
    Feminino,
    Unissex,
}

impl Gender {
    /// Customer-visible label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Masculino => "Men",
            Self::Feminino => "Women",
            Self::Unissex => "Unisex",
        }
    }

    /// Query-parameter value understood by the backend.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Masculino => "masculino",
            Self::Feminino => "feminino",
            Self::Unissex => "unissex",
        }
    }

    /// All segments, in the order the filter bar lists them.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Masculino, Self::Feminino, Self::Unissex]
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "masculino" => Ok(Self::Masculino),
            "feminino" => Ok(Self::Feminino),
            "unissex" => Ok(Self::Unissex),
            _ => Err(format!("invalid gender segment: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_values() {
        let status: OrderStatus = serde_json::from_str("\"pendente\"").unwrap();
        assert_eq!(status, OrderStatus::Pendente);
        assert_eq!(
            serde_json::to_string(&OrderStatus::Enviado).unwrap(),
            "\"enviado\""
        );
    }

    #[test]
    fn test_status_display_round_trips() {
        for status in [
            OrderStatus::Pendente,
            OrderStatus::Confirmado,
            OrderStatus::Enviado,
            OrderStatus::Entregue,
            OrderStatus::Cancelado,
        ] {
            let parsed: OrderStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_cancellable_statuses() {
        assert!(OrderStatus::Pendente.is_cancellable());
        assert!(OrderStatus::Confirmado.is_cancellable());
        assert!(!OrderStatus::Enviado.is_cancellable());
        assert!(!OrderStatus::Entregue.is_cancellable());
        assert!(!OrderStatus::Cancelado.is_cancellable());
    }

    #[test]
    fn test_gender_wire_values() {
        let gender: Gender = serde_json::from_str("\"unissex\"").unwrap();
        assert_eq!(gender, Gender::Unissex);
        assert_eq!(Gender::Feminino.as_str(), "feminino");
        assert!("other".parse::<Gender>().is_err());
    }
}
