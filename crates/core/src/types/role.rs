//! User roles.

use serde::{Deserialize, Serialize};

/// Role of a platform user. Gates access to role-specific routes.
///
/// Serialized with the wire values the REST API uses (`cliente`, `vendedor`,
/// `repartidor`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Orders food.
    #[serde(rename = "cliente")]
    Customer,
    /// Runs a restaurant and manages its products.
    #[serde(rename = "vendedor")]
    Vendor,
    /// Delivers orders.
    #[serde(rename = "repartidor")]
    Courier,
}

impl Role {
    /// All roles, in display order.
    pub const ALL: [Self; 3] = [Self::Customer, Self::Vendor, Self::Courier];

    /// The wire value of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "cliente",
            Self::Vendor => "vendedor",
            Self::Courier => "repartidor",
        }
    }

    /// Landing page for users with this role.
    #[must_use]
    pub const fn home_path(&self) -> &'static str {
        match self {
            Self::Customer => "/home-cliente",
            Self::Vendor => "/home-vendedor",
            Self::Courier => "/home-repartidor",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid role: {0}")]
pub struct RoleParseError(pub String);

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    /// Accepts the wire value or the English name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cliente" | "customer" => Ok(Self::Customer),
            "vendedor" | "vendor" => Ok(Self::Vendor),
            "repartidor" | "courier" => Ok(Self::Courier),
            _ => Err(RoleParseError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
    }

    #[test]
    fn test_from_str_accepts_both_names() {
        assert_eq!("vendedor".parse::<Role>().unwrap(), Role::Vendor);
        assert_eq!("Courier".parse::<Role>().unwrap(), Role::Courier);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_home_paths_are_distinct() {
        assert_eq!(Role::Customer.home_path(), "/home-cliente");
        assert_eq!(Role::Vendor.home_path(), "/home-vendedor");
        assert_eq!(Role::Courier.home_path(), "/home-repartidor");
    }
}
