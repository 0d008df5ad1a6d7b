//! Platform users.

use serde::{Deserialize, Serialize};

use crate::types::{Email, Role, UserId};

/// A registered user as returned by `/users`.
///
/// The API also returns the stored password for its mock login. That field
/// is not modelled, so it is dropped on decode and never persisted in a
/// session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(rename = "nombre", default)]
    pub name: String,
    pub email: Email,
    #[serde(rename = "rol")]
    pub role: Role,
    #[serde(rename = "telefono", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "direccion", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Registration payload for `POST /users`.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone, Serialize)]
pub struct UserInput {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: Email,
    pub password: String,
    #[serde(rename = "rol")]
    pub role: Role,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "direccion", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl std::fmt::Debug for UserInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserInput")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .field("phone", &self.phone)
            .field("address", &self.address)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_drops_password() {
        let json = r#"{
            "id": 4,
            "nombre": "Camila",
            "email": "camila@example.com",
            "password": "hunter2",
            "rol": "repartidor"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::Courier);
        assert_eq!(user.phone, None);

        let back = serde_json::to_string(&user).unwrap();
        assert!(!back.contains("hunter2"));
    }

    #[test]
    fn test_input_debug_redacts_password() {
        let input = UserInput {
            name: "Camila".to_string(),
            email: Email::parse("camila@example.com").unwrap(),
            password: "super_secret_value".to_string(),
            role: Role::Customer,
            phone: None,
            address: None,
        };
        let debug_output = format!("{input:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_value"));

        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["rol"], "cliente");
        assert!(json.get("telefono").is_none());
    }
}
