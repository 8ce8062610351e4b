use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Distributor,
    #[default]
    User,
}

impl UserRole {
    pub fn to_str(&self) -> &str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Distributor => "distributor",
            UserRole::User => "user",
        }
    }
}

/// Caller identity decoded from the platform token. The raw token is kept so
/// upstream calls run with the caller's own permissions.
#[derive(Clone, Serialize)]
pub struct AuthUser {
    pub user_id: String,
    pub role: UserRole,
    #[serde(skip_serializing)]
    pub token: String,
}

impl std::fmt::Debug for AuthUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthUser")
            .field("user_id", &self.user_id)
            .field("role", &self.role)
            .field("token", &"<redacted>")
            .finish()
    }
}
