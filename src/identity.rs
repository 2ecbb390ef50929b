use crate::error::{Result, RosterError};

/// Access level granted by the identity provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    Admin,
    #[default]
    Viewer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Viewer => "viewer",
        }
    }

    /// Anything unrecognised is treated as read-only
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "admin" => Self::Admin,
            _ => Self::Viewer,
        }
    }

    pub fn can_edit(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who is editing, and which tenant's roster they see
pub trait Identity {
    fn role(&self) -> Role;
    fn tenant_id(&self) -> &str;
    fn user(&self) -> Option<&str> {
        None
    }

    /// Gate for every mutating operation
    fn require_admin(&self, action: &str) -> Result<()> {
        if self.role().can_edit() {
            Ok(())
        } else {
            Err(RosterError::Permission(format!(
                "only admins can {} (current role: {})",
                action,
                self.role()
            )))
        }
    }
}

/// Identity fixed at startup from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticIdentity {
    pub role: Role,
    pub tenant_id: String,
    pub user: Option<String>,
}

impl StaticIdentity {
    pub fn new(role: Role, tenant_id: impl Into<String>) -> Self {
        Self {
            role,
            tenant_id: tenant_id.into(),
            user: None,
        }
    }

    pub fn with_user(mut self, user: Option<String>) -> Self {
        self.user = user;
        self
    }
}

impl Identity for StaticIdentity {
    fn role(&self) -> Role {
        self.role
    }

    fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse(" ADMIN "), Role::Admin);
        assert_eq!(Role::parse("viewer"), Role::Viewer);
        assert_eq!(Role::parse("superuser"), Role::Viewer);
    }

    #[test]
    fn test_require_admin() {
        let admin = StaticIdentity::new(Role::Admin, "school-1");
        assert!(admin.require_admin("add people").is_ok());

        let viewer = StaticIdentity::new(Role::Viewer, "school-1");
        let err = viewer.require_admin("add people").unwrap_err();
        assert!(matches!(err, RosterError::Permission(_)));
        assert!(err.to_string().contains("add people"));
    }
}
