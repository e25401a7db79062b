//! Well-known role name constants.
//!
//! These must match the `role` CHECK constraint in
//! `20260301000001_create_users_table.sql`.

/// Project managers: full visibility, approvals, user administration.
pub const ROLE_MANAGER: &str = "manager";

/// Developers: log hours, submit expenses, work their own tasks.
pub const ROLE_DEVELOPER: &str = "developer";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_MANAGER, ROLE_DEVELOPER];

/// Validate that a role string is one of the accepted values.
pub fn validate_role(role: &str) -> Result<(), String> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_roles_accepted() {
        assert!(validate_role(ROLE_MANAGER).is_ok());
        assert!(validate_role(ROLE_DEVELOPER).is_ok());
    }

    #[test]
    fn test_unknown_role_rejected() {
        let result = validate_role("admin");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid role"));
    }

    #[test]
    fn test_empty_role_rejected() {
        assert!(validate_role("").is_err());
    }
}
