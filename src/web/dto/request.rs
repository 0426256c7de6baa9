//! Request DTOs for Web API.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::validation::{display_name, no_control_chars};
use crate::user::{NewUser, Role, UserUpdate};

/// User creation request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// Email address.
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,
    /// Display name.
    #[validate(
        length(max = 100, message = "Must be at most 100 characters"),
        custom(function = "display_name")
    )]
    pub name: String,
    /// Role (defaults to `user`).
    #[serde(default)]
    pub role: Option<Role>,
    /// Avatar URL.
    #[serde(default)]
    #[validate(
        length(max = 2048, message = "Must be at most 2048 characters"),
        custom(function = "no_control_chars")
    )]
    pub avatar: Option<String>,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        let mut new_user = NewUser::new(req.email.trim(), req.name.trim());
        if let Some(role) = req.role {
            new_user = new_user.with_role(role);
        }
        if let Some(avatar) = req.avatar {
            new_user = new_user.with_avatar(avatar);
        }
        new_user
    }
}

/// User update request. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    /// New email address.
    #[serde(default)]
    #[validate(email(message = "Must be a valid email address"))]
    pub email: Option<String>,
    /// New display name.
    #[serde(default)]
    #[validate(
        length(max = 100, message = "Must be at most 100 characters"),
        custom(function = "display_name")
    )]
    pub name: Option<String>,
    /// New role.
    #[serde(default)]
    pub role: Option<Role>,
    /// New avatar URL.
    #[serde(default)]
    #[validate(
        length(max = 2048, message = "Must be at most 2048 characters"),
        custom(function = "no_control_chars")
    )]
    pub avatar: Option<String>,
}

impl From<UpdateUserRequest> for UserUpdate {
    fn from(req: UpdateUserRequest) -> Self {
        UserUpdate {
            email: req.email.map(|e| e.trim().to_string()),
            name: req.name.map(|n| n.trim().to_string()),
            role: req.role,
            avatar: req.avatar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_valid() {
        let req: CreateUserRequest =
            serde_json::from_str(r#"{"email": "ana@example.com", "name": "Ana"}"#).unwrap();
        assert!(req.validate().is_ok());

        let new_user: NewUser = req.into();
        assert_eq!(new_user.role, Role::User);
        assert!(new_user.avatar.is_none());
    }

    #[test]
    fn test_create_request_with_role() {
        let req: CreateUserRequest = serde_json::from_str(
            r#"{"email": "root@example.com", "name": " Root ", "role": "admin", "avatar": "/storage/image/r.png"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());

        let new_user: NewUser = req.into();
        assert_eq!(new_user.name, "Root");
        assert_eq!(new_user.role, Role::Admin);
        assert_eq!(new_user.avatar.as_deref(), Some("/storage/image/r.png"));
    }

    #[test]
    fn test_create_request_invalid_fields() {
        let req: CreateUserRequest =
            serde_json::from_str(r#"{"email": "not-an-email", "name": "   "}"#).unwrap();

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("name"));
    }

    #[test]
    fn test_create_request_control_chars() {
        let req: CreateUserRequest =
            serde_json::from_str(r#"{"email": "a@example.com", "name": "A\u0007"}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_unknown_role() {
        let result = serde_json::from_str::<CreateUserRequest>(
            r#"{"email": "a@example.com", "name": "A", "role": "root"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_update_request() {
        let req: UpdateUserRequest = serde_json::from_str(r#"{"name": "Bea"}"#).unwrap();
        assert!(req.validate().is_ok());

        let update: UserUpdate = req.into();
        assert_eq!(update.name.as_deref(), Some("Bea"));
        assert!(update.email.is_none());
        assert!(update.role.is_none());
    }

    #[test]
    fn test_update_request_empty() {
        let req: UpdateUserRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_ok());
        let update = UserUpdate::from(req);
        assert!(update.email.is_none());
        assert!(update.name.is_none());
        assert!(update.role.is_none());
        assert!(update.avatar.is_none());
    }

    #[test]
    fn test_update_request_invalid_email() {
        let req: UpdateUserRequest = serde_json::from_str(r#"{"email": "nope"}"#).unwrap();
        assert!(req.validate().is_err());
    }
}
