use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A user as seen by callers of the repository.
///
/// `id` is empty until the store assigns one. Absent attributes are never
/// written, so an update only touches the attributes that are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// 24-character hex identifier assigned on create
    #[serde(default, skip_serializing_if = "String::is_empty")]
    #[schema(example = "65f1c0ffee0000000000beef")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Alice")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "alice")]
    pub username: Option<String>,

    /// Free-form attributes stored as given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<serde_json::Value>,
}

impl User {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Response body for a successful create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreatedUser {
    #[schema(example = "65f1c0ffee0000000000beef")]
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let user = User::new().with_name("Alice");
        assert_eq!(serde_json::to_value(&user).unwrap(), json!({"name": "Alice"}));
    }

    #[test]
    fn test_deserialize_without_id() {
        let user: User =
            serde_json::from_value(json!({"email": "bob@example.com", "extra": true})).unwrap();
        assert!(user.id.is_empty());
        assert_eq!(user.email.as_deref(), Some("bob@example.com"));
    }

    #[test]
    fn test_builder_sets_all_attributes() {
        let user = User::new()
            .with_id("65f1c0ffee0000000000beef")
            .with_name("Alice")
            .with_email("alice@example.com")
            .with_username("alice")
            .with_metadata(json!({"team": "core"}));

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["id"], "65f1c0ffee0000000000beef");
        assert_eq!(value["username"], "alice");
        assert_eq!(value["metadata"]["team"], "core");
    }
}
