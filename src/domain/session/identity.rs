// SPDX-License-Identifier: MPL-2.0
//! The authenticated user as mirrored from the backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Raw contents of a backend document.
pub type Document = Map<String, Value>;

/// Opaque key identifying a user, issued by the auth backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserKey(String);

impl UserKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Shape of a user document. Unknown fields land in `profile`.
#[derive(Debug, Deserialize)]
struct UserRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(flatten)]
    profile: BTreeMap<String, Value>,
}

/// Profile of the signed-in user.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    key: UserKey,
    name: Option<String>,
    email: Option<String>,
    language: Option<String>,
    profile: BTreeMap<String, Value>,
}

impl Identity {
    /// Builds an identity from the user's document.
    ///
    /// The key always comes from the auth backend, never from the document,
    /// so a document carrying its own `id` field cannot impersonate another
    /// user. That field is kept with the other profile fields.
    ///
    /// # Errors
    ///
    /// Fails when a known field has the wrong type (e.g. a numeric `email`).
    pub fn from_document(key: UserKey, document: &Document) -> Result<Self, serde_json::Error> {
        let record: UserRecord = serde_json::from_value(Value::Object(document.clone()))?;
        Ok(Self {
            key,
            name: record.name,
            email: record.email,
            language: record.language,
            profile: record.profile,
        })
    }

    /// An identity with no profile data beyond its key.
    #[must_use]
    pub fn bare(key: UserKey) -> Self {
        Self {
            key,
            name: None,
            email: None,
            language: None,
            profile: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &UserKey {
        &self.key
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Language tag exactly as stored in the document.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Any document field other than name, email and language.
    #[must_use]
    pub fn profile_field(&self, field: &str) -> Option<&Value> {
        self.profile.get(field)
    }
}

/// What the diagnostics sink is told about the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserContext {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub language: String,
}

impl UserContext {
    /// Describes `identity` with the language the session resolved for it.
    #[must_use]
    pub fn for_identity(identity: &Identity, language: super::LanguageTag) -> Self {
        Self {
            id: identity.key.to_string(),
            username: identity.name.clone(),
            email: identity.email.clone(),
            language: language.code().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::LanguageTag;
    use serde_json::json;

    fn document(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn from_document_reads_known_fields_and_keeps_the_rest() {
        let doc = document(json!({
            "id": "someone-else",
            "name": "Ada",
            "email": "ada@example.com",
            "language": "fr",
            "role": "admin"
        }));
        let identity = Identity::from_document(UserKey::new("uid-1"), &doc).unwrap();

        assert_eq!(identity.key().as_str(), "uid-1");
        assert_eq!(identity.name(), Some("Ada"));
        assert_eq!(identity.email(), Some("ada@example.com"));
        assert_eq!(identity.language(), Some("fr"));
        assert_eq!(identity.profile_field("role"), Some(&json!("admin")));
        assert_eq!(identity.profile_field("id"), Some(&json!("someone-else")));
    }

    #[test]
    fn from_document_accepts_empty_documents() {
        let identity = Identity::from_document(UserKey::new("uid-2"), &Document::new()).unwrap();
        assert_eq!(identity, Identity::bare(UserKey::new("uid-2")));
    }

    #[test]
    fn from_document_rejects_mistyped_fields() {
        let doc = document(json!({ "email": 42 }));
        assert!(Identity::from_document(UserKey::new("uid-3"), &doc).is_err());
    }

    #[test]
    fn user_context_uses_resolved_language() {
        let doc = document(json!({ "name": "Ada", "language": "klingon" }));
        let identity = Identity::from_document(UserKey::new("uid-4"), &doc).unwrap();
        let context = UserContext::for_identity(&identity, LanguageTag::DEFAULT);

        assert_eq!(context.id, "uid-4");
        assert_eq!(context.username.as_deref(), Some("Ada"));
        assert_eq!(context.email, None);
        assert_eq!(context.language, "en");
    }
}
