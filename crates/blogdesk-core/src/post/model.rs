//! Post domain model.
//!
//! A post is one authored blog entry mirrored from the remote document store.
//! Its wire form is a flat document whose field names follow the store's
//! camelCase convention (`userId`, `createdAt`).

use crate::error::{BlogError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field map of a stored document.
pub type Fields = Map<String, Value>;

/// A document as returned by [`super::DocumentStore::list_all`].
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

/// One blog entry held in the local collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Identifier assigned by the remote store
    pub id: String,
    pub title: String,
    pub author: String,
    pub content: String,
    /// Identity of the creator
    #[serde(rename = "userId")]
    pub owner_id: String,
    /// Set at creation, never modified afterwards
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Builds a post from a stored document.
    ///
    /// # Errors
    ///
    /// Returns `BlogError::Internal` when the document lacks a required field.
    pub fn from_document(document: Document) -> Result<Self> {
        let record: PostRecord = serde_json::from_value(Value::Object(document.fields))?;
        Ok(Self {
            id: document.id,
            title: record.title,
            author: record.author,
            content: record.content,
            owner_id: record.owner_id,
            created_at: record.created_at,
        })
    }

    /// Overwrites the mutable fields with the draft's values.
    pub fn apply(&mut self, draft: &PostDraft) {
        self.title = draft.title.clone();
        self.author = draft.author.clone();
        self.content = draft.content.clone();
    }
}

/// User-submitted form values for create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub author: String,
    pub content: String,
}

impl PostDraft {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            content: content.into(),
        }
    }

    /// Checks that title, author and content are all non-empty.
    ///
    /// # Errors
    ///
    /// Returns `BlogError::Validation` naming the first empty field.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("title", &self.title),
            ("author", &self.author),
            ("content", &self.content),
        ] {
            if value.is_empty() {
                return Err(BlogError::validation(field, "All fields are required"));
            }
        }
        Ok(())
    }

    /// Fields sent on update: only the three mutable ones.
    pub fn to_update_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("title".into(), Value::String(self.title.clone()));
        fields.insert("author".into(), Value::String(self.author.clone()));
        fields.insert("content".into(), Value::String(self.content.clone()));
        fields
    }

    /// Fields sent on create: the draft tagged with owner and creation time.
    pub fn to_create_fields(&self, owner_id: &str, created_at: DateTime<Utc>) -> Fields {
        let mut fields = self.to_update_fields();
        fields.insert("userId".into(), Value::String(owner_id.to_string()));
        fields.insert("createdAt".into(), Value::String(created_at.to_rfc3339()));
        fields
    }

    /// Completes the draft into a post once the store has assigned an id.
    pub fn into_post(self, id: String, owner_id: String, created_at: DateTime<Utc>) -> Post {
        Post {
            id,
            title: self.title,
            author: self.author,
            content: self.content,
            owner_id,
            created_at,
        }
    }
}

/// Prefills the edit form.
impl From<&Post> for PostDraft {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            author: post.author.clone(),
            content: post.content.clone(),
        }
    }
}

// Wire shape of a post document, without the id.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostRecord {
    title: String,
    author: String,
    content: String,
    #[serde(rename = "userId")]
    owner_id: String,
    created_at: DateTime<Utc>,
}
