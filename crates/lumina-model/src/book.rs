use crate::{BookId, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY: &str = "General";
pub const TITLE_MAX_LEN: usize = 512;

/// A review embedded in its book. `reviewer` is the display name captured at
/// post time, not a live account reference; renaming an account does not
/// rewrite past reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub reviewer: String,
    pub rating: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub category: String,
    pub reviews: Vec<Review>,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a book. Price is intentionally unconstrained
/// beyond being a number.
#[derive(Debug, Clone, PartialEq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: String,
}

impl BookDraft {
    pub fn new(
        title: String,
        author: String,
        description: Option<String>,
        price: f64,
        category: Option<String>,
    ) -> Result<Self, ValidationError> {
        let title = title.trim().to_string();
        let author = author.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError("title must not be empty".to_string()));
        }
        if title.len() > TITLE_MAX_LEN {
            return Err(ValidationError(format!(
                "title exceeds max length {TITLE_MAX_LEN}"
            )));
        }
        if author.is_empty() {
            return Err(ValidationError("author must not be empty".to_string()));
        }
        let category = match category {
            Some(c) if !c.trim().is_empty() => c.trim().to_string(),
            _ => DEFAULT_CATEGORY.to_string(),
        };
        Ok(Self {
            title,
            author,
            description,
            price,
            category,
        })
    }
}

/// A partial update for an existing book; `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
}

impl BookPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(ValidationError("title must not be empty".to_string()));
            }
        }
        if let Some(author) = &self.author {
            if author.trim().is_empty() {
                return Err(ValidationError("author must not be empty".to_string()));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_requires_title_and_author() {
        assert!(BookDraft::new("".into(), "A".into(), None, 1.0, None).is_err());
        assert!(BookDraft::new("T".into(), "   ".into(), None, 1.0, None).is_err());
        let draft = BookDraft::new("T".into(), "A".into(), None, 1.0, None).expect("valid");
        assert_eq!(draft.category, DEFAULT_CATEGORY);
    }

    #[test]
    fn draft_keeps_explicit_category() {
        let draft =
            BookDraft::new("T".into(), "A".into(), None, 1.0, Some("Sci-Fi".into())).expect("valid");
        assert_eq!(draft.category, "Sci-Fi");
    }

    #[test]
    fn draft_accepts_negative_price() {
        // Price carries no non-negativity constraint.
        let draft = BookDraft::new("T".into(), "A".into(), None, -3.5, None).expect("valid");
        assert_eq!(draft.price, -3.5);
    }

    #[test]
    fn patch_rejects_blank_required_fields_only_when_present() {
        let patch = BookPatch {
            title: Some("  ".into()),
            ..BookPatch::default()
        };
        assert!(patch.validate().is_err());
        assert!(BookPatch::default().validate().is_ok());
        assert!(BookPatch::default().is_empty());
    }
}
