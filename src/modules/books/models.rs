use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// A catalog record for one book title held at a locality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier, assigned by the service on creation
    pub id: String,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Genre the book is shelved under
    pub genre: String,
    /// Number of copies held
    pub quantity: u32,
    /// Whether the book can currently be lent
    pub is_available: bool,
    /// Where the copies are kept
    pub locality: String,
    /// Time of the last change
    #[serde(with = "time::serde::rfc3339")]
    pub update_at: OffsetDateTime,
}

impl Book {
    /// Build a record from the create payload plus service-assigned fields.
    pub fn new(id: impl Into<String>, update_at: OffsetDateTime, fields: CreateBookDto) -> Self {
        Self {
            id: id.into(),
            title: fields.title,
            author: fields.author,
            genre: fields.genre,
            quantity: fields.quantity,
            is_available: fields.is_available,
            locality: fields.locality,
            update_at,
        }
    }

    /// A new snapshot with every present field of `changes` applied.
    pub fn with_changes(&self, changes: UpdateBookDto, update_at: OffsetDateTime) -> Self {
        Self {
            id: self.id.clone(),
            title: changes.title.unwrap_or_else(|| self.title.clone()),
            author: changes.author.unwrap_or_else(|| self.author.clone()),
            genre: changes.genre.unwrap_or_else(|| self.genre.clone()),
            quantity: changes.quantity.unwrap_or(self.quantity),
            is_available: changes.is_available.unwrap_or(self.is_available),
            locality: changes.locality.unwrap_or_else(|| self.locality.clone()),
            update_at,
        }
    }
}

/// Request model for creating a new book. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookDto {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub author: String,
    #[validate(custom(function = "not_blank"))]
    pub genre: String,
    pub quantity: u32,
    pub is_available: bool,
    #[validate(custom(function = "not_blank"))]
    pub locality: String,
}

/// Request model for updating a book. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank"))]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank"))]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank"))]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank"))]
    pub locality: Option<String>,
}

impl From<CreateBookDto> for UpdateBookDto {
    fn from(dto: CreateBookDto) -> Self {
        Self {
            title: Some(dto.title),
            author: Some(dto.author),
            genre: Some(dto.genre),
            quantity: Some(dto.quantity),
            is_available: Some(dto.is_available),
            locality: Some(dto.locality),
        }
    }
}

/// Text fields must carry something besides whitespace
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::Borrowed("must not be blank"));
        return Err(err);
    }
    Ok(())
}
