//! Memory record model.
//!
//! # Responsibility
//! - Define the static photo-and-text record rendered by every view.
//! - Validate records at construction and at deserialization.
//!
//! # Invariants
//! - `title`, `description`, `location` and `image` are non-blank.
//! - `image` is present even when `video_url` is set; it is the poster.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable record identifier.
pub type MemoryId = u32;

const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Validation failure for a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryValidationError {
    /// A required display string is empty after trimming.
    BlankField {
        id: MemoryId,
        field: &'static str,
    },
    /// `date` is not an ISO `YYYY-MM-DD` calendar date.
    InvalidDate { id: MemoryId, value: String },
    /// `videoUrl` was provided but blank.
    BlankVideoUrl(MemoryId),
}

impl Display for MemoryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField { id, field } => write!(f, "memory {id}: `{field}` must not be blank"),
            Self::InvalidDate { id, value } => {
                write!(f, "memory {id}: `{value}` is not a YYYY-MM-DD date")
            }
            Self::BlankVideoUrl(id) => write!(f, "memory {id}: `videoUrl` must not be blank"),
        }
    }
}

impl Error for MemoryValidationError {}

/// One entry of the memory catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMemoryRecord", into = "RawMemoryRecord")]
pub struct MemoryRecord {
    pub id: MemoryId,
    pub title: String,
    pub date: NaiveDate,
    pub location: String,
    pub description: String,
    /// Static picture asset path. Poster frame for video records.
    pub image: String,
    /// Optional clip played when the record is expanded on the timeline.
    pub video_url: Option<String>,
    pub quote: Option<String>,
}

/// Wire shape of the catalog data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMemoryRecord {
    id: MemoryId,
    title: String,
    date: String,
    location: String,
    description: String,
    image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    quote: Option<String>,
}

impl TryFrom<RawMemoryRecord> for MemoryRecord {
    type Error = MemoryValidationError;

    fn try_from(raw: RawMemoryRecord) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(raw.date.trim(), WIRE_DATE_FORMAT).map_err(|_| {
            MemoryValidationError::InvalidDate {
                id: raw.id,
                value: raw.date.clone(),
            }
        })?;
        let record = Self {
            id: raw.id,
            title: raw.title,
            date,
            location: raw.location,
            description: raw.description,
            image: raw.image,
            video_url: raw.video_url,
            quote: raw.quote.filter(|quote| !quote.trim().is_empty()),
        };
        record.validate()?;
        Ok(record)
    }
}

impl From<MemoryRecord> for RawMemoryRecord {
    fn from(record: MemoryRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            date: record.date.format(WIRE_DATE_FORMAT).to_string(),
            location: record.location,
            description: record.description,
            image: record.image,
            video_url: record.video_url,
            quote: record.quote,
        }
    }
}

impl MemoryRecord {
    /// Builds an image-only record.
    ///
    /// # Errors
    /// Returns the first blank required field.
    pub fn new(
        id: MemoryId,
        title: impl Into<String>,
        date: NaiveDate,
        location: impl Into<String>,
        description: impl Into<String>,
        image: impl Into<String>,
    ) -> Result<Self, MemoryValidationError> {
        let record = Self {
            id,
            title: title.into(),
            date,
            location: location.into(),
            description: description.into(),
            image: image.into(),
            video_url: None,
            quote: None,
        };
        record.validate()?;
        Ok(record)
    }

    /// Attaches a clip; the existing `image` becomes its poster.
    pub fn with_video(mut self, video_url: impl Into<String>) -> Result<Self, MemoryValidationError> {
        self.video_url = Some(video_url.into());
        self.validate()?;
        Ok(self)
    }

    pub fn with_quote(mut self, quote: impl Into<String>) -> Self {
        let quote = quote.into();
        self.quote = (!quote.trim().is_empty()).then_some(quote);
        self
    }

    pub fn validate(&self) -> Result<(), MemoryValidationError> {
        for (field, value) in [
            ("title", &self.title),
            ("location", &self.location),
            ("description", &self.description),
            ("image", &self.image),
        ] {
            if value.trim().is_empty() {
                return Err(MemoryValidationError::BlankField { id: self.id, field });
            }
        }
        if matches!(&self.video_url, Some(url) if url.trim().is_empty()) {
            return Err(MemoryValidationError::BlankVideoUrl(self.id));
        }
        Ok(())
    }

    pub fn has_video(&self) -> bool {
        self.video_url.is_some()
    }

    /// `DD/MM/YYYY`, as shown on cards.
    pub fn display_date(&self) -> String {
        self.date.format(DISPLAY_DATE_FORMAT).to_string()
    }
}
