// Catalog data model and text normalization
// Dataset records arrive pre-cleaned and deduplicated; this module turns them
// into embedding-ready catalog items.


use serde::{Deserialize, Serialize};

/// Placeholder substituted for missing metadata fields so that the combined
/// text blob is never empty.
pub const MISSING_FIELD_PLACEHOLDER: &str = "unknown";

/// Which catalog partition an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Book,
    Paper,
}

impl Category {
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Book => "book",
            Category::Paper => "paper",
        }
    }
}

impl std::fmt::Display for Category {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One indexed book or paper, with the normalized text blob its embedding is
/// computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Unique within the item's category
    pub id: String,
    pub category: Category,
    pub title: String,
    pub authors: Vec<String>,
    pub publisher_or_venue: String,
    pub year: Option<i32>,
    /// Average rating for books, citation count for papers; 0 when the source
    /// record carried neither
    pub popularity: f64,
    pub link: String,
    /// Normalized combined text used for embedding; never empty
    pub raw_text: String,
}

/// A cleaned Google Books style record as delivered by the ingestion stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: String,
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub publisher: Option<String>,
    pub description: Option<String>,
    pub published_year: Option<i32>,
    pub average_rating: Option<f64>,
    pub preview_link: Option<String>,
}

/// A cleaned Semantic Scholar style record as delivered by the ingestion stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperRecord {
    pub id: String,
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub venue: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub year: Option<i32>,
    pub citation_count: Option<u64>,
    pub url: Option<String>,
}

impl CatalogItem {
    #[inline]
    pub fn from_book(record: BookRecord) -> Self {
        let title = field_or_placeholder(record.title);
        let authors = record.authors.unwrap_or_default();
        let publisher = field_or_placeholder(record.publisher);
        let raw_text = combined_text(&title, &authors, &publisher, record.description.as_deref());

        Self {
            id: record.id,
            category: Category::Book,
            title,
            authors,
            publisher_or_venue: publisher,
            year: record.published_year,
            popularity: record.average_rating.unwrap_or(0.0),
            link: record.preview_link.unwrap_or_default(),
            raw_text,
        }
    }

    #[inline]
    pub fn from_paper(record: PaperRecord) -> Self {
        let title = field_or_placeholder(record.title);
        let authors = record.authors.unwrap_or_default();
        let venue = field_or_placeholder(record.venue);
        let raw_text = combined_text(&title, &authors, &venue, record.abstract_text.as_deref());

        Self {
            id: record.id,
            category: Category::Paper,
            title,
            authors,
            publisher_or_venue: venue,
            year: record.year,
            popularity: record.citation_count.map_or(0.0, |c| c as f64),
            link: record.url.unwrap_or_default(),
            raw_text,
        }
    }
}

fn field_or_placeholder(field: Option<String>) -> String {
    field
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| MISSING_FIELD_PLACEHOLDER.to_string())
}

/// Lowercase the text, trim it, and collapse internal whitespace runs to a
/// single space. Every other character passes through unchanged. Never fails.
#[inline]
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    for word in lowered.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Build the combined text blob for an item: title, authors, publisher/venue
/// in fixed order, with the description or abstract appended when present.
/// Missing fields have already been replaced by the placeholder, so the
/// result is never empty.
#[inline]
pub fn combined_text(
    title: &str,
    authors: &[String],
    publisher_or_venue: &str,
    description: Option<&str>,
) -> String {
    let authors_blob = if authors.is_empty() {
        MISSING_FIELD_PLACEHOLDER.to_string()
    } else {
        authors.join(" ")
    };

    let mut blob = format!("{} {} {}", title, authors_blob, publisher_or_venue);
    if let Some(description) = description {
        blob.push(' ');
        blob.push_str(description);
    }

    normalize_text(&blob)
}
