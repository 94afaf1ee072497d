//! Contribution records and their display shaping.
//!
//! DESIGN
//! ======
//! The store keeps each contribution kind as one newline-delimited string.
//! That convention ends here: `ContributionRecord::from_document` splits every
//! field once, and the rest of the crate only sees ordered lists.

use serde::Serialize;

use crate::services::store::{Document, FieldValue};

/// Entries shown per kind on the overview tab.
pub const PREVIEW_COUNT: usize = 3;

/// Two-character escape some writers store instead of a real line feed.
const ESCAPED_NEWLINE: &str = "\\n";

// =============================================================================
// KIND
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContributionKind {
    Patents,
    Publications,
    Conferences,
    Events,
}

impl ContributionKind {
    /// Column order for listings and CSV export.
    pub const ALL: [Self; 4] = [Self::Patents, Self::Publications, Self::Conferences, Self::Events];

    /// Document field name, also used as the tab slug.
    #[must_use]
    pub fn field(self) -> &'static str {
        match self {
            Self::Patents => "patents",
            Self::Publications => "publications",
            Self::Conferences => "conferences",
            Self::Events => "events",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Patents => "Patents",
            Self::Publications => "Publications",
            Self::Conferences => "Conferences",
            Self::Events => "Events",
        }
    }

    #[must_use]
    pub fn singular(self) -> &'static str {
        match self {
            Self::Patents => "patent",
            Self::Publications => "publication",
            Self::Conferences => "conference",
            Self::Events => "event",
        }
    }

    /// Position in [`Self::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_field(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.field() == raw)
    }
}

// =============================================================================
// RECORD
// =============================================================================

/// One user's contributions, keyed by email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContributionRecord {
    pub email: String,
    pub patents: Vec<String>,
    pub publications: Vec<String>,
    pub conferences: Vec<String>,
    pub events: Vec<String>,
    /// Field text exactly as stored, indexed by [`ContributionKind::index`].
    /// Export writes this rather than the split entries.
    #[serde(skip)]
    pub stored: [String; 4],
}

impl ContributionRecord {
    /// Convert a raw store document. The document id is the email.
    #[must_use]
    pub fn from_document(doc: &Document) -> Self {
        let entries_for = |kind: ContributionKind| match doc.fields.get(kind.field()) {
            Some(FieldValue::Text(text)) => split_entries(text),
            Some(FieldValue::List(items)) => items.iter().flat_map(|item| split_entries(item)).collect(),
            Some(FieldValue::Null | FieldValue::Unsupported) | None => Vec::new(),
        };

        let stored_for = |kind: ContributionKind| match doc.fields.get(kind.field()) {
            Some(FieldValue::Text(text)) => text.clone(),
            Some(FieldValue::List(items)) => items.join("\n"),
            Some(FieldValue::Null | FieldValue::Unsupported) | None => String::new(),
        };

        Self {
            email: doc.id.clone(),
            patents: entries_for(ContributionKind::Patents),
            publications: entries_for(ContributionKind::Publications),
            conferences: entries_for(ContributionKind::Conferences),
            events: entries_for(ContributionKind::Events),
            stored: ContributionKind::ALL.map(stored_for),
        }
    }

    /// The kind's field text as stored, empty when absent or null.
    #[must_use]
    pub fn stored_text(&self, kind: ContributionKind) -> &str {
        &self.stored[kind.index()]
    }

    #[must_use]
    pub fn entries(&self, kind: ContributionKind) -> &[String] {
        match kind {
            ContributionKind::Patents => &self.patents,
            ContributionKind::Publications => &self.publications,
            ContributionKind::Conferences => &self.conferences,
            ContributionKind::Events => &self.events,
        }
    }
}

/// Split newline-delimited text into trimmed, non-blank entries.
///
/// Accepts LF, CRLF and the literal `\n` escape.
#[must_use]
pub fn split_entries(text: &str) -> Vec<String> {
    text.replace(ESCAPED_NEWLINE, "\n")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

// =============================================================================
// PREVIEW
// =============================================================================

/// Overview slice of a kind's entries plus how many were left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preview<'a> {
    pub shown: &'a [String],
    pub remaining: usize,
}

impl<'a> Preview<'a> {
    #[must_use]
    pub fn of(entries: &'a [String]) -> Self {
        let cut = entries.len().min(PREVIEW_COUNT);
        Self { shown: &entries[..cut], remaining: entries.len() - cut }
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.remaining > 0
    }
}

// =============================================================================
// TAB
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Kind(ContributionKind),
}

impl Tab {
    pub const ALL: [Self; 5] = [
        Self::Overview,
        Self::Kind(ContributionKind::Patents),
        Self::Kind(ContributionKind::Publications),
        Self::Kind(ContributionKind::Conferences),
        Self::Kind(ContributionKind::Events),
    ];

    /// Parse a `?tab=` value. Unknown or missing values select the overview.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(ContributionKind::from_field)
            .map_or(Self::Overview, Self::Kind)
    }

    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Kind(kind) => kind.field(),
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Kind(kind) => kind.label(),
        }
    }
}

#[cfg(test)]
#[path = "record_test.rs"]
mod tests;
