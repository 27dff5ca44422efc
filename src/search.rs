//! Combines the free-text keyword and the priority filter into one result set.
//! The keyword picks the base query; the priority filter narrows that base set
//! in memory, so both conditions must hold for a row to appear.

use crate::db::AgendaStore;
use crate::error::StoreError;
use crate::models::{AgendaEntry, Priority};

/// Text shown in an empty search box. Never searched for.
pub const KEYWORD_PLACEHOLDER: &str = "Cari agenda....";
/// Filter selection meaning "every priority".
pub const ALL_PRIORITIES_LABEL: &str = "-- Semua Prioritas --";
/// Form selection meaning "nothing chosen yet".
pub const CHOOSE_PRIORITY_LABEL: &str = "- Pilih Prioritas -";

/// Trim the raw search box text. Blank text and the placeholder mean "no
/// keyword".
pub fn normalize_keyword(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == KEYWORD_PLACEHOLDER {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    /// Interpret a filter selection. Missing or blank selections, either
    /// placeholder, and labels that name no priority leave the filter inactive.
    pub fn parse(selection: Option<&str>) -> Self {
        match selection.map(str::trim) {
            None | Some("") | Some(ALL_PRIORITIES_LABEL) | Some(CHOOSE_PRIORITY_LABEL) => {
                PriorityFilter::All
            }
            Some(label) => label
                .parse::<Priority>()
                .map(PriorityFilter::Only)
                .unwrap_or(PriorityFilter::All),
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, PriorityFilter::Only(_))
    }

    pub fn matches(self, entry: &AgendaEntry) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Only(priority) => entry.priority == priority,
        }
    }

    /// Step All → Rendah → Sedang → Tinggi → Urgent → All.
    pub fn cycle(self) -> Self {
        match self {
            PriorityFilter::All => PriorityFilter::Only(Priority::ALL[0]),
            PriorityFilter::Only(Priority::Urgent) => PriorityFilter::All,
            PriorityFilter::Only(priority) => PriorityFilter::Only(priority.cycle(1)),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriorityFilter::All => ALL_PRIORITIES_LABEL,
            PriorityFilter::Only(priority) => priority.label(),
        }
    }
}

/// The inputs of one search run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub keyword: Option<String>,
    pub filter: PriorityFilter,
}

impl SearchRequest {
    /// Build a request straight from the search box text and filter selection.
    pub fn from_inputs(raw_keyword: &str, filter: PriorityFilter) -> Self {
        Self {
            keyword: normalize_keyword(raw_keyword),
            filter,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub request: SearchRequest,
    pub entries: Vec<AgendaEntry>,
}

impl SearchOutcome {
    /// Summary shown under the table, e.g.
    /// `Found 2 agenda | Search: "rapat" | Filter: Tinggi`.
    pub fn status(&self) -> String {
        let mut status = if self.entries.is_empty() {
            "No agenda found".to_string()
        } else {
            format!("Found {} agenda", self.entries.len())
        };

        if let Some(keyword) = &self.request.keyword {
            status.push_str(&format!(" | Search: \"{keyword}\""));
        }
        if let PriorityFilter::Only(priority) = self.request.filter {
            status.push_str(&format!(" | Filter: {priority}"));
        }
        if self.request.keyword.is_none() && !self.request.filter.is_active() {
            status.push_str(" (all data)");
        }

        status
    }
}

/// Run the keyword query (or load everything) and apply the priority filter to
/// that result. Ordering is whatever the base query returned.
pub fn run_search(
    store: &mut AgendaStore,
    request: &SearchRequest,
) -> Result<SearchOutcome, StoreError> {
    let mut entries = match &request.keyword {
        Some(keyword) => store.search(keyword)?,
        None => store.get_all()?,
    };
    entries.retain(|entry| request.filter.matches(entry));

    Ok(SearchOutcome {
        request: request.clone(),
        entries,
    })
}
