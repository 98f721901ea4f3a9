//! Locating the participants table and pulling the roster out of it.
//!
//! The page declares its participant count in a `data-region` paragraph
//! and renders one table row per participant, with cell ids following the
//! scheme `user-index-participants-<context_id>_r<row>_c<column>`. Row 0
//! is the header/self row and is skipped; column 1 holds the display name,
//! column 4 the "time since last activity" text. The id scheme is owned by
//! the upstream page, which is why the whole lookup lives behind this one
//! type and the context id is configuration rather than a constant.
use log::debug;
use roster_common::duration;
use roster_common::roster::ObservedDurations;
use roster_common::{Result, WatchError};
use scraper::{ElementRef, Html, Selector};

/// Extracts the observed roster from a fetched participants page.
pub struct RosterExtractor {
    context_id: u64,
    count_selector: Selector,
    table_selector: Selector,
    badge_selector: Selector,
}

/// Compile a CSS selector, mapping syntax errors to an extraction error.
fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| WatchError::Extraction(format!("Invalid selector `{}`: {}", css, e)))
}

impl RosterExtractor {
    /// Create an extractor for a page whose row ids embed `context_id`.
    pub fn new(context_id: u64) -> Result<Self> {
        Ok(Self {
            context_id,
            count_selector: selector(r#"p[data-region="participant-count"]"#)?,
            table_selector: selector("table#participants")?,
            badge_selector: selector("span.userinitials")?,
        })
    }

    /// Parse the page and build the observed name-to-seconds mapping.
    ///
    /// Fails fatally if the count paragraph, the table, or any expected
    /// row cell is missing; no partial roster is ever returned.
    pub fn extract(&self, html: &str) -> Result<ObservedDurations> {
        let document = Html::parse_document(html);
        let count = self.participant_count(&document)?;
        debug!("Page declares {} participants", count);

        let table = document
            .select(&self.table_selector)
            .next()
            .ok_or_else(|| WatchError::Extraction("Participants table not found".to_string()))?;

        let mut durations = ObservedDurations::new();
        for row in 1..count {
            let name_cell = self
                .row_cell(table, row, "th", 1)?
                .ok_or_else(|| WatchError::Extraction(format!("Participant {} not found", row)))?;
            let activity_cell = self.row_cell(table, row, "td", 4)?.ok_or_else(|| {
                WatchError::Extraction(format!("Last activity cell missing for participant {}", row))
            })?;

            let name = self.display_name(name_cell);
            let activity_text: String = activity_cell.text().collect();
            durations.insert(name, duration::elapsed_seconds(&activity_text));
        }
        Ok(durations)
    }

    /// Read the declared participant count from the page.
    fn participant_count(&self, document: &Html) -> Result<usize> {
        let tag = document
            .select(&self.count_selector)
            .next()
            .ok_or_else(|| WatchError::Extraction("Participant count not found on page".to_string()))?;
        let text: String = tag.text().collect();
        let first = text
            .split_whitespace()
            .next()
            .ok_or_else(|| WatchError::Extraction("Participant count is empty".to_string()))?;
        first
            .parse::<usize>()
            .map_err(|e| WatchError::Extraction(format!("Invalid participant count `{}`: {}", first, e)))
    }

    /// Locate one cell of one roster row by the page's id scheme.
    fn row_cell<'a>(
        &self,
        table: ElementRef<'a>,
        row: usize,
        tag: &str,
        column: u32,
    ) -> Result<Option<ElementRef<'a>>> {
        let css = format!(
            r#"{}[id="user-index-participants-{}_r{}_c{}"]"#,
            tag, self.context_id, row, column
        );
        let cell_selector = selector(&css)?;
        Ok(table.select(&cell_selector).next())
    }

    /// Cell text with the decorative avatar-fallback badge stripped off.
    fn display_name(&self, cell: ElementRef<'_>) -> String {
        let full: String = cell.text().collect();
        let full = full.trim();
        let badge: String = cell
            .select(&self.badge_selector)
            .flat_map(|el| el.text())
            .collect();
        let name = full.strip_prefix(badge.trim()).unwrap_or(full);
        name.trim().to_string()
    }
}
