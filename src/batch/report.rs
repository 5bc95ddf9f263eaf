//! Summary of a conversion run.

use serde::Serialize;
use std::fmt;

/// What a run produced, per diary and in total.
#[derive(Clone, Debug, Default, Serialize)]
pub struct BatchSummary {
    pub diaries: Vec<DiarySummary>,
}

/// Counts for one diary.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DiarySummary {
    pub id: String,
    pub manifest: String,
    pub canvases: usize,
    pub pages: usize,
    pub regions: usize,
    pub lines: usize,
    pub entities: usize,
    /// Linked entities that fell back to the placeholder.
    pub unresolved_entities: usize,
    /// Entity annotations without a line target.
    pub untargeted_entities: usize,
    /// Canvas ids of pages that matched no canvas in the manifest.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unmatched_canvases: Vec<String>,
}

impl BatchSummary {
    pub fn page_count(&self) -> usize {
        self.diaries.iter().map(|d| d.pages).sum()
    }

    pub fn unmatched_count(&self) -> usize {
        self.diaries.iter().map(|d| d.unmatched_canvases.len()).sum()
    }

    pub fn unresolved_count(&self) -> usize {
        self.diaries.iter().map(|d| d.unresolved_entities).sum()
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Converted {} diary(ies), {} page(s):",
            self.diaries.len(),
            self.page_count()
        )?;

        for diary in &self.diaries {
            writeln!(f, "  {}", diary)?;
        }

        if self.unresolved_count() > 0 {
            writeln!(
                f,
                "  {} linked entity lookup(s) failed and were written as 'Unknown'",
                self.unresolved_count()
            )?;
        }

        Ok(())
    }
}

impl fmt::Display for DiarySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} canvases, {} pages, {} regions, {} lines, {} entities",
            self.id, self.canvases, self.pages, self.regions, self.lines, self.entities
        )?;

        if !self.unmatched_canvases.is_empty() {
            write!(
                f,
                " ({} page(s) without a matching canvas)",
                self.unmatched_canvases.len()
            )?;
        }

        Ok(())
    }
}
