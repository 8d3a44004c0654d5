//! Per-user session state: the paper library, the comparison selection,
//! and the most recent comparison result.

use std::collections::HashSet;

use paperlens_pdf::Extraction;

use crate::{
    Analyzer, Comparator, ComparisonRecord, Limits, PaperRecord, PaperStatus, SelectionError,
};

/// Header metrics for the library view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LibraryStats {
    pub total: usize,
    pub analyzed: usize,
    pub categories: usize,
}

/// All state belonging to one interactive session.
///
/// Owned by whichever handler drives the interaction and passed by
/// reference into each action; nothing here is global.
#[derive(Debug, Clone)]
pub struct Session {
    limits: Limits,
    papers: Vec<PaperRecord>,
    /// Selected paper ids, in the order they were picked.
    selection: Vec<u32>,
    comparison: Option<ComparisonRecord>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self {
            limits,
            papers: Vec::new(),
            selection: Vec::new(),
            comparison: None,
        }
    }

    /// Drop every paper, the selection, and any comparison.
    pub fn clear(&mut self) {
        self.papers.clear();
        self.selection.clear();
        self.comparison = None;
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn papers(&self) -> &[PaperRecord] {
        &self.papers
    }

    pub fn paper(&self, id: u32) -> Option<&PaperRecord> {
        self.papers.iter().find(|p| p.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    /// Identifier the next appended paper will receive (current count + 1).
    pub fn next_id(&self) -> u32 {
        self.papers.len() as u32 + 1
    }

    /// Analyze `text` and append the resulting record.
    pub fn add_paper(&mut self, analyzer: &dyn Analyzer, title: &str, text: &str) -> &PaperRecord {
        let record = analyzer.analyze(self.next_id(), title, text);
        log::debug!("added paper #{} '{}'", record.id, record.title);
        self.papers.push(record);
        &self.papers[self.papers.len() - 1]
    }

    /// Append a paper from an extraction outcome. A failed extraction is
    /// analyzed as the sentinel text and its reason kept on the record.
    pub fn ingest(
        &mut self,
        analyzer: &dyn Analyzer,
        title: &str,
        extraction: &Extraction,
    ) -> &PaperRecord {
        let id = self.next_id();
        let mut record = analyzer.analyze(id, title, extraction.text_or_sentinel());
        record.extraction_error = extraction.failure_reason().map(str::to_string);
        self.papers.push(record);
        &self.papers[self.papers.len() - 1]
    }

    pub fn stats(&self) -> LibraryStats {
        let analyzed = self
            .papers
            .iter()
            .filter(|p| p.status == PaperStatus::Completed)
            .count();
        let categories: HashSet<&str> = self.papers.iter().map(|p| p.category.as_str()).collect();
        LibraryStats {
            total: self.papers.len(),
            analyzed,
            categories: categories.len(),
        }
    }

    // --- Comparison selection ---

    pub fn selection(&self) -> &[u32] {
        &self.selection
    }

    pub fn is_selected(&self, id: u32) -> bool {
        self.selection.contains(&id)
    }

    /// Add a paper to the selection. Re-selecting a paper is a no-op.
    pub fn select(&mut self, id: u32) -> Result<(), SelectionError> {
        if self.paper(id).is_none() {
            return Err(SelectionError::UnknownPaper(id));
        }
        if self.is_selected(id) {
            return Ok(());
        }
        if self.selection.len() >= self.limits.max_selection {
            return Err(SelectionError::LimitReached {
                max: self.limits.max_selection,
            });
        }
        self.selection.push(id);
        Ok(())
    }

    pub fn deselect(&mut self, id: u32) {
        self.selection.retain(|&s| s != id);
    }

    /// Flip a paper's selection. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: u32) -> Result<bool, SelectionError> {
        if self.is_selected(id) {
            self.deselect(id);
            Ok(false)
        } else {
            self.select(id).map(|()| true)
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Replace the selection with `ids`, in order.
    ///
    /// Unknown ids, and ids past the cap, are skipped and returned. If fewer
    /// than the minimum remain, the current selection is left untouched.
    pub fn replace_selection(
        &mut self,
        ids: &[u32],
    ) -> Result<Vec<SelectionError>, SelectionError> {
        let max = self.limits.max_selection;
        let mut picks: Vec<u32> = Vec::with_capacity(max);
        let mut skipped = Vec::new();
        for &id in ids {
            if self.paper(id).is_none() {
                skipped.push(SelectionError::UnknownPaper(id));
            } else if !picks.contains(&id) {
                if picks.len() >= max {
                    skipped.push(SelectionError::LimitReached { max });
                    break;
                }
                picks.push(id);
            }
        }
        if picks.len() < self.limits.min_selection {
            return Err(SelectionError::TooFew {
                min: self.limits.min_selection,
                max,
            });
        }
        self.selection = picks;
        Ok(skipped)
    }

    /// Whether enough papers are selected to run a comparison.
    pub fn can_compare(&self) -> bool {
        self.selection.len() >= self.limits.min_selection
    }

    /// Selected papers in selection order.
    pub fn selected_papers(&self) -> Vec<PaperRecord> {
        self.selection
            .iter()
            .filter_map(|&id| self.paper(id).cloned())
            .collect()
    }

    // --- Comparison result ---

    pub fn comparison(&self) -> Option<&ComparisonRecord> {
        self.comparison.as_ref()
    }

    /// Compare the selected papers and store the result, replacing any
    /// previous one. With too few papers selected nothing changes and
    /// `None` is returned.
    pub fn compare(&mut self, comparator: &dyn Comparator) -> Option<&ComparisonRecord> {
        if !self.can_compare() {
            log::debug!(
                "compare skipped: {} selected, need {}",
                self.selection.len(),
                self.limits.min_selection
            );
            return None;
        }
        let papers = self.selected_papers();
        log::info!("comparing {} papers", papers.len());
        self.comparison = Some(comparator.compare(&papers));
        self.comparison.as_ref()
    }

    /// Discard the stored comparison result.
    pub fn reset_comparison(&mut self) {
        self.comparison = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PlaceholderAnalyzer, PlaceholderComparator};

    fn session_with(n: usize) -> Session {
        let mut s = Session::new();
        let analyzer = PlaceholderAnalyzer::default();
        for i in 0..n {
            s.add_paper(&analyzer, &format!("Paper {}", i + 1), "text");
        }
        s
    }

    #[test]
    fn ids_are_count_plus_one() {
        let s = session_with(3);
        let ids: Vec<u32> = s.papers().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(s.next_id(), 4);
    }

    #[test]
    fn selection_is_capped() {
        let mut s = session_with(6);
        for id in 1..=5 {
            s.select(id).unwrap();
        }
        assert_eq!(s.select(6), Err(SelectionError::LimitReached { max: 5 }));
        assert_eq!(s.selection(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn reselecting_is_noop() {
        let mut s = session_with(2);
        s.select(2).unwrap();
        s.select(2).unwrap();
        assert_eq!(s.selection(), &[2]);
    }

    #[test]
    fn unknown_paper_rejected() {
        let mut s = session_with(1);
        assert_eq!(s.select(9), Err(SelectionError::UnknownPaper(9)));
    }

    #[test]
    fn toggle_flips() {
        let mut s = session_with(2);
        assert_eq!(s.toggle(1), Ok(true));
        assert_eq!(s.toggle(1), Ok(false));
        assert!(s.selection().is_empty());
    }

    #[test]
    fn compare_with_one_selection_keeps_previous_result() {
        let mut s = session_with(3);
        s.select(1).unwrap();
        s.select(2).unwrap();
        s.compare(&PlaceholderComparator).unwrap();
        let before = s.comparison().cloned();

        s.clear_selection();
        s.select(3).unwrap();
        assert!(s.compare(&PlaceholderComparator).is_none());
        assert_eq!(s.comparison().cloned(), before);
    }

    #[test]
    fn replace_selection_keeps_old_picks_when_too_few() {
        let mut s = session_with(3);
        s.replace_selection(&[2, 1]).unwrap();
        assert_eq!(
            s.replace_selection(&[3]),
            Err(SelectionError::TooFew { min: 2, max: 5 })
        );
        assert_eq!(s.selection(), &[2, 1]);

        // An unknown id does not count towards the minimum.
        assert!(s.replace_selection(&[3, 42]).is_err());
        assert_eq!(s.selection(), &[2, 1]);
    }

    #[test]
    fn replace_selection_reports_skipped_ids() {
        let mut s = session_with(6);
        let skipped = s.replace_selection(&[6, 9, 5, 6, 4, 3, 2, 1]).unwrap();
        assert_eq!(s.selection(), &[6, 5, 4, 3, 2]);
        assert_eq!(
            skipped,
            vec![
                SelectionError::UnknownPaper(9),
                SelectionError::LimitReached { max: 5 }
            ]
        );
    }

    #[test]
    fn stats_count_distinct_categories() {
        let mut s = session_with(2);
        s.papers[1].category = "Biology".into();
        s.papers[0].status = PaperStatus::Processing;
        assert_eq!(
            s.stats(),
            LibraryStats {
                total: 2,
                analyzed: 1,
                categories: 2
            }
        );
    }

    #[test]
    fn clear_resets_everything() {
        let mut s = session_with(2);
        s.select(1).unwrap();
        s.select(2).unwrap();
        s.compare(&PlaceholderComparator);
        s.clear();
        assert!(s.is_empty());
        assert!(s.selection().is_empty());
        assert!(s.comparison().is_none());
        assert_eq!(s.next_id(), 1);
    }
}
