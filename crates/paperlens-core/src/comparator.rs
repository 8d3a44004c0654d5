//! Cross-paper comparison.

use crate::analyzer::strings;
use crate::{
    Agreement, ComparisonAnalysis, ComparisonRecord, Contradiction, Contribution, PaperRecord,
    ResearchGap,
};

/// Produces a comparison across a group of papers.
///
/// Callers guarantee the group size (2 to 5 papers); implementations do no
/// validation of their own.
pub trait Comparator {
    fn compare(&self, papers: &[PaperRecord]) -> ComparisonRecord;
}

/// Templated comparison: agreements and contributions echo the input titles
/// and categories, everything else is fixed text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderComparator;

impl Comparator for PlaceholderComparator {
    fn compare(&self, papers: &[PaperRecord]) -> ComparisonRecord {
        let titles: Vec<String> = papers.iter().map(|p| p.title.clone()).collect();

        let analysis = ComparisonAnalysis {
            common_themes: strings(&[
                "Artificial Intelligence",
                "Machine Learning",
                "Data Analysis",
            ]),
            agreements: vec![Agreement {
                title: "ML Performance Benefits".to_string(),
                description: "All papers agree that machine learning improves performance."
                    .to_string(),
                papers: titles,
            }],
            contradictions: vec![Contradiction {
                title: "Optimal Model Size".to_string(),
                description: "Papers disagree on optimal model architecture.".to_string(),
                conflicting_views: strings(&[
                    "Paper A suggests larger models",
                    "Paper B advocates for smaller, efficient models",
                ]),
            }],
            research_gaps: vec![ResearchGap {
                gap: "Limited real-world deployment studies".to_string(),
                potential_impact: "Understanding practical implementation challenges".to_string(),
            }],
            unique_contributions: papers
                .iter()
                .map(|p| Contribution {
                    paper: p.title.clone(),
                    contribution: format!("Novel approach in {}", p.category),
                })
                .collect(),
        };

        ComparisonRecord {
            papers: papers.to_vec(),
            analysis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Analyzer, PlaceholderAnalyzer};

    fn paper(id: u32, title: &str, category: &str) -> PaperRecord {
        let mut rec = PlaceholderAnalyzer::default().analyze(id, title, "text");
        rec.category = category.to_string();
        rec
    }

    #[test]
    fn contributions_follow_input_order() {
        let papers = vec![paper(2, "Beta", "Biology"), paper(1, "Alpha", "Physics")];
        let cmp = PlaceholderComparator.compare(&papers);

        assert_eq!(cmp.papers, papers);
        let contribs: Vec<_> = cmp
            .analysis
            .unique_contributions
            .iter()
            .map(|c| (c.paper.as_str(), c.contribution.as_str()))
            .collect();
        assert_eq!(
            contribs,
            vec![
                ("Beta", "Novel approach in Biology"),
                ("Alpha", "Novel approach in Physics")
            ]
        );
        assert_eq!(cmp.analysis.agreements[0].papers, vec!["Beta", "Alpha"]);
    }

    #[test]
    fn static_sections_ignore_input() {
        let a = PlaceholderComparator.compare(&[paper(1, "A", "X"), paper(2, "B", "Y")]);
        let b = PlaceholderComparator.compare(&[paper(7, "Q", "Z"), paper(8, "R", "W")]);
        assert_eq!(a.analysis.contradictions, b.analysis.contradictions);
        assert_eq!(a.analysis.research_gaps, b.analysis.research_gaps);
        assert_eq!(a.analysis.common_themes, b.analysis.common_themes);
    }
}
