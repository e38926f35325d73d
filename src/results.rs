//! Result filtering.
//!
//! Pure and synchronous: the view recomputes the visible rows from the full
//! result list on every render. Three predicates compose by AND, in fixed
//! order: fit label, filename substring, skill membership.

use crate::types::MatchResult;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultFilter {
    /// `None` shows every label.
    pub fit: Option<String>,
    /// Case-insensitive filename substring; empty is a no-op.
    pub query: String,
    /// `None` shows every skill.
    pub skill: Option<String>,
}

impl ResultFilter {
    pub fn is_neutral(&self) -> bool {
        self.fit.is_none() && self.query.is_empty() && self.skill.is_none()
    }

    pub fn matches(&self, result: &MatchResult) -> bool {
        if let Some(fit) = &self.fit {
            if result.fit_label.as_deref() != Some(fit.as_str()) {
                return false;
            }
        }
        if !self.query.is_empty() {
            let query = self.query.to_lowercase();
            if !result.filename.to_lowercase().contains(&query) {
                return false;
            }
        }
        if let Some(skill) = &self.skill {
            if !result.skills.iter().any(|s| s == skill) {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, results: &'a [MatchResult]) -> Vec<&'a MatchResult> {
        results.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Deduplicated union of every result's skills, in discovery order. Feeds
/// the skill-filter options; recomputed whenever the result set changes.
pub fn skill_options(results: &[MatchResult]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut skills = Vec::new();
    for result in results {
        for skill in &result.skills {
            if seen.insert(skill.clone()) {
                skills.push(skill.clone());
            }
        }
    }
    skills
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(filename: &str, fit: &str, skills: &[&str]) -> MatchResult {
        MatchResult {
            filename: filename.to_string(),
            similarity_score: Some(50.0),
            fit_label: Some(fit.to_string()),
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_fit_filter_exact_match() {
        let results = vec![
            result("a.pdf", "Fit", &[]),
            result("b.pdf", "Not Fit", &[]),
        ];
        let filter = ResultFilter {
            fit: Some("Fit".to_string()),
            ..Default::default()
        };
        let visible = filter.apply(&results);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].filename, "a.pdf");
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let results = vec![
            result("my_resume.pdf", "Fit", &[]),
            result("cover_letter.pdf", "Fit", &[]),
        ];
        let filter = ResultFilter {
            query: "RES".to_string(),
            ..Default::default()
        };
        let visible = filter.apply(&results);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].filename, "my_resume.pdf");
    }

    #[test]
    fn test_skill_membership() {
        let results = vec![
            result("a.pdf", "Fit", &["Python", "SQL"]),
            result("b.pdf", "Fit", &["Java"]),
        ];
        let filter = ResultFilter {
            skill: Some("SQL".to_string()),
            ..Default::default()
        };
        let visible = filter.apply(&results);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].filename, "a.pdf");
    }

    #[test]
    fn test_predicates_compose_by_and() {
        let results = vec![
            result("alice_resume.pdf", "Fit", &["Python"]),
            result("alice_resume_old.pdf", "Not Fit", &["Python"]),
            result("bob_resume.pdf", "Fit", &["Java"]),
        ];
        let filter = ResultFilter {
            fit: Some("Fit".to_string()),
            query: "alice".to_string(),
            skill: Some("Python".to_string()),
        };
        let visible = filter.apply(&results);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].filename, "alice_resume.pdf");
    }

    #[test]
    fn test_missing_label_never_matches_a_fit_filter() {
        let results = vec![MatchResult {
            filename: "broken.pdf".to_string(),
            similarity_score: None,
            fit_label: None,
            skills: Vec::new(),
        }];
        let filter = ResultFilter {
            fit: Some("Fit".to_string()),
            ..Default::default()
        };
        assert!(filter.apply(&results).is_empty());
    }

    #[test]
    fn test_skill_options_union_dedup_discovery_order() {
        let results = vec![
            result("a.pdf", "Fit", &["Python", "SQL"]),
            result("b.pdf", "Fit", &["SQL", "Docker"]),
            result("c.pdf", "Not Fit", &["Python"]),
        ];
        assert_eq!(skill_options(&results), vec!["Python", "SQL", "Docker"]);

        // Same union regardless of result order; only discovery order shifts.
        let mut reversed = results.clone();
        reversed.reverse();
        let mut a: Vec<String> = skill_options(&results);
        let mut b: Vec<String> = skill_options(&reversed);
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }
}
