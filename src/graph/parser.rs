use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Course-code shape: three letters, three digits, H/Y term, campus digit.
    pub static ref COURSE_CODE: Regex = Regex::new(r"[A-Z]{3}[0-9]{3}[HY][135]").unwrap();
    static ref AND_SPLIT: Regex = Regex::new(r"(?i)\band\b").unwrap();
}

/// One AND-clause of a requirement string. `AnyOf` holds interchangeable
/// alternatives found inside a single clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrereqClause {
    Required(String),
    AnyOf(Vec<String>),
}

/// Best-effort extraction of the fixed requirement grammar: AND-separated
/// clauses, each holding one or more adjacent course codes (OR-alternatives).
/// Clauses with no recognizable code are dropped silently; malformed text
/// degrades to "no known prerequisite" rather than an error.
pub fn parse_prerequisites(prereq_str: &str) -> Vec<PrereqClause> {
    if prereq_str.trim().eq_ignore_ascii_case("none") {
        return Vec::new();
    }

    let mut clauses = Vec::new();
    for part in AND_SPLIT.split(prereq_str) {
        let codes: Vec<String> = COURSE_CODE
            .find_iter(part)
            .map(|m| m.as_str().to_string())
            .collect();
        match codes.len() {
            0 => {}
            1 => clauses.push(PrereqClause::Required(codes.into_iter().next().unwrap())),
            _ => clauses.push(PrereqClause::AnyOf(codes)),
        }
    }
    clauses
}

/// Flattens clauses into directed (prerequisite, dependent) pairs. OR
/// alternatives become one edge each; the AND/OR distinction survives only
/// in the clause list above.
pub fn prerequisite_edges(prereq_str: &str, course_title: &str) -> Vec<(String, String)> {
    let mut edges = Vec::new();
    for clause in parse_prerequisites(prereq_str) {
        match clause {
            PrereqClause::Required(code) => edges.push((code, course_title.to_string())),
            PrereqClause::AnyOf(codes) => {
                for code in codes {
                    edges.push((code, course_title.to_string()));
                }
            }
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_yields_no_clauses() {
        assert!(parse_prerequisites("None").is_empty());
        assert!(parse_prerequisites("none").is_empty());
        assert!(parse_prerequisites("  NONE  ").is_empty());
    }

    #[test]
    fn test_single_code_is_required() {
        assert_eq!(
            parse_prerequisites("CSC108H5"),
            vec![PrereqClause::Required("CSC108H5".to_string())]
        );
    }

    #[test]
    fn test_and_clauses_split() {
        let clauses = parse_prerequisites("CSC108H5 and MAT102H5");
        assert_eq!(
            clauses,
            vec![
                PrereqClause::Required("CSC108H5".to_string()),
                PrereqClause::Required("MAT102H5".to_string()),
            ]
        );
    }

    #[test]
    fn test_adjacent_codes_become_alternatives() {
        let clauses = parse_prerequisites("CSC148H5/CSC150H1 and MAT135H5");
        assert_eq!(
            clauses,
            vec![
                PrereqClause::AnyOf(vec!["CSC148H5".to_string(), "CSC150H1".to_string()]),
                PrereqClause::Required("MAT135H5".to_string()),
            ]
        );
    }

    #[test]
    fn test_unparseable_clause_dropped() {
        let clauses = parse_prerequisites("permission of instructor and CSC207H5");
        assert_eq!(
            clauses,
            vec![PrereqClause::Required("CSC207H5".to_string())]
        );
        assert!(parse_prerequisites("at least 4.0 credits").is_empty());
    }

    #[test]
    fn test_and_inside_word_not_split() {
        // "Standing" contains "and"; the word-boundary split must not fire.
        let clauses = parse_prerequisites("Standing in CSC108H5");
        assert_eq!(
            clauses,
            vec![PrereqClause::Required("CSC108H5".to_string())]
        );
    }

    #[test]
    fn test_edges_target_course() {
        let edges = prerequisite_edges("CSC108H5 and CSC148H5", "CSC207H5");
        assert_eq!(
            edges,
            vec![
                ("CSC108H5".to_string(), "CSC207H5".to_string()),
                ("CSC148H5".to_string(), "CSC207H5".to_string()),
            ]
        );
    }

    #[test]
    fn test_or_alternatives_share_target() {
        let edges = prerequisite_edges("MAT135H5 MAT137Y5", "MAT232H5");
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|(_, target)| target == "MAT232H5"));
    }
}
