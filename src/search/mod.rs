//! In-memory fuzzy person index.
//!
//! Built once from the fetched directory and queried on every keystroke. Matching is
//! case-insensitive and only looks at first and last names. Scores follow the Bitap convention
//! (0.0 is a perfect match at the start of a name, larger is worse) and combine edit distance
//! from `strsim` with a penalty for how far into the name the match starts.

use serde::Serialize;

use crate::elastic::Directory;
use crate::models::{Person, PersonKind, TaggedPerson};

/// Scores above this are not considered a match.
const MATCH_THRESHOLD: f64 = 0.6;

/// Number of characters into a name after which a match is penalized by a full point.
const LOCATION_DISTANCE: f64 = 100.0;

/// A search hit with its score (lower is better).
#[derive(Debug, Clone, Serialize)]
pub struct ScoredPerson {
    #[serde(flatten)]
    pub person: TaggedPerson,
    pub score: f64,
}

/// Lowercased name keys kept alongside each entry so queries don't re-fold them.
#[derive(Debug)]
struct NameKeys {
    first: Vec<char>,
    last: Vec<char>,
}

impl NameKeys {
    fn new(person: &Person) -> Self {
        Self {
            first: person.first_name.to_lowercase().chars().collect(),
            last: person.last_name.to_lowercase().chars().collect(),
        }
    }
}

/// Immutable fuzzy index over employees followed by customers.
#[derive(Debug, Default)]
pub struct PersonIndex {
    entries: Vec<TaggedPerson>,
    keys: Vec<NameKeys>,
}

/// Label both collections and concatenate them: all employees, then all customers.
pub fn tag_people(employees: Vec<Person>, customers: Vec<Person>) -> Vec<TaggedPerson> {
    employees
        .into_iter()
        .map(|p| TaggedPerson::new(PersonKind::Employee, p))
        .chain(
            customers
                .into_iter()
                .map(|p| TaggedPerson::new(PersonKind::Customer, p)),
        )
        .collect()
}

impl PersonIndex {
    /// Build the index from both collections, preserving fetch order.
    pub fn build(employees: Vec<Person>, customers: Vec<Person>) -> Self {
        let entries = tag_people(employees, customers);
        let keys = entries.iter().map(|e| NameKeys::new(&e.value)).collect();
        Self { entries, keys }
    }

    /// Build the index from a fetched directory.
    pub fn from_directory(directory: Directory) -> Self {
        Self::build(directory.employees, directory.customers)
    }

    /// All entries in index order.
    pub fn entries(&self) -> &[TaggedPerson] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Matching entries, best first.
    pub fn search(&self, query: &str) -> Vec<TaggedPerson> {
        self.search_scored(query)
            .into_iter()
            .map(|hit| hit.person)
            .collect()
    }

    /// Matching entries with their scores, best first. Ties keep index order.
    ///
    /// An empty (or whitespace-only) query matches nothing.
    pub fn search_scored(&self, query: &str) -> Vec<ScoredPerson> {
        let query: Vec<char> = query.trim().to_lowercase().chars().collect();
        if query.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<(usize, f64)> = self
            .keys
            .iter()
            .enumerate()
            .filter_map(|(i, keys)| {
                let score = name_score(&query, &keys.first).min(name_score(&query, &keys.last));
                (score <= MATCH_THRESHOLD).then_some((i, score))
            })
            .collect();

        // Stable sort keeps index order among equal scores.
        hits.sort_by(|a, b| a.1.total_cmp(&b.1));

        hits.into_iter()
            .map(|(i, score)| ScoredPerson {
                person: self.entries[i].clone(),
                score,
            })
            .collect()
    }
}

/// Best score of `query` against any window of `name`.
///
/// Windows one character shorter or longer than the query are tried too, so a single dropped
/// or inserted letter costs the same as a substitution.
fn name_score(query: &[char], name: &[char]) -> f64 {
    if name.is_empty() {
        return f64::INFINITY;
    }

    let pattern: String = query.iter().collect();
    let pattern_len = query.len() as f64;
    let min_len = query.len().saturating_sub(1).max(1);
    let max_len = query.len() + 1;

    let mut best = f64::INFINITY;
    for start in 0..name.len() {
        let location_penalty = start as f64 / LOCATION_DISTANCE;
        if location_penalty >= best {
            break;
        }
        for len in min_len..=max_len {
            let end = (start + len).min(name.len());
            let window: String = name[start..end].iter().collect();
            let errors = strsim::levenshtein(&pattern, &window) as f64;
            let score = errors / pattern_len + location_penalty;
            if score < best {
                best = score;
            }
            if end == name.len() {
                break;
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(first: &str, last: &str) -> Person {
        Person::new(first, last, format!("{}@example.com", first.to_lowercase()))
    }

    fn sample_index() -> PersonIndex {
        PersonIndex::build(
            vec![
                person("Ann", "Lee"),
                person("Marcus", "Bell"),
                person("Priya", "Anand"),
            ],
            vec![person("Annette", "Moore"), person("Dmitri", "Volkov")],
        )
    }

    #[test]
    fn test_tag_people_keeps_order() {
        let tagged = tag_people(
            vec![person("A", "One"), person("B", "Two")],
            vec![person("C", "Three")],
        );
        let kinds: Vec<PersonKind> = tagged.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![PersonKind::Employee, PersonKind::Employee, PersonKind::Customer]
        );
        assert_eq!(tagged[0].value.first_name, "A");
        assert_eq!(tagged[2].value.first_name, "C");
    }

    #[test]
    fn test_build_thirty_entries() {
        let employees: Vec<Person> = (0..15).map(|i| person(&format!("Emp{}", i), "E")).collect();
        let customers: Vec<Person> = (0..15).map(|i| person(&format!("Cus{}", i), "C")).collect();

        let index = PersonIndex::build(employees, customers);

        assert_eq!(index.len(), 30);
        for (i, entry) in index.entries().iter().enumerate() {
            if i < 15 {
                assert_eq!(entry.kind, PersonKind::Employee);
                assert_eq!(entry.value.first_name, format!("Emp{}", i));
            } else {
                assert_eq!(entry.kind, PersonKind::Customer);
                assert_eq!(entry.value.first_name, format!("Cus{}", i - 15));
            }
        }
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let index = sample_index();
        assert!(index.search("").is_empty());
        assert!(index.search("   ").is_empty());
    }

    #[test]
    fn test_exact_first_name_ranks_first() {
        let index = sample_index();
        let results = index.search("Ann");
        assert!(!results.is_empty());
        assert_eq!(results[0].value, person("Ann", "Lee"));
        assert!(results.iter().any(|r| r.value.first_name == "Annette"));
    }

    #[test]
    fn test_case_insensitive() {
        let index = sample_index();
        assert_eq!(index.search("mARCus"), index.search("marcus"));
        assert_eq!(index.search("MARCUS")[0].value.last_name, "Bell");
    }

    #[test]
    fn test_matches_last_name() {
        let index = sample_index();
        let results = index.search("volk");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].value.first_name, "Dmitri");
        assert_eq!(results[0].kind, PersonKind::Customer);
    }

    #[test]
    fn test_tolerates_typo() {
        let index = sample_index();
        let results = index.search("Marcsu");
        assert_eq!(results[0].value.first_name, "Marcus");
    }

    #[test]
    fn test_does_not_match_email() {
        let index = PersonIndex::build(vec![Person::new("Ann", "Lee", "zebra@x.com")], vec![]);
        assert!(index.search("zebra").is_empty());
    }

    #[test]
    fn test_no_match_is_empty() {
        let index = sample_index();
        assert!(index.search("zzz").is_empty());
    }

    #[test]
    fn test_scores_sorted_and_within_threshold() {
        let index = sample_index();
        for query in ["a", "an", "ann", "mo", "bel", "priya", "x"] {
            let results = index.search_scored(query);
            for pair in results.windows(2) {
                assert!(pair[0].score <= pair[1].score);
            }
            assert!(results.iter().all(|r| r.score <= MATCH_THRESHOLD));
        }
    }

    #[test]
    fn test_search_is_idempotent() {
        let index = sample_index();
        assert_eq!(index.search("an"), index.search("an"));
    }

    #[test]
    fn test_ties_keep_index_order() {
        let index = PersonIndex::build(
            vec![person("Sam", "Ortiz")],
            vec![person("Sam", "Ng")],
        );
        let results = index.search("sam");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].kind, PersonKind::Employee);
        assert_eq!(results[1].kind, PersonKind::Customer);
    }

    #[test]
    fn test_name_score_exact_prefix_is_zero() {
        let query: Vec<char> = "ann".chars().collect();
        let name: Vec<char> = "annette".chars().collect();
        assert_eq!(name_score(&query, &name), 0.0);
    }
}
