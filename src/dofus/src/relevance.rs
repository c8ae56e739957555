//! Search result relevance scoring.
//!
//! The item search API matches fuzzily, so merged results are re-ranked
//! locally by how tightly each name matches the typed query.

const EXACT_BONUS: f64 = 1000.0;
const PREFIX_BONUS: f64 = 500.0;
const ALL_WORDS_BONUS: f64 = 100.0;
const IN_ORDER_WORD_BONUS: f64 = 50.0;
const LENGTH_PENALTY: f64 = 0.1;

/// Score `candidate` against `query`, higher is better.
///
/// Both strings are compared lower-cased:
/// - `+1000` for an exact match
/// - `+500` if the candidate starts with the query
/// - `+100` if every query word appears somewhere in the candidate
/// - `+50` per query word found after the previous matched word
/// - `-0.1` per candidate character, favoring tighter names
pub fn score(candidate: &str, query: &str) -> f64 {
    let name = candidate.to_lowercase();
    let query = query.to_lowercase();

    let mut score = 0.0;

    if name == query {
        score += EXACT_BONUS;
    }
    if name.starts_with(&query) {
        score += PREFIX_BONUS;
    }

    let words: Vec<&str> = query.split_whitespace().collect();
    if words.iter().all(|word| name.contains(word)) {
        score += ALL_WORDS_BONUS;
    }

    // A word that is missing is skipped without moving the cursor.
    let mut cursor = 0;
    for word in &words {
        if let Some(pos) = name[cursor..].find(word) {
            score += IN_ORDER_WORD_BONUS;
            cursor += pos + word.len();
        }
    }

    score - name.chars().count() as f64 * LENGTH_PENALTY
}

/// Stable sort by descending score; equal scores keep their input order
pub fn rank_by_relevance<T>(items: &mut [T], query: &str, name: impl Fn(&T) -> &str) {
    items.sort_by(|a, b| score(name(b), query).total_cmp(&score(name(a), query)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_exact_match_case_insensitive() {
        // exact + prefix + all words + one in-order word - length
        let expected = 1000.0 + 500.0 + 100.0 + 50.0 - 0.1 * 6.0;
        assert!(approx(score("Farine", "farine"), expected));
        assert!(score("Farine", "farine") >= 1000.0 - 0.1 * 6.0);
    }

    #[test]
    fn test_prefix_match() {
        let expected = 500.0 + 100.0 + 50.0 - 0.1 * 13.0;
        assert!(approx(score("Farine de blé", "far"), expected));
    }

    #[test]
    fn test_in_order_beats_out_of_order() {
        let in_order = score("Bois de Frêne", "bois frêne");
        let out_of_order = score("Frêne de Bois", "bois frêne");
        assert!(in_order > out_of_order);
    }

    #[test]
    fn test_missing_word_does_not_move_cursor() {
        // "zzz" is skipped, "blé" is still found after "farine"
        let s = score("Farine de blé", "farine zzz blé");
        let expected = 2.0 * 50.0 - 0.1 * 13.0;
        assert!(approx(s, expected));
    }

    #[test]
    fn test_shorter_name_wins_tie() {
        assert!(score("Blé", "blé") > score("Blé noir", "blé"));
    }

    #[test]
    fn test_empty_query_is_prefix_of_everything() {
        // no words: the all-words bonus applies vacuously
        let expected = 500.0 + 100.0 - 0.3;
        assert!(approx(score("Blé", ""), expected));
    }

    #[test]
    fn test_rank_is_stable_on_ties() {
        let mut names = vec!["Orge", "Seigle", "Houblon"];
        rank_by_relevance(&mut names, "zzz", |n| n);
        // nothing matches, only the length penalty separates them
        assert_eq!(names, vec!["Orge", "Seigle", "Houblon"]);

        let mut same = vec![("a", 1), ("a", 2), ("a", 3)];
        rank_by_relevance(&mut same, "a", |t| t.0);
        assert_eq!(same, vec![("a", 1), ("a", 2), ("a", 3)]);
    }
}
