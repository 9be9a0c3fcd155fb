use std::collections::HashMap;

/// Counts word frequencies in `input`, ignoring punctuation and case.
///
/// Characters other than ASCII letters, apostrophes, and whitespace are
/// stripped before splitting on whitespace. The result is sorted by count
/// descending, ties broken alphabetically.
pub fn word_frequencies(input: &str) -> Vec<(String, usize)> {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == '\'' || c.is_whitespace())
        .collect();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for word in cleaned.to_lowercase().split_whitespace() {
        *counts.entry(word.to_string()).or_insert(0) += 1;
    }

    let mut sorted: Vec<(String, usize)> = counts.into_iter().collect();
    sorted.sort_by(|(word_a, count_a), (word_b, count_b)| {
        count_b.cmp(count_a).then_with(|| word_a.cmp(word_b))
    });
    sorted
}

#[cfg(test)]
mod tests {
    use super::word_frequencies;

    #[test]
    fn counts_ignore_case_and_punctuation() {
        let freq = word_frequencies("Hello, hello! world.");
        assert_eq!(freq, vec![("hello".into(), 2), ("world".into(), 1)]);
    }

    #[test]
    fn sorts_by_count_then_alphabetically() {
        let freq = word_frequencies("the cat and the dog");
        assert_eq!(
            freq,
            vec![
                ("the".into(), 2),
                ("and".into(), 1),
                ("cat".into(), 1),
                ("dog".into(), 1),
            ]
        );
    }

    #[test]
    fn apostrophes_stay_inside_words() {
        let freq = word_frequencies("don't stop, don't");
        assert_eq!(freq[0], ("don't".into(), 2));
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(word_frequencies("  ,;! ").is_empty());
    }
}
