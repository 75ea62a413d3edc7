/// True iff `selected` has the same length as `correct` and matches it
/// position by position. An unfilled slot never matches.
pub fn check_answers(selected: &[Option<String>], correct: &[String]) -> bool {
    selected.len() == correct.len()
        && selected
            .iter()
            .zip(correct)
            .all(|(s, c)| s.as_deref() == Some(c.as_str()))
}

/// Per-blank comparison against `correct`, one entry per correct word.
/// Used for the review display and blank accuracy, never for scoring.
pub fn blank_matches(selected: &[Option<String>], correct: &[String]) -> Vec<bool> {
    correct
        .iter()
        .enumerate()
        .map(|(i, c)| selected.get(i).and_then(|s| s.as_deref()) == Some(c.as_str()))
        .collect()
}
