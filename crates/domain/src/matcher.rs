//! Word matcher
//!
//! Compares a spoken-transcript fragment against a target word. The policy is
//! deliberately lenient: the goal is to encourage a child who is learning to
//! read, not to grade pronunciation. Containment is checked in both directions
//! because recognizers routinely over-capture ("the cat" for "cat") and
//! under-capture ("cat" for "the cat").

/// Normalize text for comparison: lowercase, strip sentence punctuation,
/// collapse internal whitespace runs, trim.
pub fn normalize(input: &str) -> String {
    let stripped: String = input
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '.' | ',' | '!' | '?'))
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether a spoken transcript counts as an attempt at the target word.
///
/// True when the normalized forms are equal or either contains the other.
/// An empty utterance never matches a non-empty target.
pub fn matches(spoken: &str, target: &str) -> bool {
    let spoken = normalize(spoken);
    let target = normalize(target);

    if spoken == target {
        return true;
    }
    if spoken.is_empty() || target.is_empty() {
        return false;
    }

    spoken.contains(&target) || target.contains(&spoken)
}

/// Collapse immediately repeated words in a transcript.
///
/// Recognizers with interim results often emit runs like "the the the" while
/// the child repeats a word. Deduplicating here keeps the repetition out of
/// the matcher without touching state transitions.
pub fn collapse_repeats(transcript: &str) -> String {
    let mut result: Vec<&str> = Vec::new();

    for word in transcript.split_whitespace() {
        if result
            .last()
            .is_none_or(|last| normalize(last) != normalize(word))
        {
            result.push(word);
        }
    }

    result.join(" ")
}
