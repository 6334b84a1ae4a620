use crate::{Flashcard, Label, DEFAULT_SCORE_THRESHOLD};

pub fn language_name(code: &str) -> Option<&'static str> {
    match code {
        "es" => Some("Spanish"),
        "fr" => Some("French"),
        "de" => Some("German"),
        "it" => Some("Italian"),
        "pt" => Some("Portuguese"),
        "ja" => Some("Japanese"),
        "zh" => Some("Chinese"),
        _ => None,
    }
}

/// Display title for a target code; unknown codes fall back to the raw
/// code upper-cased.
pub fn section_title(code: &str) -> String {
    language_name(code)
        .map(str::to_string)
        .unwrap_or_else(|| code.to_uppercase())
}

/// Groups cards into browsing sections by target language. Cards within a
/// section are newest-first; sections keep first-seen order unless
/// `sort_sections` asks for lexical order.
pub fn group_by_target(cards: &[Flashcard], sort_sections: bool) -> Vec<(String, Vec<Flashcard>)> {
    let mut sorted: Vec<Flashcard> = cards.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut sections: Vec<(String, Vec<Flashcard>)> = Vec::new();
    for card in sorted {
        let title = section_title(&card.target);
        match sections.iter_mut().find(|(t, _)| *t == title) {
            Some((_, cards)) => cards.push(card),
            None => sections.push((title, vec![card])),
        }
    }
    if sort_sections {
        sections.sort_by(|a, b| a.0.cmp(&b.0));
    }
    sections
}

/// Fixed-size row grouping for grid layouts. The last row may be shorter
/// than `size`; it is never padded here.
pub fn chunk<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    if size == 0 {
        return Vec::new();
    }
    items.chunks(size).map(|row| row.to_vec()).collect()
}

/// Keeps only candidates strictly above the confidence threshold.
pub fn confident_labels(labels: &[Label]) -> Vec<Label> {
    labels
        .iter()
        .filter(|l| l.score > DEFAULT_SCORE_THRESHOLD)
        .cloned()
        .collect()
}
