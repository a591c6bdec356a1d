use objmark::{QuestionNumber, StudentAnswerMap, parse};

fn raw(map: &StudentAnswerMap) -> Vec<(QuestionNumber, String)> {
    map.iter().map(|(q, a)| (q, a.raw().to_string())).collect()
}

fn pairs(expected: &[(QuestionNumber, &str)]) -> Vec<(QuestionNumber, String)> {
    expected.iter().map(|(q, a)| (*q, a.to_string())).collect()
}

#[test]
fn first_occurrence_wins() {
    assert_eq!(raw(&parse("1 A 1 B")), pairs(&[(1, "A")]));
    assert_eq!(raw(&parse("1: C\n2: A\n1: D")), pairs(&[(1, "C"), (2, "A")]));
}

#[test]
fn order_in_text_does_not_matter() {
    assert_eq!(raw(&parse("Q2=B, 1) A")), pairs(&[(1, "A"), (2, "B")]));
}

#[test]
fn mixed_delimiters_in_one_line() {
    let parsed = parse("1 A, 2) Uhr, Q3=ja");
    assert_eq!(raw(&parsed), pairs(&[(1, "A"), (2, "Uhr"), (3, "ja")]));
    assert_eq!(parsed.canonical(3).as_str(), "true");
}

#[test]
fn pipes_semicolons_and_tabs_separate_tokens() {
    let parsed = parse("1 A|2 B;3\tC\t4 D");
    assert_eq!(raw(&parsed), pairs(&[(1, "A"), (2, "B"), (3, "C"), (4, "D")]));
}

#[test]
fn lowercase_q_prefix() {
    assert_eq!(raw(&parse("q1 = b\nq 2 - c")), pairs(&[(1, "b"), (2, "c")]));
}

#[test]
fn multi_word_answer_keeps_first_word() {
    // The anchor scan claims the question first, so only the first word is kept.
    assert_eq!(raw(&parse("1. zu Hause")), pairs(&[(1, "zu")]));
}

#[test]
fn unanswered_anchor_contributes_nothing() {
    let parsed = parse("1) \n2) B");
    assert_eq!(raw(&parsed), pairs(&[(2, "B")]));
    assert_eq!(raw(&parse("1)\n2) B")), pairs(&[(2, "B")]));
}

#[test]
fn empty_or_anchorless_text() {
    assert!(parse("").is_empty());
    assert!(parse("   \n\t").is_empty());
    assert!(parse("Ich weiß es nicht").is_empty());
    assert_eq!(parse("").raw(1), None);
}
