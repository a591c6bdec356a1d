use objmark::{
    MarkingConfig, ReferenceAnswerMap,
    constants::{ALL_CORRECT, NO_REFERENCE_ANSWERS, UNANSWERED},
    objective::{FeedbackStyle, Mismatch, ScoreResult, feedback, objective_mark, parse, score},
    util::count_words,
};

fn key(entries: &[(u32, &str)]) -> ReferenceAnswerMap {
    entries.iter().copied().collect()
}

fn mismatch(question: u32, expected: &str, written: &str) -> Mismatch {
    Mismatch::builder()
        .question_number(question)
        .expected_display(expected)
        .student_display(written)
        .build()
}

#[test]
fn all_correct_submission() {
    let result = score(&key(&[(1, "A")]), &parse("1) a"));
    assert_eq!((result.score, result.correct, result.total), (100, 1, 1));
    assert!(result.mismatches.is_empty());

    let outcome = objective_mark("1) a", &key(&[(1, "A")]), &MarkingConfig::default());
    assert_eq!(outcome.feedback, ALL_CORRECT);
}

#[test]
fn mixed_submission_counts_each_question() {
    let reference = key(&[(1, "B"), (2, "Uhr"), (3, "Ja")]);
    let result = score(&reference, &parse("1 A, 2. Uhr, 3 nein"));

    assert_eq!((result.correct, result.total, result.score), (1, 3, 33));
    assert_eq!(
        result.mismatches,
        vec![mismatch(1, "B", "A"), mismatch(3, "Ja", "nein")]
    );
}

#[test]
fn synonyms_count_as_matches() {
    let reference = key(&[(1, "B"), (2, "Uhr"), (3, "Nein")]);
    let result = score(&reference, &parse("1 A, 2. Uhr, 3 nein"));

    assert_eq!((result.correct, result.total, result.score), (2, 3, 67));
    assert_eq!(result.mismatches, vec![mismatch(1, "B", "A")]);
}

#[test]
fn umlaut_spellings_match() {
    let result = score(&key(&[(1, "schön"), (2, "Grüße")]), &parse("1) schoen\n2) gruesse"));
    assert_eq!(result.score, 100);
}

#[test]
fn empty_submission_leaves_everything_unanswered() {
    let result = score(&key(&[(1, "A"), (2, "B")]), &parse(""));

    assert_eq!((result.correct, result.total, result.score), (0, 2, 0));
    assert_eq!(
        result.mismatches,
        vec![mismatch(1, "A", UNANSWERED), mismatch(2, "B", UNANSWERED)]
    );
}

#[test]
fn empty_reference_is_not_an_error() {
    let result = score(&ReferenceAnswerMap::new(), &parse("1 A"));
    assert_eq!(result, ScoreResult::empty_reference());
    assert_eq!((result.score, result.correct, result.total), (0, 0, 1));

    let outcome = objective_mark("1 A", &ReferenceAnswerMap::new(), &MarkingConfig::default());
    assert_eq!(outcome.score, 0);
    assert_eq!(outcome.feedback, NO_REFERENCE_ANSWERS);
}

#[test]
fn mismatches_follow_question_order() {
    let reference = key(&[(10, "C"), (2, "A"), (7, "B")]);
    let result = score(&reference, &parse("10 D 7 A 2 B"));
    let order: Vec<u32> = result.mismatches.iter().map(|m| m.question_number).collect();
    assert_eq!(order, vec![2, 7, 10]);
}

#[test]
fn scoring_is_deterministic() {
    let reference = key(&[(1, "B"), (2, "Uhr"), (3, "Ja"), (4, "C")]);
    let submission = "Q4=c | 2) uhr; 1 (b) 3 nein";
    let first = score(&reference, &parse(submission));
    for _ in 0..5 {
        assert_eq!(score(&reference, &parse(submission)), first);
    }
}

#[test]
fn percentage_rounds_halves_up() {
    let reference: ReferenceAnswerMap = (1..=8).map(|q| (q, "A")).collect();
    let result = score(&reference, &parse("1 A"));
    assert_eq!(result.score, 13);
    assert_eq!(result.to_string(), "1/8 (13%)");
}

#[test]
fn brief_feedback_lists_mismatches() {
    let reference = key(&[(1, "B"), (2, "Uhr"), (3, "Ja")]);
    let result = score(&reference, &parse("1 A, 2. Uhr, 3 nein"));
    insta::assert_snapshot!(
        feedback(&result, FeedbackStyle::Brief, 6),
        @"Keep going. Check these: 1→B (you wrote A), 3→Ja (you wrote nein). Tip: match section numbering (Teil), read each stem carefully, and watch umlauts (ä/ö/ü)."
    );
}

#[test]
fn summary_feedback_is_a_short_paragraph() {
    let reference = key(&[(1, "B"), (2, "Uhr"), (3, "Ja")]);
    let result = score(&reference, &parse("1 A, 2. Uhr, 3 nein"));
    let text = feedback(&result, FeedbackStyle::Summary, 6);

    insta::assert_snapshot!(
        text,
        @"Good effort for A1 objectives—you answered 1 of 3 correctly. Check these items: 1→B (you wrote A), 3→Ja (you wrote nein). Slow down, read each stem fully, and match letters carefully. Use umlauts (ä/ö/ü) and verify meaning before choosing."
    );
    assert!((40..=60).contains(&count_words(&text)));
}

#[test]
fn configured_style_reaches_objective_mark() {
    let config = MarkingConfig::builder()
        .feedback_style(FeedbackStyle::Summary)
        .summary_limit(1)
        .build();
    let outcome = objective_mark("", &key(&[(1, "A"), (2, "B")]), &config);

    assert_eq!(outcome.score, 0);
    assert!(outcome.feedback.contains("1→A (you wrote —)"));
    assert!(!outcome.feedback.contains("2→B"));
}
