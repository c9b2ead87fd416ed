use super::*;

fn select(options: &[&str]) -> Question {
    Question::new(
        "Which state?",
        QuestionKind::Select,
        options.iter().map(|o| o.to_string()).collect(),
    )
    .expect("select question")
}

#[test]
fn parses_known_question_kinds_and_rejects_others() {
    assert_eq!("Text".parse::<QuestionKind>().expect("text"), QuestionKind::Text);
    assert_eq!(" Select ".parse::<QuestionKind>().expect("select"), QuestionKind::Select);
    assert_eq!("Date".parse::<QuestionKind>().expect("date"), QuestionKind::Date);
    assert_eq!("Number".parse::<QuestionKind>().expect("number"), QuestionKind::Number);

    let err = "Checkbox".parse::<QuestionKind>().expect_err("unknown kind");
    assert_eq!(err, ProtocolError::UnrecognizedQuestionKind("Checkbox".to_string()));
}

#[test]
fn select_question_requires_options() {
    let err = Question::new("Pick one", QuestionKind::Select, Vec::new()).expect_err("no options");
    assert_eq!(err, ProtocolError::SelectWithoutOptions("Pick one".to_string()));
}

#[test]
fn non_select_questions_drop_options() {
    let question = Question::new("Budget?", QuestionKind::Number, vec!["1".to_string()])
        .expect("number question");
    assert!(question.options().is_empty());
    assert_eq!(question.answer(), "");
    assert!(!question.is_answered());
}

#[test]
fn select_answer_must_be_one_of_the_options() {
    let mut question = select(&["Johor", "Sarawak"]);
    question.set_answer(" Sarawak ").expect("valid option");
    assert_eq!(question.answer(), "Sarawak");

    let err = question.set_answer("Sabah").expect_err("not an option");
    assert!(matches!(err, AnswerError::NotAnOption { ref value, .. } if value == "Sabah"));
    assert_eq!(question.answer(), "Sarawak", "rejected answer must not overwrite");
}

#[test]
fn blank_answers_are_stored_as_empty_for_every_kind() {
    for kind in [QuestionKind::Text, QuestionKind::Date, QuestionKind::Number] {
        let mut question = Question::new("q", kind, Vec::new()).expect("question");
        question.set_answer("   ").expect("blank accepted");
        assert_eq!(question.answer(), "");
    }
    let mut question = select(&["Yes", "No"]);
    question.set_answer("").expect("blank select accepted");
    assert_eq!(question.answer(), "");
}

#[test]
fn date_answers_are_canonicalized() {
    let mut question = Question::new("Closing date?", QuestionKind::Date, Vec::new()).expect("date");
    question.set_answer("2025-9-1").expect("lenient day/month");
    assert_eq!(question.answer(), "2025-09-01");

    assert_eq!(
        question.set_answer("01/09/2025").expect_err("wrong format"),
        AnswerError::InvalidDate("01/09/2025".to_string())
    );
}

#[test]
fn number_answers_must_be_finite() {
    let mut question = Question::new("Months?", QuestionKind::Number, Vec::new()).expect("number");
    question.set_answer(" 36 ").expect("integer");
    assert_eq!(question.answer(), "36");
    question.set_answer("1250000.50").expect("decimal");

    assert!(question.set_answer("NaN").is_err());
    assert!(question.set_answer("thirty").is_err());
}

#[test]
fn padded_select_options_can_be_chosen() {
    let mut question = Question::new(
        "State?",
        QuestionKind::Select,
        vec![" Johor".to_string(), "Kedah ".to_string()],
    )
    .expect("select");
    assert_eq!(question.options(), ["Johor", "Kedah"]);

    question.set_answer(" Johor").expect("exact padded option");
    assert_eq!(question.answer(), "Johor");
    question.set_answer("Kedah").expect("trimmed option");
    assert_eq!(question.answer(), "Kedah");

    let blank_only = Question::new("State?", QuestionKind::Select, vec!["  ".to_string()]);
    assert!(blank_only.is_err());
}

#[test]
fn text_answers_are_kept_verbatim() {
    let question = Question::free_text("Describe the scope").with_answer("  two sites ").expect("text");
    assert_eq!(question.answer(), "  two sites ");
    assert!(question.is_answered());
}

#[test]
fn catalog_label_falls_back_to_id() {
    assert_eq!(CatalogEntry::new("PRJ-1", None).label, "PRJ-1");
    assert_eq!(CatalogEntry::new("PRJ-1", Some(" ".to_string())).label, "PRJ-1");
    assert_eq!(
        CatalogEntry::new("PRJ-1", Some("Hospital Miri".to_string())).label,
        "Hospital Miri"
    );
}

#[test]
fn document_result_reports_degraded_outcomes() {
    let full = DocumentResult {
        specification_id: SpecificationId::new("SPEC-0001"),
        record_url: "http://host/app/project-specification/SPEC-0001".to_string(),
        artifacts: vec![
            Artifact {
                format: ArtifactFormat::Markdown,
                url: "http://host/files/spec.md".to_string(),
            },
            Artifact {
                format: ArtifactFormat::Pdf,
                url: "http://host/files/spec.pdf".to_string(),
            },
        ],
        rendered_copy_available: true,
    };
    assert!(!full.is_degraded());

    let mut markdown_only = full.clone();
    markdown_only.artifacts.truncate(1);
    markdown_only.rendered_copy_available = false;
    assert_eq!(markdown_only.warnings().len(), 1);

    let mut nothing = markdown_only.clone();
    nothing.artifacts.clear();
    assert_eq!(nothing.warnings().len(), 2);
}
