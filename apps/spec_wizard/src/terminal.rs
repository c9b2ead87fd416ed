//! Line-oriented input parsing and text rendering for the wizard views.

use std::fmt::Write as _;

use shared::domain::{CatalogEntry, Question, QuestionKind};
use wizard_core::{AnswerView, GenerateView, SelectView};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerInput {
    Back,
    /// Leave the stored answer as it is and move on.
    Keep,
    Quit,
    Answer(String),
}

/// A bare number picks the matching option of a `Select` question; an empty
/// line keeps whatever is already stored.
pub fn parse_answer(line: &str, question: &Question) -> AnswerInput {
    let trimmed = line.trim();
    match trimmed {
        ":back" | ":b" => return AnswerInput::Back,
        "" | ":keep" | ":k" => return AnswerInput::Keep,
        ":clear" => return AnswerInput::Answer(String::new()),
        ":quit" | ":q" => return AnswerInput::Quit,
        _ => {}
    }

    if question.kind() == QuestionKind::Select {
        if let Some(option) = trimmed
            .parse::<usize>()
            .ok()
            .and_then(|index| index.checked_sub(1))
            .and_then(|index| question.options().get(index))
        {
            return AnswerInput::Answer(option.clone());
        }
    }

    AnswerInput::Answer(line.trim_end_matches('\r').to_string())
}

/// Resolves a catalog pick typed as a list number or as an id.
pub fn resolve_choice(input: &str, entries: &[CatalogEntry]) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(entry) = trimmed
        .parse::<usize>()
        .ok()
        .and_then(|index| index.checked_sub(1))
        .and_then(|index| entries.get(index))
    {
        return Some(entry.id.clone());
    }
    Some(trimmed.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirm {
    Yes,
    No,
}

pub fn parse_confirm(line: &str) -> Confirm {
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "y" | "yes" => Confirm::Yes,
        _ => Confirm::No,
    }
}

pub fn render_catalog(title: &str, entries: &[CatalogEntry]) -> String {
    let mut out = format!("{title}:\n");
    for (index, entry) in entries.iter().enumerate() {
        if entry.label == entry.id {
            let _ = writeln!(out, "  {:>2}. {}", index + 1, entry.id);
        } else {
            let _ = writeln!(out, "  {:>2}. {} ({})", index + 1, entry.label, entry.id);
        }
    }
    out
}

pub fn render_select(view: &SelectView<'_>) -> String {
    let mut out = String::new();
    if !view.projects.is_empty() {
        out.push_str(&render_catalog("Projects", view.projects));
    }
    if !view.templates.is_empty() {
        out.push_str(&render_catalog("Templates", view.templates));
    }
    if !view.catalogs_loaded {
        out.push_str("! Projects and templates are not loaded. Reload now? [Y/n]\n");
    }
    for notice in &view.notices {
        let _ = writeln!(out, "! {notice}");
    }
    out
}

pub fn render_answer(view: &AnswerView<'_>) -> String {
    let question = view.question;
    let mut out = format!(
        "\n[{}/{}] {}% answered\n{}\n",
        view.position,
        view.total,
        view.progress.percent(),
        question.prompt()
    );

    match question.kind() {
        QuestionKind::Select => {
            for (index, option) in question.options().iter().enumerate() {
                let _ = writeln!(out, "  {}) {option}", index + 1);
            }
        }
        QuestionKind::Date => {
            out.push_str("  (date, YYYY-MM-DD)\n");
        }
        QuestionKind::Number => out.push_str("  (number)\n"),
        QuestionKind::Text => {}
    }

    if !view.draft.is_empty() {
        let _ = writeln!(out, "  current: {}", view.draft);
    }

    let mut hints = Vec::new();
    if view.can_go_prev {
        hints.push(":back");
    }
    hints.extend([":clear", ":quit"]);
    let _ = writeln!(
        out,
        "  {} ({})",
        if view.is_last { "last question, Enter saves" } else { "Enter continues" },
        hints.join(", ")
    );
    out
}

pub fn render_generate(view: &GenerateView<'_>) -> String {
    let mut out = String::new();
    let Some(document) = view.document else {
        let _ = writeln!(
            out,
            "\nAnswers saved ({}% answered). Generate the specification now? [Y/n]",
            view.progress.percent()
        );
        return out;
    };

    let _ = writeln!(out, "\nSpecification {} is ready.", document.specification_id);
    for link in &view.downloads {
        let _ = writeln!(out, "  {}: {}", link.label, link.url);
    }
    if let Some(record) = view.record_link {
        let _ = writeln!(out, "  Record: {record}");
    }
    for warning in &view.warnings {
        let _ = writeln!(out, "  warning: {warning}");
    }
    out
}

#[cfg(test)]
#[path = "tests/terminal_tests.rs"]
mod tests;
