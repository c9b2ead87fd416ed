//! Interactive stdin loop driving one wizard run.

use std::{future::Future, io::Write as _, time::Duration};

use anyhow::Result;
use tokio::io::{stdin, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;
use wizard_core::{Stage, UiError, Wizard, WizardView};

use crate::terminal::{
    parse_answer, parse_confirm, render_answer, render_generate, render_select, resolve_choice,
    AnswerInput, Confirm,
};

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Selections supplied on the command line; used for the first attempt only.
#[derive(Debug, Default)]
pub struct Preset {
    pub project: Option<String>,
    pub template: Option<String>,
}

enum Flow {
    Continue,
    Quit,
}

pub async fn run(mut wizard: Wizard, mut preset: Preset) -> Result<()> {
    let mut input = BufReader::new(stdin()).lines();

    if let Err(err) = waiting("Loading projects and templates", wizard.load_catalogs()).await {
        report(&err);
    }

    loop {
        let flow = match wizard.controller().stage() {
            Stage::Selecting => select(&mut wizard, &mut input, &mut preset).await?,
            Stage::Answering => answer(&mut wizard, &mut input).await?,
            Stage::Generating => generate(&mut wizard, &mut input).await?,
        };
        if matches!(flow, Flow::Quit) {
            return Ok(());
        }
        if wizard.controller().document().is_some() {
            if let WizardView::Generate(view) = wizard.view() {
                print!("{}", render_generate(&view));
            }
            return Ok(());
        }
    }
}

async fn select(
    wizard: &mut Wizard,
    input: &mut Lines<BufReader<Stdin>>,
    preset: &mut Preset,
) -> Result<Flow> {
    let (projects, templates, loaded) = match wizard.view() {
        WizardView::Select(view) => {
            print!("{}", render_select(&view));
            (
                view.projects.to_vec(),
                view.templates.to_vec(),
                view.catalogs_loaded,
            )
        }
        _ => return Ok(Flow::Continue),
    };

    if !loaded {
        let Some(line) = prompt(input, "> ").await? else {
            return Ok(Flow::Quit);
        };
        if parse_confirm(&line) == Confirm::Yes {
            if let Err(err) =
                waiting("Loading projects and templates", wizard.load_catalogs()).await
            {
                report(&err);
            }
            return Ok(Flow::Continue);
        }
    }

    let project = match preset.project.take() {
        Some(project) => Some(project),
        None => match prompt(input, "Project (number or id): ").await? {
            Some(line) => resolve_choice(&line, &projects),
            None => return Ok(Flow::Quit),
        },
    };
    let template = match preset.template.take() {
        Some(template) => Some(template),
        None => match prompt(input, "Template (number or id): ").await? {
            Some(line) => resolve_choice(&line, &templates),
            None => return Ok(Flow::Quit),
        },
    };

    wizard.select_project(project.unwrap_or_default())?;
    wizard.select_template(template.unwrap_or_default())?;
    if let Err(err) = waiting("Preparing questions", wizard.start()).await {
        report(&err);
    }
    Ok(Flow::Continue)
}

async fn answer(wizard: &mut Wizard, input: &mut Lines<BufReader<Stdin>>) -> Result<Flow> {
    let question = match wizard.view() {
        WizardView::Answer(view) => {
            print!("{}", render_answer(&view));
            view.question.clone()
        }
        _ => return Ok(Flow::Continue),
    };

    let Some(line) = prompt(input, "> ").await? else {
        return Ok(Flow::Quit);
    };

    let outcome = match parse_answer(&line, &question) {
        AnswerInput::Quit => return Ok(Flow::Quit),
        AnswerInput::Back => wizard.go_prev(),
        AnswerInput::Keep => advance(wizard).await,
        AnswerInput::Answer(raw) => match wizard.edit_answer(raw) {
            Ok(()) => advance(wizard).await,
            Err(err) => Err(err),
        },
    };
    if let Err(err) = outcome {
        report(&err);
    }
    Ok(Flow::Continue)
}

async fn advance(wizard: &mut Wizard) -> Result<(), UiError> {
    if wizard.controller().is_last_question() {
        waiting("Saving answers", wizard.go_next()).await
    } else {
        wizard.go_next().await
    }
}

async fn generate(wizard: &mut Wizard, input: &mut Lines<BufReader<Stdin>>) -> Result<Flow> {
    if let WizardView::Generate(view) = wizard.view() {
        print!("{}", render_generate(&view));
    }

    let Some(line) = prompt(input, "> ").await? else {
        return Ok(Flow::Quit);
    };
    if parse_confirm(&line) == Confirm::No {
        return Ok(Flow::Quit);
    }

    let outcome = waiting("Generating specification", async {
        wizard.generate().await.map(|_| ())
    })
    .await;
    if let Err(err) = outcome {
        report(&err);
    }
    Ok(Flow::Continue)
}

async fn prompt(input: &mut Lines<BufReader<Stdin>>, label: &str) -> Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush()?;
    Ok(input.next_line().await?)
}

/// Runs `work` while printing a spinner to stderr.
async fn waiting<F: Future>(label: &str, work: F) -> F::Output {
    tokio::pin!(work);
    let mut ticks = tokio::time::interval(Duration::from_millis(120));
    let mut frame = 0usize;

    let output = loop {
        tokio::select! {
            output = &mut work => break output,
            _ = ticks.tick() => {
                eprint!("\r{label} {}", SPINNER[frame % SPINNER.len()]);
                let _ = std::io::stderr().flush();
                frame += 1;
            }
        }
    };
    eprint!("\r{}\r", " ".repeat(label.len() + 2));
    let _ = std::io::stderr().flush();
    debug!(label, ticks = frame, "wait finished");
    output
}

fn report(err: &UiError) {
    eprintln!("error: {err}");
}
