//! Plays a form on the terminal, one question per prompt.
//!
//! ```text
//! cargo run -p example-form -- ticket
//! cargo run -p example-form -- quiz
//! cargo run -p example-form -- path/to/form.json
//! ```
//!
//! Type an answer and press enter. Choices take their number or value,
//! comma separated for multi-select; composite and matrix questions take
//! `key=value` pairs. `back`, `reset` and `quit` do what they say.

use std::path::Path;

use anyhow::{Context, bail};
use flow_form::{FileInfo, Form, FormDefinition, FormEvent, Question, QuestionType, Ticker};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let choice = std::env::args().nth(1).unwrap_or_else(|| "ticket".to_string());
    let definition = load(&choice)?;
    let mut form = Form::new(definition).context("invalid form definition")?;
    info!(form = %choice, questions = form.questions().len(), "Starting form");

    let mut ticker = Ticker::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    prompt(&form);
    loop {
        ticker.follow(&form);

        tokio::select! {
            _ = ticker.tick() => {
                form.tick();
                form.drain_events();
                continue;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                match line.trim() {
                    "quit" => break,
                    "back" => form.go_to_previous_question(),
                    "reset" => form.reset(),
                    "" => form.go_to_next_question(),
                    input => answer(&mut form, input),
                }
            }
        }

        if report(&mut form)? {
            return Ok(());
        }
        prompt(&form);
    }

    debug!("Input closed before submit");
    Ok(())
}

fn load(choice: &str) -> anyhow::Result<FormDefinition> {
    Ok(match choice {
        "ticket" => example_forms::support_ticket(),
        "quiz" => example_forms::timed_quiz(),
        "survey" => example_forms::customer_survey()?,
        path if Path::new(path).exists() => FormDefinition::from_path(path)
            .with_context(|| format!("failed to load form from {path}"))?,
        other => bail!("unknown form '{other}', expected ticket, quiz, survey or a JSON file"),
    })
}

/// Feed one line of input into the active question and confirm it.
fn answer(form: &mut Form, input: &str) {
    let Some(question) = form.active_question() else {
        return;
    };
    let id = question.id().to_string();

    match question.kind() {
        QuestionType::MultipleText => {
            for (key, value) in pairs(input) {
                form.set_subanswer(&id, key, value);
            }
        }
        QuestionType::Matrix => {
            for (row, column) in pairs(input) {
                form.set_matrix_cell(&id, row, column);
            }
        }
        QuestionType::File => {
            let files = input.split(',').map(str::trim).map(file_info).collect();
            form.attach_files(&id, files);
        }
        kind if kind.has_options() => {
            let values: Vec<String> = input
                .split(',')
                .map(str::trim)
                .map(|item| option_value(question, item))
                .collect();
            for value in values {
                if !form.toggle_option(&id, &value) {
                    form.set_other(&id, value);
                }
            }
        }
        _ => {
            form.set_answer(&id, input);
        }
    }

    // No transition to wait for on a terminal.
    if form.is_disabled() {
        form.finish_auto_advance();
    } else if form.active_question_id() == Some(id.as_str()) {
        form.enter();
    }
}

/// Resolve a 1-based option number to the option value.
fn option_value(question: &Question, item: &str) -> String {
    item.parse::<usize>()
        .ok()
        .filter(|_| !question.kind().is_scale())
        .and_then(|n| n.checked_sub(1))
        .and_then(|n| question.options().get(n))
        .map_or_else(|| item.to_string(), |option| option.choice_value().to_string())
}

fn pairs(input: &str) -> impl Iterator<Item = (&str, &str)> {
    input
        .split(',')
        .filter_map(|pair| pair.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
}

fn file_info(path: &str) -> FileInfo {
    let size = std::fs::metadata(path).map(|meta| meta.len()).unwrap_or(0);
    let name = Path::new(path)
        .file_name()
        .map_or_else(|| path.to_string(), |name| name.to_string_lossy().into_owned());
    FileInfo::new(name, "", size)
}

fn prompt(form: &Form) {
    let language = form.language();

    let Some(question) = form.active_question() else {
        if form.is_completed() {
            println!("\n{} ({})", language.submit_text, language.press_enter);
        }
        return;
    };

    println!("\n[{}] {}", form.percent_label(), question.title());
    if let Some(description) = question.description() {
        println!("  {description}");
    }

    for (n, option) in question.options().iter().enumerate() {
        let mark = if option.selected { "x" } else { " " };
        println!("  [{mark}] {}. {}", n + 1, option.choice_label());
    }
    for sub in question.subquestions() {
        println!("  {}=", sub.id);
    }
    if !question.rows().is_empty() {
        let columns: Vec<_> = question.columns().iter().map(|c| c.value.as_str()).collect();
        for row in question.rows() {
            println!("  {}={}", row.id, columns.join("|"));
        }
    }

    if form.show_invalid(question.id())
        && let Some(message) = form.error_message(question.id())
    {
        println!("  ! {message}");
    }
    if form.is_timer_running() {
        println!("  ({})", form.formatted_time());
    }
}

/// Print the interesting events. Returns `true` once the form is submitted.
fn report(form: &mut Form) -> anyhow::Result<bool> {
    for event in form.drain_events() {
        debug!(event = event.name(), "Form event");
        if let FormEvent::Submit(_) = event {
            println!("\n{}", form.language().thank_you_text);
            let answers = serde_json::to_string_pretty(&form.answers().to_json())?;
            println!("{answers}");
            if form.config().timer {
                println!("Time: {}", form.formatted_time());
            }
            return Ok(true);
        }
    }
    Ok(false)
}
