//! Interactive question session.
//!
//! Each line is a question answered independently from the library. A few
//! words are commands instead: `namespace <name>`, `debug`, `exit`/`quit`.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::rag::{AnswerOutcome, RagEngine};
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};

/// A parsed line of chat input.
#[derive(Debug, PartialEq, Eq)]
enum ChatInput<'a> {
    Empty,
    Exit,
    Debug,
    Namespace(&'a str),
    Question(&'a str),
}

fn parse_input(line: &str) -> ChatInput<'_> {
    let line = line.trim();
    if line.is_empty() {
        return ChatInput::Empty;
    }
    if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
        return ChatInput::Exit;
    }
    if line.eq_ignore_ascii_case("debug") {
        return ChatInput::Debug;
    }
    if let Some((cmd, rest)) = line.split_once(char::is_whitespace) {
        if cmd.eq_ignore_ascii_case("namespace") && !rest.trim().is_empty() {
            return ChatInput::Namespace(rest.trim());
        }
    }
    ChatInput::Question(line)
}

/// Run the interactive chat command.
pub async fn run_chat(model: Option<String>, settings: Settings) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings.clone())?;
    orchestrator.prepare().await?;
    let mut engine = orchestrator.rag_engine(model.as_deref())?;

    println!("\n{}", style("Curator Chat").bold().cyan());
    println!(
        "{}\n",
        style("Ask a question, 'namespace <name>' to switch namespace, 'debug' for credentials, 'exit' to quit.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style(format!("[{}] You:", engine.namespace())).green().bold());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match parse_input(&line) {
            ChatInput::Empty => continue,
            ChatInput::Exit => {
                Output::info("Goodbye!");
                break;
            }
            ChatInput::Debug => print_debug(&settings, &engine),
            ChatInput::Namespace(ns) => {
                engine.set_namespace(ns);
                Output::info(&format!("Now searching namespace '{}'.", ns));
            }
            ChatInput::Question(question) => ask(&engine, question).await,
        }
    }

    Ok(())
}

async fn ask(engine: &RagEngine, question: &str) {
    let spinner = Output::spinner("Thinking...");
    let result = engine.answer(question).await;
    spinner.finish_and_clear();

    match result {
        Ok(response) => {
            if response.outcome == AnswerOutcome::Answered {
                println!("{}", style("Retrieved documents:").dim());
                for (i, source) in response.sources.iter().enumerate() {
                    println!(
                        "  {} {} ({}, {:.2})",
                        style(format!("[{}]", i + 1)).dim(),
                        source.title,
                        source.content_type,
                        source.score
                    );
                }
            }
            println!("\n{} {}\n", style("Curator:").cyan().bold(), response.answer);
        }
        Err(e) => {
            Output::error(&format!("Error: {}", e));
            Output::info(e.user_hint());
        }
    }
}

fn print_debug(settings: &Settings, engine: &RagEngine) {
    Output::header("Session");
    Output::kv("Provider", &settings.vector_index.provider);
    Output::kv("Namespace", engine.namespace());
    Output::kv("Model", engine.model());
    Output::kv("Top k", &engine.top_k().to_string());
    for (name, present) in preflight::credential_report(settings) {
        Output::kv(&name, if present { "set" } else { "missing" });
    }
    println!();
}
