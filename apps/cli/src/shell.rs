//! Interactive shell: line commands mapped onto workbench transitions.

use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, bail, Result};
use client_core::{ClientError, SortWorkbench, WorkbenchEvent};
use shared::domain::SortAlgorithm;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    sync::broadcast::error::RecvError,
};

use crate::ui::{render_algorithms, render_settings, render_state, PROCESSING_MARKER};

pub const HELP: &str = "\
commands:
  file [path]        select the vector file to upload (no path clears it)
  load               upload the selected file and use its numbers
  count <n>          set how many random numbers to generate
  generate           generate a random vector
  algorithm <name>   select the sort algorithm
  vector <numbers>   edit the current numbers directly
  sort               sort the current numbers
  show               print the current state
  algorithms         list available algorithms
  help               print this help
  quit               leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    SelectFile(Option<PathBuf>),
    Load,
    Count(i64),
    Generate,
    Algorithm(SortAlgorithm),
    Vector(String),
    Sort,
    Show,
    Algorithms,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Option<ShellCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (keyword, rest) = line
        .split_once(char::is_whitespace)
        .map(|(keyword, rest)| (keyword, rest.trim()))
        .unwrap_or((line, ""));

    let command = match keyword.to_ascii_lowercase().as_str() {
        "file" => ShellCommand::SelectFile((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "load" => ShellCommand::Load,
        "count" => {
            if rest.is_empty() {
                bail!("usage: count <n>");
            }
            let count = rest
                .parse::<i64>()
                .map_err(|_| anyhow!("count must be an integer, got '{rest}'"))?;
            ShellCommand::Count(count)
        }
        "generate" | "random" => ShellCommand::Generate,
        "algorithm" | "algo" => {
            if rest.is_empty() {
                bail!("usage: algorithm <name>");
            }
            ShellCommand::Algorithm(rest.parse()?)
        }
        "vector" => ShellCommand::Vector(rest.to_string()),
        "sort" => ShellCommand::Sort,
        "show" => ShellCommand::Show,
        "algorithms" => ShellCommand::Algorithms,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => bail!("unknown command '{other}'; type 'help' for a list"),
    };
    Ok(Some(command))
}

/// Applies one command and returns the text to print.
pub async fn execute(workbench: &SortWorkbench, command: ShellCommand) -> (Flow, String) {
    let outcome = match command {
        ShellCommand::SelectFile(path) => {
            workbench.select_file(path).await;
            return (Flow::Continue, render_settings(&workbench.snapshot().await));
        }
        ShellCommand::Count(count) => {
            workbench.set_random_count(count).await;
            return (Flow::Continue, render_settings(&workbench.snapshot().await));
        }
        ShellCommand::Algorithm(algorithm) => {
            workbench.select_algorithm(algorithm).await;
            return (Flow::Continue, render_settings(&workbench.snapshot().await));
        }
        ShellCommand::Vector(text) => {
            workbench.set_vector_text(text).await;
            Ok(())
        }
        ShellCommand::Load => workbench.load_from_file().await,
        ShellCommand::Generate => workbench.generate_random().await,
        ShellCommand::Sort => workbench.sort().await.map(|_| ()),
        ShellCommand::Show => Ok(()),
        ShellCommand::Algorithms => {
            let state = workbench.snapshot().await;
            return (Flow::Continue, render_algorithms(state.algorithm));
        }
        ShellCommand::Help => return (Flow::Continue, HELP.to_string()),
        ShellCommand::Quit => return (Flow::Quit, String::new()),
    };

    let mut output = render_state(&workbench.snapshot().await);
    if let Err(err @ ClientError::Busy { .. }) = outcome {
        output.push_str(&format!("\nError: {err}"));
    }
    (Flow::Continue, output)
}

pub async fn run(workbench: Arc<SortWorkbench>) -> Result<()> {
    let mut events = workbench.subscribe_events();
    let progress = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(WorkbenchEvent::LoadingStarted(operation)) => {
                    eprintln!("{PROCESSING_MARKER} ({operation})");
                }
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            }
        }
    });

    println!("{}", render_state(&workbench.snapshot().await));
    println!("type 'help' for commands");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"sort> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        let (flow, output) = execute(&workbench, command).await;
        if !output.is_empty() {
            println!("{output}");
        }
        if flow == Flow::Quit {
            break;
        }
    }

    progress.abort();
    Ok(())
}
