// Interactive terminal front end: walks the questionnaire, then chats.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};
use tracing::info;

use crate::profile::Field;
use crate::quiz::Advance;
use crate::resolver::Resolver;
use crate::session::Session;
use crate::store::{Message, Role};

const HELP: &str = "Commands: /back (questionnaire only), /reset-chat, /reset-quiz, /quit";

struct Terminal {
    lines: Lines<BufReader<Stdin>>,
    out: Stdout,
}

impl Terminal {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            out: tokio::io::stdout(),
        }
    }

    async fn say(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        self.out.flush().await.context("Failed to flush stdout")
    }

    async fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        self.out.write_all(prompt.as_bytes()).await?;
        self.out.flush().await?;
        Ok(self.lines.next_line().await?.map(|l| l.trim().to_string()))
    }
}

fn render_message(message: &Message) -> String {
    let who = match message.role {
        Role::User => "You",
        Role::Assistant => "OnWave",
    };
    format!("[{}] {}: {}", message.timestamp.format("%H:%M:%S"), who, message.content)
}

enum Flow {
    Continue,
    Quit,
}

// Parses "1 3" / "1,3" into zero-based option indexes.
fn parse_choices(input: &str, option_count: usize) -> Option<Vec<usize>> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<usize>().ok().filter(|n| (1..=option_count).contains(n)).map(|n| n - 1))
        .collect()
}

async fn run_questionnaire(session: &mut Session, term: &mut Terminal) -> Result<Flow> {
    term.say("Answer a few questions to help us recommend AI solutions tailored to your startup.").await?;
    term.say(HELP).await?;

    while !session.flow().is_finished() {
        let flow = session.flow();
        let question = flow.current_question();
        let progress = flow.progress();
        term.say(&format!(
            "\n== {} ({}/{}, {:.0}%) ==\n{}",
            flow.section().title,
            progress.completed + 1,
            progress.total,
            progress.percent(),
            question.prompt
        ))
        .await?;
        for (i, option) in question.options.iter().enumerate() {
            term.say(&format!("  {:>2}. {}", i + 1, option.label)).await?;
        }

        let hint = if question.is_multi_select() {
            "Toggle numbers (e.g. 1 3), empty line to continue: "
        } else {
            "Pick a number: "
        };
        let Some(input) = term.ask(hint).await? else {
            return Ok(Flow::Quit);
        };

        match input.as_str() {
            "/quit" => return Ok(Flow::Quit),
            "/back" => {
                session.back();
                continue;
            }
            "/reset-quiz" => {
                session.reset_quiz();
                continue;
            }
            "" if question.is_multi_select() => {
                let step = session.commit().await;
                if let Err(e) = step {
                    term.say(&format!("! {}", e)).await?;
                }
                continue;
            }
            _ => {}
        }

        let Some(choices) = parse_choices(&input, question.options.len()) else {
            term.say("! Please enter option numbers from the list.").await?;
            continue;
        };

        if question.is_multi_select() {
            for idx in choices {
                session.toggle(question.options[idx].value)?;
            }
            if let Field::Multi(field) = question.id {
                let picks = session.flow().pending(field).join(", ");
                term.say(&format!("Selected: {}", picks)).await?;
            }
        } else if let [idx] = choices.as_slice() {
            if session.answer(question.options[*idx].value).await? == Advance::Finished {
                info!("Questionnaire completed from terminal");
            }
        } else {
            term.say("! Pick exactly one option.").await?;
        }
    }
    Ok(Flow::Continue)
}

async fn run_chat(session: &mut Session, term: &mut Terminal) -> Result<Flow> {
    for message in session.store().transcript() {
        term.say(&render_message(message)).await?;
    }

    loop {
        let Some(input) = term.ask("> ").await? else {
            return Ok(Flow::Quit);
        };
        match input.as_str() {
            "" => continue,
            "/quit" => return Ok(Flow::Quit),
            "/reset-chat" => {
                session.reset_chat();
                term.say("Chat cleared.").await?;
            }
            "/reset-quiz" => {
                session.reset_quiz();
                return Ok(Flow::Continue);
            }
            _ => {
                term.say("OnWave is thinking...").await?;
                let reply = session.send_message(&input).await?;
                term.say(&render_message(&reply)).await?;
            }
        }
    }
}

/// Runs the questionnaire and chat on stdin/stdout until the user quits.
pub async fn run_terminal_chat(resolver: Resolver) -> Result<()> {
    let mut session = Session::new(resolver);
    let mut term = Terminal::new();
    info!(session = %session.id, "Starting terminal session");

    loop {
        if !session.store().quiz_completed() {
            if let Flow::Quit = run_questionnaire(&mut session, &mut term).await? {
                break;
            }
        }
        if let Flow::Quit = run_chat(&mut session, &mut term).await? {
            break;
        }
    }

    term.say("Goodbye.").await?;
    Ok(())
}
