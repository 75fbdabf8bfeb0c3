//! Interactive REPL for Switchboard
//!
//! Provides the main user interaction loop. The REPL keeps the message
//! history of the current thread and starts a new thread once a turn ends
//! `complete` or `error`.

use std::io::{self, BufRead, Write};
use uuid::Uuid;

use crate::agent::Orchestrator;
use crate::cli::commands::{handle_command, CommandResult};
use crate::core::{ChatRequest, ChatResponse, Message, Result, ThreadStatus};

/// Identifiers and history of the conversation the REPL is carrying
#[derive(Debug, Clone)]
pub struct Session {
    pub conversation_id: String,
    pub session_id: String,
    pub thread_id: String,
    pub messages: Vec<Message>,
    pub last_status: Option<ThreadStatus>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            conversation_id: Uuid::new_v4().to_string(),
            session_id: Uuid::new_v4().to_string(),
            thread_id: Uuid::new_v4().to_string(),
            messages: Vec::new(),
            last_status: None,
        }
    }

    /// Drop the history and switch to a fresh thread id
    pub fn new_thread(&mut self) {
        self.thread_id = Uuid::new_v4().to_string();
        self.messages.clear();
        self.last_status = None;
    }

    /// Request for the next turn: the thread history plus `input`
    pub fn request(&self, input: &str) -> ChatRequest {
        let mut messages = self.messages.clone();
        messages.push(Message::user(input));

        ChatRequest {
            messages,
            conversation_id: Some(self.conversation_id.clone()),
            thread_id: Some(self.thread_id.clone()),
            session_id: Some(self.session_id.clone()),
            user_id: None,
        }
    }

    /// Take in the outcome of a turn
    pub fn absorb(&mut self, response: &ChatResponse) {
        match response.thread_status {
            ThreadStatus::Active => {
                self.messages = response.messages.clone();
                self.last_status = Some(ThreadStatus::Active);
            }
            ThreadStatus::Complete | ThreadStatus::Error => {
                self.new_thread();
                self.last_status = Some(response.thread_status);
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Interactive REPL (Read-Eval-Print Loop)
pub struct Repl {
    orchestrator: Orchestrator,
    session: Session,
    model: String,
}

impl Repl {
    /// Create a REPL in front of `orchestrator`; `model` is shown in the banner
    pub fn new(orchestrator: Orchestrator, model: impl Into<String>) -> Self {
        Self {
            orchestrator,
            session: Session::new(),
            model: model.into(),
        }
    }

    /// Send one user input through the orchestrator and update the session
    pub async fn submit(&mut self, input: &str) -> ChatResponse {
        let request = self.session.request(input);
        let response = self.orchestrator.process_request(request).await;
        self.session.absorb(&response);
        response
    }

    /// Run the REPL
    pub async fn run(&mut self) -> Result<()> {
        self.print_banner();

        let stdin = io::stdin();
        let mut stdout = io::stdout();

        loop {
            print!("You: ");
            stdout.flush()?;

            let mut input = String::new();
            match stdin.lock().read_line(&mut input) {
                Ok(0) => {
                    // EOF (Ctrl+D)
                    println!("\nGoodbye!");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    eprintln!("Error reading input: {}", e);
                    continue;
                }
            }

            let input = input.trim();
            if input.is_empty() {
                continue;
            }

            match handle_command(input, &self.orchestrator, &self.session) {
                CommandResult::Exit => {
                    println!("\nGoodbye!");
                    break;
                }
                CommandResult::NewThread => {
                    self.session.new_thread();
                    println!("Started a new thread.\n");
                }
                CommandResult::Handled(output) => {
                    println!("{}\n", output);
                }
                CommandResult::Continue(input) => {
                    let response = self.submit(&input).await;
                    println!("\nAssistant:\n{}\n", response.result);
                    match response.thread_status {
                        ThreadStatus::Active => {}
                        ThreadStatus::Complete => println!("[thread complete]\n"),
                        ThreadStatus::Error => println!(
                            "[thread error: {}]\n",
                            response.error_details.as_deref().unwrap_or("unknown")
                        ),
                    }
                }
            }
        }

        Ok(())
    }

    /// Print the startup banner
    fn print_banner(&self) {
        println!("Switchboard - triage-routed agents");
        println!("Model:  {}", self.model);
        println!("Triage: {}", self.orchestrator.settings().triage_agent);
        println!("Agents: {}", self.orchestrator.agent_names().join(", "));
        println!();
        println!("Commands: help, agents, tools, status, new, exit");
        println!("─────────────────────────────────────────────");
    }
}
