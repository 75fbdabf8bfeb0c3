//! CLI commands
//!
//! Special commands that can be executed in the REPL.

use crate::agent::Orchestrator;
use crate::cli::repl::Session;

/// Result of parsing a command
#[derive(Debug, PartialEq)]
pub enum CommandResult {
    /// Continue processing as normal input
    Continue(String),
    /// Command was handled, show output
    Handled(String),
    /// Exit the REPL
    Exit,
    /// Drop the current thread and start a new one
    NewThread,
}

/// Parse and handle special commands
pub fn handle_command(input: &str, orchestrator: &Orchestrator, session: &Session) -> CommandResult {
    let input = input.trim();

    // Commands are single words; anything longer is a message
    if input.split_whitespace().count() > 1 && !input.starts_with('/') {
        return CommandResult::Continue(input.to_string());
    }

    let cmd = input
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .trim_start_matches('/')
        .to_lowercase();

    match cmd.as_str() {
        "exit" | "quit" | "q" => CommandResult::Exit,

        "new" | "clear" | "reset" => CommandResult::NewThread,

        "help" | "?" => CommandResult::Handled(help_text()),

        "agents" => {
            let triage = &orchestrator.settings().triage_agent;
            let lines: Vec<String> = orchestrator
                .agent_names()
                .into_iter()
                .map(|name| {
                    if &name == triage {
                        format!("  {} (triage)", name)
                    } else {
                        format!("  {}", name)
                    }
                })
                .collect();
            CommandResult::Handled(format!("Agents:\n{}", lines.join("\n")))
        }

        "tools" => {
            let mut output = String::from("Tools by agent:");
            for name in orchestrator.agent_names() {
                let Some(agent) = orchestrator.agent(&name) else {
                    continue;
                };
                let tools = agent.tool_names();
                output.push_str(&format!(
                    "\n  {}: {}",
                    name,
                    if tools.is_empty() {
                        "(none)".to_string()
                    } else {
                        tools.join(", ")
                    }
                ));
            }
            CommandResult::Handled(output)
        }

        "status" => CommandResult::Handled(format!(
            "Switchboard Status:\n\
             ─────────────────────────────\n\
             Conversation: {}\n\
             Thread:       {}\n\
             History:      {} messages\n\
             Last status:  {}",
            session.conversation_id,
            session.thread_id,
            session.messages.len(),
            session
                .last_status
                .map(|status| status.to_string())
                .unwrap_or_else(|| "-".to_string())
        )),

        _ => {
            if input.starts_with('/') {
                CommandResult::Handled(format!(
                    "Unknown command: {}. Type 'help' for available commands.",
                    cmd
                ))
            } else {
                CommandResult::Continue(input.to_string())
            }
        }
    }
}

/// Generate help text
fn help_text() -> String {
    r#"Switchboard Commands:
─────────────────────────────────────────────
  help, ?          Show this help message
  exit, quit, q    Exit Switchboard
  new, reset       Start a new conversation thread
  agents           List the configured agents
  tools            List the tools bound to each agent
  status           Show the current thread

Anything else is sent to the triage agent. A thread ends
by itself once a turn is complete or fails.
─────────────────────────────────────────────"#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentRegistry;
    use crate::core::config::AgentConfig;
    use crate::core::Config;
    use crate::llm::ScriptedClient;
    use std::sync::Arc;

    fn orchestrator() -> Orchestrator {
        let mut config = Config::default();
        config.agents.retain(|name, _| name == "agent_triage");
        config.agents.insert(
            "agent_helper".to_string(),
            AgentConfig::new("Help", &[]),
        );
        let registry = AgentRegistry::from_config(&config);
        Orchestrator::new(
            &registry,
            Arc::new(ScriptedClient::default()),
            config.orchestrator.clone(),
        )
        .unwrap()
    }

    #[test]
    fn test_plain_input_continues() {
        let result = handle_command("  weather in Paris?  ", &orchestrator(), &Session::new());
        assert_eq!(result, CommandResult::Continue("weather in Paris?".to_string()));
    }

    #[test]
    fn test_exit_and_new() {
        let orchestrator = orchestrator();
        let session = Session::new();
        assert_eq!(handle_command("exit", &orchestrator, &session), CommandResult::Exit);
        assert_eq!(handle_command("/quit", &orchestrator, &session), CommandResult::Exit);
        assert_eq!(handle_command("new", &orchestrator, &session), CommandResult::NewThread);
        assert_eq!(
            handle_command("new york weather", &orchestrator, &session),
            CommandResult::Continue("new york weather".to_string())
        );
    }

    #[test]
    fn test_agents_lists_triage() {
        match handle_command("agents", &orchestrator(), &Session::new()) {
            CommandResult::Handled(output) => {
                assert!(output.contains("agent_triage (triage)"));
                assert!(output.contains("agent_helper"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_tools_per_agent() {
        match handle_command("tools", &orchestrator(), &Session::new()) {
            CommandResult::Handled(output) => {
                assert!(output.contains("transfer_to_unsupported"));
                assert!(output.contains("agent_helper: (none)"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_status_shows_thread() {
        let session = Session::new();
        match handle_command("status", &orchestrator(), &session) {
            CommandResult::Handled(output) => assert!(output.contains(&session.thread_id)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_slash_command() {
        match handle_command("/frobnicate", &orchestrator(), &Session::new()) {
            CommandResult::Handled(output) => assert!(output.contains("Unknown command")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
