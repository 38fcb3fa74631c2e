//! Interactive Loop
//!
//! Reads one line per turn, sends it to the agent under a fixed session and
//! prints the answer. `exit` (any case) or end of input stops the loop.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use agent_core::{Agent, SessionId, SessionStore};

pub const GREETING: &str = "Travel assistant started! Type 'exit' to quit.";
pub const FAREWELL: &str = "Goodbye!";

const USER_PROMPT: &str = "You: ";
const ASSISTANT_PREFIX: &str = "Assistant: ";

/// Whether a line asks to leave the loop
pub fn is_exit_command(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("exit")
}

/// Drive the conversation until `exit` or EOF.
///
/// A failed turn prints a short explanation and the loop keeps going; only
/// I/O errors on the terminal end it early.
pub async fn run<R, W, S>(
    agent: &Agent,
    store: &mut S,
    session_id: &SessionId,
    input: R,
    output: &mut W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    S: SessionStore + ?Sized,
{
    let mut lines = input.lines();

    output.write_all(format!("{GREETING}\n").as_bytes()).await?;

    loop {
        output.write_all(USER_PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            // EOF: finish the prompt line before saying goodbye
            output.write_all(b"\n").await?;
            break;
        };

        if is_exit_command(&line) {
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let reply = match agent.chat(store, session_id, line).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!(error = %e, "Turn failed");
                e.user_message()
            }
        };

        output
            .write_all(format!("{ASSISTANT_PREFIX}{reply}\n").as_bytes())
            .await?;
    }

    output.write_all(format!("{FAREWELL}\n").as_bytes()).await?;
    output.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::provider::{Completion, GenerationOptions};
    use agent_core::{
        AgentBuilder, AgentError, LlmProvider, MemorySessionStore, Message, Role, ToolSchema,
    };
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Answers every turn with the number of user messages it was shown,
    /// or fails when asked to
    #[derive(Default)]
    struct CountingProvider {
        calls: Mutex<usize>,
    }

    impl CountingProvider {
        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl LlmProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        async fn complete(
            &self,
            messages: &[Message],
            _tools: &[ToolSchema],
            _options: &GenerationOptions,
        ) -> agent_core::Result<Completion> {
            *self.calls.lock().unwrap() += 1;

            let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
            if last == "fail" {
                return Err(AgentError::ProviderUnavailable("down".into()));
            }

            let seen = messages.iter().filter(|m| m.role == Role::User).count();
            Ok(Completion::text(format!("seen {seen}"), "test"))
        }
    }

    async fn session(script: &str) -> (String, Arc<CountingProvider>, MemorySessionStore) {
        let provider = Arc::new(CountingProvider::default());
        let agent = AgentBuilder::new().provider(provider.clone()).build().unwrap();
        let mut store = MemorySessionStore::new();
        let mut output = Vec::new();

        run(
            &agent,
            &mut store,
            &SessionId::from("user123"),
            script.as_bytes(),
            &mut output,
        )
        .await
        .unwrap();

        (String::from_utf8(output).unwrap(), provider, store)
    }

    #[test]
    fn test_exit_variants() {
        for line in ["exit", "EXIT", "Exit", "  exit  ", "eXiT\r"] {
            assert!(is_exit_command(line), "{line:?}");
        }
        for line in ["exit now", "quit", "", "exi"] {
            assert!(!is_exit_command(line), "{line:?}");
        }
    }

    #[tokio::test]
    async fn test_exit_does_not_reach_agent() {
        let (output, provider, store) = session("EXIT\nwhat is the weather?\n").await;

        assert_eq!(provider.calls(), 0);
        assert!(store.is_empty());
        assert!(output.starts_with(GREETING));
        assert!(output.trim_end().ends_with(FAREWELL));
    }

    #[tokio::test]
    async fn test_memory_persists_across_turns() {
        let (output, provider, store) = session("hello\n\n   \nagain\nexit\n").await;

        // Blank lines are skipped without a model call
        assert_eq!(provider.calls(), 2);
        assert!(output.contains("Assistant: seen 1\n"));
        assert!(output.contains("Assistant: seen 2\n"));

        let history = store.history(&SessionId::from("user123"));
        assert_eq!(history.len(), 4);
    }

    #[tokio::test]
    async fn test_failed_turn_keeps_running() {
        let (output, provider, store) = session("fail\nhello\n").await;

        assert_eq!(provider.calls(), 2);
        assert!(output.contains(&AgentError::ProviderUnavailable(String::new()).user_message()));
        // The failed turn left no trace in memory
        assert!(output.contains("Assistant: seen 1\n"));
        assert_eq!(store.history(&SessionId::from("user123")).len(), 2);
    }

    #[tokio::test]
    async fn test_eof_ends_loop() {
        let (output, provider, _) = session("").await;
        assert_eq!(provider.calls(), 0);
        assert!(output.trim_end().ends_with(FAREWELL));
    }
}
