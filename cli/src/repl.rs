//! Interactive chat loop: read a question, research it, print the answer, repeat.
//!
//! Exits on EOF (Ctrl+D) or `exit`/`quit`/`/quit`. Empty lines are ignored. A failed
//! run is reported and the loop continues.

use std::io::Write;

use datahopper::ResearchRunner;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::{ask, is_quit_command};

/// Runs the loop over `input`, writing prompts and answers to `out`.
/// Returns the number of questions answered.
pub async fn run_chat_loop<R, W>(
    runner: &ResearchRunner,
    input: R,
    out: &mut W,
    progress: bool,
) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "DataHopper research chat. Type 'exit' to quit.")?;
    let mut lines = input.lines();
    let mut answered = 0;

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let line = match lines.next_line().await? {
            None => break,
            Some(s) if s.trim().is_empty() => continue,
            Some(s) if is_quit_command(&s) => break,
            Some(s) => s,
        };

        match ask(runner, &line, progress).await {
            Ok(outcome) => {
                writeln!(out, "\n{}\n", outcome.final_answer)?;
                answered += 1;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Chat question failed");
                eprintln!("error: {}", e);
            }
        }
    }

    writeln!(out, "Bye.")?;
    Ok(answered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use datahopper::ResearchDeps;

    #[tokio::test]
    async fn chat_answers_until_exit() {
        let runner = ResearchRunner::new(ResearchDeps::offline()).unwrap();
        let input: &[u8] = b"first question\n\n   \nsecond question\nexit\nnever asked\n";
        let mut out = Vec::new();
        let answered = run_chat_loop(&runner, input, &mut out, false).await.unwrap();

        assert_eq!(answered, 2);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Offline mode").count(), 2);
        assert!(text.trim_end().ends_with("Bye."));
    }

    #[tokio::test]
    async fn chat_ends_on_eof() {
        let runner = ResearchRunner::new(ResearchDeps::offline()).unwrap();
        let input: &[u8] = b"only question";
        let mut out = Vec::new();
        let answered = run_chat_loop(&runner, input, &mut out, false).await.unwrap();
        assert_eq!(answered, 1);
    }
}
