use crate::error::{AuditError, Result};
use colored::Colorize;
use std::io::{self, BufRead, Write};

/// Manages the yes/no prompts around an audit run
///
/// Reads answers from `input` and writes prompts to `output`, which are
/// stdin/stdout outside of tests.
pub struct AuditInteraction<R, W> {
    input: R,
    output: W,
    assume_yes: bool,
}

impl AuditInteraction<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio(assume_yes: bool) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), assume_yes)
    }
}

impl<R: BufRead, W: Write> AuditInteraction<R, W> {
    pub fn new(input: R, output: W, assume_yes: bool) -> Self {
        Self {
            input,
            output,
            assume_yes,
        }
    }

    /// Ask before a comprehensive run. Anything but yes cancels.
    pub fn confirm_full_search(&mut self) -> Result<()> {
        writeln!(
            self.output,
            "You are about to perform a full search. {}",
            "Makes double the API calls as fast search.".yellow()
        )?;

        if self.assume_yes {
            writeln!(self.output, "{}", "Proceeding (--yes).".dimmed())?;
            return Ok(());
        }

        if self.ask("Do you wish to proceed? (Y/N): ")? {
            Ok(())
        } else {
            Err(AuditError::UserCancelled)
        }
    }

    pub fn confirm_export(&mut self) -> Result<bool> {
        self.ask("Would you like to export the failed mods to a file? (Y/N): ")
    }

    fn ask(&mut self, question: &str) -> Result<bool> {
        write!(self.output, "{}", question.bold())?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        let decision = answer.trim().to_lowercase();

        Ok(matches!(decision.as_str(), "y" | "yes"))
    }
}
