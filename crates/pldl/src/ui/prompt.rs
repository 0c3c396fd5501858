use std::io::{self, BufRead};

use console::Term;
use pldl_media::Prompt;

/// Interactive questions on stdout/stdin.
///
/// When stdout is not a terminal `console` returns empty answers, so lines
/// are read from stdin directly instead.
pub struct TermPrompt {
    term: Term,
}

impl Default for TermPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl TermPrompt {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    /// Print `question` and read one line, without the trailing newline.
    pub fn ask(&self, question: &str) -> io::Result<String> {
        self.term.write_str(question)?;

        if self.term.is_term() {
            return self.term.read_line();
        }

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl Prompt for TermPrompt {
    fn choose(&mut self, options: &[String]) -> io::Result<String> {
        self.term.write_line("Choose Quality:")?;
        for (i, quality) in options.iter().enumerate() {
            self.term.write_line(&format!("{}. {quality}", i + 1))?;
        }

        self.ask("Enter the number corresponding to the desired quality: ")
    }
}
