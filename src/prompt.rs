//! Line-oriented console prompting.
//!
//! The wizard talks to a `Prompter` rather than to stdin/stdout directly so
//! the whole flow can be driven from pre-supplied lines.

use std::io::{self, BufRead, IsTerminal, StdinLock, Stdout, Write};

use crate::utils::tui::create_spinner;

pub trait Prompter {
    /// Show a line of text.
    fn say(&mut self, message: &str) -> io::Result<()>;

    /// Show `prompt` and block until a line is entered.
    ///
    /// The line terminator is stripped; nothing else is.
    fn ask(&mut self, prompt: &str) -> io::Result<String>;

    /// Like `ask`, for values that should not be echoed.
    fn ask_secret(&mut self, prompt: &str) -> io::Result<String> {
        self.ask(prompt)
    }

    /// Run a blocking task while showing `message`.
    fn with_progress<T>(&mut self, message: &str, task: impl FnOnce() -> T) -> T {
        let _ = self.say(message);
        task()
    }
}

/// Prompter over any line reader and writer.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
    interactive: bool,
}

impl LinePrompter<StdinLock<'static>, Stdout> {
    /// Prompter over stdin/stdout.
    ///
    /// Secrets are hidden and spinners shown only when stdin is a terminal;
    /// piped input is read line by line for every prompt.
    pub fn console() -> Self {
        let stdin = io::stdin();
        let interactive = stdin.is_terminal();
        LinePrompter::new(stdin.lock(), io::stdout()).interactive(interactive)
    }
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        LinePrompter {
            input,
            output,
            interactive: false,
        }
    }

    /// Read secrets from the terminal and draw spinners instead of plain lines.
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Input closed while waiting for an answer",
            ));
        }

        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(line)
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message)?;
        self.output.flush()
    }

    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        self.say(prompt)?;
        self.read_line()
    }

    fn ask_secret(&mut self, prompt: &str) -> io::Result<String> {
        if self.interactive {
            self.output.flush()?;
            rpassword::prompt_password(format!("{}\n", prompt))
        } else {
            self.ask(prompt)
        }
    }

    fn with_progress<T>(&mut self, message: &str, task: impl FnOnce() -> T) -> T {
        if !self.interactive {
            let _ = self.say(message);
            return task();
        }

        let spinner = create_spinner(message.to_string());
        let result = task();
        spinner.finish_and_clear();
        result
    }
}
