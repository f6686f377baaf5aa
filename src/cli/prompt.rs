use std::io::{self, BufRead, Write};

/// Line-based conversation with the user
///
/// Generic over its streams so that sessions can be scripted.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R, W> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&self) -> &W {
        &self.output
    }
}

impl<R, W> Prompt<R, W>
where
    R: BufRead,
    W: Write,
{
    /// Print a full line
    pub fn say<S>(&mut self, text: S) -> io::Result<()>
    where
        S: AsRef<str>,
    {
        writeln!(self.output, "{}", text.as_ref())
    }

    /// Print `question` and read the answer
    ///
    /// `None` means the input is closed, the session should end.
    pub fn ask<S>(&mut self, question: S) -> io::Result<Option<String>>
    where
        S: AsRef<str>,
    {
        write!(self.output, "{}", question.as_ref())?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }
}
