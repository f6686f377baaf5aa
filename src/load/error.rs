//! Diagnostics about the contents of habit files
//!
//! A file can be wrong in two ways: its text does not follow the grammar,
//! or a line parses but holds data that makes no sense (a 30th of February,
//! a day written twice). The first is shown with pest's own rendering,
//! the second by quoting the line.
//!
//! ```txt
//! error: Malformed record
//!   --> data/piano.csv:4
//!    |
//!  4 | 2024-02-30,00:20
//!    | ^^^^^^^^^^^^^^^^ provided here
//!    = 2024-02-30 is not a valid date: February has at most 29 days
//!    = hint: check the day of the month
//! ```

use std::fmt;

use crate::load::parse::Rule;

/// Location of a line: file name and span within that file
pub type Loc<'i> = (&'i str, pest::Span<'i>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Part of the file the diagnostic points to
#[derive(Debug)]
enum Site {
    Syntax(pest::error::Error<Rule>),
    Row {
        path: String,
        line: usize,
        text: String,
        label: String,
    },
}

/// One problem found in a file
#[derive(Debug)]
pub struct Diagnostic {
    severity: Severity,
    title: String,
    site: Option<Site>,
    notes: Vec<String>,
    hint: Option<String>,
}

/// Every diagnostic emitted while reading one file
#[derive(Debug, Default)]
pub struct Record {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostic {
    fn new(severity: Severity, title: String) -> Self {
        Self {
            severity,
            title,
            site: None,
            notes: Vec::new(),
            hint: None,
        }
    }

    /// Point at a grammar failure
    pub fn syntax(&mut self, err: pest::error::Error<Rule>) -> &mut Self {
        self.site = Some(Site::Syntax(err.renamed_rules(rule_rename)));
        self
    }

    /// Point at a whole line of the file
    pub fn at_row<S>(&mut self, loc: &Loc, label: S) -> &mut Self
    where
        S: ToString,
    {
        self.site = Some(Site::Row {
            path: loc.0.to_string(),
            line: loc.1.start_pos().line_col().0,
            text: loc.1.as_str().to_string(),
            label: label.to_string(),
        });
        self
    }

    pub fn note<S>(&mut self, msg: S) -> &mut Self
    where
        S: ToString,
    {
        self.notes.push(msg.to_string());
        self
    }

    /// How to fix it, a later hint replaces an earlier one
    pub fn hint<S>(&mut self, msg: S) -> &mut Self
    where
        S: ToString,
    {
        self.hint = Some(msg.to_string());
        self
    }
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, severity: Severity, title: String) -> &mut Diagnostic {
        self.diagnostics.push(Diagnostic::new(severity, title));
        let last = self.diagnostics.len() - 1;
        &mut self.diagnostics[last]
    }

    /// Problem that makes the file unusable
    pub fn error<S>(&mut self, title: S) -> &mut Diagnostic
    where
        S: ToString,
    {
        self.push(Severity::Error, title.to_string())
    }

    /// Problem that the file can be used in spite of
    pub fn warning<S>(&mut self, title: S) -> &mut Diagnostic
    where
        S: ToString,
    {
        self.push(Severity::Warning, title.to_string())
    }

    pub fn is_fatal(&self) -> bool {
        self.count_errors() > 0
    }

    pub fn count_errors(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn count_warnings(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == severity).count()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

const RED: &str = "\x1b[1;31m";
const YELLOW: &str = "\x1b[1;33m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

impl Severity {
    fn paint(self) -> (&'static str, &'static str) {
        match self {
            Severity::Error => (RED, "error"),
            Severity::Warning => (YELLOW, "warning"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (color, name) = self.severity.paint();
        writeln!(f, "{}{}{}: {}", color, name, RESET, self.title)?;
        match &self.site {
            Some(Site::Syntax(err)) => {
                // pest marks line endings with a visible symbol
                for line in err.to_string().replace('␊', "").lines() {
                    writeln!(f, "  {}{}{}", CYAN, line, RESET)?;
                }
            }
            Some(Site::Row { path, line, text, label }) => {
                let gutter = " ".repeat(line.to_string().len());
                writeln!(f, "  {}-->{} {}:{}", CYAN, RESET, path, line)?;
                writeln!(f, " {} {}|{}", gutter, CYAN, RESET)?;
                writeln!(f, " {}{} |{} {}", CYAN, line, RESET, text)?;
                let marks = "^".repeat(text.chars().count().max(1));
                writeln!(f, " {} {}|{} {}{}{} {}", gutter, CYAN, RESET, color, marks, RESET, label)?;
            }
            None => (),
        }
        for note in &self.notes {
            writeln!(f, "   {}={} {}", CYAN, RESET, note)?;
        }
        if let Some(hint) = &self.hint {
            writeln!(f, "   {}= hint:{} {}", CYAN, RESET, hint)?;
        }
        Ok(())
    }
}

/// Errors first, then warnings, then a count of both
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.diagnostics.is_empty() {
            return Ok(());
        }
        for severity in [Severity::Error, Severity::Warning] {
            for d in self.diagnostics.iter().filter(|d| d.severity == severity) {
                writeln!(f, "{}", d)?;
            }
        }
        let plural = |n: usize| if n == 1 { "" } else { "s" };
        let (errors, warnings) = (self.count_errors(), self.count_warnings());
        writeln!(
            f,
            "{} error{}, {} warning{}",
            errors,
            plural(errors),
            warnings,
            plural(warnings)
        )
    }
}

/// Readable names for the rules in pest's "expected ..." messages
#[allow(unreachable_patterns)]
fn rule_rename(r: &Rule) -> String {
    String::from(match r {
        Rule::EOI => "the end of the file",
        Rule::digit => "a digit (0..9)",
        Rule::year => "a 4-digit year",
        Rule::month => "a 2-digit month",
        Rule::day => "a 2-digit day",
        Rule::date => "a date YYYY-MM-DD",
        Rule::hours => "an at least 2-digit number of hours",
        Rule::minutes => "a 2-digit number of minutes",
        Rule::seconds => "a 2-digit number of seconds",
        Rule::duration => "a duration HH:MM",
        Rule::comma => "a comma (',') separator",
        Rule::header => "the header 'date,duration'",
        Rule::row => "a line YYYY-MM-DD,HH:MM",
        Rule::file => "a header followed by one line per day",
        _ => "a line break",
    })
}
