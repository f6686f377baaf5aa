//! Convert the contents of a habit file into located text records
//!
//! The grammar only checks the shape of each line, calendar and range
//! validation is left to `HabitSeries::load`.

use pest::Parser;
use pest_derive::*;

/// Wrapper around Pest's `Pair`
type Pair<'i> = pest::iterators::Pair<'i, Rule>;

use crate::load::error;

/// Pest-generated parser
#[derive(Parser)]
#[grammar = "load/habit.pest"]
pub struct HabitParser;

/// One line of the file, still as text
#[derive(Debug)]
pub struct Row<'i> {
    pub loc: error::Loc<'i>,
    pub date: &'i str,
    pub duration: &'i str,
}

/// Get the rows of file `path`
///
/// Returns `None` if the file is not syntactically valid, in which case
/// the reason was recorded in `errs`.
pub fn extract<'i>(path: &'i str, errs: &mut error::Record, contents: &'i str) -> Option<Vec<Row<'i>>> {
    match HabitParser::parse(Rule::file, contents) {
        Ok(mut pairs) => {
            // `file` always matches as a single pair
            let file = pairs.next()?;
            Some(validate(path, file))
        }
        Err(e) => {
            errs.error("Parsing failure")
                .syntax(e.with_path(path))
                .hint("each line after the header is YYYY-MM-DD,HH:MM");
            None
        }
    }
}

/// Collect rows, skipping the header
fn validate<'i>(path: &'i str, file: Pair<'i>) -> Vec<Row<'i>> {
    let mut rows = Vec::new();
    for pair in file.into_inner() {
        match pair.as_rule() {
            Rule::row => {
                if let Some(row) = read_row(path, pair) {
                    rows.push(row);
                }
            }
            Rule::header | Rule::EOI => (),
            _ => unreachable!(),
        }
    }
    rows
}

/// Grammar ensures both fields are present
fn read_row<'i>(path: &'i str, pair: Pair<'i>) -> Option<Row<'i>> {
    let loc = (path, pair.as_span());
    let mut date = None;
    let mut duration = None;
    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::date => date = Some(item.as_str()),
            Rule::duration => duration = Some(item.as_str()),
            _ => (),
        }
    }
    Some(Row {
        loc,
        date: date?,
        duration: duration?,
    })
}
