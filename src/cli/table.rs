use std::fmt;

use crate::cli::lang::Lang;
use crate::lib::{
    chart::{Bucket, Unit},
    series::HabitSeries,
};

/// Box-drawn table with a label column on the left
pub struct Table {
    title: Option<String>,
    grid: GridFmt,
}

struct BoxFmt {
    width: usize,
    text: String,
}

struct ColFmt {
    width: usize,
    label: BoxFmt,
    boxes: Vec<BoxFmt>,
}

struct GridFmt {
    labels: ColFmt,
    columns: Vec<ColFmt>,
}

impl Table {
    pub fn new<S>(corner: S, headers: &[&str]) -> Self
    where
        S: ToString,
    {
        let columns = headers
            .iter()
            .map(|h| ColFmt::with_label(BoxFmt::from(h.to_string())))
            .collect::<Vec<_>>();
        Self {
            title: None,
            grid: GridFmt {
                labels: ColFmt::with_label(BoxFmt::from(corner.to_string())),
                columns,
            },
        }
    }

    pub fn with_title<S>(mut self, title: S) -> Self
    where
        S: ToString,
    {
        self.title = Some(title.to_string());
        self
    }

    /// Add a line, `cells` has one item per column
    pub fn push_line(&mut self, label: String, cells: Vec<String>) {
        self.grid.push_line(
            BoxFmt::from(label),
            cells.into_iter().map(BoxFmt::from).collect(),
        );
    }

    /// Every recorded day
    pub fn records(series: &HabitSeries, lang: Lang) -> Self {
        let mut table = Self::new(lang.get("show.date"), &[lang.get("show.duration")]);
        for r in series.records() {
            table.push_line(r.date.to_string(), vec![r.duration.to_string()]);
        }
        table
    }

    /// Weekly or monthly means
    pub fn buckets(buckets: &[Bucket], unit: Unit, lang: Lang) -> Self {
        let unit = match unit {
            Unit::Minutes => lang.get("misc.minutes"),
            Unit::Hours => lang.get("misc.hours"),
        };
        let average = format!("{} ({})", lang.get("misc.average"), unit);
        let mut table = Self::new("", &[lang.get("misc.days"), average.as_str()]);
        for b in buckets {
            table.push_line(
                b.period.to_string(),
                vec![b.days.to_string(), format!("{:.1}", b.mean)],
            );
        }
        table
    }
}

impl BoxFmt {
    fn from(text: String) -> Self {
        let width = text.chars().count();
        Self { text, width }
    }

    fn write(&self, f: &mut fmt::Formatter, width: usize, right: bool) -> fmt::Result {
        let padding = " ".repeat(width.saturating_sub(self.width));
        if right {
            write!(f, " {}{} ", padding, self.text)
        } else {
            write!(f, " {}{} ", self.text, padding)
        }
    }
}

impl ColFmt {
    fn with_label(label: BoxFmt) -> Self {
        Self {
            width: label.width,
            label,
            boxes: Vec::new(),
        }
    }

    fn push(&mut self, b: BoxFmt) {
        self.width = self.width.max(b.width);
        self.boxes.push(b);
    }

    fn write_label(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.label.write(f, self.width, true)
    }

    fn write_item(&self, f: &mut fmt::Formatter, idx: usize, right: bool) -> fmt::Result {
        match self.boxes.get(idx) {
            Some(b) => b.write(f, self.width, right),
            None => BoxFmt::from(String::new()).write(f, self.width, right),
        }
    }

    fn len(&self) -> usize {
        self.boxes.len()
    }

    fn hline(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", HLINE.repeat(self.width + 2))
    }
}

impl GridFmt {
    fn push_line(&mut self, label: BoxFmt, boxes: Vec<BoxFmt>) {
        self.labels.push(label);
        for (col, b) in self.columns.iter_mut().zip(boxes) {
            col.push(b);
        }
    }

    /// Horizontal border with the given corner and junction characters
    fn border(&self, f: &mut fmt::Formatter, left: &str, join: &str, right: &str) -> fmt::Result {
        write!(f, "{}", left)?;
        self.labels.hline(f)?;
        for c in &self.columns {
            write!(f, "{}", join)?;
            c.hline(f)?;
        }
        writeln!(f, "{}", right)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(title) = &self.title {
            writeln!(f, "{}", title)?;
        }
        write!(f, "{}", self.grid)
    }
}

impl fmt::Display for GridFmt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.border(f, ULCORNER, LOJOIN, URCORNER)?;
        // title line
        write!(f, "{}", VLINE)?;
        self.labels.write_label(f)?;
        for c in &self.columns {
            write!(f, "{}", VLINE)?;
            c.write_label(f)?;
        }
        writeln!(f, "{}", VLINE)?;
        self.border(f, RTJOIN, CROSS, LTJOIN)?;
        // main block
        for idx in 0..self.labels.len() {
            write!(f, "{}", VLINE)?;
            self.labels.write_item(f, idx, false)?;
            for c in &self.columns {
                write!(f, "{}", VLINE)?;
                c.write_item(f, idx, true)?;
            }
            writeln!(f, "{}", VLINE)?;
        }
        self.border(f, DLCORNER, HIJOIN, DRCORNER)
    }
}

const HLINE: &str = "─";
const VLINE: &str = "│";
const ULCORNER: &str = "┌";
const URCORNER: &str = "┐";
const DLCORNER: &str = "└";
const DRCORNER: &str = "┘";
const LTJOIN: &str = "┤";
const RTJOIN: &str = "├";
const HIJOIN: &str = "┴";
const LOJOIN: &str = "┬";
const CROSS: &str = "┼";
