//! Habit files on disk
//!
//! One `<habit>.csv` per habit in a single data directory.
//! Spaces in habit names become underscores in file names.

use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::lib::{
    error::{HabitError, Result},
    series::{DurationRecord, HabitSeries},
};
use crate::load::{error, parse};

const EXTENSION: &str = "csv";
const HEADER: &str = "date,duration";

#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new<P>(dir: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { dir: dir.into() }
    }

    /// File holding the history of `habit`
    pub fn path(&self, habit: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", habit.trim().replace(' ', "_"), EXTENSION))
    }

    pub fn exists(&self, habit: &str) -> bool {
        self.path(habit).is_file()
    }

    /// Names of all tracked habits, sorted
    ///
    /// A data directory that does not exist yet holds no habits.
    pub fn habits(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(HabitError::persistence(&self.dir, e)),
        };
        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| HabitError::persistence(&self.dir, e))?.path();
            if path.extension().map(|ext| ext == EXTENSION).unwrap_or(false) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.replace('_', " "));
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Read the history of `habit`
    ///
    /// A missing file is a habit with no records yet. Problems with the
    /// contents are described in `errs`, and yield `Ok(None)` when fatal.
    pub fn load(&self, habit: &str, errs: &mut error::Record) -> Result<Option<HabitSeries>> {
        let path = self.path(habit);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} does not exist, starting from an empty series", path.display());
                return Ok(Some(HabitSeries::new(habit)));
            }
            Err(e) => return Err(HabitError::persistence(path, e)),
        };
        let filename = path.display().to_string();
        let rows = match parse::extract(&filename, errs, &contents) {
            Some(rows) => rows,
            None => return Ok(None),
        };
        let series = match HabitSeries::load(habit, rows.iter().map(|r| (r.date, r.duration))) {
            Ok(series) => series,
            Err(HabitError::MalformedRecord { row, reason, hint }) => {
                let diagnostic = errs.error("Malformed record");
                if let Some(r) = rows.get(row) {
                    diagnostic.at_row(&r.loc, "provided here");
                }
                diagnostic.note(reason).hint(hint);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        let gaps = series.gaps();
        if let Some(first) = gaps.first() {
            warn!("{}: {} days without an entry", filename, gaps.len());
            errs.warning("Missing days")
                .note(format!("{} has no entry for {} days, starting with {}", filename, gaps.len(), first))
                .hint("add a line for each of these days, 00:00 if nothing was done");
        }
        info!("read {} records from {}", series.len(), filename);
        Ok(Some(series))
    }

    /// Write a new habit file
    ///
    /// Refuses to overwrite an existing habit.
    pub fn create(&self, series: &HabitSeries) -> Result<()> {
        let path = self.path(series.name());
        fs::create_dir_all(&self.dir).map_err(|e| HabitError::persistence(&self.dir, e))?;
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| HabitError::persistence(&path, e))?;
        let text = render(series.records(), |r| r.duration.to_string());
        file.write_all(text.as_bytes())
            .map_err(|e| HabitError::persistence(&path, e))?;
        info!("created {} with {} records", path.display(), series.len());
        Ok(())
    }

    /// Add records at the end of an existing habit file
    pub fn append(&self, habit: &str, records: &[DurationRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        let path = self.path(habit);
        let io_err = |e| HabitError::persistence(&path, e);
        let mut file = OpenOptions::new().read(true).append(true).open(&path).map_err(io_err)?;
        // hand-edited files may lack the final line break
        let mut text = String::new();
        if file.seek(SeekFrom::End(0)).map_err(io_err)? > 0 {
            let mut last = [0u8];
            file.seek(SeekFrom::End(-1)).map_err(io_err)?;
            file.read_exact(&mut last).map_err(io_err)?;
            if last[0] != b'\n' {
                text.push('\n');
            }
        }
        for r in records {
            text.push_str(&format!("{},{}\n", r.date, r.duration));
        }
        file.write_all(text.as_bytes()).map_err(io_err)?;
        info!("appended {} records to {}", records.len(), path.display());
        Ok(())
    }

    /// Write a copy of the series with `HH:MM:SS` durations
    pub fn export(&self, series: &HabitSeries, dest: &Path) -> Result<()> {
        let text = render(series.records(), |r| r.duration.with_seconds());
        fs::write(dest, text).map_err(|e| HabitError::persistence(dest, e))?;
        info!("exported {} records to {}", series.len(), dest.display());
        Ok(())
    }
}

/// Header and one line per record
fn render<F>(records: &[DurationRecord], duration: F) -> String
where
    F: Fn(&DurationRecord) -> String,
{
    let mut text = format!("{}\n", HEADER);
    for r in records {
        text.push_str(&format!("{},{}\n", r.date, duration(r)));
    }
    text
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lib::{
        date::{Date, Month::*},
        duration::Duration,
    };

    fn rec(day: usize, minutes: u32) -> DurationRecord {
        DurationRecord::new(Date::from(2024, Jan, day).unwrap(), Duration::from_minutes(minutes))
    }

    fn series(name: &str, days: &[(usize, u32)]) -> HabitSeries {
        let mut series = HabitSeries::new(name);
        for (d, m) in days {
            series.append(rec(*d, *m)).unwrap();
        }
        series
    }

    #[test]
    fn create_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        let s = series("piano practice", &[(1, 90), (2, 5)]);
        store.create(&s).unwrap();
        assert!(dir.path().join("piano_practice.csv").is_file());
        assert_eq!(
            fs::read_to_string(store.path("piano practice")).unwrap(),
            "date,duration\n2024-01-01,01:30\n2024-01-02,00:05\n"
        );
        let mut errs = error::Record::new();
        let loaded = store.load("piano practice", &mut errs).unwrap().unwrap();
        assert!(errs.is_empty());
        assert_eq!(loaded, s);
        assert_eq!(store.habits().unwrap(), vec!["piano practice".to_string()]);
    }

    #[test]
    fn create_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        store.create(&series("run", &[(1, 30)])).unwrap();
        let err = store.create(&series("run", &[(1, 45)])).unwrap_err();
        assert!(matches!(err, HabitError::Persistence { .. }));
    }

    #[test]
    fn missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("not-yet"));
        let mut errs = error::Record::new();
        let loaded = store.load("nothing", &mut errs).unwrap().unwrap();
        assert!(loaded.is_empty());
        assert!(store.habits().unwrap().is_empty());
    }

    #[test]
    fn append_adds_lines() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        fs::write(store.path("draw"), "date,duration\n2024-01-01,00:10").unwrap();
        store.append("draw", &[rec(2, 20), rec(3, 30)]).unwrap();
        let mut errs = error::Record::new();
        let loaded = store.load("draw", &mut errs).unwrap().unwrap();
        assert_eq!(loaded, series("draw", &[(1, 10), (2, 20), (3, 30)]));
        assert!(matches!(
            store.append("absent", &[rec(1, 1)]),
            Err(HabitError::Persistence { .. })
        ));
    }

    #[test]
    fn malformed_rows_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        fs::write(store.path("bad"), "date,duration\n2024-01-01,00:10\n2024-02-30,00:10\n").unwrap();
        let mut errs = error::Record::new();
        assert!(store.load("bad", &mut errs).unwrap().is_none());
        assert_eq!(errs.count_errors(), 1);
        fs::write(store.path("dup"), "date,duration\n2024-01-01,00:10\n2024-01-01,00:20\n").unwrap();
        let mut errs = error::Record::new();
        assert!(store.load("dup", &mut errs).unwrap().is_none());
        assert!(errs.is_fatal());
    }

    #[test]
    fn gaps_are_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        fs::write(store.path("gap"), "date,duration\n2024-01-01,00:10\n2024-01-04,00:10\n").unwrap();
        let mut errs = error::Record::new();
        let loaded = store.load("gap", &mut errs).unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(!errs.is_fatal());
        assert_eq!(errs.count_warnings(), 1);
    }

    #[test]
    fn export_with_seconds() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        let dest = dir.path().join("out.csv");
        store.export(&series("x", &[(1, 61)]), &dest).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "date,duration\n2024-01-01,01:01:00\n");
        let mut errs = error::Record::new();
        let rows = parse::extract("out.csv", &mut errs, "date,duration\n2024-01-01,01:01:00\n").unwrap();
        assert_eq!(rows.len(), 1);
    }
}
