//! One run of a command against the habit store
//!
//! Every exchange goes through a `Prompt`, so that a session can be
//! driven by a script as well as by a terminal.

use std::io::{self, BufRead, Write};
use std::path::Path;

use log::{debug, info};

use crate::cli::{lang::Lang, plot::Plotter, prompt::Prompt, table::Table};
use crate::lib::{
    chart,
    date::Date,
    error::HabitError,
    gapfill::{FillState, GapFill},
    series::HabitSeries,
    stats::{self, Averages, Goal, GoalProgress},
};
use crate::load::{error, store::Store};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Habit(#[from] HabitError),
    #[error("terminal: {0}")]
    Io(#[from] io::Error),
    #[error("no habit named '{0}'")]
    NotFound(String),
    #[error("the file of '{0}' could not be read")]
    Unreadable(String),
}

impl SessionError {
    /// Whether the user was already told about it in their language
    pub fn is_reported(&self) -> bool {
        matches!(self, SessionError::NotFound(_) | SessionError::Unreadable(_))
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;

pub struct Session<R, W> {
    prompt: Prompt<R, W>,
    store: Store,
    lang: Lang,
    today: Date,
}

impl<R, W> Session<R, W> {
    pub fn new(prompt: Prompt<R, W>, store: Store, lang: Lang, today: Date) -> Self {
        Self {
            prompt,
            store,
            lang,
            today,
        }
    }

    pub fn output(&self) -> &W {
        self.prompt.output()
    }
}

impl<R, W> Session<R, W>
where
    R: BufRead,
    W: Write,
{
    fn say(&mut self, key: &str, args: &[&dyn std::fmt::Display]) -> io::Result<()> {
        let msg = self.lang.fill(key, args);
        self.prompt.say(msg)
    }

    /// Read the history of an existing habit, reporting file diagnostics
    fn open(&mut self, habit: &str) -> Result<HabitSeries> {
        if !self.store.exists(habit) {
            self.say("habits.not_found", &[&habit])?;
            return Err(SessionError::NotFound(habit.to_string()));
        }
        let mut errs = error::Record::new();
        let loaded = self.store.load(habit, &mut errs)?;
        if !errs.is_empty() {
            self.prompt.say(errs.to_string())?;
        }
        match loaded {
            Some(series) if !errs.is_fatal() => Ok(series),
            _ => {
                self.say("error.load", &[&habit])?;
                Err(SessionError::Unreadable(habit.to_string()))
            }
        }
    }

    /// Ask for the time spent on `date` until it is accepted
    ///
    /// `Ok(None)` when the input closes before a valid entry.
    fn collect(&mut self, gapfill: &GapFill, series: &mut HabitSeries, date: Date) -> Result<Option<FillState>> {
        loop {
            self.say("track.ask", &[&date.long()])?;
            let hours = match self.prompt.ask(self.lang.get("entry.hours"))? {
                Some(hours) => hours,
                None => return Ok(None),
            };
            let minutes = match self.prompt.ask(self.lang.get("entry.minutes"))? {
                Some(minutes) => minutes,
                None => return Ok(None),
            };
            match gapfill.submit(series, date, &hours, &minutes) {
                Ok(state) => return Ok(Some(state)),
                Err(HabitError::InvalidDuration { field, input, max }) => {
                    let key = if field == "hours" { "entry.invalid_hours" } else { "entry.invalid_minutes" };
                    self.say(key, &[&input, &max])?
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub fn list(&mut self) -> Result<()> {
        let habits = self.store.habits()?;
        if habits.is_empty() {
            self.say("habits.none", &[])?;
        } else {
            self.say("habits.list", &[])?;
            for habit in habits {
                self.prompt.say(format!("  - {}", habit))?;
            }
        }
        Ok(())
    }

    /// Start tracking `habit` with an entry for today
    pub fn new_habit(&mut self, habit: &str) -> Result<()> {
        if self.store.exists(habit) {
            self.say("new.exists", &[&habit])?;
            return Ok(());
        }
        self.say("new.journey", &[])?;
        let gapfill = GapFill::new(self.today);
        let mut series = HabitSeries::new(habit);
        match self.collect(&gapfill, &mut series, self.today)? {
            Some(_) => {
                self.store.create(&series)?;
                info!("started '{}' on {}", habit, self.today);
                self.say("new.started", &[])?;
            }
            None => self.say("new.cancelled", &[])?,
        }
        Ok(())
    }

    /// Fill every day between the latest record and today
    ///
    /// Each entry is saved as soon as it is accepted.
    pub fn track(&mut self, habit: &str) -> Result<()> {
        let mut series = self.open(habit)?;
        let gapfill = GapFill::new(self.today);
        let mut date = match gapfill.state(&series) {
            FillState::AwaitingEntry(date) => date,
            FillState::UpToDate | FillState::Complete => {
                self.say("track.up_to_date", &[])?;
                return Ok(());
            }
        };
        debug!("'{}' needs {} entries", habit, gapfill.pending(&series).count());
        self.say("track.catching_up", &[])?;
        let before = series.len();
        loop {
            let state = self.collect(&gapfill, &mut series, date)?;
            if state.is_some() {
                self.store.append(habit, &series.records()[series.len() - 1..])?;
            }
            match state {
                Some(FillState::AwaitingEntry(next)) => date = next,
                Some(_) => {
                    self.say("track.done", &[])?;
                    return Ok(());
                }
                None => {
                    let saved = series.len() - before;
                    self.say("track.interrupted", &[&saved])?;
                    return Ok(());
                }
            }
        }
    }

    /// Overall, weekly and monthly averages, or the average of the last `days`
    pub fn averages(&mut self, habit: &str, days: Option<&str>) -> Result<()> {
        let series = self.open(habit)?;
        if let Some(days) = days {
            let requested = days
                .trim()
                .parse::<usize>()
                .map_err(|_| HabitError::InvalidDays(days.to_string()))?;
            return match stats::last_n_average(&series, requested) {
                Ok((used, avg)) => {
                    if used < requested {
                        self.say("avg.clamped", &[&used])?;
                    }
                    let avg = self.lang.duration(avg);
                    self.say("avg.last_n", &[&used, &avg])?;
                    Ok(())
                }
                Err(HabitError::EmptySeries) => Ok(self.say("avg.not_enough", &[])?),
                Err(e) => Err(e.into()),
            };
        }
        let averages = Averages::of(&series);
        let overall = match averages.overall {
            Some(overall) => self.lang.duration(overall),
            None => {
                self.say("avg.not_enough", &[])?;
                return Ok(());
            }
        };
        self.say("avg.heading", &[])?;
        self.say("avg.overall", &[&averages.days, &overall])?;
        if let Some(last7) = averages.last7 {
            let last7 = self.lang.duration(last7);
            self.say("avg.last7", &[&last7])?;
        }
        if let Some(last30) = averages.last30 {
            let last30 = self.lang.duration(last30);
            self.say("avg.last30", &[&last30])?;
        }
        Ok(())
    }

    /// Progress towards `hours`, asked for if not given
    pub fn goal(&mut self, habit: &str, hours: Option<&str>) -> Result<()> {
        let series = self.open(habit)?;
        if series.is_empty() {
            self.say("show.empty", &[])?;
            return Ok(());
        }
        let goal = match hours {
            Some(hours) => hours.parse::<Goal>()?,
            None => {
                self.say("goal.hint", &[])?;
                loop {
                    let answer = match self.prompt.ask(self.lang.get("goal.enter"))? {
                        Some(answer) => answer,
                        None => return Ok(()),
                    };
                    match answer.parse::<Goal>() {
                        Ok(goal) => break goal,
                        Err(_) => self.say("goal.invalid", &[&answer])?,
                    }
                }
            }
        };
        match stats::goal_progress(&series, goal) {
            Ok(GoalProgress::Reached { goal_hours, .. }) => self.say("goal.reached", &[&goal_hours])?,
            Ok(GoalProgress::InProgress(p)) => {
                let completed = format!("{:.1}", p.completed_hours);
                let per_day = format!("{:.1}", p.average_hours_per_day);
                let remaining = format!("{:.1}", p.hours_remaining);
                let days = format!("{:.0}", p.days_remaining);
                let years = format!("{:.2}", p.years_remaining);
                self.say(
                    "goal.progress",
                    &[&completed, &p.goal_hours, &p.percent_rounded(), &per_day, &remaining, &days, &years],
                )?;
            }
            Err(HabitError::ProjectionUndefined) => self.say("goal.undefined", &[])?,
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    /// Write the chart of `habit` to `output` and print the aggregates
    pub fn graph(&mut self, habit: &str, output: &Path) -> Result<()> {
        let series = self.open(habit)?;
        let data = match chart::build(&series) {
            Ok(data) => data,
            Err(HabitError::EmptySeries) => {
                self.say("show.empty", &[])?;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        Plotter::from(&data, self.lang)
            .render(output)
            .map_err(|e| HabitError::persistence(output, e))?;
        if let Some(weekly) = &data.weekly {
            let table = Table::buckets(weekly, data.unit, self.lang).with_title(self.lang.get("graph.weekly"));
            self.prompt.say(table.to_string())?;
        }
        if let Some(monthly) = &data.monthly {
            let table = Table::buckets(monthly, data.unit, self.lang).with_title(self.lang.get("graph.monthly"));
            self.prompt.say(table.to_string())?;
        }
        self.say("graph.saved", &[&output.display()])?;
        Ok(())
    }

    /// Every recorded day
    pub fn show(&mut self, habit: &str) -> Result<()> {
        let series = self.open(habit)?;
        match (series.first_date(), series.latest_date()) {
            (Ok(first), Ok(last)) => {
                self.say("show.span", &[&first, &last])?;
                let table = Table::records(&series, self.lang).with_title(series.name());
                self.prompt.say(table.to_string())?;
            }
            _ => self.say("show.empty", &[])?,
        }
        Ok(())
    }

    pub fn export(&mut self, habit: &str, dest: &Path) -> Result<()> {
        let series = self.open(habit)?;
        self.store.export(&series, dest)?;
        self.say("export.done", &[&series.len(), &dest.display()])?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lib::date::Month::*;
    use std::fs;

    macro_rules! dt {
        ( $y:tt - $m:tt - $d:tt ) => {
            Date::from($y, $m, $d).unwrap()
        };
    }

    fn session<'i>(dir: &Path, input: &'i str, today: Date) -> Session<&'i [u8], Vec<u8>> {
        Session::new(Prompt::new(input.as_bytes(), Vec::new()), Store::new(dir), Lang::En, today)
    }

    fn text<R>(s: &Session<R, Vec<u8>>) -> String {
        String::from_utf8(s.output().clone()).unwrap()
    }

    #[test]
    fn new_then_track() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path(), "1\n30\n", dt!(2024-Jan-01));
        s.new_habit("piano").unwrap();
        assert!(text(&s).contains("New habit started"));
        assert!(text(&s).contains("Mon, Jan 01, 2024"));

        let mut s = session(dir.path(), "x\n0\n0\n15\n2\n0\n", dt!(2024-Jan-03));
        s.track("piano").unwrap();
        let out = text(&s);
        assert!(out.contains("Invalid input"));
        assert!(out.contains("Habit tracked!"));
        assert_eq!(
            fs::read_to_string(dir.path().join("piano.csv")).unwrap(),
            "date,duration\n2024-01-01,01:30\n2024-01-02,00:15\n2024-01-03,02:00\n"
        );

        let mut s = session(dir.path(), "", dt!(2024-Jan-03));
        s.track("piano").unwrap();
        assert!(text(&s).contains("Already up to date!"));
    }

    #[test]
    fn interrupted_track_keeps_entries() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("run.csv"), "date,duration\n2024-01-01,00:30\n").unwrap();
        let mut s = session(dir.path(), "0\n20\n0\n", dt!(2024-Jan-05));
        s.track("run").unwrap();
        assert!(text(&s).contains("1 new days were saved"));
        let mut s = session(dir.path(), "0\n1\n0\n2\n0\n3\n", dt!(2024-Jan-05));
        s.track("run").unwrap();
        let contents = fs::read_to_string(dir.path().join("run.csv")).unwrap();
        assert_eq!(contents.lines().count(), 6);
        assert!(contents.ends_with("2024-01-05,00:03\n"));
    }

    #[test]
    fn existing_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("run.csv"), "date,duration\n").unwrap();
        let mut s = session(dir.path(), "", dt!(2024-Jan-05));
        s.new_habit("run").unwrap();
        assert!(text(&s).contains("already tracking"));
        let err = s.track("swim").unwrap_err();
        assert!(err.is_reported());
        assert!(text(&s).contains("Habit 'swim' not found."));
        s.new_habit("swim").unwrap();
        assert!(text(&s).contains("was not created"));
        assert!(!dir.path().join("swim.csv").exists());
    }

    #[test]
    fn averages_and_goal() {
        let dir = tempfile::tempdir().unwrap();
        let mut contents = "date,duration\n".to_string();
        for day in 1..=25 {
            contents.push_str(&format!("2024-01-{:02},02:00\n", day));
        }
        fs::write(dir.path().join("code.csv"), contents).unwrap();
        let mut s = session(dir.path(), "zero\n40\n", dt!(2024-Jan-25));
        s.averages("code", None).unwrap();
        s.averages("code", Some("40")).unwrap();
        s.goal("code", None).unwrap();
        s.goal("code", Some("10,000")).unwrap();
        let out = text(&s);
        assert!(out.contains("Overall (25 days): 2 hours"));
        assert!(out.contains("Last 7 days: 2 hours"));
        assert!(!out.contains("Last 30 days"));
        assert!(out.contains("You only have 25 days recorded."));
        assert!(out.contains("Invalid input 'zero': enter a positive whole number of hours."));
        assert!(out.contains("You've already reached your goal of 40 hours."));
        assert!(out.contains("You have completed 50.0 of 10000 hours (1%)."));
        assert!(out.contains("4975 days, or 13.63 years"));
        assert!(s.averages("code", Some("0")).is_err());
    }

    #[test]
    fn graph_show_export() {
        let dir = tempfile::tempdir().unwrap();
        let mut contents = "date,duration\n".to_string();
        for day in 1..=20 {
            contents.push_str(&format!("2024-01-{:02},00:{:02}\n", day, day));
        }
        fs::write(dir.path().join("read.csv"), contents).unwrap();
        let svg = dir.path().join("read.svg");
        let copy = dir.path().join("copy.csv");
        let mut s = session(dir.path(), "", dt!(2024-Jan-20));
        s.graph("read", &svg).unwrap();
        s.show("read").unwrap();
        s.export("read", &copy).unwrap();
        let out = text(&s);
        assert!(svg.is_file());
        assert!(out.contains("Weekly Averages"));
        assert!(!out.contains("Monthly Averages"));
        assert!(out.contains("From 2024-01-01 to 2024-01-20"));
        assert!(out.contains("│ 2024-01-20 │    00:20 │"));
        assert!(out.contains("Exported 20 days"));
        assert!(fs::read_to_string(&copy).unwrap().contains("2024-01-20,00:20:00"));
    }

    #[test]
    fn japanese_prompts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("run.csv"), "date,duration\n2024-01-01,00:30\n").unwrap();
        let input = "x\n0\n1\n75\n0\n40\nlots\n";
        let mut s = Session::new(Prompt::new(input.as_bytes(), Vec::new()), Store::new(dir.path()), Lang::Ja, dt!(2024-Jan-02));
        s.track("run").unwrap();
        s.goal("run", None).unwrap();
        let out = text(&s);
        assert!(out.contains("無効な入力です「x」: 時間は0から23までの整数です。"));
        assert!(out.contains("無効な入力です「75」: 分は0から59までの整数です。"));
        assert!(out.contains("無効な入力です「lots」"));
        assert!(out.contains("記録しました！"));
        assert!(!out.contains("invalid"));
    }

    #[test]
    fn listing() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path(), "", dt!(2024-Jan-01));
        s.list().unwrap();
        assert!(text(&s).contains("not tracking any habit"));
        fs::write(dir.path().join("sight_reading.csv"), "date,duration\n").unwrap();
        s.list().unwrap();
        assert!(text(&s).contains("  - sight reading"));
    }
}
