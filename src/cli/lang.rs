//! User-facing messages
//!
//! Every sentence printed by the application is looked up here by key.
//! Placeholders are `{}` and are filled in order by `Lang::fill`.

use std::fmt;
use std::str::FromStr;

use crate::lib::{duration::Duration, stats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    En,
    Ja,
}

impl Default for Lang {
    fn default() -> Self {
        Lang::En
    }
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Lang::En),
            "ja" => Ok(Lang::Ja),
            other => Err(format!("unsupported language '{}', use 'en' or 'ja'", other)),
        }
    }
}

impl Lang {
    /// Message for `key`, or the key itself if there is none
    pub fn get<'k>(self, key: &'k str) -> &'k str {
        let table = match self {
            Lang::En => EN,
            Lang::Ja => JA,
        };
        table
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, msg)| *msg)
            .unwrap_or(key)
    }

    /// Message for `key` with its placeholders replaced by `args`
    pub fn fill(self, key: &str, args: &[&dyn fmt::Display]) -> String {
        let mut out = String::new();
        let mut args = args.iter();
        let mut pieces = self.get(key).split("{}");
        if let Some(first) = pieces.next() {
            out.push_str(first);
        }
        for piece in pieces {
            match args.next() {
                Some(arg) => out.push_str(&arg.to_string()),
                None => out.push_str("{}"),
            }
            out.push_str(piece);
        }
        out
    }

    /// Friendly duration in this language
    pub fn duration(self, d: Duration) -> String {
        match self {
            Lang::En => stats::human_readable(d),
            Lang::Ja => match (d.whole_hours(), d.rem_minutes()) {
                (0, m) => format!("{}分", m),
                (h, 0) => format!("{}時間", h),
                (h, m) => format!("{}時間{}分", h, m),
            },
        }
    }
}

const EN: &[(&str, &str)] = &[
    ("habits.list", "The habits you're currently tracking are:"),
    ("habits.none", "You are not tracking any habit yet."),
    ("habits.not_found", "Habit '{}' not found."),
    ("new.exists", "You are already tracking a habit named '{}'. Please choose something different to start a new habit."),
    ("new.journey", "A journey of ten thousand hours begins with a single day."),
    ("new.started", "New habit started. Congratulations!"),
    ("new.cancelled", "No entry for today, the habit was not created."),
    ("track.up_to_date", "Already up to date!"),
    ("track.catching_up", "Let's get our data up to date!"),
    ("track.ask", "Enter the amount of time for {} in hours and minutes."),
    ("track.done", "Habit tracked!"),
    ("track.interrupted", "Stopped early, {} new days were saved. Run track again to continue."),
    ("entry.hours", "How many hours? "),
    ("entry.minutes", "How many minutes? "),
    ("entry.invalid_hours", "Invalid input '{}': hours are a whole number from 0 to {}."),
    ("entry.invalid_minutes", "Invalid input '{}': minutes are a whole number from 0 to {}."),
    ("avg.heading", "Average time spent per day"),
    ("avg.not_enough", "Not enough data yet, come back after at least 2 days."),
    ("avg.overall", "Overall ({} days): {}"),
    ("avg.last7", "Last 7 days: {}"),
    ("avg.last30", "Last 30 days: {}"),
    ("avg.last_n", "The average for the last {} recorded days is {}."),
    ("avg.clamped", "You only have {} days recorded."),
    ("goal.hint", "A common goal is 10,000 hours, but many people need far less to achieve what they want."),
    ("goal.enter", "What's your goal (in hours)? "),
    ("goal.invalid", "Invalid input '{}': enter a positive whole number of hours."),
    ("goal.reached", "You've already reached your goal of {} hours. Congrats!"),
    ("goal.progress", "You have completed {} of {} hours ({}%). At {} hours per day, {} hours remain: about {} days, or {} years."),
    ("goal.undefined", "No time has been recorded yet, so no completion date can be projected."),
    ("graph.title", "Time Spent Per Day"),
    ("graph.daily", "Daily Data"),
    ("graph.weekly", "Weekly Averages"),
    ("graph.monthly", "Monthly Averages"),
    ("graph.dates", "Dates"),
    ("graph.saved", "Graph saved to {}"),
    ("misc.minutes", "Minutes"),
    ("misc.hours", "Hours"),
    ("misc.days", "Days"),
    ("misc.average", "Average"),
    ("show.date", "Date"),
    ("show.duration", "Duration"),
    ("show.empty", "No days recorded yet."),
    ("show.span", "From {} to {}"),
    ("export.done", "Exported {} days to {}"),
    ("error.load", "Could not load '{}'."),
];

const JA: &[(&str, &str)] = &[
    ("habits.list", "記録中の習慣:"),
    ("habits.none", "まだ習慣を記録していません。"),
    ("habits.not_found", "習慣「{}」が見つかりません。"),
    ("new.exists", "「{}」という習慣はすでに記録中です。別の名前を入力してください。"),
    ("new.journey", "一万時間の旅も一日から始まる。"),
    ("new.started", "新しい習慣を始めました。おめでとうございます！"),
    ("new.cancelled", "今日の記録がないため、習慣は作成されませんでした。"),
    ("track.up_to_date", "データはすでに最新です！"),
    ("track.catching_up", "データを最新にしましょう！"),
    ("track.ask", "{}の時間を時間と分で入力してください。"),
    ("track.done", "記録しました！"),
    ("track.interrupted", "途中で終了しました。{}日分を保存しました。"),
    ("entry.hours", "何時間？ "),
    ("entry.minutes", "何分？ "),
    ("entry.invalid_hours", "無効な入力です「{}」: 時間は0から{}までの整数です。"),
    ("entry.invalid_minutes", "無効な入力です「{}」: 分は0から{}までの整数です。"),
    ("avg.heading", "1日あたりの平均時間"),
    ("avg.not_enough", "データが足りません。2日以上記録してください。"),
    ("avg.overall", "全体（{}日間）: {}"),
    ("avg.last7", "過去7日間: {}"),
    ("avg.last30", "過去30日間: {}"),
    ("avg.last_n", "直近{}日間の平均は{}です。"),
    ("avg.clamped", "記録は{}日分しかありません。"),
    ("goal.hint", "よくある目標は1万時間ですが、多くの人はもっと少ない時間で目的を達成できます。"),
    ("goal.enter", "目標は何時間ですか？ "),
    ("goal.invalid", "無効な入力です「{}」: 正の整数で時間を入力してください。"),
    ("goal.reached", "目標の{}時間をすでに達成しました。おめでとうございます！"),
    ("goal.progress", "{}時間 / {}時間を達成しました（{}%）。1日平均{}時間で、残り{}時間：約{}日、{}年です。"),
    ("goal.undefined", "まだ時間が記録されていないため、達成日を予測できません。"),
    ("graph.title", "1日あたりの時間"),
    ("graph.daily", "毎日のデータ"),
    ("graph.weekly", "週平均"),
    ("graph.monthly", "月平均"),
    ("graph.dates", "日付"),
    ("graph.saved", "グラフを{}に保存しました"),
    ("misc.minutes", "分"),
    ("misc.hours", "時間"),
    ("misc.days", "日数"),
    ("misc.average", "平均"),
    ("show.date", "日付"),
    ("show.duration", "時間"),
    ("show.empty", "まだ記録がありません。"),
    ("show.span", "{}から{}まで"),
    ("export.done", "{}日分を{}に書き出しました"),
    ("error.load", "「{}」を読み込めませんでした。"),
];
