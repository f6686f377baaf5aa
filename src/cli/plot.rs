use std::path::Path;

use svg::{
    node::{
        element::{path::Data, Circle, Line, Path as SvgPath, Text},
        Text as TextNode,
    },
    Document,
};

use crate::cli::lang::Lang;
use crate::lib::chart::{ChartSeries, Point, Unit};

/// Draws a `ChartSeries` as an SVG line chart
pub struct Plotter<'d> {
    data: &'d ChartSeries,
    lang: Lang,
}

/// How one series of points is drawn
struct Style {
    color: &'static str,
    label: &'static str,
    line: bool,
    dashed: bool,
    radius: f64,
}

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 700.0;
const MARGIN: f64 = 60.0;
const STROKE_WIDTH: f64 = 2.0;
const GRID_LINES: usize = 5;

impl<'d> Plotter<'d> {
    pub fn from(data: &'d ChartSeries, lang: Lang) -> Self {
        Self { data, lang }
    }

    /// Styles follow the amount of aggregation: the most aggregated
    /// series is the one that stands out
    fn layers(&self) -> Vec<(Vec<Point>, Style)> {
        let daily = self.data.daily.clone();
        let label = |key| self.lang.get(key);
        match (&self.data.weekly, &self.data.monthly) {
            (Some(weekly), Some(monthly)) => vec![
                (daily, Style { color: "gray", label: label("graph.daily"), line: false, dashed: false, radius: 2.0 }),
                (weekly.iter().map(|b| b.point()).collect(), Style { color: "blue", label: label("graph.weekly"), line: true, dashed: true, radius: 2.5 }),
                (monthly.iter().map(|b| b.point()).collect(), Style { color: "red", label: label("graph.monthly"), line: true, dashed: false, radius: 4.0 }),
            ],
            (Some(weekly), None) => vec![
                (daily, Style { color: "blue", label: label("graph.daily"), line: false, dashed: false, radius: 2.5 }),
                (weekly.iter().map(|b| b.point()).collect(), Style { color: "red", label: label("graph.weekly"), line: true, dashed: false, radius: 4.0 }),
            ],
            _ => vec![
                (daily, Style { color: "red", label: label("graph.daily"), line: true, dashed: false, radius: 4.0 }),
            ],
        }
    }

    pub fn document(&self) -> Document {
        let layers = self.layers();
        let (xmin, xmax, ymax) = {
            let mut xmin = i64::MAX;
            let mut xmax = i64::MIN;
            let mut ymax = 0.0f64;
            for (points, _) in &layers {
                for pt in points {
                    let x = pt.date.index() as i64;
                    xmin = xmin.min(x);
                    xmax = xmax.max(x);
                    ymax = ymax.max(pt.value);
                }
            }
            // weekly and monthly points sit at the end of their period
            (xmin, xmax.max(xmin + 1), if ymax > 0.0 { ymax * 1.1 } else { 1.0 })
        };
        let resize_x = |x: i64| (x - xmin) as f64 / (xmax - xmin) as f64 * WIDTH;
        let resize_y = |y: f64| HEIGHT - y / ymax * HEIGHT;

        let mut document = Document::new()
            .set("viewBox", (-MARGIN * 1.5, -MARGIN, WIDTH + 3.0 * MARGIN, HEIGHT + 2.5 * MARGIN))
            .set("font-family", "sans-serif");

        // horizontal grid with value labels
        for i in 0..=GRID_LINES {
            let value = ymax * i as f64 / GRID_LINES as f64;
            let y = resize_y(value);
            document = document
                .add(Line::new()
                    .set("x1", 0.0)
                    .set("x2", WIDTH)
                    .set("y1", y)
                    .set("y2", y)
                    .set("stroke", "lightgray")
                    .set("stroke-width", 1.0))
                .add(label(-8.0, y + 5.0, format!("{:.1}", value)).set("text-anchor", "end"));
        }
        if let (Some(first), Some(last)) = (self.data.daily.first(), self.data.daily.last()) {
            document = document
                .add(label(0.0, HEIGHT + 25.0, first.date.to_string()))
                .add(label(WIDTH, HEIGHT + 25.0, last.date.to_string()).set("text-anchor", "end"));
        }

        for (points, style) in &layers {
            if style.line && points.len() > 1 {
                let mut data = Data::new().move_to((resize_x(points[0].date.index() as i64), resize_y(points[0].value)));
                for pt in &points[1..] {
                    data = data.line_to((resize_x(pt.date.index() as i64), resize_y(pt.value)));
                }
                let mut path = SvgPath::new()
                    .set("fill", "none")
                    .set("stroke", style.color)
                    .set("stroke-width", STROKE_WIDTH)
                    .set("d", data);
                if style.dashed {
                    path = path.set("stroke-dasharray", "8,6");
                }
                document = document.add(path);
            }
            for pt in points {
                document = document.add(Circle::new()
                    .set("cx", resize_x(pt.date.index() as i64))
                    .set("cy", resize_y(pt.value))
                    .set("r", style.radius)
                    .set("fill", style.color));
            }
        }

        let yaxis = Line::new()
            .set("x1", 0.0)
            .set("x2", 0.0)
            .set("y1", 0.0)
            .set("y2", HEIGHT)
            .set("stroke", "black")
            .set("stroke-width", STROKE_WIDTH);
        let xaxis = Line::new()
            .set("x1", 0.0)
            .set("x2", WIDTH)
            .set("y1", HEIGHT)
            .set("y2", HEIGHT)
            .set("stroke", "black")
            .set("stroke-width", STROKE_WIDTH);
        let unit = match self.data.unit {
            Unit::Minutes => self.lang.get("misc.minutes"),
            Unit::Hours => self.lang.get("misc.hours"),
        };
        document = document
            .add(yaxis)
            .add(xaxis)
            .add(label(WIDTH / 2.0, -MARGIN / 2.0, self.lang.get("graph.title"))
                .set("text-anchor", "middle")
                .set("font-size", 24))
            .add(label(WIDTH / 2.0, HEIGHT + 50.0, self.lang.get("graph.dates")).set("text-anchor", "middle"))
            .add(label(-MARGIN, -10.0, unit));

        // legend
        for (i, (_, style)) in layers.iter().enumerate() {
            let y = 20.0 + 25.0 * i as f64;
            document = document
                .add(Circle::new()
                    .set("cx", WIDTH + 15.0)
                    .set("cy", y - 5.0)
                    .set("r", 5.0)
                    .set("fill", style.color))
                .add(label(WIDTH + 25.0, y, style.label).set("font-size", 12));
        }
        document
    }

    pub fn render(&self, file: &Path) -> std::io::Result<()> {
        svg::save(file, &self.document())
    }
}

fn label<S>(x: f64, y: f64, text: S) -> Text
where
    S: Into<String>,
{
    Text::new()
        .set("x", x)
        .set("y", y)
        .set("font-size", 14)
        .add(TextNode::new(text))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lib::{
        chart,
        date::{Date, Month::*},
        duration::Duration,
        series::{DurationRecord, HabitSeries},
    };

    fn chart_of(n: usize) -> ChartSeries {
        let mut series = HabitSeries::new("plot");
        let mut d = Date::from(2024, Jan, 1).unwrap();
        for i in 0..n {
            series.append(DurationRecord::new(d, Duration::from_minutes((i % 5) as u32 * 10))).unwrap();
            d = d.next();
        }
        chart::build(&series).unwrap()
    }

    #[test]
    fn layers_follow_tiers() {
        assert_eq!(Plotter::from(&chart_of(3), Lang::En).layers().len(), 1);
        assert_eq!(Plotter::from(&chart_of(20), Lang::En).layers().len(), 2);
        let long = chart_of(70);
        let layers = Plotter::from(&long, Lang::En).layers();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[2].1.label, "Monthly Averages");
    }

    #[test]
    fn renders_single_day() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("one.svg");
        let data = chart_of(1);
        Plotter::from(&data, Lang::En).render(&file).unwrap();
        let svg = std::fs::read_to_string(&file).unwrap();
        assert!(svg.contains("Time Spent Per Day"));
        assert!(svg.contains("<circle"));
        assert!(!svg.contains("NaN"));
    }
}
