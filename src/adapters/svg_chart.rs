//! SVG comparison chart rendering.
//!
//! Two value axes share one date axis: the instrument and its SMAs on the
//! left, the risk gauge, its percentile bands and the threshold on the right.
//! The first line on each axis is the primary series and gets an area fill.

use crate::domain::error::TrendguardError;
use crate::ports::chart_port::{ChartLine, ChartPort, ComparisonChart, LineStyle};
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 500.0;
const PAD_X: f64 = 70.0;
const PAD_TOP: f64 = 50.0;
const PAD_BOTTOM: f64 = 50.0;

const LEFT_COLORS: [&str; 7] = [
    "blue", "red", "orange", "purple", "brown", "magenta", "olive",
];
const RIGHT_COLORS: [&str; 4] = ["darkgreen", "teal", "goldenrod", "crimson"];

pub struct SvgChartAdapter {
    output_dir: PathBuf,
}

impl SvgChartAdapter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn chart_path(&self, symbol: &str) -> PathBuf {
        self.output_dir.join(format!("{}.svg", file_stem(symbol)))
    }
}

impl ChartPort for SvgChartAdapter {
    fn render(&self, chart: &ComparisonChart) -> Result<PathBuf, TrendguardError> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.chart_path(&chart.symbol);
        fs::write(&path, format_comparison_chart(chart))?;
        Ok(path)
    }
}

/// Index symbols such as `^GSPC` lose the caret; other unsafe characters become `_`.
fn file_stem(symbol: &str) -> String {
    symbol
        .trim_start_matches('^')
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn dash_array(style: LineStyle) -> &'static str {
    match style {
        LineStyle::Solid => "",
        LineStyle::Dashed => r#" stroke-dasharray="8,4""#,
        LineStyle::Dotted => r#" stroke-dasharray="2,3""#,
    }
}

/// Min and max over every defined value, widened when flat.
fn value_range(lines: &[ChartLine], extra: Option<f64>) -> Option<(f64, f64)> {
    let values = lines
        .iter()
        .flat_map(|l| l.values.iter().flatten().copied())
        .chain(extra)
        .filter(|v| v.is_finite());

    let (min, max) = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })?;

    if max - min > 0.0 {
        Some((min, max))
    } else {
        Some((min - 1.0, max + 1.0))
    }
}

struct Axis {
    min: f64,
    max: f64,
}

impl Axis {
    fn y(&self, value: f64) -> f64 {
        let plot_height = HEIGHT - PAD_TOP - PAD_BOTTOM;
        HEIGHT - PAD_BOTTOM - (value - self.min) / (self.max - self.min) * plot_height
    }
}

fn x_of(index: usize, count: usize) -> f64 {
    let plot_width = WIDTH - 2.0 * PAD_X;
    if count > 1 {
        PAD_X + index as f64 * plot_width / (count - 1) as f64
    } else {
        PAD_X
    }
}

/// Polyline point lists, split wherever the line is undefined.
fn segments(values: &[Option<f64>], count: usize, axis: &Axis) -> Vec<Vec<(f64, f64)>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for (i, value) in values.iter().enumerate() {
        match value {
            Some(v) if v.is_finite() => current.push((x_of(i, count), axis.y(*v))),
            _ => {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn points_attr(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{:.1},{:.1}", x, y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn draw_lines(svg: &mut String, lines: &[ChartLine], palette: &[&str], count: usize, axis: &Axis) {
    let baseline = HEIGHT - PAD_BOTTOM;
    for (n, line) in lines.iter().enumerate() {
        let color = palette[n % palette.len()];
        for segment in segments(&line.values, count, axis) {
            if n == 0 {
                if let (Some(first), Some(last)) = (segment.first(), segment.last()) {
                    let _ = writeln!(
                        svg,
                        r#"  <polygon points="{:.1},{:.1} {} {:.1},{:.1}" fill="{}" fill-opacity="0.3" stroke="none"/>"#,
                        first.0,
                        baseline,
                        points_attr(&segment),
                        last.0,
                        baseline,
                        color
                    );
                }
            }
            let _ = writeln!(
                svg,
                r#"  <polyline points="{}" fill="none" stroke="{}" stroke-width="1.2"{}/>"#,
                points_attr(&segment),
                color,
                dash_array(line.style)
            );
        }
    }
}

fn draw_legend(svg: &mut String, lines: &[ChartLine], palette: &[&str], x: f64, anchor: &str) {
    for (n, line) in lines.iter().enumerate() {
        let y = PAD_TOP + 14.0 + n as f64 * 14.0;
        let _ = writeln!(
            svg,
            r#"  <text x="{:.1}" y="{:.1}" font-size="11" text-anchor="{}" fill="{}">{}</text>"#,
            x,
            y,
            anchor,
            palette[n % palette.len()],
            escape_xml(&line.label)
        );
    }
}

pub fn format_comparison_chart(chart: &ComparisonChart) -> String {
    let count = chart.dates.len();
    let mut svg = String::new();

    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}" font-family="sans-serif">"#,
        WIDTH, HEIGHT, WIDTH, HEIGHT
    );
    let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"  <text x="{:.1}" y="25" font-size="16" text-anchor="middle">{}</text>"#,
        WIDTH / 2.0,
        escape_xml(&chart.title)
    );

    if count == 0 {
        let _ = writeln!(
            svg,
            r#"  <text x="{:.1}" y="{:.1}" text-anchor="middle">No price data available.</text>"#,
            WIDTH / 2.0,
            HEIGHT / 2.0
        );
        svg.push_str("</svg>\n");
        return svg;
    }

    let bottom = HEIGHT - PAD_BOTTOM;
    let right = WIDTH - PAD_X;
    let _ = writeln!(
        svg,
        r#"  <line x1="{PAD_X}" y1="{bottom}" x2="{right}" y2="{bottom}" stroke="black"/>"#
    );

    if let Some((min, max)) = value_range(&chart.left, None) {
        let axis = Axis { min, max };
        let _ = writeln!(
            svg,
            r#"  <line x1="{PAD_X}" y1="{PAD_TOP}" x2="{PAD_X}" y2="{bottom}" stroke="blue"/>"#
        );
        for value in [min, max] {
            let _ = writeln!(
                svg,
                r#"  <text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end" fill="blue">{:.2}</text>"#,
                PAD_X - 4.0,
                axis.y(value) + 4.0,
                value
            );
        }
        draw_lines(&mut svg, &chart.left, &LEFT_COLORS, count, &axis);
        draw_legend(&mut svg, &chart.left, &LEFT_COLORS, PAD_X + 8.0, "start");
    }

    if let Some((min, max)) = value_range(&chart.right, chart.threshold) {
        let axis = Axis { min, max };
        let _ = writeln!(
            svg,
            r#"  <line x1="{right}" y1="{PAD_TOP}" x2="{right}" y2="{bottom}" stroke="green"/>"#
        );
        for value in [min, max] {
            let _ = writeln!(
                svg,
                r#"  <text x="{:.1}" y="{:.1}" font-size="11" fill="green">{:.2}</text>"#,
                right + 4.0,
                axis.y(value) + 4.0,
                value
            );
        }
        draw_lines(&mut svg, &chart.right, &RIGHT_COLORS, count, &axis);
        if let Some(threshold) = chart.threshold {
            let y = axis.y(threshold);
            let _ = writeln!(
                svg,
                r#"  <line x1="{PAD_X}" y1="{y:.1}" x2="{right}" y2="{y:.1}" stroke="black" stroke-dasharray="8,3,2,3"/>"#
            );
            let _ = writeln!(
                svg,
                r#"  <text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end">Threshold {:.0}</text>"#,
                right - 4.0,
                y - 4.0,
                threshold
            );
        }
        draw_legend(&mut svg, &chart.right, &RIGHT_COLORS, WIDTH / 2.0, "middle");
    }

    for (index, anchor) in [(0, "start"), (count - 1, "end")] {
        let _ = writeln!(
            svg,
            r#"  <text x="{:.1}" y="{:.1}" font-size="11" text-anchor="{}">{}</text>"#,
            x_of(index, count),
            bottom + 18.0,
            anchor,
            chart.dates[index].format("%Y-%m-%d")
        );
    }

    svg.push_str("</svg>\n");
    svg
}
