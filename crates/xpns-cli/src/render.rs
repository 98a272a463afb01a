use std::io::{self, IsTerminal, Write};

use unicode_width::UnicodeWidthStr;
use xpns_core::classes::ClassList;
use xpns_core::colors::Color;
use xpns_core::labels::Segment;
use xpns_core::views::{
    CalendarView, DayExpensesView, ManageTagsView, MonthChartView, OverviewView,
};

use crate::config::Config;

const CHART_WIDTH: usize = 40;

/// Prints view models as plain text tables. Tag badges become ANSI colors
/// when stdout is a terminal and `color` is on.
#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> Self {
        let color = cfg.get_bool("color").unwrap_or(true);
        Self {
            color: color && io::stdout().is_terminal(),
        }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    #[tracing::instrument(skip_all)]
    pub fn write_tags<W: Write>(&self, out: &mut W, view: &ManageTagsView) -> anyhow::Result<()> {
        let rows = view
            .rows
            .iter()
            .map(|row| {
                vec![
                    format!("{}{}", "  ".repeat(row.depth), self.badge(&row.name, &row.badge)),
                    badge_color(&row.badge).unwrap_or_default().to_string(),
                ]
            })
            .collect();
        write_table(out, &["Kategorie", "Farbe"], rows)
    }

    #[tracing::instrument(skip_all)]
    pub fn write_colors<W: Write>(&self, out: &mut W, colors: &[&Color]) -> anyhow::Result<()> {
        let rows = colors
            .iter()
            .map(|color| {
                let classes: ClassList = color.classes.iter().collect();
                vec![
                    color.key.clone(),
                    self.badge(&color.name, &classes),
                    classes.to_attr(),
                ]
            })
            .collect();
        write_table(out, &["Key", "Name", "Classes"], rows)
    }

    #[tracing::instrument(skip_all)]
    pub fn write_overview<W: Write>(&self, out: &mut W, view: &OverviewView) -> anyhow::Result<()> {
        writeln!(out, "{}", view.month_label)?;
        let mut rows: Vec<Vec<String>> = view
            .rows
            .iter()
            .filter(|row| row.total != 0.0)
            .map(|row| {
                vec![
                    format!("{}{}", "  ".repeat(row.depth), self.badge(&row.name, &row.badge)),
                    row.total_label.clone(),
                ]
            })
            .collect();
        rows.push(vec!["(ohne Kategorie)".to_string(), view.untagged_label.clone()]);
        rows.push(vec!["Summe".to_string(), view.total_label.clone()]);
        write_table(out, &["Kategorie", "Betrag"], rows)
    }

    #[tracing::instrument(skip_all)]
    pub fn write_calendar<W: Write>(&self, out: &mut W, view: &CalendarView) -> anyhow::Result<()> {
        writeln!(out, "{}", view.month_label)?;
        let rows = view
            .weeks
            .iter()
            .map(|week| {
                week.iter()
                    .map(|cell| match cell {
                        Some(day) => {
                            let text = match &day.total {
                                Some(total) => format!("{:>2} {total}", day.day),
                                None => format!("{:>2}", day.day),
                            };
                            match (day.selected, day.today) {
                                (true, _) => self.paint(&text, "1"),
                                (false, true) => self.paint(&text, "4"),
                                (false, false) => text,
                            }
                        }
                        None => String::new(),
                    })
                    .collect()
            })
            .collect();
        let headers: Vec<&str> = view.weekdays.iter().map(String::as_str).collect();
        write_table(out, &headers, rows)
    }

    #[tracing::instrument(skip_all)]
    pub fn write_chart<W: Write>(&self, out: &mut W, view: &MonthChartView) -> anyhow::Result<()> {
        writeln!(out, "{}", view.month_label)?;
        for point in &view.points {
            let filled = if view.max > 0.0 {
                ((point.cumulative / view.max) * CHART_WIDTH as f64).round() as usize
            } else {
                0
            };
            writeln!(out, "{:>2} {}", point.day, "#".repeat(filled))?;
        }
        writeln!(out, "Summe {}", view.total_label)?;
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    pub fn write_day<W: Write>(&self, out: &mut W, view: &DayExpensesView) -> anyhow::Result<()> {
        writeln!(out, "{}", view.heading)?;
        let rows = view
            .rows
            .iter()
            .map(|row| {
                vec![
                    row.id.to_string(),
                    self.segments(&row.segments),
                    row.amount.clone(),
                    row.currency.clone(),
                    row.converted.clone().unwrap_or_default(),
                ]
            })
            .collect();
        write_table(out, &["Id", "Beschreibung", "Betrag", "Währung", "Umgerechnet"], rows)?;
        writeln!(out, "Summe {} ({})", view.total, view.day_label)?;
        Ok(())
    }

    fn segments(&self, segments: &[Segment]) -> String {
        segments
            .iter()
            .map(|segment| match segment {
                Segment::Text(text) => text.clone(),
                Segment::Label(badge) => self.badge(&format!("#{}", badge.name), &badge.classes),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn badge(&self, text: &str, classes: &ClassList) -> String {
        match classes.iter().find_map(ansi_code) {
            Some(code) => self.paint(text, code),
            None => text.to_string(),
        }
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn ansi_code(class: &str) -> Option<&'static str> {
    match class {
        "bg-primary" => Some("34"),
        "bg-secondary" => Some("90"),
        "bg-success" => Some("32"),
        "bg-danger" => Some("31"),
        "bg-warning" => Some("33"),
        "bg-info" => Some("36"),
        "bg-light" => Some("37"),
        "bg-dark" => Some("30;47"),
        _ => None,
    }
}

fn badge_color(classes: &ClassList) -> Option<&str> {
    classes.iter().find(|class| class.starts_with("bg-"))
}

pub fn write_table<W: Write>(
    writer: &mut W,
    headers: &[&str],
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(|h| UnicodeWidthStr::width(*h)).collect();
    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(idx) {
                *width = (*width).max(visible_width(cell));
            }
        }
    }

    for (header, width) in headers.iter().zip(&widths) {
        write!(writer, "{header}{} ", " ".repeat(width.saturating_sub(visible_width(header))))?;
    }
    writeln!(writer)?;

    for width in &widths {
        write!(writer, "{:-<width$} ", "", width = *width)?;
    }
    writeln!(writer)?;

    for row in rows {
        for (cell, width) in row.iter().zip(&widths) {
            let padding = width.saturating_sub(visible_width(cell));
            write!(writer, "{cell}{} ", " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn visible_width(s: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi(s).as_str())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        match (escaped, ch) {
            (true, 'm') => escaped = false,
            (true, _) => {}
            (false, '\x1b') => escaped = true,
            (false, _) => out.push(ch),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_on_visible_width() {
        let mut out = Vec::new();
        write_table(
            &mut out,
            &["Name", "Betrag"],
            vec![
                vec!["\x1b[32mGrün\x1b[0m".to_string(), "1,00".to_string()],
                vec!["Reisen".to_string(), "12,50".to_string()],
            ],
        )
        .expect("table");

        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Name   Betrag ");
        assert_eq!(lines[1], "------ ------ ");
        assert_eq!(strip_ansi(lines[2]), "Grün   1,00   ");
        assert_eq!(lines[3], "Reisen 12,50  ");
    }

    #[test]
    fn color_setting_off_disables_paint() {
        let mut cfg = Config::default();
        cfg.apply_overrides(vec![("rc.color".to_string(), "off".to_string())]);
        assert!(!Renderer::new(&cfg).color);
    }

    #[test]
    fn plain_renderer_does_not_paint() {
        let renderer = Renderer::plain();
        let classes: ClassList = ["badge", "bg-success"].into_iter().collect();
        assert_eq!(renderer.badge("Food", &classes), "Food");
    }

    #[test]
    fn strip_ansi_removes_escape_sequences() {
        assert_eq!(strip_ansi("\x1b[30;47mx\x1b[0m"), "x");
    }
}
