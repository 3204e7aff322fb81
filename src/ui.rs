use std::fmt;

use chrono::{DateTime, TimeZone};
use ratatui::{prelude::*, widgets::*};

use crate::messages::AppTab;
use crate::screens::CourseRow;

/// Renders the bottom tab titles
pub fn render_tabs<'a>(selected: AppTab) -> Tabs<'a> {
    let titles: Vec<Line> = AppTab::ALL
        .iter()
        .map(|t| Line::from(format!(" {}:{} ", t.index() + 1, t.title())))
        .collect();

    Tabs::new(titles)
        .select(selected.index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .divider("|")
}

pub fn format_price(price: f64) -> String {
    if price <= 0.0 {
        "Free".to_string()
    } else {
        format!("${:.2}", price)
    }
}

pub fn format_rating(avg: f64, count: u32) -> String {
    format!("★ {:.1} ({})", avg, count)
}

pub fn price_color(price: f64) -> Color {
    if price <= 0.0 {
        Color::Green
    } else {
        Color::Yellow
    }
}

/// One course as a single list line
pub fn course_line(row: &CourseRow) -> Line<'static> {
    let course = &row.course;
    let saved = if row.saved { "♥ " } else { "♡ " };
    Line::from(vec![
        Span::styled(saved, Style::default().fg(Color::Red)),
        Span::styled(course.title.clone(), Style::default().bold()),
        Span::styled(
            format!("  {}", row.teacher),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!("  {}", format_price(course.price)),
            Style::default().fg(price_color(course.price)),
        ),
        Span::styled(
            format!("  {}", format_rating(course.rating_avg, course.rating_count)),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!("  {} lessons", course.lesson_count),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

/// Interleaves group headings with row lines.
///
/// Returns the list items and, for each row, its position in the list,
/// so a row selection can be mapped onto the rendered list.
pub fn with_headings(
    headings: &[&str],
    lines: Vec<Line<'static>>,
) -> (Vec<ListItem<'static>>, Vec<usize>) {
    let mut items = Vec::with_capacity(lines.len() + headings.len());
    let mut positions = Vec::with_capacity(lines.len());
    let mut current: Option<&str> = None;

    for (heading, line) in headings.iter().zip(lines) {
        if current != Some(*heading) {
            if current.is_some() {
                items.push(ListItem::new(""));
            }
            items.push(ListItem::new(Line::from(Span::styled(
                heading.to_string(),
                Style::default().fg(Color::Cyan).bold(),
            ))));
            current = Some(heading);
        }
        positions.push(items.len());
        items.push(ListItem::new(line));
    }
    (items, positions)
}

/// Bordered list with the selection highlighted
pub fn selectable_list<'a>(items: Vec<ListItem<'a>>, title: String) -> List<'a> {
    List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray).bold())
        .highlight_symbol("> ")
}

/// Muted single-line message used for empty and error states
pub fn placeholder(text: impl Into<String>, color: Color) -> Paragraph<'static> {
    Paragraph::new(text.into())
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
}

/// Status bar note for when data last arrived
pub fn updated_label<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    format!("updated {}", at.format("%H:%M"))
}

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Spinner glyph for a frame counter
pub fn spinner(tick: usize) -> &'static str {
    SPINNER[tick % SPINNER.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::fixtures;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0.0), "Free");
        assert_eq!(format_price(49.99), "$49.99");
        assert_eq!(format_price(10.0), "$10.00");
    }

    #[test]
    fn test_format_rating() {
        assert_eq!(format_rating(4.5, 120), "★ 4.5 (120)");
        assert_eq!(format_rating(4.0, 0), "★ 4.0 (0)");
    }

    #[test]
    fn test_course_line_mentions_teacher_and_price() {
        let row = CourseRow {
            course: fixtures::course(1, "Rust", 1, 100, 0.0),
            teacher: "Sara".into(),
            saved: true,
        };
        let text: String = course_line(&row)
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert!(text.starts_with("♥ Rust"));
        assert!(text.contains("Sara"));
        assert!(text.contains("Free"));
        assert!(text.contains("12 lessons"));
    }

    #[test]
    fn test_with_headings_positions() {
        let headings = ["A", "A", "B"];
        let lines = vec![Line::from("1"), Line::from("2"), Line::from("3")];
        let (items, positions) = with_headings(&headings, lines);
        // A, 1, 2, blank, B, 3
        assert_eq!(items.len(), 6);
        assert_eq!(positions, vec![1, 2, 5]);
    }

    #[test]
    fn test_updated_label() {
        let at = chrono::Utc.with_ymd_and_hms(2026, 10, 17, 9, 5, 42).unwrap();
        assert_eq!(updated_label(&at), "updated 09:05");
    }

    #[test]
    fn test_spinner_wraps() {
        assert_eq!(spinner(0), spinner(4));
    }
}
