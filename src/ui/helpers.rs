use anyhow::Error;
use chrono::{Local, NaiveDateTime};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};

use crate::error::{InterchangeError, StoreError};
use crate::models::{truncate_to_seconds, Priority};

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Pick the message to show for a chained error: the first store or
/// interchange error in the chain, otherwise the root cause.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .find(|cause| cause.is::<InterchangeError>() || cause.is::<StoreError>())
        .or_else(|| err.chain().last())
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Highlight for table cells whose text contains the active keyword, compared
/// case-insensitively.
pub(crate) fn keyword_match_style(text: &str, keyword: Option<&str>) -> Style {
    match keyword {
        Some(keyword) if text.to_lowercase().contains(&keyword.to_lowercase()) => Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        _ => Style::default(),
    }
}

/// Colour coding for the priority column.
pub(crate) fn priority_style(priority: Priority) -> Style {
    match priority {
        Priority::Rendah => Style::default().fg(Color::Green),
        Priority::Sedang => Style::default().fg(Color::Yellow),
        Priority::Tinggi => Style::default().fg(Color::LightRed),
        Priority::Urgent => Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD),
    }
}

/// Local wall-clock time at second precision.
pub(crate) fn local_now() -> NaiveDateTime {
    truncate_to_seconds(Local::now().naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn surface_error_shows_root_cause() {
        let err = Err::<(), _>(std::io::Error::other("disk full"))
            .context("failed to write export")
            .unwrap_err();
        assert_eq!(surface_error(&err), "disk full");
    }

    #[test]
    fn surface_error_prefers_the_typed_message() {
        let read = InterchangeError::Read {
            path: "backup/agenda.json".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let err = Err::<(), _>(read)
            .context("failed to import agenda")
            .unwrap_err();
        assert_eq!(surface_error(&err), "failed to read backup/agenda.json");

        let malformed = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err = anyhow::Error::from(InterchangeError::Malformed { source: malformed })
            .context("failed to import agenda");
        assert_eq!(
            surface_error(&err),
            "file is neither an agenda export nor a list of agenda entries"
        );
    }

    #[test]
    fn keyword_highlight_ignores_case() {
        let highlighted = keyword_match_style("Rapat tim", Some("RAPAT"));
        assert_eq!(highlighted.bg, Some(Color::Yellow));
        assert_eq!(keyword_match_style("Rapat tim", Some("kopi")), Style::default());
        assert_eq!(keyword_match_style("Rapat tim", None), Style::default());
    }

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(60, 50, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 20);
        assert_eq!(popup.x, 20);
        assert_eq!(popup.y, 10);
    }
}
