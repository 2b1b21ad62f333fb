use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

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

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Keep the first line of the viewport on screen while the cursor moves
/// through a document taller than `height`.
pub(crate) fn scroll_to_cursor(cursor_line: usize, height: u16) -> u16 {
    let height = height.max(1) as usize;
    cursor_line.saturating_sub(height - 1).min(u16::MAX as usize) as u16
}

#[cfg(test)]
mod tests {
    use anyhow::{anyhow, Context};

    use super::*;

    #[test]
    fn surface_error_prefers_root_cause() {
        let err = Err::<(), _>(anyhow!("permission denied"))
            .context("failed to read /songs/x.onsong")
            .unwrap_err();
        assert_eq!(surface_error(&err), "permission denied");
    }

    #[test]
    fn scroll_keeps_cursor_visible() {
        assert_eq!(scroll_to_cursor(3, 10), 0);
        assert_eq!(scroll_to_cursor(12, 10), 3);
        assert_eq!(scroll_to_cursor(5, 0), 5);
    }
}
