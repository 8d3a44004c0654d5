use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Tabs};
use ratatui::Frame;

use crate::app::{App, Screen};
use crate::theme::Theme;

pub mod compare;
pub mod help;
pub mod library;
pub mod upload;

/// Spinner frames for animated progress indication.
const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Get the current spinner character based on a tick counter.
pub fn spinner_char(tick: usize) -> char {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Truncate a string to fit in `max_width` columns, appending "…" if truncated.
pub fn truncate(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

/// Top bar: app name plus one tab per view.
pub fn render_tabs(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let titles: Vec<Line> = Screen::ALL
        .iter()
        .enumerate()
        .map(|(i, s)| Line::from(format!("{} {}", i + 1, s.title())))
        .collect();

    let [brand, tabs_area] =
        Layout::horizontal([Constraint::Length(12), Constraint::Min(10)]).areas(area);

    f.render_widget(
        Paragraph::new(Span::styled(" PAPERLENS ", theme.header_style())),
        brand,
    );
    let tabs = Tabs::new(titles)
        .select(app.screen.index())
        .style(Style::default().fg(theme.dim))
        .highlight_style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
        .divider(" | ");
    f.render_widget(tabs, tabs_area);
}

/// Notice line (left) or nothing.
pub fn render_notice(f: &mut Frame, area: Rect, app: &App) {
    if let Some(notice) = &app.notice {
        let line = Line::from(Span::styled(
            format!(" {}", notice.text()),
            app.theme.notice_style(notice),
        ));
        f.render_widget(Paragraph::new(line), area);
    }
}

pub fn render_footer(f: &mut Frame, area: Rect, keys: &str, theme: &Theme) {
    let footer = Line::from(Span::styled(format!(" {keys}"), theme.footer_style()));
    f.render_widget(Paragraph::new(footer), area);
}

pub fn section_header<'a>(lines: &mut Vec<Line<'a>>, title: &'a str, theme: &Theme) {
    lines.push(Line::from(Span::styled(format!("  {title}"), theme.section_style())));
}

pub fn labeled_line<'a>(lines: &mut Vec<Line<'a>>, label: &'a str, value: &str, theme: &Theme) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {label:<18}"), Style::default().fg(theme.dim)),
        Span::styled(value.to_string(), Style::default().fg(theme.text)),
    ]));
}

pub fn bullet_line<'a>(lines: &mut Vec<Line<'a>>, value: &str, theme: &Theme) {
    lines.push(Line::from(Span::styled(
        format!("    • {value}"),
        Style::default().fg(theme.text),
    )));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_is_char_aware() {
        assert_eq!(truncate("ééééé", 3), "éé…");
        assert_eq!(truncate("abc", 3), "abc");
        assert_eq!(truncate("abc", 0), "");
    }
}
