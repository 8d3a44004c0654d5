use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::theme::Theme;

/// Render the help overlay as a centered popup.
pub fn render(f: &mut Frame, theme: &Theme) {
    let area = f.area();
    let popup = centered_rect(66, 34, area);

    let lines = vec![
        Line::from(Span::styled(
            " Keyboard Shortcuts ",
            Style::default()
                .fg(theme.header_fg)
                .bg(theme.header_bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section_header("Views", theme),
        key_line("1 / 2 / 3", "Library / Upload Paper / Compare Papers", theme),
        key_line("Tab", "Next view", theme),
        Line::from(""),
        section_header("Navigation", theme),
        key_line("j / ↓   k / ↑", "Move down / up", theme),
        key_line("Ctrl+d / PgDn", "Page down (scrolls result on Compare)", theme),
        key_line("Ctrl+u / PgUp", "Page up (scrolls result on Compare)", theme),
        key_line("g / G", "Go to top / bottom", theme),
        Line::from(""),
        section_header("Library", theme),
        key_line("Enter / Esc", "Expand / collapse paper details", theme),
        Line::from(""),
        section_header("Upload Paper", theme),
        key_line("Space", "Choose or unchoose a PDF", theme),
        key_line("Enter", "Analyze chosen papers", theme),
        key_line("R", "Rescan directory", theme),
        Line::from(""),
        section_header("Compare Papers", theme),
        key_line("Space", "Select or unselect a paper", theme),
        key_line("c / Enter", "Compare selected papers", theme),
        key_line("r", "New comparison (clear result)", theme),
        Line::from(""),
        section_header("Global", theme),
        key_line("?", "Toggle this help", theme),
        key_line("q / Ctrl+c", "Quit", theme),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active))
                .title(" Help "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn section_header<'a>(title: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD),
    ))
}

fn key_line<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {key:<16}"), Style::default().fg(theme.text)),
        Span::styled(desc, Style::default().fg(theme.dim)),
    ])
}

/// Create a centered rectangle of the given width (columns) and height (rows).
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area);
    Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .split(vertical[0])[0]
}
