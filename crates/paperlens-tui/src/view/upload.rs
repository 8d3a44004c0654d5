use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use paperlens_core::UploadPhase;

use crate::app::App;
use crate::model::picker::display_name;
use crate::view::{render_footer, render_notice, render_tabs, spinner_char, truncate};

/// Render the Upload screen.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // tabs
        Constraint::Min(5),    // file picker
        Constraint::Length(3), // progress
        Constraint::Length(1), // notice
        Constraint::Length(1), // footer
    ])
    .split(f.area());

    render_tabs(f, chunks[0], app);
    render_picker(f, chunks[1], app);
    render_progress(f, chunks[2], app);
    render_notice(f, chunks[3], app);
    render_footer(
        f,
        chunks[4],
        "j/k:nav  Space:choose  Enter:analyze  R:rescan  ?:help  q:quit",
        &app.theme,
    );
}

fn render_picker(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let picker = &app.picker;
    let title = format!(
        " Choose PDF files in {} ",
        truncate(&picker.dir.display().to_string(), 50)
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(title);

    if picker.entries.is_empty() {
        let hint = "No PDF files here. Start with --dir <DIR> or pass PDFs as arguments.";
        let empty = Paragraph::new(hint)
            .style(Style::default().fg(theme.dim))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let name_width = (area.width as usize).saturating_sub(10);
    let items: Vec<ListItem> = picker
        .entries
        .iter()
        .enumerate()
        .map(|(idx, path)| {
            let chosen = picker.is_chosen(idx);
            let mark = if chosen { "[x]" } else { "[ ]" };
            let style = if chosen {
                Style::default().fg(theme.selected).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {mark} "), style),
                Span::styled(truncate(&display_name(path), name_width), style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(theme.highlight_style());
    let mut state = ListState::default();
    state.select(Some(picker.cursor));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_progress(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style());

    match &app.upload {
        UploadPhase::Processing(progress) => {
            let current = app.current_file.as_deref().unwrap_or("");
            let label = format!(
                "{} Processing {}... {} / {}",
                spinner_char(app.tick),
                current,
                progress.done,
                progress.total
            );
            let gauge = Gauge::default()
                .block(block.title(" Analyzing "))
                .gauge_style(Style::default().fg(theme.active))
                .ratio(progress.fraction().clamp(0.0, 1.0))
                .label(label);
            f.render_widget(gauge, area);
        }
        UploadPhase::Uploading { files } => {
            let text = format!(
                " {} file(s) chosen. Press Enter to analyze papers.",
                files.len()
            );
            f.render_widget(
                Paragraph::new(Span::styled(text, Style::default().fg(theme.text))).block(block),
                area,
            );
        }
        UploadPhase::Idle => {
            f.render_widget(
                Paragraph::new(Span::styled(
                    " Upload your research papers (PDF format) for analysis.",
                    Style::default().fg(theme.dim),
                ))
                .block(block),
                area,
            );
        }
    }
}
