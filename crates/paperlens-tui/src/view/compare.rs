use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use paperlens_core::ComparisonRecord;

use crate::app::App;
use crate::theme::Theme;
use crate::view::{bullet_line, render_footer, render_notice, render_tabs, section_header, truncate};

/// Render the Compare screen.
pub fn render(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let paper_count = app.session.papers().len();
    let list_height = (paper_count as u16).clamp(1, 7) + 2;

    let chunks = Layout::vertical([
        Constraint::Length(1),           // tabs
        Constraint::Length(list_height), // selection
        Constraint::Min(5),              // result
        Constraint::Length(1),           // notice
        Constraint::Length(1),           // footer
    ])
    .split(f.area());

    render_tabs(f, chunks[0], app);

    let min = app.session.limits().min_selection;
    if paper_count < min {
        let warning = Paragraph::new(format!(
            "You need at least {min} papers to compare. Upload more papers first."
        ))
        .style(Style::default().fg(theme.processing))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style()),
        );
        f.render_widget(warning, chunks[1]);
    } else {
        render_selection(f, chunks[1], app);
    }

    render_result(f, chunks[2], app);
    render_notice(f, chunks[3], app);
    render_footer(
        f,
        chunks[4],
        "j/k:nav  Space:select  c/Enter:compare  r:new comparison  PgUp/PgDn:scroll  q:quit",
        theme,
    );
}

fn render_selection(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let limits = app.session.limits();
    let selection = app.session.selection();
    let title_width = (area.width as usize).saturating_sub(16);

    let items: Vec<ListItem> = app
        .session
        .papers()
        .iter()
        .map(|paper| {
            let order = selection.iter().position(|&id| id == paper.id);
            let (mark, style) = match order {
                Some(pos) => (
                    format!("[{}]", pos + 1),
                    Style::default().fg(theme.selected).add_modifier(Modifier::BOLD),
                ),
                None => ("[ ]".to_string(), Style::default().fg(theme.text)),
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {mark} "), style),
                Span::styled(format!("#{:<3} ", paper.id), Style::default().fg(theme.dim)),
                Span::styled(truncate(&paper.title, title_width), style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(format!(
                    " Select papers to compare ({}-{}): {} selected ",
                    limits.min_selection,
                    limits.max_selection,
                    selection.len()
                )),
        )
        .highlight_style(theme.highlight_style());
    let mut state = ListState::default();
    state.select(Some(app.compare_cursor));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_result(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(" Comparison Analysis ");

    let Some(record) = app.session.comparison() else {
        let empty = Paragraph::new("No comparison yet. Select papers with Space and press c.")
            .style(Style::default().fg(theme.dim))
            .block(block);
        f.render_widget(empty, area);
        return;
    };

    let content = Paragraph::new(comparison_lines(record, theme))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.result_scroll, 0));
    f.render_widget(content, area);
}

fn numbered<'a>(idx: usize, title: &str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!("    {}. {}", idx + 1, title),
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
    ))
}

fn detail<'a>(text: &str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!("       {text}"),
        Style::default().fg(theme.text),
    ))
}

fn comparison_lines<'a>(record: &ComparisonRecord, theme: &Theme) -> Vec<Line<'a>> {
    let analysis = &record.analysis;
    let mut lines: Vec<Line> = Vec::new();

    section_header(&mut lines, "PAPERS BEING COMPARED", theme);
    for (idx, paper) in record.papers.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("    {}. {}", idx + 1, paper.title),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" - {}", paper.authors.join(", ")),
                Style::default().fg(theme.dim),
            ),
        ]));
    }

    if !analysis.common_themes.is_empty() {
        lines.push(Line::from(""));
        section_header(&mut lines, "COMMON THEMES", theme);
        let mut spans = vec![Span::raw("    ")];
        for t in &analysis.common_themes {
            spans.push(Span::styled(
                format!(" {t} "),
                Style::default().fg(theme.header_fg).bg(theme.active),
            ));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }

    if !analysis.agreements.is_empty() {
        lines.push(Line::from(""));
        section_header(&mut lines, "AREAS OF AGREEMENT", theme);
        for (idx, a) in analysis.agreements.iter().enumerate() {
            lines.push(numbered(idx, &a.title, theme));
            lines.push(detail(&a.description, theme));
            if !a.papers.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("       Papers: {}", a.papers.join(", ")),
                    Style::default().fg(theme.dim),
                )));
            }
        }
    }

    if !analysis.contradictions.is_empty() {
        lines.push(Line::from(""));
        section_header(&mut lines, "CONTRADICTIONS", theme);
        for (idx, c) in analysis.contradictions.iter().enumerate() {
            lines.push(numbered(idx, &c.title, theme));
            lines.push(detail(&c.description, theme));
            for view in &c.conflicting_views {
                bullet_line(&mut lines, view, theme);
            }
        }
    }

    if !analysis.research_gaps.is_empty() {
        lines.push(Line::from(""));
        section_header(&mut lines, "RESEARCH GAPS", theme);
        for (idx, g) in analysis.research_gaps.iter().enumerate() {
            lines.push(numbered(idx, &g.gap, theme));
            lines.push(Line::from(vec![
                Span::styled("       Potential Impact: ", Style::default().fg(theme.dim)),
                Span::styled(g.potential_impact.clone(), Style::default().fg(theme.text)),
            ]));
        }
    }

    if !analysis.unique_contributions.is_empty() {
        lines.push(Line::from(""));
        section_header(&mut lines, "UNIQUE CONTRIBUTIONS", theme);
        for c in &analysis.unique_contributions {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("    {}: ", c.paper),
                    Style::default().fg(theme.completed).add_modifier(Modifier::BOLD),
                ),
                Span::styled(c.contribution.clone(), Style::default().fg(theme.completed)),
            ]));
        }
    }

    lines
}
