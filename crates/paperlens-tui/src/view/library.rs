use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use paperlens_core::PaperRecord;

use crate::app::App;
use crate::theme::Theme;
use crate::view::{
    bullet_line, labeled_line, render_footer, render_notice, render_tabs, section_header, truncate,
};

/// Render the Library screen.
pub fn render(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let chunks = Layout::vertical([
        Constraint::Length(1), // tabs
        Constraint::Length(3), // stats
        Constraint::Min(5),    // papers
        Constraint::Length(1), // notice
        Constraint::Length(1), // footer
    ])
    .split(f.area());

    render_tabs(f, chunks[0], app);
    render_stats(f, chunks[1], app);

    if app.session.is_empty() {
        let empty = Paragraph::new(
            "No research papers uploaded yet. Press 2 to go to 'Upload Paper' and add papers.",
        )
        .style(Style::default().fg(theme.dim))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(" Research Library "),
        )
        .wrap(Wrap { trim: true });
        f.render_widget(empty, chunks[2]);
    } else if app.expanded {
        let [list, detail] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                .areas(chunks[2]);
        render_table(f, list, app);
        if let Some(paper) = app.session.papers().get(app.library_cursor) {
            render_detail(f, detail, paper, theme);
        }
    } else {
        render_table(f, chunks[2], app);
    }

    render_notice(f, chunks[3], app);
    render_footer(
        f,
        chunks[4],
        "1/2/3:views  j/k:nav  Enter:expand  Esc:collapse  ?:help  q:quit",
        theme,
    );
}

fn render_stats(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let stats = app.session.stats();
    let metric = |label: &'static str, value: usize| {
        vec![
            Span::styled(format!(" {label}: "), Style::default().fg(theme.dim)),
            Span::styled(
                format!("{value}  "),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
        ]
    };
    let mut spans = metric("Total Papers", stats.total);
    spans.extend(metric("Analyzed", stats.analyzed));
    spans.extend(metric("Categories", stats.categories));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style());
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_table(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let wide = area.width >= 70;

    let header_cells = if wide {
        vec!["#", "Title", "Category", "Status"]
    } else {
        vec!["#", "Title", "Status"]
    };
    let header = Row::new(header_cells.iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
    }))
    .height(1);

    let title_width = (area.width as usize).saturating_sub(if wide { 40 } else { 22 });
    let rows: Vec<Row> = app
        .session
        .papers()
        .iter()
        .map(|paper| {
            let status = if paper.extraction_error.is_some() {
                Cell::from("! No text").style(Style::default().fg(theme.failed))
            } else {
                Cell::from(paper.status.label())
                    .style(Style::default().fg(theme.status_color(paper.status)))
            };
            let mut cells = vec![
                Cell::from(format!("{}", paper.id)),
                Cell::from(truncate(&paper.title, title_width)),
            ];
            if wide {
                cells.push(
                    Cell::from(paper.category.clone()).style(Style::default().fg(theme.dim)),
                );
            }
            cells.push(status);
            Row::new(cells)
        })
        .collect();

    let widths = if wide {
        vec![
            Constraint::Length(4),
            Constraint::Min(20),
            Constraint::Length(18),
            Constraint::Length(12),
        ]
    } else {
        vec![
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(12),
        ]
    };

    let table = Table::new(rows, &widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(" Research Library "),
        )
        .row_highlight_style(theme.highlight_style());

    let mut state = TableState::default();
    state.select(Some(app.library_cursor));
    f.render_stateful_widget(table, area, &mut state);
}

fn render_detail(f: &mut Frame, area: Rect, paper: &PaperRecord, theme: &Theme) {
    let mut lines: Vec<Line> = Vec::new();

    if !paper.authors.is_empty() {
        labeled_line(&mut lines, "Authors", &paper.authors.join(", "), theme);
    }
    labeled_line(&mut lines, "Year", &paper.year.to_string(), theme);
    if !paper.category.is_empty() {
        labeled_line(&mut lines, "Category", &paper.category, theme);
    }
    if !paper.keywords.is_empty() {
        labeled_line(&mut lines, "Keywords", &paper.keywords.join(", "), theme);
    }
    lines.push(Line::from(vec![
        Span::styled(format!("  {:<18}", "Status"), Style::default().fg(theme.dim)),
        Span::styled(
            paper.status.badge(),
            Style::default()
                .fg(theme.status_color(paper.status))
                .add_modifier(Modifier::BOLD),
        ),
    ]));

    if let Some(reason) = &paper.extraction_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  ⚠ Text extraction failed: {reason}"),
            Style::default().fg(theme.failed).add_modifier(Modifier::BOLD),
        )));
    }

    if !paper.executive_summary.is_empty() {
        lines.push(Line::from(""));
        section_header(&mut lines, "EXECUTIVE SUMMARY", theme);
        lines.push(Line::from(format!("    {}", paper.executive_summary)));
    }

    if !paper.key_findings.is_empty() {
        lines.push(Line::from(""));
        section_header(&mut lines, "KEY FINDINGS", theme);
        for finding in &paper.key_findings {
            bullet_line(&mut lines, finding, theme);
        }
    }

    if !paper.methodology.is_empty() {
        lines.push(Line::from(""));
        section_header(&mut lines, "METHODOLOGY", theme);
        lines.push(Line::from(format!("    {}", paper.methodology)));
    }

    if !paper.sections.is_empty() {
        lines.push(Line::from(""));
        section_header(&mut lines, "SECTIONS", theme);
        for section in &paper.sections {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("    {}: ", section.title),
                    Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                ),
                Span::styled(section.summary.clone(), Style::default().fg(theme.text)),
            ]));
        }
    }

    lines.push(Line::from(""));
    section_header(&mut lines, "ABSTRACT", theme);
    lines.push(Line::from(Span::styled(
        format!("    {}", paper.abstract_text),
        Style::default().fg(theme.dim),
    )));

    let content = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(format!(" {} ", paper.title)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(content, area);
}
