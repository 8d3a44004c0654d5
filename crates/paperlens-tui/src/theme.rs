use ratatui::style::{Color, Modifier, Style};

use paperlens_core::PaperStatus;

use crate::app::Notice;

/// Color theme for the TUI.
pub struct Theme {
    pub completed: Color,
    pub processing: Color,
    pub failed: Color,
    pub selected: Color,

    pub header_fg: Color,
    pub header_bg: Color,
    pub border: Color,
    pub text: Color,
    pub dim: Color,
    pub highlight_bg: Color,
    pub active: Color,
    pub spinner: Color,
    pub footer_fg: Color,
    pub footer_bg: Color,
}

impl Theme {
    /// Violet theme matching the web gradient background.
    pub fn lens() -> Self {
        Self {
            completed: Color::Green,
            processing: Color::Yellow,
            failed: Color::Red,
            selected: Color::Cyan,

            header_fg: Color::White,
            header_bg: Color::Rgb(118, 75, 162),
            border: Color::DarkGray,
            text: Color::White,
            dim: Color::DarkGray,
            highlight_bg: Color::Rgb(45, 40, 70),
            active: Color::Rgb(102, 126, 234),
            spinner: Color::Cyan,
            footer_fg: Color::DarkGray,
            footer_bg: Color::Reset,
        }
    }

    pub fn status_color(&self, status: PaperStatus) -> Color {
        match status {
            PaperStatus::Completed => self.completed,
            PaperStatus::Processing => self.processing,
        }
    }

    pub fn notice_style(&self, notice: &Notice) -> Style {
        let color = match notice {
            Notice::Info(_) => self.active,
            Notice::Success(_) => self.completed,
            Notice::Warning(_) => self.processing,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn header_style(&self) -> Style {
        Style::default().fg(self.header_fg).bg(self.header_bg).add_modifier(Modifier::BOLD)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default().bg(self.highlight_bg).add_modifier(Modifier::BOLD)
    }

    pub fn section_style(&self) -> Style {
        Style::default().fg(self.active).add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.footer_fg).bg(self.footer_bg)
    }
}
