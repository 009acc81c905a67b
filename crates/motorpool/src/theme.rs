//! Semantic color roles.
//!
//! Widgets ask for roles (text, border, danger, …) instead of hardcoding
//! colors, so the palette can change in one place.

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    pub text: Color,
    pub subtle: Color,
    pub border: Color,
    pub accent: Color,
    pub success_fg: Color,
    pub warning_fg: Color,
    pub danger_fg: Color,
    pub info_fg: Color,
    pub selection_fg: Color,
    pub selection_bg: Color,
    pub chip_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Subtle dark palette, nvim-like.
        Self {
            text: Color::Rgb(192, 202, 245),
            subtle: Color::Rgb(107, 112, 137),
            border: Color::Rgb(59, 63, 81),
            accent: Color::Rgb(125, 207, 255),
            success_fg: Color::Rgb(158, 206, 106),
            warning_fg: Color::Rgb(224, 175, 104),
            danger_fg: Color::Rgb(247, 118, 142),
            info_fg: Color::Rgb(122, 162, 247),
            selection_fg: Color::Black,
            selection_bg: Color::Rgb(125, 207, 255),
            chip_bg: Color::Rgb(40, 44, 60),
        }
    }
}

impl Theme {
    pub fn title_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn hint_style(&self) -> Style {
        Style::default().fg(self.subtle)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.danger_fg)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success_fg)
    }

    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning_fg)
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.selection_fg)
            .bg(self.selection_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn label_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.text).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.text)
        }
    }

    pub fn value_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.selection_fg).bg(self.selection_bg)
        } else {
            Style::default().fg(self.accent)
        }
    }
}
