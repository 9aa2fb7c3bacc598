use color_eyre::Result;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    components::Component,
    core::state::{CheckoutState, NoticeKind},
    tui::Frame,
};

/// Single line above the form showing the current notice, if any.
#[derive(Debug, Default)]
pub struct Banner;

impl Banner {
    pub fn new() -> Self {
        Self
    }
}

fn style_for(kind: NoticeKind) -> Style {
    match kind {
        NoticeKind::Error => Style::default()
            .fg(Color::White)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD),
        NoticeKind::Success => Style::default().fg(Color::Black).bg(Color::Green),
    }
}

impl Component for Banner {
    fn height_constraint(&self, state: &CheckoutState) -> Constraint {
        if state.notice.is_some() {
            Constraint::Length(1)
        } else {
            Constraint::Length(0)
        }
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect, state: &CheckoutState) -> Result<()> {
        let Some(notice) = &state.notice else {
            return Ok(());
        };
        let style = style_for(notice.kind);
        let line = Line::from(vec![
            Span::styled(format!(" {} ", notice.message), style),
            Span::styled("  (Esc para fechar)", Style::default().fg(Color::DarkGray)),
        ]);
        f.render_widget(Paragraph::new(line), area);
        Ok(())
    }
}
