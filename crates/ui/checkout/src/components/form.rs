//! The donation form: one scrollable column of fields bound to the registry.
//!
//! Text inputs are edited in place with `tui-input`; the value is committed
//! with Enter as an [`Action::EditField`]. Selects cycle with Left/Right and
//! emit `SelectRegion` / `SelectDivision`. The destination select is local to
//! the view and never reaches the registry.

use color_eyre::Result;
use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent};
use donation::{Destination, FieldKind, FieldPath, FieldSpec, FormLayout, SelectSource};
use geography::{DivisionName, RegionCode, types::NONE_SELECTED};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
};
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::{
    action::Action,
    components::Component,
    core::state::CheckoutState,
    tui::{EventResponse, Frame},
};

enum Item {
    Field {
        path: FieldPath,
        spec: FieldSpec,
        /// Scope heading drawn above the first field of a scope.
        heading: Option<&'static str>,
    },
    Submit(&'static str),
}

pub struct FormView {
    items: Vec<Item>,
    focused: usize,
    editing: bool,
    input: Input,
    destination: Option<Destination>,
    scroll: u16,
}

impl FormView {
    pub fn new(layout: &FormLayout) -> Self {
        let mut items = Vec::new();
        for scope in &layout.scopes {
            let mut heading = scope.title;
            for spec in &scope.fields {
                if let Ok(path) = scope.path(spec) {
                    items.push(Item::Field {
                        path,
                        spec: spec.clone(),
                        heading: heading.take(),
                    });
                }
            }
        }
        items.push(Item::Submit(layout.submit_label));

        Self {
            items,
            focused: 0,
            editing: false,
            input: Input::default(),
            destination: None,
            scroll: 0,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn destination(&self) -> Option<Destination> {
        self.destination
    }

    pub fn focused_path(&self) -> Option<&FieldPath> {
        match self.items.get(self.focused)? {
            Item::Field { path, .. } => Some(path),
            Item::Submit(_) => None,
        }
    }

    /// Move focus to `path`. Returns false if the form has no such field.
    pub fn focus(&mut self, path: &FieldPath) -> bool {
        let found = self
            .items
            .iter()
            .position(|item| matches!(item, Item::Field { path: p, .. } if p == path));
        if let Some(idx) = found {
            self.focused = idx;
            self.cancel_editing();
        }
        found.is_some()
    }

    fn focused_kind(&self) -> Option<FieldKind> {
        match self.items.get(self.focused)? {
            Item::Field { spec, .. } => Some(spec.kind),
            Item::Submit(_) => None,
        }
    }

    fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % self.items.len();
    }

    fn focus_prev(&mut self) {
        self.focused = (self.focused + self.items.len() - 1) % self.items.len();
    }

    fn start_editing(&mut self, state: &CheckoutState) {
        let Some(path) = self.focused_path() else {
            return;
        };
        let current = state.registry.value(path).unwrap_or_default();
        self.input = Input::default().with_value(current);
        self.editing = true;
    }

    fn cancel_editing(&mut self) {
        self.editing = false;
        self.input = Input::default();
    }

    fn commit_editing(&mut self) -> Option<Action> {
        let path = self.focused_path().cloned();
        let value = self.input.value().to_string();
        self.cancel_editing();
        path.map(|path| Action::EditField { path, value })
    }

    /// Step the focused select by `dir`. Index 0 is always "none selected".
    fn cycle(&mut self, dir: i32, state: &CheckoutState) -> Option<Action> {
        let Item::Field { path, spec, .. } = self.items.get(self.focused)? else {
            return None;
        };
        match spec.kind {
            FieldKind::Select(source) => {
                let options: Vec<&str> = std::iter::once(NONE_SELECTED)
                    .chain(match source {
                        SelectSource::Regions => state
                            .selector
                            .regions()
                            .iter()
                            .map(RegionCode::as_str)
                            .collect::<Vec<_>>(),
                        SelectSource::Divisions => state
                            .selector
                            .divisions()
                            .iter()
                            .map(DivisionName::as_str)
                            .collect::<Vec<_>>(),
                    })
                    .collect();
                let current = state.registry.value(path).unwrap_or_default();
                let next = step(&options, &current, dir);
                Some(match source {
                    SelectSource::Regions => Action::SelectRegion(RegionCode::new(next)),
                    SelectSource::Divisions => Action::SelectDivision(DivisionName::new(next)),
                })
            }
            FieldKind::Destination => {
                let options: Vec<Option<Destination>> = std::iter::once(None)
                    .chain(Destination::all().into_iter().map(Some))
                    .collect();
                let idx = options
                    .iter()
                    .position(|d| *d == self.destination)
                    .unwrap_or(0) as i32;
                let len = options.len() as i32;
                self.destination = options[(idx + dir).rem_euclid(len) as usize];
                Some(Action::Render)
            }
            _ => None,
        }
    }

    fn display_value(&self, item: &Item, state: &CheckoutState) -> (String, bool) {
        let Item::Field { path, spec, .. } = item else {
            return (String::new(), false);
        };
        match spec.kind {
            FieldKind::Destination => match self.destination {
                Some(d) => (d.label().to_string(), false),
                None => (Destination::PLACEHOLDER.to_string(), true),
            },
            FieldKind::Select(_) => {
                let value = state.registry.value(path).unwrap_or_default();
                if value.is_empty() || value == NONE_SELECTED {
                    (spec.placeholder.unwrap_or_default().to_string(), true)
                } else {
                    (value, false)
                }
            }
            _ => (state.registry.value(path).unwrap_or_default(), false),
        }
    }

    /// Lines to draw, the row of the focused item and, while editing, the
    /// cursor column on that row.
    fn lines(&self, state: &CheckoutState) -> (Vec<Line<'static>>, u16, u16) {
        let mut lines = Vec::new();
        let mut focus_row = 0u16;
        let mut cursor_col = 0u16;

        for (idx, item) in self.items.iter().enumerate() {
            let focused = idx == self.focused;
            match item {
                Item::Field {
                    path,
                    spec,
                    heading,
                } => {
                    if let Some(h) = heading {
                        lines.push(Line::raw(""));
                        lines.push(Line::from(Span::styled(
                            h.to_string(),
                            Style::default().add_modifier(Modifier::BOLD),
                        )));
                    }

                    let marker = if focused { "›" } else { " " };
                    let prefix = format!("{marker} {}: ", spec.label);
                    let label_style = if focused {
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::White)
                    };

                    let (value, placeholder) = if focused && self.editing {
                        (self.input.value().to_string(), false)
                    } else {
                        self.display_value(item, state)
                    };
                    let value_style = if focused {
                        Style::default().fg(Color::Black).bg(Color::White)
                    } else if placeholder {
                        Style::default().fg(Color::DarkGray)
                    } else {
                        Style::default().fg(Color::Cyan)
                    };

                    if focused {
                        focus_row = lines.len() as u16;
                        let prefix_width = Span::raw(prefix.clone()).width();
                        cursor_col = (prefix_width + self.input.visual_cursor()) as u16;
                    }
                    let mut spans = vec![
                        Span::styled(prefix, label_style),
                        Span::styled(value, value_style),
                    ];
                    if spec.kind.is_select() {
                        spans.push(Span::styled(" ◂▸", Style::default().fg(Color::DarkGray)));
                    }
                    lines.push(Line::from(spans));

                    if let Some(err) = state.registry.error(path) {
                        lines.push(Line::from(Span::styled(
                            format!("    {err}"),
                            Style::default().fg(Color::Red),
                        )));
                    }
                }
                Item::Submit(label) => {
                    lines.push(Line::raw(""));
                    if focused {
                        focus_row = lines.len() as u16;
                    }
                    let style = if focused {
                        Style::default()
                            .fg(Color::Black)
                            .bg(Color::Green)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::Green)
                    };
                    lines.push(Line::from(Span::styled(format!("[ {label} ]"), style)));
                }
            }
        }
        (lines, focus_row, cursor_col)
    }

    fn ensure_visible(&mut self, focus_row: u16, height: u16) {
        if height == 0 {
            return;
        }
        if focus_row < self.scroll {
            self.scroll = focus_row;
        } else if focus_row >= self.scroll + height {
            self.scroll = focus_row + 1 - height;
        }
    }
}

fn step(options: &[&str], current: &str, dir: i32) -> String {
    let idx = options.iter().position(|o| *o == current).unwrap_or(0) as i32;
    let len = options.len().max(1) as i32;
    options
        .get((idx + dir).rem_euclid(len) as usize)
        .copied()
        .unwrap_or(NONE_SELECTED)
        .to_string()
}

impl Component for FormView {
    fn height_constraint(&self, _state: &CheckoutState) -> Constraint {
        Constraint::Min(10)
    }

    fn handle_key_events(
        &mut self,
        key: KeyEvent,
        state: &CheckoutState,
    ) -> Result<Option<EventResponse<Action>>> {
        if self.editing {
            let response = match key.code {
                KeyCode::Enter => self.commit_editing().unwrap_or(Action::Render),
                KeyCode::Esc => {
                    self.cancel_editing();
                    Action::Render
                }
                KeyCode::Char(c) if !self.focused_kind().is_some_and(|k| k.accepts(c)) => {
                    Action::Render
                }
                _ => {
                    self.input.handle_event(&CrosstermEvent::Key(key));
                    Action::Render
                }
            };
            return Ok(Some(EventResponse::Stop(response)));
        }

        let kind = self.focused_kind();
        let action = match key.code {
            KeyCode::Up | KeyCode::BackTab => {
                self.focus_prev();
                Some(Action::Render)
            }
            KeyCode::Down | KeyCode::Tab => {
                self.focus_next();
                Some(Action::Render)
            }
            KeyCode::Left => self.cycle(-1, state),
            KeyCode::Right => self.cycle(1, state),
            KeyCode::Enter => match kind {
                None => Some(Action::Submit),
                Some(k) if k.is_select() => self.cycle(1, state),
                Some(_) => {
                    self.start_editing(state);
                    Some(Action::Render)
                }
            },
            KeyCode::Esc if state.notice.is_some() => Some(Action::DismissNotice),
            KeyCode::Char(c) if kind.is_some_and(|k| k.accepts(c)) => {
                // typing on a text field starts editing it
                self.start_editing(state);
                self.input.handle_event(&CrosstermEvent::Key(key));
                Some(Action::Render)
            }
            KeyCode::Char(' ') if kind.is_some_and(|k| k.is_select()) => self.cycle(1, state),
            KeyCode::Char('q') if kind.map_or(true, |k| k.is_select()) => Some(Action::Quit),
            _ => None,
        };
        Ok(action.map(EventResponse::Stop))
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect, state: &CheckoutState) -> Result<()> {
        let block = Block::default().borders(Borders::ALL).title(Span::styled(
            format!(" {} ", state.layout.title),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        let inner = block.inner(area);
        f.render_widget(block, area);
        if inner.height < 2 || inner.width < 5 {
            return Ok(());
        }

        let body = Rect {
            height: inner.height - 1,
            ..inner
        };
        let footer = Rect {
            y: inner.y + inner.height - 1,
            height: 1,
            ..inner
        };

        let (lines, focus_row, cursor_col) = self.lines(state);
        self.ensure_visible(focus_row, body.height);
        f.render_widget(
            Paragraph::new(Text::from(lines)).scroll((self.scroll, 0)),
            body,
        );

        let hints = Line::from(vec![
            Span::styled("↑/↓", Style::default().fg(Color::White)),
            Span::raw(": navegar   "),
            Span::styled("Enter", Style::default().fg(Color::White)),
            Span::raw(if self.editing { ": confirmar   " } else { ": editar/enviar   " }),
            Span::styled("←/→", Style::default().fg(Color::White)),
            Span::raw(": escolher   "),
            Span::styled("Ctrl+C", Style::default().fg(Color::White)),
            Span::raw(": sair"),
        ])
        .style(Style::default().fg(Color::DarkGray));
        f.render_widget(Paragraph::new(hints), footer);

        if self.editing {
            let row = focus_row.saturating_sub(self.scroll);
            if row < body.height {
                let x = (body.x + cursor_col).min(body.x + body.width.saturating_sub(1));
                f.set_cursor_position((x, body.y + row));
            }
        }
        Ok(())
    }
}
