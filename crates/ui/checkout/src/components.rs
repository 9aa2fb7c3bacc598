use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::layout::{Constraint, Rect};

use crate::{
    action::Action,
    core::state::CheckoutState,
    tui::{Event, EventResponse, Frame},
};

pub mod banner;
pub mod form;

/// A visual and interactive element of the checkout screen.
///
/// Components read [`CheckoutState`] but never mutate it; anything that should
/// change state is returned as an [`Action`] and goes through the reducer.
pub trait Component {
    fn init(&mut self, _state: &CheckoutState) -> Result<()> {
        Ok(())
    }

    fn height_constraint(&self, state: &CheckoutState) -> Constraint;

    fn handle_events(
        &mut self,
        event: &Event,
        state: &CheckoutState,
    ) -> Result<Option<EventResponse<Action>>> {
        match event {
            Event::Key(key_event) => self.handle_key_events(*key_event, state),
            _ => Ok(None),
        }
    }

    fn handle_key_events(
        &mut self,
        _key: KeyEvent,
        _state: &CheckoutState,
    ) -> Result<Option<EventResponse<Action>>> {
        Ok(None)
    }

    fn update(&mut self, _action: &Action, _state: &CheckoutState) -> Result<Option<Action>> {
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect, state: &CheckoutState) -> Result<()>;
}
