use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use geography::GeographySource;
use ratatui::prelude::{Layout, Rect};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::{
    action::Action,
    components::{Component, banner::Banner, form::FormView},
    config::Config,
    core::{
        effects::Effect,
        executor::TaskExecutor,
        reducer::{reduce, startup},
        state::CheckoutState,
    },
    tui::{Event, EventResponse, Tui},
};

pub const TICK_RATE: f64 = 4.0;
pub const FRAME_RATE: f64 = 30.0;

pub struct App {
    tick_rate: f64,
    frame_rate: f64,
    state: CheckoutState,
    banner: Banner,
    form: FormView,
    executor: TaskExecutor,
    should_quit: bool,
    should_suspend: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    /// Must be called inside a Tokio runtime; the executor worker starts here.
    pub fn new(config: &Config, source: Arc<dyn GeographySource>) -> Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let state = CheckoutState::from_config(config)?;
        let form = FormView::new(&state.layout);
        let executor = TaskExecutor::new(source, action_tx.clone());

        Ok(Self {
            tick_rate: TICK_RATE,
            frame_rate: FRAME_RATE,
            state,
            banner: Banner::new(),
            form,
            executor,
            should_quit: false,
            should_suspend: false,
            action_tx,
            action_rx,
        })
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?
            .tick_rate(self.tick_rate)
            .frame_rate(self.frame_rate);
        tui.enter()?;

        self.banner.init(&self.state)?;
        self.form.init(&self.state)?;
        let effects = startup(&self.state);
        self.execute(effects);
        self.action_tx.send(Action::ClearScreen)?;
        self.action_tx.send(Action::Render)?;

        let action_tx = self.action_tx.clone();
        loop {
            self.handle_events(&mut tui).await?;
            self.handle_actions(&mut tui)?;
            if self.should_suspend {
                tui.suspend()?;
                action_tx.send(Action::Resume)?;
                action_tx.send(Action::ClearScreen)?;
                tui.resume()?;
            } else if self.should_quit {
                tui.stop()?;
                break;
            }
        }
        tui.exit()?;
        Ok(())
    }

    async fn handle_events(&mut self, tui: &mut Tui) -> Result<()> {
        let Some(event) = tui.next_event().await else {
            return Ok(());
        };
        let action_tx = self.action_tx.clone();
        match event {
            Event::Tick => action_tx.send(Action::Tick)?,
            Event::Render => action_tx.send(Action::Render)?,
            Event::Resize(x, y) => action_tx.send(Action::Resize(x, y))?,
            Event::Key(key) if is_global(key) => {
                if let Some(action) = global_action(key) {
                    action_tx.send(action)?;
                }
                return Ok(());
            }
            Event::Key(_) => {}
        }

        for component in [&mut self.banner as &mut dyn Component, &mut self.form] {
            match component.handle_events(&event, &self.state)? {
                Some(EventResponse::Stop(action)) => {
                    action_tx.send(action)?;
                    break;
                }
                Some(EventResponse::Continue(action)) => action_tx.send(action)?,
                None => {}
            }
        }
        Ok(())
    }

    fn handle_actions(&mut self, tui: &mut Tui) -> Result<()> {
        while let Ok(action) = self.action_rx.try_recv() {
            if action != Action::Tick && action != Action::Render {
                debug!("{action:?}");
            }
            match &action {
                Action::Quit => self.should_quit = true,
                Action::Suspend => self.should_suspend = true,
                Action::Resume => self.should_suspend = false,
                Action::ClearScreen => tui.terminal.clear()?,
                Action::Resize(w, h) => self.handle_resize(tui, *w, *h)?,
                Action::Render => self.render(tui)?,
                Action::Error(message) => report_component_error(message),
                _ => {}
            }

            let effects = reduce(&mut self.state, &action);
            self.execute(effects);

            for component in [&mut self.banner as &mut dyn Component, &mut self.form] {
                if let Some(follow_up) = component.update(&action, &self.state)? {
                    self.action_tx.send(follow_up)?;
                }
            }

            // state changes from the executor redraw without waiting for the frame tick
            if !matches!(
                action,
                Action::Tick | Action::Render | Action::Resize(..) | Action::ClearScreen
            ) {
                self.action_tx.send(Action::Render)?;
            }
        }
        Ok(())
    }

    fn execute(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Async(kind) => {
                    let id = self.executor.spawn(kind);
                    debug!("scheduled task {id}");
                }
                Effect::Log(message) => info!("{message}"),
            }
        }
    }

    fn handle_resize(&mut self, tui: &mut Tui, w: u16, h: u16) -> Result<()> {
        tui.resize(Rect::new(0, 0, w, h))?;
        self.render(tui)?;
        Ok(())
    }

    fn render(&mut self, tui: &mut Tui) -> Result<()> {
        let action_tx = self.action_tx.clone();
        let state = &self.state;
        let banner = &mut self.banner;
        let form = &mut self.form;
        tui.draw(|frame| {
            let [top, body] = Layout::vertical([
                banner.height_constraint(state),
                form.height_constraint(state),
            ])
            .areas(frame.area());
            if let Err(err) = banner.draw(frame, top, state) {
                let _ = action_tx.send(Action::Error(format!("Failed to draw banner: {err:?}")));
            }
            if let Err(err) = form.draw(frame, body, state) {
                let _ = action_tx.send(Action::Error(format!("Failed to draw form: {err:?}")));
            }
        })?;
        Ok(())
    }
}

fn report_component_error(message: &str) {
    error!("component error: {message}");
}

fn is_global(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('z'))
}

fn global_action(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('c') => Some(Action::Quit),
        KeyCode::Char('z') => Some(Action::Suspend),
        _ => None,
    }
}
