use crate::animation::Animate;
use crate::config::Config;
use crate::events::terminal::{handle_key, Event as TerminalEvent, Handler as TerminalEventHandler};
use crate::logger::{self, LogBuffer};
use crate::scene::Scene;
use crate::state::State;
use crate::ui;
use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::*;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::io::{self, stdout, Stdout};
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};

/// Oversees event processing, backdrop animation, and terminal output.
///
pub struct App {
    config: Config,
    state: State,
}

impl App {
    /// Start a new application according to the given configuration. Returns
    /// the result of the application execution.
    ///
    pub async fn start(config: Config) -> Result<()> {
        let log = LogBuffer::new();
        logger::init(LevelFilter::Debug, log.sink())?;

        info!("Starting application...");
        let mut app = App {
            state: State::new(&config.headline, log),
            config,
        };

        let mut terminal = setup_terminal().context("Failed to set up terminal")?;
        let result = app.start_ui(&mut terminal).await;
        if let Err(e) = restore_terminal(&mut terminal) {
            error!("Failed to restore terminal: {}", e);
        }

        info!("Exiting application...");
        result
    }

    /// Begin the terminal event poll on a separate thread, then animate and
    /// draw the backdrop once per frame on the main thread until an exit is
    /// requested.
    ///
    async fn start_ui(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        debug!("Starting user interface on main thread...");
        let area = terminal.size()?;

        let mut scene = Scene::from_config(&self.config, ui::pixel_size(area));
        scene.mount();

        let mut ticker = time::interval(Duration::from_secs(1) / self.config.frame_rate);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut terminal_events = TerminalEventHandler::new();

        while self.state.is_running() {
            tokio::select! {
                _ = ticker.tick() => {
                    scene.set_mounted(self.state.is_backdrop_mounted());
                    if scene.animate_frame() {
                        self.state.advance_frame();
                    }
                    terminal.draw(|frame| ui::render(frame, &self.state, &scene))?;
                }
                event = terminal_events.next() => match event {
                    Some(TerminalEvent::Input(key)) => handle_key(key, &mut self.state),
                    Some(TerminalEvent::Resize(cols, rows)) => {
                        scene.resize(ui::pixel_size(Rect::new(0, 0, cols, rows)));
                    }
                    None => {
                        warn!("Terminal event stream closed");
                        self.state.request_exit();
                    }
                },
            }
        }

        scene.unmount();
        Ok(())
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.hide_cursor()?;
    Ok(terminal)
}

fn restore_terminal<B: Backend + io::Write>(terminal: &mut Terminal<B>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
