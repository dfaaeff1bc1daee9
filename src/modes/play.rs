use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, Interval, interval_at};

use crate::game::{GameConfig, TickOutcome};
use crate::input::{InputHandler, KeyAction};
use crate::render::Renderer;
use crate::session::{GameSession, HighScoreStore, SessionPhase};

pub struct PlayMode {
    session: GameSession,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(config: GameConfig, store: HighScoreStore) -> Self {
        Self {
            session: GameSession::new(config, store),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // The tick timer is re-armed on start, on resume, and whenever eating
        // food shortens the interval. Arming from `now + period` means a
        // re-arm never fires an immediate tick and a resume never replays
        // ticks missed during the pause.
        let mut tick_timer = arm_tick_timer(self.session.tick_interval());

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval_at(Instant::now() + render_interval, render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        if self.handle_event(event)? {
                            tick_timer = arm_tick_timer(self.session.tick_interval());
                        }
                    }
                }

                // Game logic tick; disabled while not running
                _ = tick_timer.tick(), if self.session.is_running() => {
                    if let Some(TickOutcome::AteFood) = self.session.tick()? {
                        // Switch to the new, shorter cadence immediately
                        tick_timer = arm_tick_timer(self.session.tick_interval());
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.session);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Apply one terminal event; returns true when the tick timer must be
    /// re-armed (game started or resumed)
    fn handle_event(&mut self, event: Event) -> Result<bool> {
        let mut rearm = false;

        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(false);
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Turn(direction) => {
                    self.session.enqueue_direction(direction);
                }
                KeyAction::TogglePause => match self.session.phase() {
                    SessionPhase::Running => self.session.pause(),
                    SessionPhase::Paused => {
                        self.session.resume();
                        rearm = true;
                    }
                    _ => {}
                },
                KeyAction::Start => {
                    if matches!(
                        self.session.phase(),
                        SessionPhase::NotStarted | SessionPhase::Ended
                    ) {
                        self.session.start();
                        rearm = true;
                    }
                }
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }

        Ok(rearm)
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

fn arm_tick_timer(period: Duration) -> Interval {
    interval_at(Instant::now() + period, period)
}
