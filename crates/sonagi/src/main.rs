use std::io;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;
use color_eyre::eyre::eyre;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Alignment, Rect},
    style::{Style, Stylize},
    widgets::Paragraph,
};
use sonagi_audio::LevelSource;
use sonagi_core::RainConfig;
use sonagi_rain::RainState;

mod cli;
mod logging;

use cli::Args;

/// How long a status message stays on screen.
const STATUS_DURATION: Duration = Duration::from_secs(2);

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    logging::init(args.log.as_deref())?;

    if args.write_config {
        let path = match args.config.clone() {
            Some(path) => path,
            None => sonagi_config::default_path()
                .ok_or_else(|| eyre!("no config directory on this platform"))?,
        };
        sonagi_config::write_default(&path)?;
        println!("wrote default config to {}", path.display());
        return Ok(());
    }

    let config = args.apply(sonagi_config::load(args.config.as_deref())?);
    config.validate().map_err(|reason| eyre!(reason))?;
    let seed = args.seed.unwrap_or_else(clock_seed);
    let audio = sonagi_audio::open_level_source(&config.audio);

    let terminal = ratatui::init();
    let result = execute!(io::stdout(), EnableMouseCapture)
        .map_err(color_eyre::Report::from)
        .and_then(|()| App::new(config, seed, audio).run(terminal));
    release_mouse(&mut io::stdout());
    ratatui::restore();
    result
}

/// Turn mouse capture off, logging a failure. Returns whether it succeeded.
fn release_mouse<W: io::Write>(out: &mut W) -> bool {
    match execute!(out, DisableMouseCapture) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "could not disable mouse capture");
            false
        }
    }
}

/// Seed taken from the system clock when none is given.
fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// The main application which holds the state and logic of the application.
pub struct App {
    /// Is the application running?
    running: bool,
    rain: RainState,
    audio: Box<dyn LevelSource>,
    frame_time: Duration,
    /// Message shown at the bottom of the screen, and when it was set.
    status: Option<(String, Instant)>,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: RainConfig, seed: u64, audio: Box<dyn LevelSource>) -> Self {
        let frame_time = Duration::from_secs_f64(1.0 / f64::from(config.fps.max(1)));
        tracing::info!(seed, fps = config.fps, "starting rain");
        Self {
            running: false,
            // Sized on the first frame
            rain: RainState::new(config, 0, 0, seed),
            audio,
            frame_time,
            status: None,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        let size = terminal.size()?;
        self.rain.resize(size.width, size.height);

        self.running = true;
        let mut deadline = Instant::now();
        while self.running {
            self.rain.tick(self.audio.as_mut());
            terminal.draw(|frame| self.render(frame))?;

            deadline += self.frame_time;
            self.handle_crossterm_events(deadline)?;

            // Frames missed during a stall are skipped
            let now = Instant::now();
            if deadline < now {
                deadline = now;
            }
        }
        Ok(())
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        self.rain.render(frame);

        if self
            .status
            .as_ref()
            .is_some_and(|(_, since)| since.elapsed() > STATUS_DURATION)
        {
            self.status = None;
        }
        if let Some((message, _)) = &self.status {
            let area = frame.area();
            if area.height == 0 {
                return;
            }
            let line = Rect::new(area.x, area.bottom() - 1, area.width, 1);
            let status = Paragraph::new(message.as_str().bold())
                .style(Style::new().black().on_green())
                .alignment(Alignment::Center);
            frame.render_widget(status, line);
        }
    }

    /// Reads the crossterm events until the next frame is due.
    fn handle_crossterm_events(&mut self, deadline: Instant) -> color_eyre::Result<()> {
        while self.running {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::Resize(cols, rows) => self.rain.resize(cols, rows),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('a') | KeyCode::Char('A')) => self.toggle_audio(),
            _ => {}
        }
    }

    /// Toggle audio reactivity and say so.
    fn toggle_audio(&mut self) {
        let message = if self.rain.toggle_audio() {
            "audio reactivity on"
        } else {
            "audio reactivity off"
        };
        self.status = Some((message.to_string(), Instant::now()));
    }

    /// A left click starts a shockwave under the pointer.
    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            self.rain.click(mouse.column, mouse.row);
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
