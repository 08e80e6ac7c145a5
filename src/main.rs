use anyhow::Context;
use circlewave::{
    wave::PhaseWrap, AnimationScheduler, CellCanvas, SavedState, Viewport, WaveConfig, WaveView,
};
use clap::Parser;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Print, ResetColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::{
    io::{self, Stdout, Write},
    path::PathBuf,
    sync::{mpsc, Arc, Mutex},
    time::Duration,
};

/// Logical units per canvas pixel when no size is given. Keeps the configured sample spacing
/// meaningful on small grids.
const UNITS_PER_PIXEL: u32 = 8;

/// Rows kept below the canvas for the status line.
const STATUS_ROWS: u16 = 2;

const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Run a circular liquid fill progress indicator in the terminal.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// A YAML file with wave settings.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// The initial progress, as a percentage.
    #[arg(short, long, value_parser = clap::value_parser!(i32).range(0..=100))]
    progress: Option<i32>,

    /// The target delay between animation frames, in milliseconds.
    #[arg(short, long)]
    interval: Option<u64>,

    /// The side of the logical viewport the waves are traced in. Defaults to the canvas size in
    /// pixels times 8.
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    size: Option<u32>,

    /// How wave phases are kept bounded: `modulo` or `reset`.
    #[arg(long)]
    phase_wrap: Option<PhaseWrap>,

    /// Where progress is persisted between runs.
    #[arg(long, env = "CIRCLEWAVE_STATE_FILE")]
    state_file: Option<PathBuf>,

    /// Don't load or save progress.
    #[arg(long)]
    no_persist: bool,
}

impl Cli {
    fn wave_config(&self) -> anyhow::Result<WaveConfig> {
        let mut config = match &self.config {
            Some(path) => WaveConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
            None => WaveConfig::default(),
        };
        if let Some(interval) = self.interval {
            config.refresh_interval_ms = interval;
        }
        if let Some(wrap) = self.phase_wrap {
            config.phase_wrap = wrap;
        }
        config.validate()?;
        Ok(config)
    }

    fn state_path(&self) -> Option<PathBuf> {
        if self.no_persist {
            return None;
        }
        self.state_file.clone().or_else(SavedState::default_path)
    }
}

/// Puts the terminal back the way it was, even on early returns.
struct TerminalGuard;

impl TerminalGuard {
    fn enter(stdout: &mut Stdout) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), ResetColor, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Where the canvas sits on screen.
struct Placement {
    column: u16,
    canvas: CellCanvas,
}

impl Placement {
    fn fit(columns: u16, rows: u16, logical_size: Option<u32>) -> Self {
        let available_rows = rows.saturating_sub(STATUS_ROWS);
        // Pixels are square, two per cell vertically.
        let side = columns.min(available_rows.saturating_mul(2)) & !1;
        let logical = match logical_size {
            Some(size) if side > 0 => size,
            _ => side as u32 * UNITS_PER_PIXEL,
        };
        let area = Viewport::sized(logical, logical);
        Self { column: (columns - side) / 2, canvas: CellCanvas::new(side, side / 2, area) }
    }
}

struct Host {
    stdout: Stdout,
    view: Arc<Mutex<WaveView>>,
    scheduler: AnimationScheduler,
    placement: Placement,
    logical_size: Option<u32>,
    slider: i32,
    animating: bool,
    hidden: bool,
}

impl Host {
    fn resize(&mut self, columns: u16, rows: u16) -> io::Result<()> {
        self.placement = Placement::fit(columns, rows, self.logical_size);
        self.view.lock().unwrap().set_viewport(self.placement.canvas.area());
        log::debug!("resized to {columns}x{rows}, canvas area {:?}", self.placement.canvas.area());
        execute!(self.stdout, Clear(ClearType::All))
    }

    fn set_slider(&mut self, slider: i32) {
        self.slider = slider.clamp(0, 100);
        self.view.lock().unwrap().set_progress(self.slider);
    }

    /// Returns whether the host should keep running.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return false,
            KeyCode::Up => self.set_slider(self.slider + 1),
            KeyCode::Down => self.set_slider(self.slider - 1),
            KeyCode::PageUp => self.set_slider(self.slider + 10),
            KeyCode::PageDown => self.set_slider(self.slider - 10),
            KeyCode::Char(' ') => {
                self.animating = !self.animating;
                self.scheduler.refresh_progress(self.animating && !self.hidden);
            }
            KeyCode::Char('h') => {
                self.hidden = !self.hidden;
                if self.hidden {
                    self.scheduler.on_become_hidden();
                } else if self.animating {
                    self.scheduler.on_become_visible();
                }
            }
            _ => (),
        }
        true
    }

    fn draw(&mut self) -> io::Result<()> {
        let canvas = &mut self.placement.canvas;
        canvas.clear();
        if !self.hidden {
            self.view.lock().unwrap().draw(canvas);
        }
        let state = match (self.hidden, self.animating) {
            (true, _) => "hidden",
            (false, true) => "running",
            (false, false) => "paused",
        };
        let status = format!(
            "progress {:>3}% [{state}]  up/down: adjust  space: pause  h: hide  q: quit",
            self.slider
        );
        queue!(self.stdout, BeginSynchronizedUpdate)?;
        canvas.flush_to(&mut self.stdout, self.placement.column, 0)?;
        queue!(
            self.stdout,
            MoveTo(0, canvas.rows() + 1),
            Clear(ClearType::CurrentLine),
            Print(status),
            EndSynchronizedUpdate
        )?;
        self.stdout.flush()
    }

    fn run(&mut self, redraws: &mpsc::Receiver<()>) -> anyhow::Result<()> {
        loop {
            let mut dirty = false;
            if event::poll(EVENT_POLL_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if !self.handle_key(key) {
                            return Ok(());
                        }
                        dirty = true;
                    }
                    Event::Resize(columns, rows) => {
                        self.resize(columns, rows)?;
                        dirty = true;
                    }
                    _ => (),
                }
            }
            // Coalesce whatever piled up since the last frame.
            while redraws.try_recv().is_ok() {
                dirty = true;
            }
            if dirty {
                self.draw()?;
            }
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.wave_config()?;
    let mut view = WaveView::new(&config)?;
    let state_path = cli.state_path();
    if let Some(path) = &state_path {
        if let Some(state) = SavedState::load(path).with_context(|| format!("reading {}", path.display()))? {
            view.restore_state(&state);
        }
    }
    if let Some(progress) = cli.progress {
        view.set_progress(progress);
    }
    let slider = view.progress() * 100 / view.max_progress();
    let view = Arc::new(Mutex::new(view));

    let (sender, redraws) = mpsc::channel();
    let sink = move || {
        let _ = sender.send(());
    };
    let scheduler = AnimationScheduler::spawn(view.clone(), sink, config.refresh_interval())?;

    let mut stdout = io::stdout();
    let guard = TerminalGuard::enter(&mut stdout)?;
    let (columns, rows) = terminal::size()?;
    let mut host = Host {
        stdout,
        view: view.clone(),
        scheduler,
        placement: Placement::fit(columns, rows, cli.size),
        logical_size: cli.size,
        slider,
        animating: true,
        hidden: false,
    };
    host.resize(columns, rows)?;
    host.scheduler.on_become_visible();
    let result = host.run(&redraws);
    host.scheduler.stop();
    drop(guard);

    if let Some(path) = &state_path {
        let state = view.lock().unwrap().save_state();
        state.save(path).with_context(|| format!("saving {}", path.display()))?;
    }
    result
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::scaled(None, 80, 42, 640)]
    #[case::explicit(Some(300), 80, 42, 300)]
    #[case::too_small(Some(300), 80, 2, 0)]
    fn placement_viewport(
        #[case] size: Option<u32>,
        #[case] columns: u16,
        #[case] rows: u16,
        #[case] expected: u32,
    ) {
        let placement = Placement::fit(columns, rows, size);
        assert_eq!(placement.canvas.area(), Viewport::sized(expected, expected));
    }

    #[test]
    fn size_flag() {
        let cli = Cli::try_parse_from(["circlewave", "--size", "480"]).expect("parse failed");
        assert_eq!(cli.size, Some(480));
        assert!(Cli::try_parse_from(["circlewave", "--size", "0"]).is_err());
    }
}
