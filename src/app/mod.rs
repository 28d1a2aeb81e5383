mod renderer;

use std::{
    io::{Stdout, Write},
    time::{Duration, Instant},
};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind},
    queue,
    terminal::{self, ClearType},
};

pub use renderer::{Renderer, sidebar_lines};

use crate::{
    Error,
    config::Config,
    generators::Generator,
    maze::{Cell, MIN_DIMENSION},
    metrics::MetricsCollector,
    simulation::Simulation,
    solvers::Solver,
};

/// What a key press asks the application to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Generate,
    Solve,
    Reset,
    TogglePause,
    SelectGenerator(Generator),
    SelectSolver(Solver),
    SpeedUp,
    SlowDown,
    Quit,
}

impl UserAction {
    pub fn from_key(code: KeyCode) -> Option<UserAction> {
        let action = match code {
            KeyCode::Esc => UserAction::Quit,
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'q' => UserAction::Quit,
                'g' => UserAction::Generate,
                's' => UserAction::Solve,
                'r' => UserAction::Reset,
                'p' => UserAction::TogglePause,
                '1' => UserAction::SelectGenerator(Generator::RecurBacktrack),
                '2' => UserAction::SelectGenerator(Generator::Prim),
                '3' => UserAction::SelectGenerator(Generator::Kruskal),
                '4' => UserAction::SelectSolver(Solver::Dfs),
                '5' => UserAction::SelectSolver(Solver::AStar),
                '6' => UserAction::SelectSolver(Solver::Bfs),
                '+' | '=' => UserAction::SpeedUp,
                '-' | '_' => UserAction::SlowDown,
                _ => return None,
            },
            _ => return None,
        };
        Some(action)
    }
}

/// Terminal front end: one simulation step per tick, input handled between ticks.
pub struct App {
    sim: Simulation,
    metrics: MetricsCollector,
    renderer: Renderer,
    /// Time between simulation steps
    tick: Duration,
    /// Terminal (width, height)
    term_size: (u16, u16),
    /// Dimensions fixed on the command line, which resizes leave alone
    fixed_rows: Option<u16>,
    fixed_cols: Option<u16>,
}

impl App {
    const MIN_TICK: Duration = Duration::from_millis(1);
    const MAX_TICK: Duration = Duration::from_millis(1000);

    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate screen on panic
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Largest odd maze side that fits `available` terminal cells of `cell_size` each,
    /// never below the minimum maze side.
    fn fit_dimension(available: u16, cell_size: u16) -> u16 {
        let n = available / cell_size;
        let odd = if n % 2 == 0 { n.saturating_sub(1) } else { n };
        odd.max(MIN_DIMENSION)
    }

    /// Grid (rows, cols) that fills a terminal of `term_size`, leaving room for the sidebar.
    pub fn fit_to_terminal(term_size: (u16, u16)) -> (u16, u16) {
        let (term_width, term_height) = term_size;
        (
            App::fit_dimension(term_height, 1),
            App::fit_dimension(
                term_width.saturating_sub(Renderer::SIDEBAR_WIDTH),
                Cell::CELL_WIDTH,
            ),
        )
    }

    pub fn new(config: &Config, term_size: (u16, u16)) -> Self {
        let (fit_rows, fit_cols) = App::fit_to_terminal(term_size);
        let rows = config.rows.unwrap_or(fit_rows);
        let cols = config.cols.unwrap_or(fit_cols);
        let mut sim = Simulation::new(rows, cols, config.seed);
        sim.set_generator(config.generator);
        sim.set_solver(config.solver);
        tracing::info!(
            "[app] {}x{} maze, generator {}, solver {}, seed {:?}",
            rows,
            cols,
            config.generator,
            config.solver,
            config.seed
        );
        Self {
            sim,
            metrics: MetricsCollector::new(),
            renderer: Renderer::new(),
            tick: config.tick(),
            term_size,
            fixed_rows: config.rows,
            fixed_cols: config.cols,
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// Apply a user action. Returns false when the application should exit.
    pub fn handle_action(&mut self, action: UserAction) -> bool {
        tracing::debug!("[app] action {:?}", action);
        match action {
            UserAction::Quit => return false,
            UserAction::Generate => self.sim.start_generation(self.sim.generator()),
            UserAction::Solve => {
                if !self.sim.is_generation_complete() {
                    tracing::info!("[app] solve requested before generation finished");
                }
                self.sim.start_solving(self.sim.solver());
            }
            UserAction::Reset => self.sim.reset(),
            UserAction::TogglePause => {
                let paused = self.sim.toggle_pause();
                tracing::info!("[app] paused: {}", paused);
            }
            UserAction::SelectGenerator(generator) => {
                self.sim.set_generator(generator);
            }
            UserAction::SelectSolver(solver) => {
                self.sim.set_solver(solver);
            }
            UserAction::SpeedUp => self.tick = (self.tick / 2).max(App::MIN_TICK),
            UserAction::SlowDown => self.tick = (self.tick * 2).min(App::MAX_TICK),
        }
        self.metrics.observe(&self.sim);
        true
    }

    /// Refit the grid after a terminal resize. Changing the grid discards all progress.
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        self.term_size = (width, height);
        self.renderer.invalidate();
        let (fit_rows, fit_cols) = App::fit_to_terminal(self.term_size);
        let rows = self.fixed_rows.unwrap_or(fit_rows);
        let cols = self.fixed_cols.unwrap_or(fit_cols);
        let maze = self.sim.maze();
        if (rows, cols) != (maze.rows(), maze.cols()) {
            tracing::info!("[app] terminal resized to {}x{}", width, height);
            self.sim.resize(rows, cols);
            self.metrics.observe(&self.sim);
        }
    }

    /// Advance the simulation by one tick.
    pub fn on_tick(&mut self) {
        self.sim.step();
        self.metrics.observe(&self.sim);
    }

    fn draw(&mut self, stdout: &mut Stdout) -> std::io::Result<()> {
        self.renderer
            .draw(stdout, &self.sim, &self.metrics, self.tick, self.term_size)
    }

    /// Main application loop
    pub fn run(&mut self, stdout: &mut Stdout) -> Result<(), Error> {
        self.draw(stdout)?;
        let mut next_tick = Instant::now() + self.tick;
        loop {
            let timeout = next_tick.saturating_duration_since(Instant::now());
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if let Some(action) = UserAction::from_key(key.code) {
                            if !self.handle_action(action) {
                                break;
                            }
                        }
                    }
                    Event::Resize(width, height) => self.handle_resize(width, height),
                    _ => {}
                }
                self.draw(stdout)?;
                continue;
            }
            self.on_tick();
            self.draw(stdout)?;
            next_tick = Instant::now() + self.tick;
        }
        tracing::info!("[app] exiting");
        Ok(())
    }
}
