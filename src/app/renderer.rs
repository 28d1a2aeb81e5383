use std::{io::Write, time::Duration};

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};
use unicode_truncate::UnicodeTruncateStr;

use crate::{
    maze::{Cell, Grid},
    metrics::MetricsCollector,
    simulation::{Phase, Simulation},
};

/// Draws the maze grid and a status sidebar, sending only cells that changed since the
/// previous frame.
pub struct Renderer {
    /// Frame as last drawn, including the current-cell marker
    drawn: Option<Grid>,
    /// Whether the "terminal too small" notice is on screen
    too_small: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Columns reserved to the right of the grid for the sidebar
    pub const SIDEBAR_WIDTH: u16 = 30;
    /// Gap between the grid and the sidebar
    const SIDEBAR_GAP: u16 = 2;

    pub fn new() -> Self {
        Self {
            drawn: None,
            too_small: false,
        }
    }

    /// Forget the last frame so the next draw repaints everything.
    pub fn invalidate(&mut self) {
        self.drawn = None;
    }

    /// Whether a `rows` x `cols` grid fits a terminal of `term_size` (width, height).
    pub fn fits(term_size: (u16, u16), rows: u16, cols: u16) -> bool {
        let (term_width, term_height) = term_size;
        u32::from(term_width) >= u32::from(cols) * u32::from(Cell::CELL_WIDTH)
            && term_height >= rows
    }

    /// The grid as it should appear: the maze plus the active algorithm's head.
    fn frame(sim: &Simulation) -> Grid {
        let maze = sim.maze();
        let mut frame = maze.grid().clone();
        if let Some(pos) = sim.current_cell_highlight() {
            if !maze.is_endpoint(pos) {
                frame.set(pos, Cell::Current);
            }
        }
        frame
    }

    /// Draw one frame to `out`. `term_size` is the terminal (width, height).
    pub fn draw<W: Write>(
        &mut self,
        out: &mut W,
        sim: &Simulation,
        metrics: &MetricsCollector,
        tick: Duration,
        term_size: (u16, u16),
    ) -> std::io::Result<()> {
        let (rows, cols) = (sim.maze().rows(), sim.maze().cols());
        if !Renderer::fits(term_size, rows, cols) {
            if !self.too_small {
                Renderer::draw_too_small(out, term_size, rows, cols)?;
                self.too_small = true;
            }
            self.drawn = None;
            return Ok(());
        }
        if self.too_small {
            self.too_small = false;
            self.drawn = None;
        }

        let frame = Renderer::frame(sim);
        match self.drawn.as_ref().filter(|d| d.rows() == rows && d.cols() == cols) {
            Some(drawn) => {
                for (pos, cell) in frame.cells() {
                    if drawn.get(pos) != cell {
                        queue!(
                            out,
                            cursor::MoveTo(pos.1 * Cell::CELL_WIDTH, pos.0),
                            style::Print(cell)
                        )?;
                    }
                }
            }
            None => {
                queue!(out, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
                for row in 0..rows {
                    out.queue(cursor::MoveTo(0, row))?;
                    for col in 0..cols {
                        out.queue(style::Print(frame.get((row, col))))?;
                    }
                }
            }
        }
        self.drawn = Some(frame);

        self.draw_sidebar(out, sim, metrics, tick, term_size)?;
        out.flush()
    }

    fn draw_too_small<W: Write>(
        out: &mut W,
        term_size: (u16, u16),
        rows: u16,
        cols: u16,
    ) -> std::io::Result<()> {
        let msg = format!(
            "Terminal size ({}x{}) is too small for a {}x{} maze ({}x{} columns x rows). Please resize the terminal.\r\n",
            term_size.0,
            term_size.1,
            rows,
            cols,
            u32::from(cols) * u32::from(Cell::CELL_WIDTH),
            rows
        );
        queue!(
            out,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0),
            style::PrintStyledContent(msg.with(Color::Yellow).attribute(Attribute::Bold)),
            style::PrintStyledContent(
                "Press Esc to exit...\r\n"
                    .with(Color::Blue)
                    .attribute(Attribute::Bold)
            )
        )?;
        out.flush()
    }

    fn draw_sidebar<W: Write>(
        &self,
        out: &mut W,
        sim: &Simulation,
        metrics: &MetricsCollector,
        tick: Duration,
        term_size: (u16, u16),
    ) -> std::io::Result<()> {
        let x = sim.maze().cols() * Cell::CELL_WIDTH + Renderer::SIDEBAR_GAP;
        let width = usize::from(term_size.0.saturating_sub(x));
        if width == 0 {
            return Ok(());
        }
        for (y, line) in sidebar_lines(sim, metrics, tick).iter().enumerate() {
            let Ok(y) = u16::try_from(y) else { break };
            if y >= term_size.1 {
                break;
            }
            let (text, _) = line.unicode_truncate(width);
            out.queue(cursor::MoveTo(x, y))?;
            let styled = if y == 0 {
                text.with(Color::Yellow).attribute(Attribute::Bold)
            } else if line.starts_with("  ") {
                text.with(Color::Cyan)
            } else {
                text.with(Color::Reset)
            };
            queue!(
                out,
                style::PrintStyledContent(styled),
                terminal::Clear(ClearType::UntilNewLine)
            )?;
        }
        Ok(())
    }
}

/// Status text shown beside the grid, one entry per line.
pub fn sidebar_lines(sim: &Simulation, metrics: &MetricsCollector, tick: Duration) -> Vec<String> {
    let maze = sim.maze();
    let phase = sim.phase();
    let mut lines = vec![
        "mazesim".to_string(),
        if sim.is_paused() {
            format!("Status: {} (paused)", phase)
        } else {
            format!("Status: {}", phase)
        },
        format!("Generator: {}", sim.generator()),
        format!("Solver: {}", sim.solver()),
        format!("Size: {}x{}", maze.rows(), maze.cols()),
        format!("Tick: {} ms", tick.as_millis()),
        String::new(),
        format!(
            "Generation: {} steps, {:.2?}",
            sim.generation_step_count(),
            metrics.generation_elapsed()
        ),
        format!("Repaired cells: {}", sim.repaired_cells()),
        format!(
            "Solve: {} steps, {:.2?}",
            sim.solving_step_count(),
            metrics.solving_elapsed()
        ),
    ];
    match (phase, metrics.report()) {
        (Phase::Unsolvable, _) => lines.push("No solution found".to_string()),
        (_, Some(report)) => {
            lines.push(format!("Path length: {}", report.path_length));
            lines.push(format!("Optimal length: {}", report.optimal_length));
            lines.push(format!("Optimality: {:.3}", report.optimality_ratio()));
        }
        _ => {}
    }
    lines.push(String::new());
    lines.extend(
        [
            "Controls:",
            "  G generate  S solve",
            "  R reset  P pause",
            "  1/2/3 backtrack/Prim/Kruskal",
            "  4/5/6 DFS/A*/BFS",
            "  +/- speed  Q/Esc quit",
        ]
        .map(String::from),
    );
    lines
}
