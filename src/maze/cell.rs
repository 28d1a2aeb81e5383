use crossterm::style::{Color, Stylize};

use std::fmt;

/// State of a single grid cell.
///
/// `Visited`, `Solution` and `Current` are overlays drawn during solving on top of the
/// `Wall`/`Path` skeleton. They never appear while a maze is being generated.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Wall,
    Path,
    Start,
    End,
    Visited,
    Solution,
    Current,
}

impl Cell {
    /// The width of each cell when rendered, in character widths.
    pub const CELL_WIDTH: u16 = 2;

    /// Whether a solver may step onto this cell.
    pub fn is_walkable(self) -> bool {
        matches!(self, Cell::Path | Cell::Start | Cell::End)
    }

    /// Whether this cell is a solving overlay that a restore must erase.
    pub fn is_overlay(self) -> bool {
        matches!(self, Cell::Visited | Cell::Solution | Cell::Current)
    }

    /// Plain single-character symbol, used for text dumps of the grid.
    pub fn symbol(self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Path => ' ',
            Cell::Start => 'S',
            Cell::End => 'E',
            Cell::Visited => '.',
            Cell::Solution => '*',
            Cell::Current => '@',
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            Cell::Wall => "⬜".with(Color::White),
            Cell::Path => "  ".with(Color::Reset),
            Cell::Start => "🟩".with(Color::Green),
            Cell::End => "🟥".with(Color::Red),
            Cell::Visited => "· ".with(Color::Blue),
            Cell::Solution => "🟨".with(Color::Yellow),
            Cell::Current => "🟪".with(Color::Magenta),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Cell::CELL_WIDTH as usize,
                "Each cell must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}
