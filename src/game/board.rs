use tracing::instrument;

use super::Player;
use crate::error::MoveError;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Tokens in a row needed to win.
pub const CONNECT: usize = 4;

/// Right, down, down-right, down-left. Every line on the board is covered by
/// walking one of these from its first cell in row-major order.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Red,
    Yellow,
}

/// A cell coordinate. Row 0 is the top, row 5 is the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Get the cell at a specific position
    /// Row 0 is the top, row 5 is the bottom
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Bounds-checked lookup with signed coordinates, for direction walks.
    fn cell_at(&self, row: isize, col: isize) -> Option<Cell> {
        if row < 0 || col < 0 {
            return None;
        }
        self.cells
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
    }

    /// Number of tokens stacked in a column
    pub fn column_height(&self, col: usize) -> usize {
        (0..ROWS)
            .filter(|&row| self.cells[row][col] != Cell::Empty)
            .count()
    }

    /// Check if a column is full. Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= COLS {
            return true;
        }
        self.cells[0][col] != Cell::Empty
    }

    /// Drop a token in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, player: Player) -> Result<usize, MoveError> {
        if col >= COLS {
            return Err(MoveError::InvalidColumn { column: col });
        }

        // Lowest empty row wins
        let row = (0..ROWS)
            .rev()
            .find(|&row| self.cells[row][col] == Cell::Empty)
            .ok_or(MoveError::ColumnFull { column: col })?;

        self.cells[row][col] = player.to_cell();
        Ok(row)
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| self.is_column_full(col))
    }

    /// Check whether `player` has four in a row anywhere on the board
    pub fn check_win(&self, player: Player) -> bool {
        self.winning_line(player).is_some()
    }

    /// Find the first four-in-a-row for `player`, scanning start cells in
    /// row-major order.
    #[instrument(level = "trace", skip(self))]
    pub fn winning_line(&self, player: Player) -> Option<[Position; CONNECT]> {
        let target = player.to_cell();

        for row in 0..ROWS {
            for col in 0..COLS {
                if self.cells[row][col] != target {
                    continue;
                }
                for (dr, dc) in DIRECTIONS {
                    if let Some(line) = self.line_from(row, col, dr, dc, target) {
                        return Some(line);
                    }
                }
            }
        }

        None
    }

    /// The `CONNECT` cells starting at (row, col) stepping by (dr, dc), if all
    /// are in bounds and hold `target`.
    fn line_from(
        &self,
        row: usize,
        col: usize,
        dr: isize,
        dc: isize,
        target: Cell,
    ) -> Option<[Position; CONNECT]> {
        let mut line = [Position::new(row, col); CONNECT];

        for (i, slot) in line.iter_mut().enumerate() {
            let r = row as isize + dr * i as isize;
            let c = col as isize + dc * i as isize;
            if self.cell_at(r, c) != Some(target) {
                return None;
            }
            *slot = Position::new(r as usize, c as usize);
        }

        Some(line)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a board from top-to-bottom rows: `R`, `Y`, anything else empty.
    fn board_from_rows(rows: [&str; ROWS]) -> Board {
        let mut board = Board::new();
        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.chars().take(COLS).enumerate() {
                board.cells[row][col] = match ch {
                    'R' => Cell::Red,
                    'Y' => Cell::Yellow,
                    _ => Cell::Empty,
                };
            }
        }
        board
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        for row in 0..ROWS {
            for col in 0..COLS {
                assert_eq!(board.get(row, col), Cell::Empty);
            }
        }
    }

    #[test]
    fn test_drop_piece() {
        let mut board = Board::new();

        // Drop first piece in column 3
        let row = board.drop_piece(3, Player::Red).unwrap();
        assert_eq!(row, 5); // Should land at bottom
        assert_eq!(board.get(5, 3), Cell::Red);

        // Drop second piece in same column
        let row = board.drop_piece(3, Player::Yellow).unwrap();
        assert_eq!(row, 4); // Should land on top of first piece
        assert_eq!(board.get(4, 3), Cell::Yellow);
    }

    #[test]
    fn test_drop_lands_above_existing_stack() {
        let mut board = Board::new();
        for k in 0..ROWS {
            assert_eq!(board.column_height(2), k);
            let row = board.drop_piece(2, Player::Yellow).unwrap();
            assert_eq!(row, ROWS - 1 - k);
        }
        assert_eq!(board.column_height(2), ROWS);
    }

    #[test]
    fn test_column_full() {
        let mut board = Board::new();

        // Fill column 0
        for _ in 0..ROWS {
            board.drop_piece(0, Player::Red).unwrap();
        }

        assert!(board.is_column_full(0));
        let before = board;
        assert_eq!(
            board.drop_piece(0, Player::Yellow),
            Err(MoveError::ColumnFull { column: 0 })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_invalid_column() {
        let mut board = Board::new();
        assert_eq!(
            board.drop_piece(7, Player::Red),
            Err(MoveError::InvalidColumn { column: 7 })
        );
        assert_eq!(board, Board::new());
        assert!(board.is_column_full(7));
    }

    #[test]
    fn test_full_board() {
        let mut board = Board::new();
        for col in 0..COLS {
            for _ in 0..ROWS {
                board.drop_piece(col, Player::Red).unwrap();
            }
        }
        assert!(board.is_full());
    }

    #[test]
    fn test_empty_board_has_no_win() {
        let board = Board::new();
        assert!(!board.check_win(Player::Red));
        assert!(!board.check_win(Player::Yellow));
    }

    #[test]
    fn test_horizontal_win() {
        let mut board = Board::new();
        // Create horizontal line at bottom row
        for col in 0..4 {
            board.drop_piece(col, Player::Red).unwrap();
        }
        assert!(board.check_win(Player::Red));
        assert!(!board.check_win(Player::Yellow));
        assert_eq!(
            board.winning_line(Player::Red),
            Some([
                Position::new(5, 0),
                Position::new(5, 1),
                Position::new(5, 2),
                Position::new(5, 3),
            ])
        );
    }

    #[test]
    fn test_vertical_win() {
        let mut board = Board::new();
        // Create vertical line in column 3
        for _ in 0..4 {
            board.drop_piece(3, Player::Yellow).unwrap();
        }
        assert!(board.check_win(Player::Yellow));
        assert_eq!(
            board.winning_line(Player::Yellow),
            Some([
                Position::new(2, 3),
                Position::new(3, 3),
                Position::new(4, 3),
                Position::new(5, 3),
            ])
        );
    }

    #[test]
    fn test_diagonal_up_win() {
        let mut board = Board::new();
        // Create diagonal / pattern
        board.drop_piece(0, Player::Red).unwrap();

        board.drop_piece(1, Player::Yellow).unwrap();
        board.drop_piece(1, Player::Red).unwrap();

        board.drop_piece(2, Player::Yellow).unwrap();
        board.drop_piece(2, Player::Yellow).unwrap();
        board.drop_piece(2, Player::Red).unwrap();

        board.drop_piece(3, Player::Yellow).unwrap();
        board.drop_piece(3, Player::Yellow).unwrap();
        board.drop_piece(3, Player::Yellow).unwrap();
        assert!(!board.check_win(Player::Red));
        board.drop_piece(3, Player::Red).unwrap();

        assert!(board.check_win(Player::Red));
    }

    #[test]
    fn test_diagonal_down_win() {
        let mut board = Board::new();
        // Create diagonal \ pattern
        board.drop_piece(6, Player::Red).unwrap();

        board.drop_piece(5, Player::Yellow).unwrap();
        board.drop_piece(5, Player::Red).unwrap();

        board.drop_piece(4, Player::Yellow).unwrap();
        board.drop_piece(4, Player::Yellow).unwrap();
        board.drop_piece(4, Player::Red).unwrap();

        board.drop_piece(3, Player::Yellow).unwrap();
        board.drop_piece(3, Player::Yellow).unwrap();
        board.drop_piece(3, Player::Yellow).unwrap();
        assert!(!board.check_win(Player::Red));
        board.drop_piece(3, Player::Red).unwrap();

        assert!(board.check_win(Player::Red));
    }

    #[test]
    fn test_win_in_top_right_corner() {
        let board = board_from_rows([
            "...YRRR",
            ".......",
            ".......",
            ".......",
            ".......",
            ".......",
        ]);
        assert!(!board.check_win(Player::Red));

        let board = board_from_rows([
            "...RRRR",
            ".......",
            ".......",
            ".......",
            ".......",
            ".......",
        ]);
        assert_eq!(
            board.winning_line(Player::Red),
            Some([
                Position::new(0, 3),
                Position::new(0, 4),
                Position::new(0, 5),
                Position::new(0, 6),
            ])
        );
    }

    #[test]
    fn test_anti_diagonal_from_corner() {
        let board = board_from_rows([
            "......Y",
            ".....Y.",
            "....Y..",
            "...Y...",
            ".......",
            ".......",
        ]);
        assert_eq!(
            board.winning_line(Player::Yellow),
            Some([
                Position::new(0, 6),
                Position::new(1, 5),
                Position::new(2, 4),
                Position::new(3, 3),
            ])
        );
    }

    #[test]
    fn test_diagonal_into_bottom_left_corner() {
        let board = board_from_rows([
            ".......",
            ".......",
            "R......",
            ".R.....",
            "..R....",
            "...R...",
        ]);
        assert!(board.check_win(Player::Red));
    }

    #[test]
    fn test_no_win_with_three() {
        let mut board = Board::new();
        for col in 0..3 {
            board.drop_piece(col, Player::Red).unwrap();
        }
        assert!(!board.check_win(Player::Red));
    }

    #[test]
    fn test_no_win_across_gap_or_wrap() {
        // A gap breaks the line, and lines never wrap between rows
        let board = board_from_rows([
            ".......",
            ".......",
            ".......",
            "R......",
            "....RRR",
            "RR.RR..",
        ]);
        assert!(!board.check_win(Player::Red));
    }

    #[test]
    fn test_mixed_colours_do_not_win() {
        let board = board_from_rows([
            ".......",
            ".......",
            ".......",
            ".......",
            ".......",
            "RRYRRYR",
        ]);
        assert!(!board.check_win(Player::Red));
        assert!(!board.check_win(Player::Yellow));
    }
}
