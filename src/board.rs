use std::fmt;

use Direction::*;

pub const SIZE: usize = 4;

pub type Cell = u32;
pub type Grid = [[Cell; SIZE]; SIZE];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

/// A 4x4 grid of tiles. Zero is an empty cell, anything else is a power of two.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    cells: Grid,
}

impl Board {
    pub fn new() -> Self {
        Board::default()
    }

    pub fn from_rows(cells: Grid) -> Self {
        Board { cells }
    }

    pub fn rows(&self) -> &Grid {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: Cell) {
        self.cells[row][col] = value;
    }

    /// Coordinates of every empty cell, row-major.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut free = Vec::with_capacity(SIZE * SIZE);

        for (row, cells) in self.cells.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if *cell == 0 {
                    free.push((row, col));
                }
            }
        }

        free
    }

    pub fn sum(&self) -> Cell {
        self.cells.iter().flatten().sum()
    }

    /// Slides and merges every line towards `direction`.
    ///
    /// Returns the resulting board and whether any cell changed. The input
    /// board is left untouched; no tile is spawned.
    pub fn shift(&self, direction: Direction) -> (Board, bool) {
        let mut next = *self;
        let mut changed = false;

        for line in 0..SIZE {
            let coords = line_coords(direction, line);
            let before = coords.map(|(row, col)| self.cells[row][col]);

            let mut after = before;
            combine(&mut after);
            compact(&mut after);

            for (&(row, col), &cell) in coords.iter().zip(after.iter()) {
                next.cells[row][col] = cell;
            }

            changed |= after != before;
        }

        (next, changed)
    }

    /// True once the board is full and no two neighbours in any row or
    /// column share a value, i.e. no direction can change it.
    pub fn is_stuck(&self) -> bool {
        for row in 0..SIZE {
            for col in 0..SIZE {
                let cell = self.cells[row][col];

                if cell == 0 {
                    return false;
                }
                if col + 1 < SIZE && self.cells[row][col + 1] == cell {
                    return false;
                }
                if row + 1 < SIZE && self.cells[row + 1][col] == cell {
                    return false;
                }
            }
        }

        true
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i != 0 {
                writeln!(f)?;
            }
            let line: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
            write!(f, "{}", line.join(","))?;
        }

        Ok(())
    }
}

///////////////////////////////////////////////////////////////////////////////

// Cells of one row or column, starting at the edge the tiles travel towards.
fn line_coords(direction: Direction, line: usize) -> [(usize, usize); SIZE] {
    let mut coords = [(0, 0); SIZE];

    for (i, slot) in coords.iter_mut().enumerate() {
        let far = SIZE - 1 - i;
        *slot = match direction {
            Up => (i, line),
            Down => (far, line),
            Left => (line, i),
            Right => (line, far),
        };
    }

    coords
}

// A merged tile clears the pending slot so it can't absorb a third tile.
fn combine(line: &mut [Cell; SIZE]) {
    let mut pending: Option<usize> = None;

    for i in 0..SIZE {
        let cell = line[i];
        if cell == 0 {
            continue;
        }

        match pending {
            Some(p) if line[p] == cell => {
                line[p] = cell * 2;
                line[i] = 0;
                pending = None;
            },
            _ => pending = Some(i),
        }
    }
}

fn compact(line: &mut [Cell; SIZE]) {
    let mut packed = [0; SIZE];

    for (slot, cell) in packed.iter_mut().zip(line.iter().filter(|cell| **cell != 0)) {
        *slot = *cell;
    }

    *line = packed;
}

#[cfg(test)]
impl quickcheck::Arbitrary for Direction {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        *g.choose(&[Up, Down, Left, Right]).unwrap()
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Board {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let mut cells = [[0; SIZE]; SIZE];

        for cell in cells.iter_mut().flatten() {
            // Roughly a third of the cells stay empty
            let exponent = u8::arbitrary(g) % 18;
            *cell = if exponent < 6 { 0 } else { 1 << (exponent - 5) };
        }

        Board { cells }
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;

    quickcheck! {
        // A tile merged by the first shift may merge again on the second, so
        // repeating a shift is only a no-op when the first one merged nothing
        fn second_shift_only_merges(board: Board, direction: Direction) -> bool {
            let (once, _) = board.shift(direction);
            let (twice, changed) = once.shift(direction);

            if tiles(&once) == tiles(&board) {
                return !changed && once == twice;
            }

            !changed || (twice.sum() == once.sum() && tiles(&twice) < tiles(&once))
        }

        fn shifting_conserves_sum(board: Board, direction: Direction) -> bool {
            board.shift(direction).0.sum() == board.sum()
        }

        fn changed_flag_matches_board_difference(board: Board, direction: Direction) -> bool {
            let (next, changed) = board.shift(direction);
            changed == (next != board)
        }

        fn stuck_board_cannot_move(board: Board) -> bool {
            !board.is_stuck() || [Up, Down, Left, Right].iter().all(|d| !board.shift(*d).1)
        }
    }

    fn tiles(board: &Board) -> usize {
        SIZE * SIZE - board.empty_cells().len()
    }

    fn assert_shift(board: Grid, direction: Direction, expected: Grid) {
        let board = Board::from_rows(board);
        let expected = Board::from_rows(expected);
        let (actual, changed) = board.shift(direction);

        assert_eq!(actual, expected, "Incorrect board:\nExpected:\n{}\nActual:\n{}", expected, actual);
        assert_eq!(changed, board != expected);
    }

    #[test]
    fn down_combines_twice_in_one_column() {
        assert_shift(
            [[2, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0]],
            Down,
            [[0, 0, 0, 0], [0, 0, 0, 0], [4, 0, 0, 0], [4, 0, 0, 0]],
        );
    }

    #[test]
    fn down_combines_pair_nearest_bottom() {
        assert_shift(
            [[0, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0]],
            Down,
            [[0, 0, 0, 0], [0, 0, 0, 0], [2, 0, 0, 0], [4, 0, 0, 0]],
        );
        assert_shift(
            [[2, 0, 0, 0], [0, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0]],
            Down,
            [[0, 0, 0, 0], [0, 0, 0, 0], [2, 0, 0, 0], [4, 0, 0, 0]],
        );
        assert_shift(
            [[2, 0, 0, 0], [2, 0, 0, 0], [0, 0, 0, 0], [2, 0, 0, 0]],
            Down,
            [[0, 0, 0, 0], [0, 0, 0, 0], [2, 0, 0, 0], [4, 0, 0, 0]],
        );
    }

    #[test]
    fn down_combines_in_last_column() {
        assert_shift(
            [[0, 0, 0, 2], [0, 0, 0, 2], [0, 0, 0, 2], [0, 0, 0, 2]],
            Down,
            [[0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 4], [0, 0, 0, 4]],
        );
    }

    #[test]
    fn down_slides_single_tile() {
        assert_shift(
            [[0, 0, 0, 0], [2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
            Down,
            [[0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [2, 0, 0, 0]],
        );
    }

    #[test]
    fn packed_distinct_column_does_nothing() {
        let board = [[0, 0, 0, 2], [0, 0, 0, 4], [0, 0, 0, 8], [0, 0, 0, 16]];

        for direction in [Up, Down, Right].iter() {
            let (next, changed) = Board::from_rows(board).shift(*direction);
            assert!(!changed, "{:?} changed the board", direction);
            assert_eq!(next, Board::from_rows(board));
        }
    }

    #[test]
    fn up_combines_pair_nearest_top() {
        assert_shift(
            [[2, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0]],
            Up,
            [[4, 0, 0, 0], [4, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
        );
        assert_shift(
            [[0, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0]],
            Up,
            [[4, 0, 0, 0], [2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
        );
        assert_shift(
            [[2, 0, 0, 0], [0, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0]],
            Up,
            [[4, 0, 0, 0], [2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
        );
    }

    #[test]
    fn up_slides_single_tile_all_the_way() {
        assert_shift(
            [[0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [2, 0, 0, 0]],
            Up,
            [[2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
        );
    }

    #[test]
    fn left_and_right_merge_towards_their_edge() {
        let board = [[2, 2, 2, 2], [2, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0]];

        assert_shift(
            board,
            Left,
            [[4, 4, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0]],
        );
        assert_shift(
            board,
            Right,
            [[0, 0, 4, 4], [0, 0, 0, 2], [0, 0, 0, 2], [0, 0, 0, 2]],
        );
    }

    #[test]
    fn merged_tile_does_not_merge_again() {
        assert_shift(
            [[4, 2, 2, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
            Left,
            [[4, 4, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
        );
        assert_shift(
            [[2, 2, 4, 8], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
            Right,
            [[0, 4, 4, 8], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
        );
    }

    #[test]
    fn merged_tile_merges_again_on_next_shift() {
        let (once, _) = Board::from_rows([[4, 2, 2, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]).shift(Left);
        let (twice, changed) = once.shift(Left);

        assert_eq!(once.rows()[0], [4, 4, 0, 0]);
        assert!(changed);
        assert_eq!(twice.rows()[0], [8, 0, 0, 0]);
        assert_eq!(twice.sum(), once.sum());
    }

    #[test]
    fn unmerged_shift_is_idempotent() {
        let board = Board::from_rows([[0, 2, 0, 4], [0, 0, 0, 8], [0, 0, 0, 0], [2, 4, 2, 0]]);
        let (once, changed) = board.shift(Left);
        let (twice, changed_again) = once.shift(Left);

        assert!(changed);
        assert_eq!(*once.rows(), [[2, 4, 0, 0], [8, 0, 0, 0], [0, 0, 0, 0], [2, 4, 2, 0]]);
        assert!(!changed_again);
        assert_eq!(twice, once);
    }

    #[test]
    fn merges_past_the_usual_win_tile() {
        assert_shift(
            [[2048, 2048, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
            Left,
            [[4096, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
        );
    }

    #[test]
    fn empty_board_is_unchanged() {
        let (next, changed) = Board::new().shift(Left);
        assert!(!changed);
        assert_eq!(next, Board::new());
    }

    #[test]
    fn stuck_only_when_full_without_equal_neighbours() {
        let mut board = Board::from_rows([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ]);
        assert!(board.is_stuck());

        board.set(1, 1, 0);
        assert!(!board.is_stuck());

        board.set(1, 1, 4);
        assert!(!board.is_stuck(), "equal neighbours allow a move");
    }

    #[test]
    fn empty_cells_are_row_major() {
        let board = Board::from_rows([[2, 0, 2, 2], [2, 2, 2, 2], [2, 2, 2, 0], [2, 2, 2, 2]]);
        assert_eq!(board.empty_cells(), vec![(0, 1), (2, 3)]);
        assert_eq!(board.sum(), 28);
    }

    #[test]
    fn display_lists_rows() {
        let board = Board::from_rows([[2, 0, 0, 0], [0, 4, 0, 0], [0, 0, 8, 0], [0, 0, 0, 16]]);
        assert_eq!(board.to_string(), "2,0,0,0\n0,4,0,0\n0,0,8,0\n0,0,0,16");
    }
}
