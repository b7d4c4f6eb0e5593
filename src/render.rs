use crate::{Coords, TermInt};
use crate::board::{Cell, SIZE};
use crate::session::Snapshot;
use crate::signal::Repaint;
use crate::term::{Paint, TermManager};

use crossterm::style::Color;

const CELL_WIDTH: TermInt = 6;
const CELL_HEIGHT: TermInt = CELL_WIDTH / 2;
const COLUMN_GAP: TermInt = 2;
const ROW_GAP: TermInt = 1;

const BOARD_WIDTH: TermInt = CELL_WIDTH * SIZE as TermInt + COLUMN_GAP * (SIZE as TermInt - 1);
const BOARD_HEIGHT: TermInt = CELL_HEIGHT * SIZE as TermInt + ROW_GAP * (SIZE as TermInt - 1);

const GAME_OVER_BOX_HEIGHT: TermInt = 3;
const CONTROLS_HINT: &str = "Ctrl+R to restart, Ctrl+C to quit";

// 256-colour palette index per tile; 512 and anything past 8192 fall back to reversed
const TILE_COLORS: [(Cell, u8); 12] = [
    (2, 100),
    (4, 101),
    (8, 102),
    (16, 103),
    (32, 105),
    (64, 106),
    (128, 108),
    (256, 109),
    (1024, 110),
    (2048, 111),
    (4096, 112),
    (8192, 113),
];

/// Paints a snapshot: the grid, the game over box if needed, and the controls.
pub fn draw_snapshot(term: &mut TermManager, snapshot: &Snapshot, repaint: Repaint) -> anyhow::Result<()> {
    if repaint == Repaint::Full {
        term.clear()?;
    }

    for row in 0..SIZE {
        for col in 0..SIZE {
            draw_cell(term, row, col, snapshot.board.get(row, col))?;
        }
    }

    if snapshot.game_over {
        let (top_left, width, text) = game_over_box(snapshot.score);
        term.fill_rect(top_left, width, GAME_OVER_BOX_HEIGHT, Paint::Plain)?;
        term.print_at((top_left.0 + 1, top_left.1 + GAME_OVER_BOX_HEIGHT / 2), &text, Paint::Plain)?;
    }

    term.print_at((0, BOARD_HEIGHT + 1), CONTROLS_HINT, Paint::Plain)?;
    term.flush()
}

fn draw_cell(term: &mut TermManager, row: usize, col: usize, value: Cell) -> anyhow::Result<()> {
    let top_left = cell_origin(row, col);
    let paint = tile_paint(value);

    term.fill_rect(top_left, CELL_WIDTH, CELL_HEIGHT, paint)?;

    if value != 0 {
        let label = value.to_string();
        let pos = (top_left.0 + label_offset(label.len()), top_left.1 + (CELL_HEIGHT - 1) / 2);
        term.print_at(pos, &label, paint)?;
    }

    Ok(())
}

fn cell_origin(row: usize, col: usize) -> Coords {
    (
        col as TermInt * (CELL_WIDTH + COLUMN_GAP),
        row as TermInt * (CELL_HEIGHT + ROW_GAP),
    )
}

// Centres the label, leaning left on even widths
fn label_offset(len: usize) -> TermInt {
    let len = len.max(1) as TermInt;
    (CELL_WIDTH / 2 - 1).saturating_sub((len - 1) / 2)
}

fn tile_paint(value: Cell) -> Paint {
    TILE_COLORS
        .iter()
        .find(|(tile, _)| *tile == value)
        .map(|(_, index)| Paint::Background(Color::AnsiValue(*index)))
        .unwrap_or(Paint::Reversed)
}

fn game_over_box(score: Cell) -> (Coords, TermInt, String) {
    let text = format!("Game Over; Score: {}", score);
    let width = text.len() as TermInt + 2;
    let top_left = (
        (BOARD_WIDTH / 2).saturating_sub(width / 2),
        (BOARD_HEIGHT / 2).saturating_sub(GAME_OVER_BOX_HEIGHT / 2),
    );

    (top_left, width, text)
}
