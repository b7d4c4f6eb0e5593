pub mod board;
pub mod game;
pub mod input;
pub mod render;
pub mod session;
pub mod signal;
pub mod term;

pub type TermInt = u16;
pub type Coords = (u16, u16);
