//! Ways to build a starting board: RLE text, random soup, named patterns.

pub mod patterns;
pub mod rle;
pub mod soup;

pub use patterns::Pattern;
pub use rle::{PatternError, decode};
pub use soup::{random_board, random_board_seeded};
