pub mod board;

pub use board::RequestBoard;
