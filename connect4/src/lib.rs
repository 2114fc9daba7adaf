pub use board::*;
pub use detector::*;
pub use errors::*;
pub use game::*;
pub use players::*;
pub use subscriber::*;

#[cfg(test)]
mod arbitrary;
mod board;
mod detector;
mod errors;
mod game;
mod players;
mod subscriber;
