mod game;
mod recording;
pub use game::*;
pub use recording::*;

use std::cell::RefCell;
use std::rc::Rc;

pub struct Config {
    pub rng: rand::rngs::StdRng,
    pub recorder: Option<Rc<RefCell<recording::Recorder>>>,
}
