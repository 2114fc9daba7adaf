use quickcheck::Arbitrary;

use crate::{Board, Label, HEIGHT, WIDTH};

impl Arbitrary for Label {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        *g.choose(&[Label::A, Label::B]).unwrap()
    }
}

/// A board reachable by dropping chips, though not necessarily by
/// alternating turns and not necessarily stopping at the first win.
impl Arbitrary for Board {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let mut board = Board::new();
        let num_chips = usize::arbitrary(g) % (WIDTH * HEIGHT + 1);
        for _ in 0..num_chips {
            let column = usize::arbitrary(g) % WIDTH;
            if board.is_column_playable(column) {
                board.drop_chip(column, Label::arbitrary(g));
            }
        }
        board
    }
}
