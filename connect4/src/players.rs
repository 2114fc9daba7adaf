use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::trace;

use crate::{
    Board, GameError, InvalidMove, Label, Subscriber, Subscribers, CONNECT, HEIGHT, WIDTH,
};

/// Describes a game that a [`Player`] can be attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameType {
    pub name: &'static str,
    pub width: usize,
    pub height: usize,
    pub connect: usize,
}

impl GameType {
    pub const CONNECT_FOUR: GameType = GameType {
        name: "Connect4",
        width: WIDTH,
        height: HEIGHT,
        connect: CONNECT,
    };
}

/// What a player sees of a game while it is being attached to it.
pub struct Attachment<'a> {
    pub(crate) game_type: GameType,
    pub(crate) label: Label,
    pub(crate) subscribers: &'a mut Subscribers,
}

impl<'a> Attachment<'a> {
    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    /// The label the player will play with.
    pub fn label(&self) -> Label {
        self.label
    }

    /// Registers a subscriber with the game. See [`Subscribers::insert()`].
    pub fn subscribe<S: Subscriber + 'static>(&mut self, subscriber: &Rc<RefCell<S>>) -> bool {
        self.subscribers.insert(subscriber)
    }

    /// Fails with [`GameError::UnsupportedGameType`] unless this is the game
    /// the player was written for.
    pub fn ensure_game_type(
        &self,
        player: &'static str,
        supported: GameType,
    ) -> Result<(), GameError> {
        if self.game_type == supported {
            Ok(())
        } else {
            Err(GameError::UnsupportedGameType {
                player,
                game: self.game_type.name,
            })
        }
    }
}

/// A strategy for choosing moves.
///
/// The game asks the player for a column, and keeps asking for as long as
/// the answer is not a valid move.
pub trait Player {
    /// Called once, when the player is seated at a game.
    fn on_attach(&mut self, game: &mut Attachment<'_>) -> anyhow::Result<()>;

    /// Picks a column to drop a chip into.
    ///
    /// The answer is not trusted; it may be out of range or point at a full
    /// column.
    fn request_move(&mut self, board: &Board, label: Label) -> anyhow::Result<i64>;

    /// Called when the last answer to [`Self::request_move()`] was rejected,
    /// right before the player is asked again.
    fn handle_invalid_move(&mut self, board: &Board, err: InvalidMove) -> anyhow::Result<()>;
}

/// The input side of a human's user interface.
pub trait HumanInterface {
    /// Asks the human for a column. May block until one is entered.
    fn read_move(&mut self, board: &Board, label: Label) -> anyhow::Result<i64>;

    /// Tells the human why their last choice was rejected.
    fn report_invalid_move(&mut self, board: &Board, err: InvalidMove) -> anyhow::Result<()>;
}

/// A player whose moves come from a human, through some user interface.
///
/// The interface is also subscribed to the game when the player is
/// attached, so the human gets to see the board after every move.
pub struct HumanPlayer<T> {
    interface: Rc<RefCell<T>>,
}

impl<T> HumanPlayer<T> {
    pub fn new(interface: Rc<RefCell<T>>) -> Self {
        Self { interface }
    }

    pub fn interface(&self) -> &Rc<RefCell<T>> {
        &self.interface
    }
}

impl<T: HumanInterface + Subscriber + 'static> Player for HumanPlayer<T> {
    fn on_attach(&mut self, game: &mut Attachment<'_>) -> anyhow::Result<()> {
        game.ensure_game_type("HumanPlayer", GameType::CONNECT_FOUR)?;
        game.subscribe(&self.interface);
        Ok(())
    }

    fn request_move(&mut self, board: &Board, label: Label) -> anyhow::Result<i64> {
        self.interface.try_borrow_mut()?.read_move(board, label)
    }

    fn handle_invalid_move(&mut self, board: &Board, err: InvalidMove) -> anyhow::Result<()> {
        self.interface
            .try_borrow_mut()?
            .report_invalid_move(board, err)
    }
}

/// A computer player that picks uniformly among the playable columns.
pub struct RandomPlayer {
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl Player for RandomPlayer {
    fn on_attach(&mut self, game: &mut Attachment<'_>) -> anyhow::Result<()> {
        game.ensure_game_type("RandomPlayer", GameType::CONNECT_FOUR)?;
        Ok(())
    }

    fn request_move(&mut self, board: &Board, label: Label) -> anyhow::Result<i64> {
        let columns: Vec<usize> = board.playable_columns().collect();
        let column = *columns
            .choose(&mut self.rng)
            .context("No playable column left")?;
        trace!(label = %label, column, "Random player chose");
        Ok(column as i64)
    }

    fn handle_invalid_move(&mut self, _board: &Board, err: InvalidMove) -> anyhow::Result<()> {
        // Only playable columns are ever chosen, so this is a bug
        Err(GameError::UnreachableInvalidMove { err }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Game, InvalidMoveReason, Outcome};

    #[test]
    fn random_player_only_picks_playable_columns() {
        let mut board = Board::new();
        for column in [0, 2, 3, 5, 6] {
            for _ in 0..HEIGHT {
                board.drop_chip(column, Label::A);
            }
        }
        let mut player = RandomPlayer::from_seed(7);
        for _ in 0..50 {
            let column = player.request_move(&board, Label::B).unwrap();
            assert!(column == 1 || column == 4, "picked {}", column);
        }
    }

    #[test]
    fn random_player_treats_invalid_move_as_fatal() {
        let mut player = RandomPlayer::from_seed(0);
        let err = player
            .handle_invalid_move(
                &Board::new(),
                InvalidMove {
                    column: 9,
                    reason: InvalidMoveReason::OutOfRange,
                },
            )
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GameError>(),
            Some(GameError::UnreachableInvalidMove { .. })
        ));
    }

    /// Stands in for a terminal: first answers with a column that does not
    /// exist, then with the leftmost playable one.
    #[derive(Default)]
    struct FakeTerminal {
        asked: usize,
        invalid_reports: Vec<InvalidMove>,
        starts: usize,
        updates: usize,
        outcomes: Vec<Outcome>,
    }

    impl HumanInterface for FakeTerminal {
        fn read_move(&mut self, board: &Board, _label: Label) -> anyhow::Result<i64> {
            self.asked += 1;
            if self.asked == 1 {
                return Ok(WIDTH as i64);
            }
            let column = board.playable_columns().next().context("Board is full")?;
            Ok(column as i64)
        }

        fn report_invalid_move(&mut self, _board: &Board, err: InvalidMove) -> anyhow::Result<()> {
            self.invalid_reports.push(err);
            Ok(())
        }
    }

    impl Subscriber for FakeTerminal {
        fn on_game_start(&mut self, board: &Board) -> anyhow::Result<()> {
            assert_eq!(board.chip_count(), 0);
            self.starts += 1;
            Ok(())
        }

        fn on_board_updated(&mut self, _: &Board, _: Label, _: usize) -> anyhow::Result<()> {
            self.updates += 1;
            Ok(())
        }

        fn on_game_result(&mut self, outcome: Outcome) -> anyhow::Result<()> {
            self.outcomes.push(outcome);
            Ok(())
        }
    }

    #[test]
    fn human_player_subscribes_its_interface() {
        let terminal = Rc::new(RefCell::new(FakeTerminal::default()));
        let human = HumanPlayer::new(Rc::clone(&terminal));
        let mut game = Game::new(human, RandomPlayer::from_seed(3)).unwrap();
        let outcome = game.play().unwrap();

        let terminal = terminal.borrow();
        assert_eq!(terminal.starts, 1);
        assert_eq!(terminal.updates, game.move_count());
        assert_eq!(terminal.outcomes, vec![outcome]);
        assert_eq!(
            terminal.invalid_reports,
            vec![InvalidMove {
                column: WIDTH as i64,
                reason: InvalidMoveReason::OutOfRange
            }]
        );
    }

    #[test]
    fn other_game_types_are_rejected() {
        let mut subscribers = Subscribers::new();
        let mut attachment = Attachment {
            game_type: GameType {
                name: "Connect3",
                width: 5,
                height: 4,
                connect: 3,
            },
            label: Label::A,
            subscribers: &mut subscribers,
        };
        let err = RandomPlayer::from_seed(0)
            .on_attach(&mut attachment)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "RandomPlayer does not implement playing the game Connect3"
        );
    }
}
