use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::{
    evaluate, Attachment, Board, GameError, GameResult, GameType, InvalidMove, InvalidMoveReason,
    Label, Outcome, Player, Subscriber, Subscribers, WIDTH,
};

/// Where a game is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Players are seated, but [`Game::start()`] was not called yet.
    AwaitingStart,
    /// Waiting for the next player to make a valid move.
    AwaitingMove,
    /// The game was won or drawn and the result has been announced.
    Decided,
    /// A player or subscriber failed. Nothing can be played anymore.
    Aborted,
}

/// One game of Connect Four between two players.
///
/// The game owns the board and decides whose turn it is. Everything else
/// learns about the game through [`Subscriber`] notifications.
pub struct Game {
    board: Board,
    /// Indexed by [`Label::index()`].
    players: [Box<dyn Player>; 2],
    next_label: Label,
    subscribers: Subscribers,
    phase: Phase,
    move_count: usize,
    outcome: Option<Outcome>,
}

impl Game {
    pub const GAME_TYPE: GameType = GameType::CONNECT_FOUR;

    /// Seats two players, `player_a` moving first.
    ///
    /// Both players are attached right away, first A, then B. Any error
    /// from attaching, such as [`GameError::UnsupportedGameType`], is
    /// returned as is.
    pub fn new(
        player_a: impl Player + 'static,
        player_b: impl Player + 'static,
    ) -> anyhow::Result<Self> {
        let mut players: [Box<dyn Player>; 2] = [Box::new(player_a), Box::new(player_b)];
        let mut subscribers = Subscribers::new();
        for (player, label) in players.iter_mut().zip([Label::A, Label::B]) {
            player.on_attach(&mut Attachment {
                game_type: Self::GAME_TYPE,
                label,
                subscribers: &mut subscribers,
            })?;
        }

        Ok(Self {
            board: Board::new(),
            players,
            next_label: Label::A,
            subscribers,
            phase: Phase::AwaitingStart,
            move_count: 0,
            outcome: None,
        })
    }

    /// Registers a subscriber. Only a weak reference is kept.
    ///
    /// Subscribing the same instance again does nothing and returns `false`.
    pub fn subscribe<S: Subscriber + 'static>(&mut self, subscriber: &Rc<RefCell<S>>) -> bool {
        self.subscribers.insert(subscriber)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Whose turn it is.
    pub fn next_label(&self) -> Label {
        self.next_label
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of chips dropped so far.
    pub fn move_count(&self) -> usize {
        self.move_count
    }

    /// How the game ended, once it has.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Plays the whole game and returns how it ended.
    ///
    /// Returns an error only when a player or subscriber fails, not when a
    /// player makes an invalid move.
    pub fn play(&mut self) -> anyhow::Result<Outcome> {
        self.start()?;
        loop {
            match self.play_turn()? {
                GameResult::Undecided => {}
                result => return Ok(Outcome::try_from(result)?),
            }
        }
    }

    /// Announces the game to the subscribers, with the empty board.
    pub fn start(&mut self) -> anyhow::Result<()> {
        self.expect_phase(Phase::AwaitingStart)?;
        let board = &self.board;
        let announced = self.subscribers.broadcast(|sub| sub.on_game_start(board));
        self.abort_on_error(announced)?;
        self.phase = Phase::AwaitingMove;
        Ok(())
    }

    /// Plays one move of the player whose turn it is.
    ///
    /// The player is asked until it comes up with a valid move, and told
    /// about every invalid one. When the move ends the game, the result is
    /// announced before this returns.
    ///
    /// If a player or subscriber fails, the game is [`Phase::Aborted`] and
    /// the error is returned.
    pub fn play_turn(&mut self) -> anyhow::Result<GameResult> {
        self.expect_phase(Phase::AwaitingMove)?;
        let result = self.take_turn();
        self.abort_on_error(result)
    }

    fn take_turn(&mut self) -> anyhow::Result<GameResult> {
        let label = self.next_label;
        let player = &mut self.players[label.index()];

        let column = loop {
            trace!(label = %label, "Requesting move");
            let requested = player.request_move(&self.board, label)?;
            match validate_move(&self.board, requested) {
                Ok(column) => break column,
                Err(err) => {
                    debug!(label = %label, %err, "Invalid move");
                    player.handle_invalid_move(&self.board, err)?;
                }
            }
        };

        let row = self.board.drop_chip(column, label);
        self.move_count += 1;
        debug!(label = %label, column, row, "Dropped chip");
        let board = &self.board;
        self.subscribers
            .broadcast(|sub| sub.on_board_updated(board, label, column))?;
        self.next_label = label.other();

        let result = evaluate(&self.board);
        if result != GameResult::Undecided {
            self.report_result(result)?;
        }
        Ok(result)
    }

    fn report_result(&mut self, result: GameResult) -> anyhow::Result<()> {
        let outcome = Outcome::try_from(result)?;
        debug!(?outcome, moves = self.move_count, "Game decided");
        self.phase = Phase::Decided;
        self.outcome = Some(outcome);
        self.subscribers
            .broadcast(|sub| sub.on_game_result(outcome))
    }

    fn abort_on_error<T>(&mut self, result: anyhow::Result<T>) -> anyhow::Result<T> {
        if let Err(err) = &result {
            debug!(%err, moves = self.move_count, "Game aborted");
            self.phase = Phase::Aborted;
        }
        result
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), GameError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }
}

/// Checks a move against the board and turns it into a column index.
pub fn validate_move(board: &Board, column: i64) -> Result<usize, InvalidMove> {
    let idx = usize::try_from(column)
        .ok()
        .filter(|&idx| idx < WIDTH)
        .ok_or(InvalidMove {
            column,
            reason: InvalidMoveReason::OutOfRange,
        })?;
    if board.is_column_playable(idx) {
        Ok(idx)
    } else {
        Err(InvalidMove {
            column,
            reason: InvalidMoveReason::ColumnFull,
        })
    }
}
