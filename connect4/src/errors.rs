use crate::{GameResult, Phase};

/// Why a move was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidMoveReason {
    /// The column index is negative or not smaller than the board width.
    OutOfRange,
    /// The topmost cell of the column is already occupied.
    ColumnFull,
}

/// The error type for a single move. The game recovers from it by asking
/// the same player again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidMove {
    pub column: i64,
    pub reason: InvalidMoveReason,
}

impl std::error::Error for InvalidMove {}

impl std::fmt::Display for InvalidMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.reason {
            InvalidMoveReason::OutOfRange => {
                write!(f, "Column {} does not exist on the board", self.column)
            }
            InvalidMoveReason::ColumnFull => write!(f, "Column {} is already full", self.column),
        }
    }
}

/// Errors that end a game. None of these are caused by a player simply
/// choosing a bad column; they point at a bug in a player, a subscriber or
/// in how the game is driven.
#[derive(Debug)]
pub enum GameError {
    /// A player was attached to a game it cannot play.
    UnsupportedGameType {
        player: &'static str,
        game: &'static str,
    },
    /// A player that only ever picks playable columns was told its move was invalid.
    UnreachableInvalidMove { err: InvalidMove },
    /// A result that cannot be reported as the end of a game.
    UnsupportedResult(GameResult),
    /// An operation was called in the wrong phase of the game.
    WrongPhase { expected: Phase, actual: Phase },
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::UnreachableInvalidMove { err } => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::UnsupportedGameType { player, game } => {
                write!(f, "{} does not implement playing the game {}", player, game)
            }
            GameError::UnreachableInvalidMove { err } => write!(
                f,
                "A computer player chose column {}, which is not a valid move",
                err.column
            ),
            GameError::UnsupportedResult(result) => {
                write!(f, "The game result {:?} is not supported", result)
            }
            GameError::WrongPhase { expected, actual } => write!(
                f,
                "Expected the game to be in phase {:?}, but it is in phase {:?}",
                expected, actual
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_invalid_move_has_source() {
        let err = GameError::UnreachableInvalidMove {
            err: InvalidMove {
                column: 3,
                reason: InvalidMoveReason::ColumnFull,
            },
        };
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "Column 3 is already full");
    }
}
