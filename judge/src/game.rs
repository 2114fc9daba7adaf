use std::cell::RefCell;
use std::rc::Rc;

use connect4::{Game, Label, Outcome, RandomPlayer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::recording::Recorder;
use crate::Config;

/// Tally of a series of games.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchScore {
    /// Indexed by [`Label::index()`].
    pub wins: [usize; 2],
    pub draws: usize,
}

impl MatchScore {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Won(label) => self.wins[label.index()] += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    pub fn num_games(&self) -> usize {
        self.wins[0] + self.wins[1] + self.draws
    }
}

/// Plays one game between two random players, each seeded from `rng`.
///
/// Returns an error only if the engine, a player or the recorder fails.
pub fn play_game(
    rng: &mut StdRng,
    recorder: Option<&Rc<RefCell<Recorder>>>,
) -> anyhow::Result<Outcome> {
    let player_a = RandomPlayer::new(StdRng::seed_from_u64(rng.gen()));
    let player_b = RandomPlayer::new(StdRng::seed_from_u64(rng.gen()));
    let mut game = Game::new(player_a, player_b)?;
    if let Some(recorder) = recorder {
        game.subscribe(recorder);
    }
    let outcome = game.play()?;
    debug!(?outcome, moves = game.move_count());
    Ok(outcome)
}

/// Plays `num_games` games and counts who won.
pub fn play_matchup(config: &mut Config, num_games: usize) -> anyhow::Result<MatchScore> {
    let mut match_score = MatchScore::default();
    for game_idx in 0..num_games {
        let outcome = play_game(&mut config.rng, config.recorder.as_ref())?;
        match outcome {
            Outcome::Won(winner) => debug!(%winner, game_idx),
            Outcome::Draw => debug!(game_idx, "Draw"),
        }
        match_score.record(outcome);
    }
    Ok(match_score)
}

/// A one-paragraph summary of a match, for printing.
pub fn summarize(score: &MatchScore) -> String {
    let percentage = |n: usize| n as f32 / score.num_games().max(1) as f32 * 100.0;
    format!(
        "End result:\n- {} wins by {} ({:.1}%)\n- {} wins by {} ({:.1}%)\n- {} draws ({:.1}%)",
        score.wins[Label::A.index()],
        Label::A,
        percentage(score.wins[Label::A.index()]),
        score.wins[Label::B.index()],
        Label::B,
        percentage(score.wins[Label::B.index()]),
        score.draws,
        percentage(score.draws),
    )
}
