use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use connect4::{Board, Label, Outcome, Subscriber};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Writes every game it watches into its own JSON file.
///
/// The files are named `game_000001.json`, `game_000002.json` and so on.
pub struct Recorder {
    num: usize,
    directory: PathBuf,
    moves: Vec<MoveRecord>,
}

impl Recorder {
    pub fn new(directory: PathBuf) -> anyhow::Result<Self> {
        if !directory.is_dir() {
            anyhow::bail!("Directory '{}' does not exist", directory.display());
        }
        Ok(Self {
            num: 1,
            directory,
            moves: Vec::new(),
        })
    }

    /// How many games have been written so far.
    pub fn num_recorded(&self) -> usize {
        self.num - 1
    }

    fn write_game_recording(&mut self, outcome: Outcome) -> anyhow::Result<()> {
        let filepath = self.directory.join(format!("game_{:0>6}.json", self.num));
        let recording = GameRecording {
            moves: std::mem::take(&mut self.moves),
            outcome,
        };
        let mut writer = BufWriter::new(File::create(&filepath)?);
        serde_json::to_writer_pretty(&mut writer, &recording)?;
        writer.flush()?;
        debug!(path = %filepath.display(), "Wrote game recording");
        self.num += 1;
        Ok(())
    }
}

impl Subscriber for Recorder {
    fn on_game_start(&mut self, _board: &Board) -> anyhow::Result<()> {
        self.moves.clear();
        Ok(())
    }

    fn on_board_updated(
        &mut self,
        board: &Board,
        label: Label,
        column: usize,
    ) -> anyhow::Result<()> {
        // The chip that was just dropped is the topmost one in its column
        let row = board
            .column(column)
            .iter()
            .rposition(Option::is_some)
            .ok_or_else(|| anyhow::anyhow!("Column {} is empty after a move", column))?;
        self.moves.push(MoveRecord { label, column, row });
        Ok(())
    }

    fn on_game_result(&mut self, outcome: Outcome) -> anyhow::Result<()> {
        self.write_game_recording(outcome)
    }
}

#[derive(Serialize, Deserialize)]
pub struct GameRecording {
    pub moves: Vec<MoveRecord>,
    pub outcome: Outcome,
}

#[derive(Serialize, Deserialize)]
pub struct MoveRecord {
    pub label: Label,
    pub column: usize,
    pub row: usize,
}
