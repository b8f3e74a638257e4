//! Game persistence for save/load functionality.
//!
//! Serializes a full playthrough (roster, configuration, board state) to
//! human-readable JSON. A snapshot that cannot be read back never stops a
//! host: [`load_or_new`] absorbs missing, corrupt, and incompatible files
//! by starting a fresh game.

use crate::board::MAX_SIXES_STREAK;
use crate::engine::{EngineConfig, GameEngine};
use crate::players::Roster;
use crate::state::{GameState, GameStatus, PlayerColor};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Corrupt snapshot: {0}")]
    Corrupt(String),
}

/// Current save file version.
const SAVE_VERSION: u32 = 1;

/// A saved game with all state needed to resume play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedGame {
    /// Save format version for compatibility checking.
    pub version: u32,

    /// When the save was created.
    pub saved_at: String,

    /// Stable identity of the playthrough across saves.
    pub game_id: Uuid,

    /// Who is playing which color.
    pub roster: Roster,

    /// Engine tunables, including the win rule.
    pub config: EngineConfig,

    /// The complete board state.
    pub state: GameState,

    /// Metadata about the save.
    pub metadata: SaveMetadata,
}

/// Metadata about the save file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveMetadata {
    /// Player names in turn order.
    pub players: Vec<String>,

    /// Whether the game is still in progress.
    pub status: GameStatus,

    /// Color whose turn it was at save time.
    pub current_turn: PlayerColor,

    /// Colors that have finished, in finishing order.
    pub winners: Vec<PlayerColor>,

    /// When the save was created (duplicated from parent for peek access).
    #[serde(default)]
    pub saved_at: String,
}

impl SavedGame {
    /// Snapshot a running engine.
    pub fn new(game_id: Uuid, engine: &GameEngine) -> Self {
        let saved_at = unix_stamp();
        let state = engine.state();
        let metadata = SaveMetadata {
            players: engine
                .roster()
                .seats()
                .iter()
                .map(|seat| seat.name.clone())
                .collect(),
            status: state.status,
            current_turn: state.current_turn,
            winners: state.winners.clone(),
            saved_at: saved_at.clone(),
        };

        Self {
            version: SAVE_VERSION,
            saved_at,
            game_id,
            roster: engine.roster().clone(),
            config: engine.config().clone(),
            state: state.clone(),
            metadata,
        }
    }

    /// Rebuild an engine from this snapshot.
    pub fn into_engine(self) -> GameEngine {
        GameEngine::resume(self.roster, self.state, self.config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON, checking the format version and that the
    /// state satisfies the board invariants.
    pub fn from_json_str(content: &str) -> Result<Self, PersistError> {
        let saved: Self = serde_json::from_str(content)?;

        if saved.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: saved.version,
            });
        }
        saved.validate()?;

        Ok(saved)
    }

    /// Reject snapshots whose state breaks the board invariants.
    ///
    /// JSON that parses can still describe an impossible board, which
    /// the engine is entitled to assume never reaches it.
    fn validate(&self) -> Result<(), PersistError> {
        for color in PlayerColor::ALL {
            for token in self.state.tokens_of(color) {
                if !token.invariants_hold() {
                    return Err(PersistError::Corrupt(format!(
                        "{color} token {} is {:?} at position {}",
                        token.id, token.status, token.position
                    )));
                }
            }
        }
        if self.state.sixes_streak > MAX_SIXES_STREAK {
            return Err(PersistError::Corrupt(format!(
                "sixes streak of {}",
                self.state.sixes_streak
            )));
        }
        if !self.roster.is_seated(self.state.current_turn) {
            return Err(PersistError::Corrupt(format!(
                "turn held by unseated {}",
                self.state.current_turn
            )));
        }
        Ok(())
    }

    /// Save to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let content = self.to_json_string()?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Load from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path).await?;
        Self::from_json_str(&content)
    }

    /// Check if a save file exists and get its metadata without loading the full state.
    pub async fn peek_metadata(path: impl AsRef<Path>) -> Result<SaveMetadata, PersistError> {
        let content = fs::read_to_string(path).await?;

        // Parse just enough to get metadata
        #[derive(Deserialize)]
        struct Partial {
            version: u32,
            metadata: SaveMetadata,
        }

        let partial: Partial = serde_json::from_str(&content)?;

        if partial.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: partial.version,
            });
        }

        Ok(partial.metadata)
    }
}

/// Load a snapshot, or start over when it cannot be used.
///
/// A missing, corrupt, or version-incompatible file is logged and
/// replaced by a fresh game under the given roster and configuration;
/// loading never fails.
pub async fn load_or_new(
    path: impl AsRef<Path>,
    roster: Roster,
    config: EngineConfig,
) -> (Uuid, GameEngine) {
    match SavedGame::load_json(path.as_ref()).await {
        Ok(saved) => (saved.game_id, saved.into_engine()),
        Err(err) => {
            warn!(
                "snapshot {} unusable ({err}); starting a fresh game",
                path.as_ref().display()
            );
            (Uuid::new_v4(), GameEngine::with_config(roster, config))
        }
    }
}

/// Create an auto-save file name.
pub fn auto_save_path(base_dir: impl AsRef<Path>, stem: &str) -> std::path::PathBuf {
    let sanitized = stem
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>();
    base_dir.as_ref().join(format!("{sanitized}_autosave.json"))
}

/// Get current timestamp as a unix-seconds string.
fn unix_stamp() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();

    format!("{}", now.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::DieFace;

    fn engine() -> GameEngine {
        GameEngine::new(Roster::standard())
    }

    #[test]
    fn test_saved_game_creation() {
        let mut engine = engine();
        engine.roll_dice(DieFace::SIX);

        let saved = SavedGame::new(Uuid::new_v4(), &engine);

        assert_eq!(saved.version, SAVE_VERSION);
        assert_eq!(saved.metadata.players.len(), 4);
        assert_eq!(saved.metadata.players[0], "Player 1");
        assert_eq!(saved.metadata.current_turn, PlayerColor::Red);
        assert_eq!(saved.state.dice_value, Some(DieFace::SIX));
    }

    #[test]
    fn test_json_string_round_trip() {
        let engine = engine();
        let saved = SavedGame::new(Uuid::new_v4(), &engine);

        let json = saved.to_json_string().expect("serialize should succeed");
        let loaded = SavedGame::from_json_str(&json).expect("parse should succeed");

        assert_eq!(loaded.game_id, saved.game_id);
        assert_eq!(loaded.state, saved.state);
        assert_eq!(loaded.roster, saved.roster);
        assert_eq!(loaded.config, saved.config);
    }

    #[test]
    fn test_version_mismatch_is_rejected() {
        let engine = engine();
        let saved = SavedGame::new(Uuid::new_v4(), &engine);
        let json = saved
            .to_json_string()
            .expect("serialize should succeed")
            .replace("\"version\": 1", "\"version\": 99");

        let err = SavedGame::from_json_str(&json).expect_err("should reject");
        assert!(matches!(
            err,
            PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: 99
            }
        ));
    }

    #[test]
    fn test_out_of_range_position_is_rejected() {
        let mut saved = SavedGame::new(Uuid::new_v4(), &engine());
        saved.state.tokens[0][0].position = 127;
        saved.state.tokens[0][0].status = crate::state::TokenStatus::Active;

        let json = saved.to_json_string().expect("serialize should succeed");
        let err = SavedGame::from_json_str(&json).expect_err("should reject");
        assert!(matches!(err, PersistError::Corrupt(_)));
    }

    #[test]
    fn test_excessive_streak_is_rejected() {
        let mut saved = SavedGame::new(Uuid::new_v4(), &engine());
        saved.state.sixes_streak = 4;

        let json = saved.to_json_string().expect("serialize should succeed");
        let err = SavedGame::from_json_str(&json).expect_err("should reject");
        assert!(matches!(err, PersistError::Corrupt(_)));
    }

    #[test]
    fn test_unseated_turn_is_rejected() {
        let roster = Roster::new(vec![
            crate::players::PlayerConfig::human("A", PlayerColor::Red),
            crate::players::PlayerConfig::human("B", PlayerColor::Green),
        ])
        .unwrap();
        let engine = GameEngine::with_config(roster, EngineConfig::default());
        let mut saved = SavedGame::new(Uuid::new_v4(), &engine);
        saved.state.current_turn = PlayerColor::Blue;

        let json = saved.to_json_string().expect("serialize should succeed");
        let err = SavedGame::from_json_str(&json).expect_err("should reject");
        assert!(matches!(err, PersistError::Corrupt(_)));
    }

    #[test]
    fn test_auto_save_path() {
        let path = auto_save_path("/saves", "Friday Night!");
        assert!(path.to_string_lossy().contains("Friday_Night__autosave"));
        assert!(path.to_string_lossy().ends_with(".json"));
    }

    #[tokio::test]
    async fn test_save_and_load() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let save_path = temp_dir.path().join("game.json");

        let mut engine = engine();
        engine.roll_dice(DieFace::SIX);
        engine.move_token(crate::state::TokenId(0));
        let saved = SavedGame::new(Uuid::new_v4(), &engine);
        saved.save_json(&save_path).await.expect("Save should succeed");

        assert!(save_path.exists());

        let loaded = SavedGame::load_json(&save_path)
            .await
            .expect("Load should succeed");
        assert_eq!(loaded.state, *engine.state());

        let resumed = loaded.into_engine();
        assert_eq!(resumed.current_color(), PlayerColor::Red);
        let token = resumed
            .state()
            .token(PlayerColor::Red, crate::state::TokenId(0))
            .expect("token exists");
        assert_eq!(token.position, 0);
    }

    #[tokio::test]
    async fn test_peek_metadata() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let save_path = temp_dir.path().join("peek.json");

        let saved = SavedGame::new(Uuid::new_v4(), &engine());
        saved.save_json(&save_path).await.expect("Save should succeed");

        let metadata = SavedGame::peek_metadata(&save_path)
            .await
            .expect("Peek should succeed");
        assert_eq!(metadata.status, GameStatus::Playing);
        assert!(metadata.winners.is_empty());
    }

    #[tokio::test]
    async fn test_load_or_new_missing_file() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let save_path = temp_dir.path().join("nothing_here.json");

        let (_, engine) =
            load_or_new(&save_path, Roster::standard(), EngineConfig::default()).await;
        assert_eq!(engine.current_color(), PlayerColor::Red);
        assert_eq!(engine.state().winners.len(), 0);
    }

    #[tokio::test]
    async fn test_load_or_new_corrupt_file() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let save_path = temp_dir.path().join("corrupt.json");
        tokio::fs::write(&save_path, "{ not json at all")
            .await
            .expect("write should succeed");

        let (_, engine) =
            load_or_new(&save_path, Roster::standard(), EngineConfig::default()).await;
        assert_eq!(engine.state().dice_value, None);
        assert_eq!(engine.revision(), 0);
    }
}
