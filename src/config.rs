use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// How the viewport is carved into board cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardLayout {
    /// Width of one cell in viewport units
    pub cell_width: f64,
    /// Height of one cell in viewport units
    pub cell_height: f64,
    /// Horizontal space reserved around the board
    pub margin_x: f64,
    /// Vertical space reserved for header and HUD
    pub margin_y: f64,
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self::canvas()
    }
}

impl BoardLayout {
    /// Square 24px cells with room for the header, as drawn on the canvas.
    pub fn canvas() -> Self {
        Self {
            cell_width: 24.0,
            cell_height: 24.0,
            margin_x: 72.0,
            margin_y: 160.0,
        }
    }

    /// Two characters per cell; header, HUD and word lines take the rest.
    pub fn terminal() -> Self {
        Self {
            cell_width: 2.0,
            cell_height: 1.0,
            margin_x: 4.0,
            margin_y: 10.0,
        }
    }
}

/// Tuning for the Maus & Käse game
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board: BoardLayout,
    /// Tick interval at the start of a session
    pub initial_speed_ms: f64,
    /// Amount the interval shrinks per cheese eaten
    pub speed_step_ms: f64,
    /// The interval never drops below this
    pub min_speed_ms: f64,
    /// Random food placements tried before falling back to a scan
    pub spawn_attempts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board: BoardLayout::default(),
            initial_speed_ms: 140.0,
            speed_step_ms: 4.0,
            min_speed_ms: 70.0,
            spawn_attempts: 256,
        }
    }
}

/// Top-level settings for the whole app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub game: GameConfig,
    /// Transition progress added each frame
    pub transition_step: f32,
    pub toast_ms: f64,
    /// Delay between answering a quiz question and the next one
    pub quiz_advance_ms: f64,
    /// Target frame time for front-ends that pace themselves
    pub frame_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            transition_step: 0.06,
            toast_ms: 1400.0,
            quiz_advance_ms: 400.0,
            frame_ms: 16,
        }
    }
}

impl Config {
    pub fn terminal() -> Self {
        let mut config = Self::default();
        config.game.board = BoardLayout::terminal();
        config.frame_ms = 33;
        config
    }

    /// Read TOML settings on top of `self`. Keys the source leaves out keep
    /// their current values, at any depth.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn overlay_toml(&self, source: &str) -> Result<Self, ConfigError> {
        let overlay: toml::Table = source.parse()?;
        let mut merged = match toml::Value::try_from(self)? {
            toml::Value::Table(table) => table,
            _ => toml::Table::new(),
        };
        merge_tables(&mut merged, overlay);

        let config: Config = toml::Value::Table(merged).try_into()?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn overlay_file(&self, path: &std::path::Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        self.overlay_toml(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let game = &self.game;
        if game.board.cell_width <= 0.0 || game.board.cell_height <= 0.0 {
            return Err(ConfigError::Invalid("cell size must be positive".into()));
        }
        let speeds = [game.initial_speed_ms, game.min_speed_ms, game.speed_step_ms];
        if speeds.iter().any(|ms| !ms.is_finite()) {
            return Err(ConfigError::Invalid("speeds must be finite numbers".into()));
        }
        if game.min_speed_ms <= 0.0 {
            return Err(ConfigError::Invalid("min_speed_ms must be positive".into()));
        }
        if game.initial_speed_ms < game.min_speed_ms {
            return Err(ConfigError::Invalid(format!(
                "initial_speed_ms ({}) is below min_speed_ms ({})",
                game.initial_speed_ms, game.min_speed_ms
            )));
        }
        // every cheese has to speed the mouse up until the floor
        if game.speed_step_ms <= 0.0 {
            return Err(ConfigError::Invalid("speed_step_ms must be positive".into()));
        }
        if !(self.transition_step > 0.0 && self.transition_step <= 1.0) {
            return Err(ConfigError::Invalid(
                "transition_step must be in (0, 1]".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(patch) => match base.get_mut(&key) {
                Some(toml::Value::Table(inner)) => merge_tables(inner, patch),
                _ => {
                    base.insert(key, toml::Value::Table(patch));
                }
            },
            value => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.game.initial_speed_ms, 140.0);
        assert_eq!(config.game.min_speed_ms, 70.0);
        assert_eq!(config.game.board.cell_width, 24.0);
    }

    #[test]
    fn test_terminal_layout() {
        let config = Config::terminal();
        assert_eq!(config.game.board, BoardLayout::terminal());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::default()
            .overlay_toml(
                r#"
            toast_ms = 900.0

            [game]
            initial_speed_ms = 200.0
            "#,
            )
            .unwrap();

        assert_eq!(config.toast_ms, 900.0);
        assert_eq!(config.game.initial_speed_ms, 200.0);
        assert_eq!(config.game.speed_step_ms, 4.0);
        assert_eq!(config.transition_step, 0.06);
    }

    #[test]
    fn test_rejects_speed_below_floor() {
        let err = Config::default()
            .overlay_toml(
                r#"
            [game]
            initial_speed_ms = 50.0
            "#,
            )
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_zero_step() {
        let err = Config::default()
            .overlay_toml("[game]\nspeed_step_ms = 0.0")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_non_finite_speed() {
        for source in [
            "[game]\ninitial_speed_ms = nan\nmin_speed_ms = nan",
            "[game]\ninitial_speed_ms = inf",
            "[game]\nspeed_step_ms = nan",
        ] {
            let err = Config::default().overlay_toml(source).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "accepted {:?}", source);
        }
    }

    #[test]
    fn test_rejects_garbage() {
        let err = Config::default().overlay_toml("game = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = Config::default().overlay_toml("[game").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_overlay_keeps_terminal_board() {
        let config = Config::terminal()
            .overlay_toml(
                r#"
            [game.board]
            margin_y = 6.0
            "#,
            )
            .unwrap();

        assert_eq!(config.game.board.cell_width, 2.0);
        assert_eq!(config.game.board.margin_y, 6.0);
        assert_eq!(config.frame_ms, 33);
    }
}
