pub mod activities;
pub mod announce;
pub mod app;
pub mod clock;
pub mod config;
pub mod entity;
pub mod error;
pub mod game;
pub mod grid;
pub mod input;
pub mod progress;
pub mod renderer;
pub mod scene;
pub mod speech;
pub mod tracker;
pub mod vocab;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli_renderer;

#[cfg(target_arch = "wasm32")]
pub mod web_main;
#[cfg(target_arch = "wasm32")]
pub mod web_platform;
#[cfg(target_arch = "wasm32")]
pub mod web_renderer;

pub use activities::{Diary, Flashcards, HomeMenu, Quiz, Toast};
pub use announce::{AnnouncementSink, CounterSink};
pub use app::{ActiveScene, App};
pub use clock::{ManualClock, TimeSource};
pub use config::{BoardLayout, Config, GameConfig};
pub use entity::{Direction, Position, Snake};
pub use error::{ConfigError, SpeechError, StorageError};
pub use game::{Game, GameState, TickOutcome};
pub use grid::{GridWorld, Viewport};
pub use input::{HeldKeys, KeyState};
pub use progress::{MemoryStore, Progress, ProgressStore};
pub use renderer::{Command, FrameInput, Input, Key, Renderer};
pub use scene::{SceneId, SceneTransition};
pub use speech::{SilentSpeaker, Speaker};
pub use tracker::{BoxedTracker, ProgressTracker};
pub use vocab::{VocabItem, WORDS};

#[cfg(not(target_arch = "wasm32"))]
pub use clock::SystemClock;
#[cfg(not(target_arch = "wasm32"))]
pub use cli_renderer::CliRenderer;
#[cfg(not(target_arch = "wasm32"))]
pub use progress::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use web_renderer::WebRenderer;
