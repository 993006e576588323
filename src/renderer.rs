use crate::app::App;
use crate::entity::Direction;
use crate::input::HeldKeys;
use crate::scene::SceneId;
use std::io;

/// Platform-neutral key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Arrow(Direction),
    Char(char),
    Enter,
    Backspace,
    Escape,
}

/// On-screen buttons. A renderer lays them out and reports clicks on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Navigate(SceneId),
    Restart,
    PrevCard,
    NextCard,
    Speak,
    Answer(usize),
    SaveDiary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Key(Key),
    Click(Command),
    Quit,
}

/// Everything a front-end collected since the previous frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    pub held: HeldKeys,
    pub events: Vec<Input>,
}

impl FrameInput {
    pub fn with_events(events: impl IntoIterator<Item = Input>) -> Self {
        Self {
            held: HeldKeys::none(),
            events: events.into_iter().collect(),
        }
    }

    pub fn holding(held: HeldKeys) -> Self {
        Self {
            held,
            events: Vec::new(),
        }
    }
}

/// A front-end: draws the app and collects raw input for it.
/// The terminal and the browser each have one.
pub trait Renderer {
    /// Set up the display and input listeners
    fn init(&mut self) -> io::Result<()>;

    /// Draw the app as it is now. Must not change it.
    fn render(&mut self, app: &App, now: f64) -> io::Result<()>;

    /// Clean up and restore terminal/display state
    fn cleanup(&mut self) -> io::Result<()>;

    /// Collect input for the next frame
    fn poll_input(&mut self) -> io::Result<FrameInput>;
}
