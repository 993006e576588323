use crate::activities::{Quiz, MENU};
use crate::app::{ActiveScene, App};
use crate::entity::{Direction, Position};
use crate::game::{Game, GameState};
use crate::grid::Viewport;
use crate::input::HeldKeys;
use crate::renderer::{Command, FrameInput, Input, Key, Renderer};
use crate::scene::SceneId;
use crate::vocab::WORDS;
use chrono::Local;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

/// Rows above the board: title and status line, then the top border.
const BOARD_TOP: u16 = 3;

pub struct CliRenderer {
    frame_time: Duration,
    next_frame: Instant,
    size: (u16, u16),
    /// Scene drawn last frame; a different one means a full clear
    drawn: Option<SceneId>,
}

impl CliRenderer {
    pub fn new(frame_ms: u64) -> Self {
        Self {
            frame_time: Duration::from_millis(frame_ms),
            next_frame: Instant::now(),
            size: (80, 24),
            drawn: None,
        }
    }

    /// Terminal size in cells, tracked across resize events.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(f64::from(self.size.0), f64::from(self.size.1))
    }

    fn width(&self) -> usize {
        usize::from(self.size.0)
    }

    /// Print `text` at a row, cut to the terminal width, erasing what was there.
    fn line(&self, out: &mut Stdout, row: u16, col: u16, text: &str) -> io::Result<()> {
        if row >= self.size.1 {
            return Ok(());
        }
        let room = self.width().saturating_sub(usize::from(col));
        let text: String = text.chars().take(room).collect();
        queue!(
            out,
            cursor::MoveTo(col, row),
            Print(text),
            terminal::Clear(ClearType::UntilNewLine)
        )
    }

    fn colored(
        &self,
        out: &mut Stdout,
        row: u16,
        col: u16,
        color: Color,
        text: &str,
    ) -> io::Result<()> {
        queue!(out, SetForegroundColor(color))?;
        self.line(out, row, col, text)?;
        queue!(out, ResetColor)
    }

    fn draw_header(&self, app: &App, out: &mut Stdout) -> io::Result<()> {
        let progress = app.progress();
        queue!(out, SetAttribute(Attribute::Bold))?;
        self.colored(
            out,
            0,
            0,
            Color::Yellow,
            &format!(
                "SKY Deutsch · {}  streak {}d  cheese {}  words {}",
                progress.name,
                progress.streak_days,
                progress.total_cheese_eaten,
                progress.learned_words.len()
            ),
        )?;
        queue!(out, SetAttribute(Attribute::Reset))?;
        Ok(())
    }

    fn draw_home(&self, app: &App, selected: usize, out: &mut Stdout) -> io::Result<()> {
        self.line(out, 1, 0, "Pick an activity")?;
        let half = (self.size.0 / 2).max(20);
        for (i, item) in MENU.iter().enumerate() {
            let col = 2 + (i as u16 % 2) * half;
            let row = BOARD_TOP + 1 + (i as u16 / 2) * 4;
            let label = format!(" {} {} ", i + 1, item.label);
            if i == selected {
                queue!(out, SetAttribute(Attribute::Reverse))?;
            }
            let color = if item.hot { Color::Yellow } else { Color::White };
            self.colored(out, row, col, color, &label)?;
            queue!(out, SetAttribute(Attribute::Reset))?;
            self.colored(out, row + 1, col + 3, Color::DarkGrey, item.description)?;
        }

        let progress = app.progress();
        self.line(
            out,
            BOARD_TOP + 10,
            2,
            &format!(
                "Flashcards reviewed {}  Quiz best {}%  Best run {}  Diary entries {}",
                progress.flashcards_reviewed,
                progress.quiz_best,
                progress.best_game_score,
                progress.diary_entries.len()
            ),
        )?;
        self.help(out, "Arrows select · Enter start · 1-4 jump · D diary · Esc quit")
    }

    fn draw_game(&self, app: &App, game: &Game, out: &mut Stdout) -> io::Result<()> {
        let speed = game.speed_ms;
        self.line(
            out,
            1,
            0,
            &format!(
                "Maus & Käse  score {}  best {}  {}ms",
                game.score,
                app.progress().best_game_score,
                speed
            ),
        )?;

        let layout = &game.config.board;
        let cell_w = layout.cell_width.max(1.0) as usize;
        let left = (layout.margin_x / 2.0) as u16;
        let cols = game.grid.cols as usize;
        let border = "─".repeat(cols * cell_w);

        self.colored(out, BOARD_TOP - 1, left.saturating_sub(1), Color::DarkGrey, &format!("┌{}┐", border))?;
        for y in 0..game.grid.rows {
            let row = BOARD_TOP + y as u16;
            queue!(
                out,
                cursor::MoveTo(left.saturating_sub(1), row),
                SetForegroundColor(Color::DarkGrey),
                Print("│")
            )?;
            for x in 0..game.grid.cols {
                self.draw_cell(game, Position::new(x, y), cell_w, out)?;
            }
            queue!(
                out,
                ResetColor,
                SetForegroundColor(Color::DarkGrey),
                Print("│"),
                ResetColor,
                terminal::Clear(ClearType::UntilNewLine)
            )?;
        }
        let bottom = BOARD_TOP + game.grid.rows as u16;
        self.colored(out, bottom, left.saturating_sub(1), Color::DarkGrey, &format!("└{}┘", border))?;

        for (offset, status) in (1..).zip(status_lines(game)) {
            if status.bold {
                queue!(out, SetAttribute(Attribute::Bold))?;
            }
            self.colored(out, bottom + offset, left, status.color, status.text)?;
            if status.bold {
                queue!(out, SetAttribute(Attribute::Reset))?;
            }
        }
        self.help(out, "Arrows steer · H home")
    }

    fn draw_cell(&self, game: &Game, pos: Position, cell_w: usize, out: &mut Stdout) -> io::Result<()> {
        let blank = " ".repeat(cell_w);
        if game.snake.head() == Some(pos) {
            let face = match game.dir {
                Direction::Up => "^",
                Direction::Down => "v",
                Direction::Left => "<",
                Direction::Right => ">",
            };
            queue!(
                out,
                SetBackgroundColor(Color::Green),
                SetForegroundColor(Color::Black),
                Print(format!("{:<width$}", face, width = cell_w)),
                ResetColor
            )
        } else if game.snake.occupies(pos) {
            queue!(out, SetBackgroundColor(Color::DarkGreen), Print(blank), ResetColor)
        } else if game.food == Some(pos) {
            queue!(
                out,
                SetForegroundColor(Color::Yellow),
                Print(format!("{:<width$}", "◆", width = cell_w)),
                ResetColor
            )
        } else {
            queue!(
                out,
                SetForegroundColor(Color::DarkGrey),
                Print(format!("{:<width$}", "·", width = cell_w)),
                ResetColor
            )
        }
    }

    fn draw_flashcards(&self, index: usize, out: &mut Stdout) -> io::Result<()> {
        let card = &WORDS[index % WORDS.len()];
        self.line(out, 1, 0, &format!("Flashcards  {}/{}", index % WORDS.len() + 1, WORDS.len()))?;
        queue!(out, SetAttribute(Attribute::Bold))?;
        self.colored(out, BOARD_TOP + 2, 4, Color::Yellow, card.native)?;
        queue!(out, SetAttribute(Attribute::Reset))?;
        self.line(out, BOARD_TOP + 4, 4, card.translation)?;
        self.help(out, "←/→ flip · Enter speak · H home")
    }

    fn draw_quiz(&self, quiz: &Quiz, out: &mut Stdout) -> io::Result<()> {
        self.line(out, 1, 0, &format!("Quiz  {}/{}", quiz.score, quiz.total))?;
        self.line(
            out,
            BOARD_TOP + 1,
            2,
            &format!("What does \"{}\" mean?", quiz.question.word.native),
        )?;
        for (i, option) in quiz.question.options.iter().enumerate() {
            let color = match quiz.question.selected {
                Some(_) if quiz.question.is_correct(i) => Color::Green,
                Some(picked) if picked == i => Color::Red,
                _ => Color::White,
            };
            self.colored(out, BOARD_TOP + 3 + i as u16, 4, color, &format!("{}) {}", i + 1, option))?;
        }
        self.help(out, "1-4 answer · H home")
    }

    fn draw_diary(&self, app: &App, draft: &str, out: &mut Stdout) -> io::Result<()> {
        self.line(out, 1, 0, "Diary")?;
        let mut row = BOARD_TOP;
        let lines: Vec<&str> = draft.split('\n').collect();
        let last = lines.len() - 1;
        for (i, text) in lines.iter().enumerate() {
            let text = if i == last { format!("> {}_", text) } else { format!("> {}", text) };
            self.line(out, row, 2, &text)?;
            row += 1;
        }
        // a deleted line leaves its old text one row below
        self.line(out, row, 0, "")?;

        row += 1;
        for entry in app.progress().diary_entries.iter().take(5) {
            let stamp = entry.date.with_timezone(&Local).format("%Y-%m-%d %H:%M");
            let first = entry.text.lines().next().unwrap_or_default();
            self.colored(out, row, 2, Color::DarkGrey, &format!("{}  {}", stamp, first))?;
            row += 1;
        }
        self.line(out, row, 0, "")?;
        self.help(out, "Type · Enter newline · Ctrl+S save · Esc home")
    }

    fn help(&self, out: &mut Stdout, text: &str) -> io::Result<()> {
        let row = self.size.1.saturating_sub(2);
        self.colored(out, row, 0, Color::DarkGrey, text)
    }

    /// Cover the scene with shade characters while a fade is running.
    fn draw_fade(&self, alpha: f32, out: &mut Stdout) -> io::Result<()> {
        let shade = match alpha {
            a if a < 0.25 => return Ok(()),
            a if a < 0.5 => "░",
            a if a < 0.75 => "▒",
            _ => "▓",
        };
        let fill = shade.repeat(self.width());
        for row in 1..self.size.1.saturating_sub(1) {
            self.colored(out, row, 0, Color::DarkGrey, &fill)?;
        }
        Ok(())
    }
}

impl Renderer for CliRenderer {
    fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.size = terminal::size()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide
        )?;
        self.next_frame = Instant::now() + self.frame_time;
        Ok(())
    }

    fn render(&mut self, app: &App, now: f64) -> io::Result<()> {
        let mut stdout = io::stdout();
        let scene = app.scene().id();
        if self.drawn != Some(scene) || app.transition().is_active() {
            queue!(stdout, terminal::Clear(ClearType::All))?;
        }
        self.drawn = Some(scene);
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.draw_header(app, &mut stdout)?;
        match app.scene() {
            ActiveScene::Home(menu) => self.draw_home(app, menu.selected, &mut stdout)?,
            ActiveScene::Game(game) => self.draw_game(app, game, &mut stdout)?,
            ActiveScene::Flashcards(cards) => self.draw_flashcards(cards.index, &mut stdout)?,
            ActiveScene::Quiz(quiz) => self.draw_quiz(quiz, &mut stdout)?,
            ActiveScene::Diary(diary) => self.draw_diary(app, &diary.draft, &mut stdout)?,
        }
        self.draw_fade(app.transition().overlay_alpha(), &mut stdout)?;

        if let Some(toast) = app.toast().filter(|t| t.is_visible(now)) {
            let row = self.size.1.saturating_sub(1);
            queue!(stdout, SetAttribute(Attribute::Reverse))?;
            self.line(&mut stdout, row, 0, &format!(" {} ", toast.message))?;
            queue!(stdout, SetAttribute(Attribute::Reset))?;
        } else {
            self.line(&mut stdout, self.size.1.saturating_sub(1), 0, "")?;
        }

        queue!(stdout, ResetColor)?;
        stdout.flush()?;
        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            cursor::Show,
            terminal::LeaveAlternateScreen,
            ResetColor
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Collect events until the next frame is due. Terminals only report
    /// presses, so an arrow counts as held for the frame its press lands in.
    fn poll_input(&mut self) -> io::Result<FrameInput> {
        let mut input = FrameInput::holding(HeldKeys::none());

        loop {
            let remaining = self.next_frame.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                break;
            }
            match event::read()? {
                Event::Key(key) => {
                    if let Some(mapped) = map_key(key) {
                        if let Input::Key(Key::Arrow(dir)) = mapped {
                            input.held.set(dir, true);
                        }
                        input.events.push(mapped);
                    }
                }
                Event::Resize(width, height) => {
                    log::debug!("terminal resized to {}x{}", width, height);
                    self.size = (width, height);
                    self.drawn = None;
                }
                _ => {}
            }
        }

        // if a frame ran long, start counting from now rather than catching up
        self.next_frame = (self.next_frame + self.frame_time).max(Instant::now());
        Ok(input)
    }
}

/// One line under the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StatusLine {
    color: Color,
    bold: bool,
    text: &'static str,
}

/// The lines under the board, top to bottom. The last word stays up after a
/// crash, with the crash notice below it.
fn status_lines(game: &Game) -> Vec<StatusLine> {
    let mut lines = Vec::with_capacity(3);
    match game.current_word {
        Some(word) => {
            lines.push(StatusLine { color: Color::Yellow, bold: true, text: word.native });
            lines.push(StatusLine { color: Color::Reset, bold: false, text: word.translation });
        }
        None => {
            lines.push(StatusLine {
                color: Color::DarkGrey,
                bold: false,
                text: "Eat cheese to hear a word",
            });
            lines.push(StatusLine { color: Color::Reset, bold: false, text: "" });
        }
    }
    if game.state == GameState::Crashed {
        lines.push(StatusLine {
            color: Color::Red,
            bold: false,
            text: "Crashed!  R restart · H home",
        });
    }
    lines
}

fn map_key(event: KeyEvent) -> Option<Input> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let input = match event.code {
        KeyCode::Char('c') if ctrl => Input::Quit,
        KeyCode::Char('s') if ctrl => Input::Click(Command::SaveDiary),
        _ if ctrl => return None,
        KeyCode::Up => Input::Key(Key::Arrow(Direction::Up)),
        KeyCode::Down => Input::Key(Key::Arrow(Direction::Down)),
        KeyCode::Left => Input::Key(Key::Arrow(Direction::Left)),
        KeyCode::Right => Input::Key(Key::Arrow(Direction::Right)),
        KeyCode::Enter => Input::Key(Key::Enter),
        KeyCode::Backspace => Input::Key(Key::Backspace),
        KeyCode::Esc => Input::Key(Key::Escape),
        KeyCode::Char(c) => Input::Key(Key::Char(c)),
        _ => return None,
    };
    Some(input)
}

impl Drop for CliRenderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
