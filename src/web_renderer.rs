use crate::activities::{Quiz, MENU};
use crate::app::{ActiveScene, App};
use crate::entity::{Direction, Position};
use crate::game::{Game, GameState};
use crate::grid::Viewport;
use crate::input::HeldKeys;
use crate::renderer::{Command, FrameInput, Input, Key, Renderer};
use crate::scene::SceneId;
use crate::vocab::WORDS;
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent,
};

const SWIPE_THRESHOLD: f64 = 30.0; // Minimum distance in pixels to register a swipe
/// Vertical space above the board for the title and the word overlay.
const BOARD_TOP: f64 = 110.0;

const COLOR_BACKGROUND: &str = "#0f172a";
const COLOR_PANEL: &str = "#1e293b";
const COLOR_GRID: &str = "#243047";
const COLOR_TEXT: &str = "#f8fafc";
const COLOR_MUTED: &str = "#94a3b8";
const COLOR_ACCENT: &str = "#facc15";
const COLOR_SNAKE: &str = "#22c55e";
const COLOR_HEAD: &str = "#15803d";
const COLOR_GOOD: &str = "#16a34a";
const COLOR_BAD: &str = "#dc2626";

fn js_error(err: JsValue) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{:?}", err))
}

/// Clickable area laid out by the last render, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HitRegion {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    command: Command,
}

impl HitRegion {
    fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.w && y >= self.y && y <= self.y + self.h
    }
}

fn hit_test(regions: &[HitRegion], x: f64, y: f64) -> Option<Command> {
    // drawn last is on top
    regions.iter().rev().find(|r| r.contains(x, y)).map(|r| r.command)
}

fn swipe_direction(dx: f64, dy: f64) -> Option<Direction> {
    let abs_dx = dx.abs();
    let abs_dy = dy.abs();
    if abs_dx <= SWIPE_THRESHOLD && abs_dy <= SWIPE_THRESHOLD {
        return None;
    }
    // Primary direction is the one with larger delta
    if abs_dx > abs_dy {
        Some(if dx > 0.0 { Direction::Right } else { Direction::Left })
    } else {
        Some(if dy > 0.0 { Direction::Down } else { Direction::Up })
    }
}

fn arrow(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" => Some(Direction::Up),
        "ArrowDown" => Some(Direction::Down),
        "ArrowLeft" => Some(Direction::Left),
        "ArrowRight" => Some(Direction::Right),
        _ => None,
    }
}

pub struct WebRenderer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    window: web_sys::Window,

    // Input state, shared with the DOM listeners
    held: Rc<RefCell<HeldKeys>>,
    pending: Rc<RefCell<Vec<Input>>>,
    regions: Rc<RefCell<Vec<HitRegion>>>,
    touch_start_pos: Rc<RefCell<Option<(f64, f64)>>>,
}

impl WebRenderer {
    pub fn new(canvas_id: &str) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Self {
            canvas,
            context,
            window,
            held: Rc::new(RefCell::new(HeldKeys::none())),
            pending: Rc::new(RefCell::new(Vec::new())),
            regions: Rc::new(RefCell::new(Vec::new())),
            touch_start_pos: Rc::new(RefCell::new(None)),
        })
    }

    /// CSS-pixel size of the window, which the canvas fills.
    pub fn viewport(&self) -> Viewport {
        let width = self
            .window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let height = self
            .window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        Viewport::new(width, height)
    }

    fn listen<E: 'static + wasm_bindgen::convert::FromWasmAbi>(
        target: &web_sys::EventTarget,
        name: &str,
        handler: impl FnMut(E) + 'static,
    ) -> Result<(), JsValue> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
        target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
        closure.forget(); // Keep listener alive
        Ok(())
    }

    fn setup_keyboard_listeners(&self) -> Result<(), JsValue> {
        let held = self.held.clone();
        let pending = self.pending.clone();
        Self::listen(&self.window, "keydown", move |event: KeyboardEvent| {
            let key = event.key();
            let input = if event.ctrl_key() || event.meta_key() {
                match key.as_str() {
                    "s" | "S" => Some(Input::Click(Command::SaveDiary)),
                    _ => None,
                }
            } else if let Some(dir) = arrow(&key) {
                held.borrow_mut().set(dir, true);
                Some(Input::Key(Key::Arrow(dir)))
            } else {
                match key.as_str() {
                    "Enter" => Some(Input::Key(Key::Enter)),
                    "Backspace" => Some(Input::Key(Key::Backspace)),
                    "Escape" => Some(Input::Key(Key::Escape)),
                    // printable keys report themselves as a single character
                    text => {
                        let mut chars = text.chars();
                        match (chars.next(), chars.next()) {
                            (Some(c), None) => Some(Input::Key(Key::Char(c))),
                            _ => None,
                        }
                    }
                }
            };

            if let Some(input) = input {
                pending.borrow_mut().push(input);
                event.prevent_default();
            }
        })?;

        let held = self.held.clone();
        Self::listen(&self.window, "keyup", move |event: KeyboardEvent| {
            if let Some(dir) = arrow(&event.key()) {
                held.borrow_mut().set(dir, false);
            }
        })?;

        // a lost focus swallows keyups
        let held = self.held.clone();
        Self::listen(&self.window, "blur", move |_: web_sys::Event| {
            *held.borrow_mut() = HeldKeys::none();
        })
    }

    fn setup_pointer_listeners(&self) -> Result<(), JsValue> {
        let canvas = self.canvas.clone();
        let pending = self.pending.clone();
        let regions = self.regions.clone();
        Self::listen(&self.canvas, "click", move |event: MouseEvent| {
            let rect = canvas.get_bounding_client_rect();
            let x = f64::from(event.client_x()) - rect.left();
            let y = f64::from(event.client_y()) - rect.top();
            if let Some(command) = hit_test(&regions.borrow(), x, y) {
                pending.borrow_mut().push(Input::Click(command));
            }
        })?;

        // TouchStart: Record initial position
        let touch_start_pos = self.touch_start_pos.clone();
        Self::listen(&self.canvas, "touchstart", move |event: TouchEvent| {
            event.prevent_default(); // Prevent zooming, scrolling, etc.
            if let Some(touch) = event.touches().item(0) {
                let x = f64::from(touch.client_x());
                let y = f64::from(touch.client_y());
                *touch_start_pos.borrow_mut() = Some((x, y));
            }
        })?;

        // TouchMove: Prevent default to avoid scrolling
        Self::listen(&self.canvas, "touchmove", move |event: TouchEvent| {
            event.prevent_default();
        })?;

        // TouchEnd: a swipe steers, a tap presses whatever is under it
        let touch_start_pos = self.touch_start_pos.clone();
        let pending = self.pending.clone();
        let regions = self.regions.clone();
        let canvas = self.canvas.clone();
        Self::listen(&self.canvas, "touchend", move |event: TouchEvent| {
            event.prevent_default();
            let Some(touch) = event.changed_touches().item(0) else {
                return;
            };
            let Some((start_x, start_y)) = touch_start_pos.borrow_mut().take() else {
                return;
            };
            let end_x = f64::from(touch.client_x());
            let end_y = f64::from(touch.client_y());

            match swipe_direction(end_x - start_x, end_y - start_y) {
                Some(dir) => {
                    pending.borrow_mut().push(Input::Key(Key::Arrow(dir)));
                    vibrate(50.0);
                }
                None => {
                    let rect = canvas.get_bounding_client_rect();
                    if let Some(command) =
                        hit_test(&regions.borrow(), end_x - rect.left(), end_y - rect.top())
                    {
                        pending.borrow_mut().push(Input::Click(command));
                    }
                }
            }
        })?;

        // TouchCancel: Clear state if touch is cancelled
        let touch_start_pos = self.touch_start_pos.clone();
        Self::listen(&self.canvas, "touchcancel", move |event: TouchEvent| {
            event.prevent_default();
            *touch_start_pos.borrow_mut() = None;
        })
    }

    /// Match the canvas backing store to the viewport and device pixel ratio.
    fn fit_canvas(&self, viewport: Viewport) -> io::Result<()> {
        let dpr = self.window.device_pixel_ratio();
        let pixel_width = (viewport.width * dpr) as u32;
        let pixel_height = (viewport.height * dpr) as u32;

        if self.canvas.width() != pixel_width || self.canvas.height() != pixel_height {
            self.canvas.set_width(pixel_width);
            self.canvas.set_height(pixel_height);

            let element: &HtmlElement = self.canvas.unchecked_ref();
            let style = element.style();
            style
                .set_property("width", &format!("{}px", viewport.width))
                .map_err(js_error)?;
            style
                .set_property("height", &format!("{}px", viewport.height))
                .map_err(js_error)?;
        }

        // Setting the size resets the context, and scale() would compound
        self.context
            .set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)
            .map_err(js_error)
    }

    fn text(&self, text: &str, x: f64, y: f64, font: &str, color: &str, align: &str) -> io::Result<()> {
        self.context.set_font(font);
        self.context.set_fill_style_str(color);
        self.context.set_text_align(align);
        self.context.set_text_baseline("middle");
        self.context.fill_text(text, x, y).map_err(js_error)
    }

    fn rounded_rect(&self, x: f64, y: f64, w: f64, h: f64, r: f64) {
        let ctx = &self.context;
        ctx.begin_path();
        ctx.move_to(x + r, y);
        ctx.line_to(x + w - r, y);
        ctx.quadratic_curve_to(x + w, y, x + w, y + r);
        ctx.line_to(x + w, y + h - r);
        ctx.quadratic_curve_to(x + w, y + h, x + w - r, y + h);
        ctx.line_to(x + r, y + h);
        ctx.quadratic_curve_to(x, y + h, x, y + h - r);
        ctx.line_to(x, y + r);
        ctx.quadratic_curve_to(x, y, x + r, y);
        ctx.close_path();
    }

    /// Draw a button and remember where it is for clicks.
    fn button(
        &self,
        label: &str,
        (x, y, w, h): (f64, f64, f64, f64),
        fill: &str,
        command: Command,
    ) -> io::Result<()> {
        self.rounded_rect(x, y, w, h, 10.0);
        self.context.set_fill_style_str(fill);
        self.context.fill();
        self.text(label, x + w / 2.0, y + h / 2.0, "600 16px system-ui, sans-serif", COLOR_TEXT, "center")?;
        self.regions.borrow_mut().push(HitRegion { x, y, w, h, command });
        Ok(())
    }

    /// Row of equal buttons centred near the bottom of the screen.
    fn button_row(&self, viewport: Viewport, buttons: &[(&str, Command)]) -> io::Result<()> {
        let gap = 12.0;
        let w = 120.0;
        let h = 44.0;
        let total = buttons.len() as f64 * w + (buttons.len().saturating_sub(1)) as f64 * gap;
        let mut x = (viewport.width - total) / 2.0;
        // the board leaves margin_y minus BOARD_TOP free at the bottom
        let y = viewport.height - h - 4.0;
        for (label, command) in buttons {
            self.button(label, (x, y, w, h), COLOR_PANEL, *command)?;
            x += w + gap;
        }
        Ok(())
    }

    fn draw_header(&self, app: &App, viewport: Viewport, subtitle: &str) -> io::Result<()> {
        let progress = app.progress();
        self.text(
            &format!("Hallo, {}!", progress.name),
            24.0,
            32.0,
            "700 24px system-ui, sans-serif",
            COLOR_TEXT,
            "left",
        )?;
        self.text(subtitle, 24.0, 60.0, "16px system-ui, sans-serif", COLOR_MUTED, "left")?;
        self.text(
            &format!(
                "🔥 {}  🧀 {}  🃏 {}  ✅ {}%",
                progress.streak_days,
                progress.total_cheese_eaten,
                progress.flashcards_reviewed,
                progress.quiz_best
            ),
            viewport.width - 24.0,
            32.0,
            "16px system-ui, sans-serif",
            COLOR_TEXT,
            "right",
        )
    }

    fn draw_home(&self, app: &App, selected: usize, viewport: Viewport) -> io::Result<()> {
        self.draw_header(app, viewport, "Was möchtest du heute üben?")?;

        let gap = 16.0;
        let tile_w = ((viewport.width - 48.0 - gap) / 2.0).min(320.0);
        let tile_h = 120.0;
        let left = (viewport.width - (tile_w * 2.0 + gap)) / 2.0;
        for (i, item) in MENU.iter().enumerate() {
            let x = left + (i % 2) as f64 * (tile_w + gap);
            let y = BOARD_TOP + (i / 2) as f64 * (tile_h + gap);

            self.rounded_rect(x, y, tile_w, tile_h, 14.0);
            self.context.set_fill_style_str(COLOR_PANEL);
            self.context.fill();
            if i == selected || item.hot {
                self.context.set_line_width(if i == selected { 3.0 } else { 1.0 });
                self.context.set_stroke_style_str(COLOR_ACCENT);
                self.context.stroke();
            }
            self.text(item.label, x + 16.0, y + 40.0, "700 20px system-ui, sans-serif", COLOR_TEXT, "left")?;
            self.text(item.description, x + 16.0, y + 76.0, "14px system-ui, sans-serif", COLOR_MUTED, "left")?;
            self.regions.borrow_mut().push(HitRegion {
                x,
                y,
                w: tile_w,
                h: tile_h,
                command: Command::Navigate(item.scene),
            });
        }
        Ok(())
    }

    /// Top-left corner of the board so it sits centred under the header.
    fn board_origin(game: &Game, viewport: Viewport) -> (f64, f64) {
        let board = &game.config.board;
        let width = f64::from(game.grid.cols) * board.cell_width;
        ((viewport.width - width) / 2.0, BOARD_TOP)
    }

    fn draw_game(&self, app: &App, game: &Game, viewport: Viewport) -> io::Result<()> {
        self.draw_header(
            app,
            viewport,
            &format!("Maus & Käse · Punkte {} · Rekord {}", game.score, app.progress().best_game_score),
        )?;

        let cw = game.config.board.cell_width;
        let ch = game.config.board.cell_height;
        let (ox, oy) = Self::board_origin(game, viewport);
        let width = f64::from(game.grid.cols) * cw;
        let height = f64::from(game.grid.rows) * ch;

        self.context.set_fill_style_str(COLOR_PANEL);
        self.context.fill_rect(ox, oy, width, height);

        // grid lines
        self.context.set_stroke_style_str(COLOR_GRID);
        self.context.set_line_width(1.0);
        self.context.begin_path();
        for x in 0..=game.grid.cols {
            let px = ox + f64::from(x) * cw + 0.5;
            self.context.move_to(px, oy);
            self.context.line_to(px, oy + height);
        }
        for y in 0..=game.grid.rows {
            let py = oy + f64::from(y) * ch + 0.5;
            self.context.move_to(ox, py);
            self.context.line_to(ox + width, py);
        }
        self.context.stroke();

        let cell = |pos: Position| (ox + f64::from(pos.x) * cw, oy + f64::from(pos.y) * ch);

        if let Some(food) = game.food {
            let (x, y) = cell(food);
            self.text("🧀", x + cw / 2.0, y + ch / 2.0, &format!("{}px serif", (ch * 0.8).round()), COLOR_ACCENT, "center")?;
        }

        for (i, part) in game.snake.body.iter().enumerate() {
            let (x, y) = cell(*part);
            let color = if i == 0 { COLOR_HEAD } else { COLOR_SNAKE };
            self.rounded_rect(x + 2.0, y + 2.0, cw - 4.0, ch - 4.0, 6.0);
            self.context.set_fill_style_str(color);
            self.context.fill();
        }
        if let Some(head) = game.snake.head() {
            let (x, y) = cell(head);
            self.text("🐭", x + cw / 2.0, y + ch / 2.0, &format!("{}px serif", (ch * 0.7).round()), COLOR_TEXT, "center")?;
        }

        if let Some(word) = &game.current_word {
            self.text(word.native, viewport.width / 2.0, oy - 24.0, "700 22px system-ui, sans-serif", COLOR_ACCENT, "center")?;
            self.text(word.translation, viewport.width / 2.0, oy - 4.0, "14px system-ui, sans-serif", COLOR_MUTED, "center")?;
        }

        if game.state == GameState::Crashed {
            self.context.set_fill_style_str("rgba(0, 0, 0, 0.6)");
            self.context.fill_rect(ox, oy, width, height);
            self.text("Autsch!", ox + width / 2.0, oy + height / 2.0 - 20.0, "700 28px system-ui, sans-serif", COLOR_TEXT, "center")?;
            self.text(
                &format!("{} Käse gefressen", game.score),
                ox + width / 2.0,
                oy + height / 2.0 + 12.0,
                "16px system-ui, sans-serif",
                COLOR_MUTED,
                "center",
            )?;
            self.button_row(viewport, &[("Nochmal", Command::Restart), ("Home", Command::Navigate(SceneId::Home))])
        } else {
            self.button_row(viewport, &[("Home", Command::Navigate(SceneId::Home))])
        }
    }

    fn draw_flashcards(&self, app: &App, index: usize, viewport: Viewport) -> io::Result<()> {
        let card = &WORDS[index % WORDS.len()];
        self.draw_header(app, viewport, &format!("Karte {} / {}", index % WORDS.len() + 1, WORDS.len()))?;

        let w = (viewport.width - 48.0).min(420.0);
        let h = 220.0;
        let x = (viewport.width - w) / 2.0;
        let y = BOARD_TOP;
        self.rounded_rect(x, y, w, h, 18.0);
        self.context.set_fill_style_str(COLOR_PANEL);
        self.context.fill();
        self.text(card.native, x + w / 2.0, y + 90.0, "700 36px system-ui, sans-serif", COLOR_TEXT, "center")?;
        self.text(card.translation, x + w / 2.0, y + 150.0, "18px system-ui, sans-serif", COLOR_MUTED, "center")?;

        self.button_row(
            viewport,
            &[
                ("◀", Command::PrevCard),
                ("🔊 Sprechen", Command::Speak),
                ("▶", Command::NextCard),
                ("Home", Command::Navigate(SceneId::Home)),
            ],
        )
    }

    fn draw_quiz(&self, app: &App, quiz: &Quiz, viewport: Viewport) -> io::Result<()> {
        self.draw_header(app, viewport, &format!("Quiz · {} / {}", quiz.score, quiz.total))?;

        self.text(
            &format!("Was bedeutet „{}“?", quiz.question.word.native),
            viewport.width / 2.0,
            BOARD_TOP + 10.0,
            "700 24px system-ui, sans-serif",
            COLOR_TEXT,
            "center",
        )?;

        let w = (viewport.width - 48.0).min(420.0);
        let h = 52.0;
        let x = (viewport.width - w) / 2.0;
        for (i, option) in quiz.question.options.iter().enumerate() {
            let fill = match quiz.question.selected {
                Some(_) if quiz.question.is_correct(i) => COLOR_GOOD,
                Some(picked) if picked == i => COLOR_BAD,
                _ => COLOR_PANEL,
            };
            let y = BOARD_TOP + 50.0 + i as f64 * (h + 12.0);
            self.button(option, (x, y, w, h), fill, Command::Answer(i))?;
        }

        self.button_row(viewport, &[("Home", Command::Navigate(SceneId::Home))])
    }

    fn draw_diary(&self, app: &App, draft: &str, viewport: Viewport) -> io::Result<()> {
        self.draw_header(app, viewport, "Tagebuch · Wie geht's dir heute?")?;

        let w = (viewport.width - 48.0).min(560.0);
        let x = (viewport.width - w) / 2.0;
        let h = 160.0;
        self.rounded_rect(x, BOARD_TOP, w, h, 12.0);
        self.context.set_fill_style_str(COLOR_PANEL);
        self.context.fill();

        let lines: Vec<&str> = draft.split('\n').collect();
        let last = lines.len() - 1;
        // newest lines stay visible once the draft outgrows the box
        let visible = lines.len().saturating_sub(6);
        for (row, (i, line)) in lines.iter().enumerate().skip(visible).enumerate() {
            let text = if i == last { format!("{}▏", line) } else { line.to_string() };
            self.text(&text, x + 14.0, BOARD_TOP + 20.0 + row as f64 * 22.0, "16px system-ui, sans-serif", COLOR_TEXT, "left")?;
        }

        let mut y = BOARD_TOP + h + 30.0;
        for entry in app.progress().diary_entries.iter().take(4) {
            let stamp = entry.date.format("%Y-%m-%d");
            let first = entry.text.lines().next().unwrap_or_default();
            self.text(&format!("{}  {}", stamp, first), x, y, "14px system-ui, sans-serif", COLOR_MUTED, "left")?;
            y += 22.0;
        }

        self.button_row(
            viewport,
            &[("Speichern", Command::SaveDiary), ("Home", Command::Navigate(SceneId::Home))],
        )
    }

    fn draw_toast(&self, message: &str, viewport: Viewport) -> io::Result<()> {
        let w = 260.0;
        let h = 40.0;
        let x = (viewport.width - w) / 2.0;
        let y = viewport.height - 120.0;
        self.rounded_rect(x, y, w, h, 20.0);
        self.context.set_fill_style_str("rgba(15, 23, 42, 0.92)");
        self.context.fill();
        self.text(message, x + w / 2.0, y + h / 2.0, "600 15px system-ui, sans-serif", COLOR_ACCENT, "center")
    }
}

fn vibrate(ms: f64) {
    // Try to vibrate - this will fail silently if not supported
    if let Some(window) = web_sys::window() {
        let navigator = window.navigator();
        let _ = js_sys::Reflect::get(&navigator, &JsValue::from_str("vibrate"))
            .ok()
            .and_then(|vibrate_fn| {
                let vibrate = vibrate_fn.dyn_ref::<js_sys::Function>()?;
                vibrate.call1(&navigator, &JsValue::from_f64(ms)).ok()
            });
    }
}

impl Renderer for WebRenderer {
    fn init(&mut self) -> io::Result<()> {
        self.setup_keyboard_listeners().map_err(js_error)?;
        self.setup_pointer_listeners().map_err(js_error)?;
        Ok(())
    }

    fn render(&mut self, app: &App, now: f64) -> io::Result<()> {
        let viewport = app.viewport();
        self.fit_canvas(viewport)?;
        self.regions.borrow_mut().clear();

        self.context.set_fill_style_str(COLOR_BACKGROUND);
        self.context.fill_rect(0.0, 0.0, viewport.width, viewport.height);

        match app.scene() {
            ActiveScene::Home(menu) => self.draw_home(app, menu.selected, viewport)?,
            ActiveScene::Game(game) => self.draw_game(app, game, viewport)?,
            ActiveScene::Flashcards(cards) => self.draw_flashcards(app, cards.index, viewport)?,
            ActiveScene::Quiz(quiz) => self.draw_quiz(app, quiz, viewport)?,
            ActiveScene::Diary(diary) => self.draw_diary(app, &diary.draft, viewport)?,
        }

        if let Some(toast) = app.toast().filter(|t| t.is_visible(now)) {
            self.draw_toast(&toast.message, viewport)?;
        }

        let alpha = app.transition().overlay_alpha();
        if alpha > 0.0 {
            self.context
                .set_fill_style_str(&format!("rgba(15, 23, 42, {:.3})", alpha));
            self.context.fill_rect(0.0, 0.0, viewport.width, viewport.height);
        }
        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        // No cleanup needed for web
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<FrameInput> {
        let mut input = FrameInput::holding(*self.held.borrow());
        input.events = std::mem::take(&mut *self.pending.borrow_mut());
        // swipes and key repeats steer for the frame they arrive in
        for event in &input.events {
            if let Input::Key(Key::Arrow(dir)) = event {
                input.held.set(*dir, true);
            }
        }
        Ok(input)
    }
}
