use crate::app::App;
use crate::clock::TimeSource;
use crate::config::Config;
use crate::progress::ProgressStore;
use crate::renderer::Renderer;
use crate::speech::Speaker;
use crate::tracker::ProgressTracker;
use crate::web_platform::{LocalStorageStore, PerformanceClock, WebSpeaker};
use crate::web_renderer::WebRenderer;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Options read from the page's location hash, e.g. `#-vv&--seed=7`.
#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

fn to_js(err: std::io::Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

struct GameLoop {
    app: App,
    renderer: WebRenderer,
    clock: PerformanceClock,
}

impl GameLoop {
    fn new(seed: Option<u64>) -> Result<Self, JsValue> {
        let mut renderer = WebRenderer::new("gameCanvas")?;
        renderer.init().map_err(to_js)?;

        let store: Box<dyn ProgressStore> = Box::new(LocalStorageStore);
        let speaker: Box<dyn Speaker> = Box::new(WebSpeaker::new());
        let mut tracker = ProgressTracker::new(store, speaker);
        tracker.start_visit(chrono::Local::now());

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let app = App::new(Config::default(), tracker, rng, renderer.viewport());

        Ok(Self {
            app,
            renderer,
            clock: PerformanceClock::new(),
        })
    }

    fn update_frame(&mut self) -> Result<(), JsValue> {
        let input = self.renderer.poll_input().map_err(to_js)?;
        let now = self.clock.now();
        self.app.frame(now, &input, self.renderer.viewport());
        self.renderer.render(&self.app, now).map_err(to_js)
    }
}

fn request_frame(callback: &Closure<dyn FnMut()>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    Ok(())
}

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let hash = web_sys::window()
        .and_then(|window| window.location().hash().ok())
        .unwrap_or_default();
    let args = Args::try_parse_from(hash.split(['#', '&'])).unwrap_or_else(|err| {
        web_sys::console::warn_1(&format!("ignoring location hash: {}", err).into());
        Args::default()
    });
    if let Some(level) = args.verbose.log_level() {
        if let Err(err) = console_log::init_with_level(level) {
            web_sys::console::warn_1(&format!("logger already set: {}", err).into());
        }
    }

    log::info!("starting, seed {:?}", args.seed);
    let game_loop = Rc::new(RefCell::new(GameLoop::new(args.seed)?));

    // Setup requestAnimationFrame loop
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if let Err(err) = game_loop.borrow_mut().update_frame() {
            log::error!("frame failed: {:?}", err);
            return; // Stop loop on error
        }

        // Schedule next frame
        if let Some(callback) = f.borrow().as_ref() {
            if let Err(err) = request_frame(callback) {
                log::error!("could not schedule frame: {:?}", err);
            }
        }
    }) as Box<dyn FnMut()>));

    // Start the loop
    match g.borrow().as_ref() {
        Some(callback) => request_frame(callback),
        None => Err("animation callback missing".into()),
    }
}
