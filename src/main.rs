//! Duck Hunt entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlElement, KeyboardEvent, MouseEvent};

    use duck_hunt::Settings;
    use duck_hunt::audio::{AudioManager, SoundEffect};
    use duck_hunt::consts::MAX_FRAME_MS;
    use duck_hunt::dom::DomView;
    use duck_hunt::sim::{GameEvent, GameState, TickInput, start_level, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        view: DomView,
        audio: AudioManager,
        settings: Settings,
        last_time: f64,
        /// Sub-millisecond remainder carried between frames
        carry_ms: f64,
        input: TickInput,
    }

    impl Game {
        /// Run one simulation step for this frame
        fn update(&mut self, time: f64) {
            let elapsed = if self.last_time > 0.0 {
                (time - self.last_time).max(0.0) + self.carry_ms
            } else {
                0.0
            };
            self.last_time = time;
            let dt = elapsed.floor();
            self.carry_ms = elapsed - dt;
            let dt = (dt as u64).min(MAX_FRAME_MS);

            let input = std::mem::take(&mut self.input);
            tick(&mut self.state, &input, dt);

            for event in self.state.drain_events() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
                if let GameEvent::LevelStarted(level) = event {
                    log::info!("Level {} started", level);
                }
            }
        }

        fn render(&mut self) {
            if let Err(e) = self.view.render(&self.state) {
                log::warn!("Render error: {:?}", e);
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Duck Hunt starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        if let Some(body) = document.body() {
            body.class_list().add_1("unselectable")?;
        }

        let screen: HtmlElement = document
            .get_element_by_id("screen")
            .ok_or_else(|| JsValue::from_str("no #screen element"))?
            .dyn_into()?;

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);

        let view = DomView::new(document, screen.clone());
        let bounds = view.fit_to_window(&window)?;
        let mut state = GameState::new(seed, settings.tuning.clone(), bounds);
        start_level(&mut state);
        log::info!(
            "Game initialized with seed {} ({}x{})",
            seed,
            bounds.width,
            bounds.height
        );

        let game = Rc::new(RefCell::new(Game {
            state,
            view,
            audio: AudioManager::new(&settings),
            settings,
            last_time: 0.0,
            carry_ms: 0.0,
            input: TickInput::default(),
        }));

        setup_input_handlers(&window, &screen, game.clone())?;
        setup_focus_mute(&window, game.clone())?;

        // Start game loop
        request_animation_frame(game);

        log::info!("Duck Hunt running!");
        Ok(())
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        screen: &HtmlElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Shots on the playfield (hit-testing happens in the simulation)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                let (x, y) = g.view.to_playfield(event.client_x(), event.client_y());
                g.input.clicks.push(glam::Vec2::new(x, y));
            });
            screen.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // No native image dragging on the playfield
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
            });
            screen.add_event_listener_with_callback("dragstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Debug: any key kills every duck on screen
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: KeyboardEvent| {
                game.borrow_mut().input.kill_all = true;
            });
            window.add_event_listener_with_callback("keypress", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Playfield follows the window size
        {
            let window_clone = window.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                let fitted = g.view.fit_to_window(&window_clone);
                match fitted {
                    Ok(bounds) => g.input.resize = Some(bounds),
                    Err(e) => log::warn!("Resize failed: {:?}", e),
                }
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_focus_mute(window: &web_sys::Window, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        for (event_name, muted) in [("blur", true), ("focus", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(muted);
                    log::info!("Audio {}", if muted { "muted (window blur)" } else { "resumed" });
                }
            });
            window.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            log::error!("No window, game loop stopped");
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Duck Hunt (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    let path = std::env::args().nth(1).map(std::path::PathBuf::from);
    let settings = duck_hunt::Settings::load(path.as_deref());
    demo::run(&settings);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless autoplay: a simulated shooter plays until game over
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use duck_hunt::Settings;
    use duck_hunt::sim::{Bounds, GameEvent, GameState, TickInput, start_level, tick};

    /// Frame length fed to the simulation (ms)
    const FRAME_MS: u64 = 16;
    /// Chance per frame that the shooter pulls the trigger
    const TRIGGER_RATE: f64 = 0.02;
    /// Chance that a shot is aimed at a duck rather than the sky
    const ACCURACY: f64 = 0.6;
    /// Give up after this much virtual time
    const MAX_RUN_MS: u64 = 30 * 60 * 1000;

    pub fn run(settings: &Settings) {
        let seed = settings.seed.unwrap_or(0xD0C);
        let bounds = Bounds::new(1280.0, 720.0);
        let mut state = GameState::new(seed, settings.tuning.clone(), bounds);
        let mut shooter = Pcg32::seed_from_u64(seed ^ 0x5EED);
        start_level(&mut state);

        while !state.is_over() && state.time_ms < MAX_RUN_MS {
            let mut input = TickInput::default();
            if shooter.random_bool(TRIGGER_RATE) {
                let aimed = shooter.random_bool(ACCURACY);
                let target = state
                    .ducks
                    .iter()
                    .find(|d| aimed && d.is_active())
                    .map(|d| d.center(state.time_ms))
                    .unwrap_or_else(|| {
                        Vec2::new(
                            shooter.random_range(0.0..bounds.width),
                            shooter.random_range(0.0..bounds.height),
                        )
                    });
                input.clicks.push(target);
            }
            tick(&mut state, &input, FRAME_MS);

            for event in state.drain_events() {
                match event {
                    GameEvent::LevelStarted(level) => log::info!("Level {}", level),
                    GameEvent::LifeLost { remaining } => log::info!("Duck escaped, {} lives left", remaining),
                    _ => {}
                }
            }
        }

        println!(
            "seed {}: level {}, score {}, hits {}/{} shots, life {} ({} s of play)",
            seed,
            state.level,
            state.score,
            state.hits,
            state.shots,
            state.life,
            state.time_ms / 1000
        );
    }
}
