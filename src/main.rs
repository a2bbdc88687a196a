//! Snake Arcade entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use snake_arcade::audio::AudioManager;
    use snake_arcade::platform::canvas::CanvasRenderer;
    use snake_arcade::platform::input::{self, DIRECTION_BUTTONS};
    use snake_arcade::platform::storage::LocalStorage;
    use snake_arcade::{Command, Game, GameConfig, InputSource};

    const CANVAS_ID: &str = "game";
    const MUTE_BUTTON_ID: &str = "mute-btn";
    /// Optional JSON config overrides on the canvas element
    const CONFIG_ATTR: &str = "data-config";
    const ACTIVE_CLASS: &str = "active-direction";

    /// Everything the browser callbacks share
    struct Shell {
        game: Game<LocalStorage>,
        audio: AudioManager,
        renderer: CanvasRenderer,
        touch_start: Option<(f32, f32)>,
        active_button: Option<&'static str>,
    }

    impl Shell {
        fn handle(&mut self, command: Command, now: f64) {
            let was_muted = self.game.muted();
            self.game.handle(command, now);
            if self.game.muted() != was_muted {
                self.audio.set_muted(self.game.muted());
                update_mute_button(self.game.muted());
            }
            // Play inside the gesture so autoplay is allowed
            self.flush_cues();
        }

        fn frame(&mut self, now: f64) {
            self.game.frame(now);
            self.flush_cues();
            self.renderer.render(&self.game.snapshot());
            self.update_direction_buttons();
        }

        fn flush_cues(&mut self) {
            for cue in self.game.drain_cues() {
                self.audio.play_cue(cue);
            }
        }

        fn update_direction_buttons(&mut self) {
            let active = input::active_button(self.game.state().snake.heading);
            if active == self.active_button {
                return;
            }
            self.active_button = active;

            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            for (id, _) in DIRECTION_BUTTONS {
                if let Some(btn) = document.get_element_by_id(id) {
                    let _ = btn
                        .class_list()
                        .toggle_with_force(ACTIVE_CLASS, active == Some(id));
                }
            }
        }
    }

    /// Owns the requestAnimationFrame chain
    #[derive(Default)]
    struct FrameLoop {
        stopped: Cell<bool>,
        pending: Cell<Option<i32>>,
    }

    impl FrameLoop {
        /// Cancel the pending frame; no further frames are requested
        fn stop(&self) {
            self.stopped.set(true);
            if let Some(id) = self.pending.take()
                && let Some(window) = web_sys::window()
            {
                let _ = window.cancel_animation_frame(id);
            }
            log::info!("Frame loop stopped");
        }
    }

    fn update_mute_button(muted: bool) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(btn) = document.get_element_by_id(MUTE_BUTTON_ID) {
            btn.set_text_content(Some(if muted { "\u{1F507}" } else { "\u{1F50A}" }));
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Snake Arcade starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .ok_or("no canvas")?
            .dyn_into()?;

        let config = GameConfig::from_json_or_default(canvas.get_attribute(CONFIG_ATTR).as_deref());
        canvas.set_width(config.canvas_size as u32);
        canvas.set_height(config.canvas_size as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;
        let renderer = CanvasRenderer::new(ctx, config.canvas_size as f64);

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(config, LocalStorage::open(), seed);

        let mut audio = AudioManager::new();
        audio.set_muted(game.muted());
        update_mute_button(game.muted());

        log::info!(
            "Game initialized with seed: {} (best {})",
            seed,
            game.high_score()
        );

        let shell = Rc::new(RefCell::new(Shell {
            game,
            audio,
            renderer,
            touch_start: None,
            active_button: None,
        }));
        let frames = Rc::new(FrameLoop::default());

        setup_keyboard(shell.clone());
        setup_canvas_input(&canvas, shell.clone());
        setup_direction_buttons(shell.clone());
        setup_mute_button(shell.clone());
        setup_teardown(frames.clone());

        request_animation_frame(shell, frames);

        log::info!("Snake Arcade running!");
        Ok(())
    }

    fn setup_keyboard(shell: Rc<RefCell<Shell>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let key = event.key();
            if input::should_prevent_default(&key) {
                event.prevent_default();
            }
            shell
                .borrow_mut()
                .handle(input::command_for_key(&key), event.time_stamp());
        });
        let _ =
            document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_canvas_input(canvas: &HtmlCanvasElement, shell: Rc<RefCell<Shell>>) {
        // Tap / click
        {
            let shell = shell.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
                shell.borrow_mut().handle(Command::Tap, event.time_stamp());
            });
            let _ =
                canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Swipe start
        {
            let shell = shell.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    shell.borrow_mut().touch_start =
                        Some((touch.client_x() as f32, touch.client_y() as f32));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Swipe end
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut s = shell.borrow_mut();
                let Some((start_x, start_y)) = s.touch_start.take() else {
                    return;
                };
                let Some(touch) = event.changed_touches().get(0) else {
                    return;
                };
                let dx = touch.client_x() as f32 - start_x;
                let dy = touch.client_y() as f32 - start_y;
                if let Some(command) = input::command_for_swipe(dx, dy) {
                    s.handle(command, event.time_stamp());
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_direction_buttons(shell: Rc<RefCell<Shell>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        for (id, heading) in DIRECTION_BUTTONS {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let shell = shell.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
                event.stop_propagation();
                shell
                    .borrow_mut()
                    .handle(Command::Steer(heading, InputSource::Touch), event.time_stamp());
            });
            for kind in ["touchstart", "click"] {
                let _ = btn.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }
    }

    fn setup_mute_button(shell: Rc<RefCell<Shell>>) {
        let Some(btn) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(MUTE_BUTTON_ID))
        else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
            event.stop_propagation();
            shell
                .borrow_mut()
                .handle(Command::ToggleMute, event.time_stamp());
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_teardown(frames: Rc<FrameLoop>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            frames.stop();
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(shell: Rc<RefCell<Shell>>, frames: Rc<FrameLoop>) {
        if frames.stopped.get() {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let next = frames.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(shell, next, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => frames.pending.set(Some(id)),
            Err(err) => log::error!("requestAnimationFrame failed: {:?}", err),
        }
        closure.forget();
    }

    fn game_loop(shell: Rc<RefCell<Shell>>, frames: Rc<FrameLoop>, time: f64) {
        frames.pending.set(None);
        if frames.stopped.get() {
            return;
        }
        shell.borrow_mut().frame(time);
        request_animation_frame(shell, frames);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Snake Arcade (native) starting...");
    log::info!("Native mode is headless - serve the wasm build to play");

    run_demo_session();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Greedy apple chaser against an in-memory store, until it crashes or a
/// minute of game time passes.
#[cfg(not(target_arch = "wasm32"))]
fn run_demo_session() {
    use snake_arcade::sim::{GamePhase, GameState, Heading};
    use snake_arcade::{Command, Game, GameConfig, InputSource, KeyValueStore, MemoryStore};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const LIMIT_MS: f64 = 60_000.0;

    fn chase(state: &GameState) -> Heading {
        let (head, apple) = (state.snake.head, state.apple);
        let preferred = [
            (apple.x > head.x, Heading::Right),
            (apple.x < head.x, Heading::Left),
            (apple.y > head.y, Heading::Down),
            (apple.y < head.y, Heading::Up),
        ];
        preferred
            .into_iter()
            .find(|(wanted, h)| *wanted && !h.is_reverse_of(state.snake.heading))
            .map(|(_, h)| h)
            .unwrap_or(state.snake.heading)
    }

    let seed = 7;
    let mut game = Game::new(GameConfig::default(), MemoryStore::new(), seed);
    let mut now = 0.0;
    game.frame(now);
    game.handle(Command::AnyKey, now);
    game.handle(Command::Steer(Heading::Left, InputSource::Keyboard), now);

    let mut last_score = 0;
    while game.phase() == GamePhase::Playing && now < LIMIT_MS {
        let heading = chase(game.state());
        game.handle(Command::Steer(heading, InputSource::Keyboard), now);
        now += FRAME_MS;
        game.frame(now);

        let score = game.state().score;
        if score != last_score {
            log::info!(
                "t={:>6.0}ms score={} speed={} obstacles={}",
                now,
                score,
                game.state().speed,
                game.state().obstacles.len()
            );
            last_score = score;
        }
    }

    let cues = game.drain_cues();
    log::info!(
        "Demo finished: phase={:?} score={} ticks={} best={} stored={:?} cues={}",
        game.phase(),
        game.state().score,
        game.state().time_ticks,
        game.high_score(),
        game.store().get(snake_arcade::config::HIGH_SCORE_KEY),
        cues.len()
    );
}
