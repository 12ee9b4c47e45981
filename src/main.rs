//! Galaxia entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use galaxia::Settings;
    use galaxia::platform::assets::{BrowserImages, preload};
    use galaxia::platform::input::detect_touch;
    use galaxia::platform::ui::DomUi;
    use galaxia::platform::{KeyAction, UiSink, map_key};
    use galaxia::render::WebCanvas;
    use galaxia::sim::{Game, Layout, Viewport};

    /// Everything the browser callbacks share
    struct App {
        game: Game<DomUi>,
        images: BrowserImages,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        touch: bool,
        /// Start and restart wait for the next frame so they use its timestamp
        start_requested: bool,
        restart_requested: bool,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            if self.restart_requested {
                self.restart_requested = false;
                self.game.restart_game(time);
            } else if self.start_requested {
                self.start_requested = false;
                self.game.start(time);
            }

            self.game.frame(time);

            let canvas = &mut WebCanvas::new(&self.ctx, &self.images);
            self.game.render(canvas, &self.images);
        }

        fn advance(&mut self) {
            if self.game.ui.take_advance() {
                self.game.resume_after_message();
            }
        }

        /// Touch point in canvas coordinates
        fn touch_point(&self, event: &TouchEvent) -> Option<Vec2> {
            let touch = event.touches().get(0)?;
            let rect = self.canvas.get_bounding_client_rect();
            Some(Vec2::new(
                touch.client_x() as f32 - rect.left() as f32,
                touch.client_y() as f32 - rect.top() as f32,
            ))
        }
    }

    fn window_viewport(window: &web_sys::Window) -> Viewport {
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(600.0);
        Viewport::new(width as f32, height as f32)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let mut settings = Settings::load();
        if console_log::init_with_level(settings.log_level()).is_err() {
            web_sys::console::warn_1(&"logger already initialized".into());
        }

        log::info!("Galaxia starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game-canvas")
            .ok_or("no #game-canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let viewport = window_viewport(&window);
        canvas.set_width(viewport.width as u32);
        canvas.set_height(viewport.height as u32);

        let touch = settings.touch_mode.unwrap_or_else(|| detect_touch(&window));
        if settings.seed.is_none() {
            settings.seed = Some(js_sys::Date::now() as u64);
        }
        log::info!(
            "seed {:?}, {} layout, {} integrator",
            settings.seed,
            if touch { "touch" } else { "desktop" },
            settings.integrator.as_str()
        );

        let (images, report) = preload().await;
        if !report.is_clean() {
            for (key, err) in &report.substituted {
                log::warn!("{key:?}: {err}");
            }
        }
        log::info!("{} images ready", report.loaded.len());

        let ui = DomUi::new(document.clone());
        let game = Game::new(settings, Layout::new(viewport, touch), ui);
        let app = Rc::new(RefCell::new(App {
            game,
            images,
            canvas,
            ctx,
            touch,
            start_requested: false,
            restart_requested: false,
        }));

        setup_buttons(&document, app.clone());
        setup_keyboard(&document, app.clone());
        setup_touch(app.clone());
        setup_resize(&window, app.clone());

        request_animation_frame(app);

        log::info!("Galaxia running!");
        Ok(())
    }

    fn on_click(document: &web_sys::Document, id: &str, mut handler: impl FnMut() + 'static) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("missing #{id}");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| handler());
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &web_sys::Document, app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            on_click(document, "start-btn", move || {
                let mut a = app.borrow_mut();
                a.game.ui.show_game_screen();
                a.start_requested = true;
            });
        }
        {
            let app = app.clone();
            on_click(document, "close-message-btn", move || app.borrow_mut().advance());
        }
        for id in ["restart-btn", "final-restart-btn"] {
            let app = app.clone();
            on_click(document, id, move || app.borrow_mut().restart_requested = true);
        }
    }

    fn setup_keyboard(document: &web_sys::Document, app: Rc<RefCell<App>>) {
        for (event_name, pressed) in [("keydown", true), ("keyup", false)] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                match map_key(&event.key()) {
                    Some(KeyAction::Steer(direction)) if !a.touch => {
                        event.prevent_default();
                        let mut keys = a.game.keys();
                        keys.set(direction, pressed);
                        a.game.set_keys(keys);
                    }
                    Some(KeyAction::Advance) if pressed => a.advance(),
                    _ => {}
                }
            });
            let _ = document
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_touch(app: Rc<RefCell<App>>) {
        let canvas = app.borrow().canvas.clone();

        for event_name in ["touchstart", "touchmove"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                if let Some(point) = a.touch_point(&event) {
                    a.game.touch_move(point);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
            app.borrow_mut().game.touch_end();
        });
        let _ = canvas.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(window: &web_sys::Window, app: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let viewport = window_viewport(&window);
            let mut a = app.borrow_mut();
            a.canvas.set_width(viewport.width as u32);
            a.canvas.set_height(viewport.height as u32);
            a.game.resize(viewport);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}

/// Headless run: plays a scripted session against recording collaborators
/// and prints the final status as JSON.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use galaxia::Settings;
    use galaxia::consts::FRAME_MS;
    use galaxia::platform::RecordingUi;
    use galaxia::render::{NoImages, RecordingCanvas};
    use galaxia::sim::{DirectionKeys, Game, Layout, Viewport};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Galaxia (native) starting...");
    log::info!("The playable build targets wasm32; this runs a headless session");

    let settings = Settings::load();
    let layout = Layout::new(Viewport::new(1000.0, 800.0), settings.touch_mode.unwrap_or(false));
    let mut game = Game::new(settings, layout, RecordingUi::new());
    let mut canvas = RecordingCanvas::new();

    game.start(0.0);
    for frame in 1..=600u32 {
        // Drift right, weaving up and down
        game.set_keys(DirectionKeys {
            right: true,
            up: frame % 120 < 60,
            down: frame % 120 >= 60,
            left: false,
        });
        game.frame(frame as f64 * FRAME_MS);
        if game.ui.awaiting_advance {
            game.ui.awaiting_advance = false;
            game.resume_after_message();
        }
    }

    canvas.clear();
    game.render(&mut canvas, &NoImages);
    log::info!("last frame: {} draw calls", canvas.draw_calls());

    match serde_json::to_string_pretty(&game.status()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("status not serializable: {e}"),
    }
}
