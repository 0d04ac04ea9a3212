//! Neon Arcade entry point
//!
//! In the browser this boots whichever game the page hosts and runs the
//! fixed-step loop. Natively it plays a short scripted session of both
//! games headlessly and logs how it went.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use neon_arcade::GamePhase;
use neon_arcade::consts::{VOID_DEFAULT_HEIGHT, VOID_DEFAULT_WIDTH};
use neon_arcade::input::{InputState, KeyBindings};
use neon_arcade::invaders::{self, InvadersState};
use neon_arcade::vector_void::{self, VoidState};

/// Frames between thrust rumbles while the ship burns
const THRUST_SOUND_INTERVAL: u32 = 12;

/// Paces the looping engine sound
#[derive(Default)]
struct ThrustSound {
    timer: u32,
}

impl ThrustSound {
    /// True on frames that should play a rumble
    fn update(&mut self, thrusting: bool) -> bool {
        if !thrusting {
            self.timer = 0;
            return false;
        }
        if self.timer == 0 {
            self.timer = THRUST_SOUND_INTERVAL;
            true
        } else {
            self.timer -= 1;
            false
        }
    }
}

/// The game running on this page
enum Session {
    Invaders(Box<InvadersState>),
    Void(Box<VoidState>),
}

impl Session {
    fn new(kind: &str, seed: u64) -> Self {
        match kind {
            "vector-void" => Session::Void(Box::new(VoidState::new(
                seed,
                VOID_DEFAULT_WIDTH,
                VOID_DEFAULT_HEIGHT,
            ))),
            "invaders" => Session::Invaders(Box::new(InvadersState::new(seed))),
            other => {
                log::warn!("Unknown game '{}', falling back to invaders", other);
                Session::Invaders(Box::new(InvadersState::new(seed)))
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Session::Invaders(_) => "Space Invaders: Enhanced Edition",
            Session::Void(_) => "Vector Void",
        }
    }

    fn bindings(&self) -> KeyBindings {
        match self {
            Session::Invaders(_) => KeyBindings::invaders(),
            Session::Void(_) => KeyBindings::vector_void(),
        }
    }

    fn phase(&self) -> GamePhase {
        match self {
            Session::Invaders(s) => s.phase(),
            Session::Void(s) => s.phase(),
        }
    }

    fn score(&self) -> u64 {
        match self {
            Session::Invaders(s) => s.score(),
            Session::Void(s) => s.score(),
        }
    }

    fn lives(&self) -> u32 {
        match self {
            Session::Invaders(s) => s.lives(),
            Session::Void(s) => s.lives(),
        }
    }

    fn start_game(&mut self) {
        match self {
            Session::Invaders(s) => s.start_game(),
            Session::Void(s) => s.start_game(),
        }
    }

    fn pause_game(&mut self) {
        match self {
            Session::Invaders(s) => s.pause_game(),
            Session::Void(s) => s.pause_game(),
        }
    }

    fn resume_game(&mut self) {
        match self {
            Session::Invaders(s) => s.resume_game(),
            Session::Void(s) => s.resume_game(),
        }
    }

    fn quit_to_menu(&mut self) {
        match self {
            Session::Invaders(s) => s.quit_to_menu(),
            Session::Void(s) => s.quit_to_menu(),
        }
    }

    /// Ship engine is lit (Vector Void only)
    fn thrusting(&self) -> bool {
        match self {
            Session::Invaders(_) => false,
            Session::Void(s) => s.phase() == GamePhase::Playing && s.ship.thrusting,
        }
    }

    /// Advance one simulated frame
    fn tick(&mut self, input: &InputState) -> Vec<GameEvent> {
        match self {
            Session::Invaders(s) => {
                invaders::tick(s, input);
                s.drain_events().into_iter().map(GameEvent::Invaders).collect()
            }
            Session::Void(s) => {
                vector_void::tick(s, input);
                s.drain_events().into_iter().map(GameEvent::Void).collect()
            }
        }
    }
}

/// Events from either game, in emission order
enum GameEvent {
    Invaders(invaders::InvaderEvent),
    Void(vector_void::VoidEvent),
}

impl GameEvent {
    fn sound(&self) -> Option<neon_arcade::audio::SoundEffect> {
        match self {
            GameEvent::Invaders(e) => neon_arcade::audio::invader_sound(e),
            GameEvent::Void(e) => neon_arcade::audio::void_sound(e),
        }
    }

    fn is_mute_toggle(&self) -> bool {
        matches!(
            self,
            GameEvent::Invaders(invaders::InvaderEvent::MuteToggled)
                | GameEvent::Void(vector_void::VoidEvent::MuteToggled)
        )
    }

    /// Name and stats for the high-score board, when this event ends a run
    fn final_score(&self) -> Option<(&'static str, u64, u32)> {
        match self {
            GameEvent::Invaders(invaders::InvaderEvent::GameOver {
                score, max_combo, ..
            }) => Some(("PLAYER", *score, *max_combo)),
            GameEvent::Invaders(invaders::InvaderEvent::Victory { score, max_combo }) => {
                Some(("VICTOR", *score, *max_combo))
            }
            _ => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent, Window};

    use neon_arcade::audio::{AudioSink, SoundEffect, WebAudio};
    use neon_arcade::consts::*;
    use neon_arcade::highscores::{self, HighScores};
    use neon_arcade::input::{InputState, TouchButton};
    use neon_arcade::persistence::{self, KeyValueStore, LocalStore, MemoryStore};
    use neon_arcade::renderer::{self, Canvas2d, ViewOptions};
    use neon_arcade::{GamePhase, Settings};

    use super::{GameEvent, Session, ThrustSound};

    /// LocalStorage when the browser allows it, otherwise this page load only
    enum Store {
        Local(LocalStore),
        Memory(MemoryStore),
    }

    impl KeyValueStore for Store {
        fn get(&self, key: &str) -> persistence::Result<Option<String>> {
            match self {
                Store::Local(s) => s.get(key),
                Store::Memory(s) => s.get(key),
            }
        }

        fn set(&mut self, key: &str, value: &str) -> persistence::Result<()> {
            match self {
                Store::Local(s) => s.set(key, value),
                Store::Memory(s) => s.set(key, value),
            }
        }

        fn remove(&mut self, key: &str) -> persistence::Result<()> {
            match self {
                Store::Local(s) => s.remove(key),
                Store::Memory(s) => s.remove(key),
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        input: InputState,
        audio: WebAudio,
        store: Store,
        settings: Settings,
        high_scores: HighScores,
        canvas: Canvas2d,
        document: Document,
        accumulator: f32,
        last_time: f64,
        thrust_sound: ThrustSound,
        // Last phase shown in the DOM overlays
        shown_phase: Option<GamePhase>,
    }

    impl Game {
        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.step();
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
            // Drop whatever backlog the substep cap left behind
            if substeps == MAX_SUBSTEPS {
                self.accumulator = self.accumulator.min(SIM_DT);
            }
        }

        fn step(&mut self) {
            let events = self.session.tick(&self.input);
            self.input.end_frame();

            for event in &events {
                if let Some(effect) = event.sound() {
                    self.audio.play(effect);
                }
                if event.is_mute_toggle() {
                    self.toggle_mute();
                }
                if let Some((name, score, max_combo)) = event.final_score() {
                    self.record_score(name, score, max_combo);
                }
            }

            if self.thrust_sound.update(self.session.thrusting()) {
                self.audio.play(SoundEffect::Thrust);
            }
        }

        fn render(&mut self) {
            let view = ViewOptions::from(&self.settings);
            match &self.session {
                Session::Invaders(state) => renderer::draw_invaders(&mut self.canvas, state, view),
                Session::Void(state) => renderer::draw_vector_void(&mut self.canvas, state),
            }
        }

        fn start_game(&mut self) {
            self.audio.resume();
            self.audio.play(SoundEffect::MenuSelect);
            self.input.reset();
            self.accumulator = 0.0;
            self.session.start_game();
        }

        fn toggle_mute(&mut self) {
            self.settings.muted = self.audio.toggle_mute();
            self.settings.save(&mut self.store);
            log::info!("Audio {}", if self.settings.muted { "muted" } else { "unmuted" });
        }

        fn record_score(&mut self, name: &str, score: u64, max_combo: u32) {
            match self
                .high_scores
                .add(name, score, max_combo, highscores::today())
            {
                Some(rank) => {
                    log::info!("New high score #{}: {}", rank, score);
                    self.high_scores.save(&mut self.store);
                    self.update_high_score_list();
                }
                None => log::info!("Final score {} did not make the board", score),
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_hidden(&self, id: &str, hidden: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.class_list().toggle_with_force("hidden", hidden);
            }
        }

        fn update_hud(&mut self) {
            self.set_text("hud-score", &self.session.score().to_string());
            self.set_text("hud-lives", &self.session.lives().to_string());

            if let Session::Invaders(state) = &self.session {
                self.set_text("hud-level", &state.level().to_string());
                let combo = if state.combo() > 1 {
                    format!("{}x COMBO ({:.1}x)", state.combo(), state.multiplier())
                } else {
                    String::new()
                };
                self.set_text("hud-combo", &combo);
                self.set_text("hud-power", state.active_power_up_name());
                match state.boss_health() {
                    Some((fraction, phase)) => {
                        self.set_hidden("hud-boss", false);
                        self.set_text(
                            "hud-boss-health",
                            &format!("{:.0}% (PHASE {})", fraction * 100.0, phase),
                        );
                    }
                    None => self.set_hidden("hud-boss", true),
                }
            }

            let phase = self.session.phase();
            if self.shown_phase != Some(phase) {
                self.shown_phase = Some(phase);
                self.set_hidden("menu-screen", phase != GamePhase::Menu);
                self.set_hidden("pause-screen", phase != GamePhase::Paused);
                self.set_hidden("game-over-screen", phase != GamePhase::GameOver);
                self.set_hidden("victory-screen", phase != GamePhase::Victory);
                self.set_hidden("hud", phase == GamePhase::Menu);
                if phase.is_terminal() {
                    self.set_text("final-score", &self.session.score().to_string());
                }
            }
        }

        fn update_high_score_list(&self) {
            let Some(list) = self.document.get_element_by_id("high-scores") else {
                return;
            };
            list.set_text_content(None);
            for (i, entry) in self.high_scores.entries().iter().enumerate() {
                let Ok(item) = self.document.create_element("li") else {
                    return;
                };
                item.set_text_content(Some(&format!(
                    "{:>2}. {:<10} {:>8}  x{}  {}",
                    i + 1,
                    entry.name,
                    entry.score,
                    entry.max_combo,
                    entry.date
                )));
                let _ = list.append_child(&item);
            }
        }
    }

    /// Size the canvas to the window (Vector Void fills the page)
    fn fit_to_window(window: &Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(f64::from(VOID_DEFAULT_WIDTH)) as u32;
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(f64::from(VOID_DEFAULT_HEIGHT)) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #gameCanvas element");
            return;
        };

        let kind = canvas
            .get_attribute("data-game")
            .unwrap_or_else(|| "invaders".to_string());
        let seed = js_sys::Date::now() as u64;
        let mut session = Session::new(&kind, seed);
        log::info!("{} starting with seed {}", session.name(), seed);

        let store = match LocalStore::open() {
            Ok(store) => Store::Local(store),
            Err(e) => {
                log::warn!("{} - scores will not persist", e);
                Store::Memory(MemoryStore::new())
            }
        };
        let settings = Settings::load(&store);
        let high_scores = HighScores::load(&store);

        match &mut session {
            Session::Invaders(state) => {
                canvas.set_width(INVADERS_WIDTH as u32);
                canvas.set_height(INVADERS_HEIGHT as u32);
                settings.apply_to_invaders(state);
            }
            Session::Void(state) => {
                let (w, h) = fit_to_window(&window, &canvas);
                state.resize(w as f32, h as f32);
                settings.apply_to_particles(&mut state.particles);
            }
        }

        let canvas2d = match Canvas2d::new(&canvas) {
            Ok(c) => c,
            Err(e) => {
                log::error!("Failed to get 2d context: {:?}", e);
                return;
            }
        };

        let audio = WebAudio::new(settings.volume, settings.muted);
        let input = InputState::new(session.bindings());
        let touch_controls = settings.touch_controls && matches!(session, Session::Invaders(_));

        let game = Rc::new(RefCell::new(Game {
            session,
            input,
            audio,
            store,
            settings,
            high_scores,
            canvas: canvas2d,
            document: document.clone(),
            accumulator: 0.0,
            last_time: 0.0,
            thrust_sound: ThrustSound::default(),
            shown_phase: None,
        }));
        game.borrow().update_high_score_list();

        setup_input_handlers(&window, game.clone());
        if touch_controls {
            setup_touch_controls(&document, game.clone());
        }
        setup_menu_buttons(&document, game.clone());
        setup_auto_pause(&window, &document, game.clone());
        if matches!(game.borrow().session, Session::Void(_)) {
            setup_resize(&window, canvas, game.clone());
        }

        request_animation_frame(game);

        log::info!("Neon Arcade running!");
    }

    fn setup_input_handlers(window: &Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                // Audio may only start after a user gesture
                g.audio.resume();
                if event.code() == "Enter"
                    && matches!(
                        g.session.phase(),
                        GamePhase::Menu | GamePhase::GameOver | GamePhase::Victory
                    )
                {
                    g.start_game();
                    event.prevent_default();
                    return;
                }
                if g.input.key_down(&event.code(), event.repeat()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.code());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_touch_controls(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(el) = document.get_element_by_id("touch-controls") {
            let _ = el.class_list().remove_1("hidden");
        }

        let buttons = [
            ("touch-left", TouchButton::Left),
            ("touch-right", TouchButton::Right),
            ("touch-fire", TouchButton::Fire),
        ];
        for (id, button) in buttons {
            let Some(el) = document.get_element_by_id(id) else {
                log::warn!("Touch button #{} missing", id);
                continue;
            };
            for (event_name, pressed) in [("touchstart", true), ("touchend", false), ("touchcancel", false)] {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                    event.prevent_default();
                    let mut g = game.borrow_mut();
                    g.audio.resume();
                    g.input.set_touch(button, pressed);
                });
                let _ = el
                    .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn on_click(document: &Document, id: &str, game: &Rc<RefCell<Game>>, action: fn(&mut Game)) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::debug!("No #{} button on this page", id);
            return;
        };
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            action(&mut game.borrow_mut());
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_menu_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        on_click(document, "start-btn", &game, Game::start_game);
        on_click(document, "restart-btn", &game, Game::start_game);
        on_click(document, "pause-btn", &game, |g| g.session.pause_game());
        on_click(document, "resume-btn", &game, |g| {
            g.input.reset();
            g.session.resume_game();
        });
        on_click(document, "menu-btn", &game, |g| g.session.quit_to_menu());
        on_click(document, "mute-btn", &game, Game::toggle_mute);
    }

    fn setup_auto_pause(window: &Window, document: &Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.input.reset();
                    if g.session.phase() == GamePhase::Playing {
                        g.session.pause_game();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur: keys released elsewhere never send keyup here
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.input.reset();
                if g.session.phase() == GamePhase::Playing {
                    g.session.pause_game();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(window: &Window, canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window_clone = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (w, h) = fit_to_window(&window_clone, &canvas);
            let mut g = game.borrow_mut();
            g.canvas.resize(w, h);
            if let Session::Void(state) = &mut g.session {
                state.resize(w as f32, h as f32);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
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

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    log::info!("Neon Arcade (native) - headless demo with seed {}", seed);

    headless::run(seed);
}

/// Scripted autopilot for both games, drawn into a recording canvas
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use neon_arcade::audio::{AudioSink, SilentAudio, SoundEffect};
    use neon_arcade::highscores::{self, HighScores};
    use neon_arcade::persistence::MemoryStore;
    use neon_arcade::renderer::{self, DrawList, ViewOptions};
    use neon_arcade::{InputState, Settings};

    use super::{Session, ThrustSound};

    /// Three minutes of play per game at most
    const MAX_FRAMES: u32 = 60 * 60 * 3;

    pub fn run(seed: u64) {
        let mut store = MemoryStore::new();
        let settings = Settings::default();
        settings.save(&mut store);
        let mut high_scores = HighScores::load(&store);
        let mut audio = SilentAudio::new();
        audio.set_volume(settings.volume);

        for kind in ["invaders", "vector-void"] {
            let mut session = Session::new(kind, seed);
            let mut input = InputState::new(session.bindings());
            session.start_game();

            let mut thrust_sound = ThrustSound::default();
            let mut sounds = 0usize;
            let mut frame = 0;
            while frame < MAX_FRAMES && !session.phase().is_terminal() {
                // Take a short breather mid-run
                match frame {
                    600 => session.pause_game(),
                    660 => session.resume_game(),
                    _ => {}
                }
                autopilot(&mut input, &session, frame);
                for event in session.tick(&input) {
                    if let Some(effect) = event.sound() {
                        audio.play(effect);
                        sounds += 1;
                    }
                    if event.is_mute_toggle() {
                        audio.toggle_mute();
                    }
                    if let Some((name, score, max_combo)) = event.final_score() {
                        if let Some(rank) =
                            high_scores.add(name, score, max_combo, highscores::today())
                        {
                            log::info!("{} took rank {} with {}", name, rank, score);
                        }
                    }
                }
                if thrust_sound.update(session.thrusting()) {
                    audio.play(SoundEffect::Thrust);
                    sounds += 1;
                }
                input.end_frame();
                frame += 1;
            }

            let mut list = DrawList::new();
            match &session {
                Session::Invaders(state) => {
                    renderer::draw_invaders(&mut list, state, ViewOptions::from(&settings))
                }
                Session::Void(state) => renderer::draw_vector_void(&mut list, state),
            }

            log::info!(
                "{}: {:?} after {} frames, score {}, lives {}, {} sounds, last frame {} draw calls",
                session.name(),
                session.phase(),
                frame,
                session.score(),
                session.lives(),
                sounds,
                list.len()
            );
            session.quit_to_menu();
        }

        high_scores.save(&mut store);
        log::info!("High score board holds {} entries", high_scores.entries().len());
    }

    /// Hold fire and sweep side to side; Vector Void also pulses thrust
    fn autopilot(input: &mut InputState, session: &Session, frame: u32) {
        input.reset();
        input.key_down("Space", false);
        let code = if (frame / 90) % 2 == 0 {
            "ArrowLeft"
        } else {
            "ArrowRight"
        };
        input.key_down(code, false);
        if matches!(session, Session::Void(_)) && frame % 120 < 20 {
            input.key_down("ArrowUp", false);
        }
    }
}
