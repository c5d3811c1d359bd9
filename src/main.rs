//! Ramadan Arcade entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use ramadan_arcade::consts::SIM_DT;
    use ramadan_arcade::platform;
    use ramadan_arcade::renderer::CanvasRenderer;
    use ramadan_arcade::renderer::layout::{back_rect, grid_cell_at, menu_at, option_at};
    use ramadan_arcade::sim::{
        DilemmaGame, DilemmaRules, GameOver, Runner, RunnerRules, ScenarioGraph, TapGame,
        TapRules, TickInput,
    };
    use ramadan_arcade::{
        ArcadeError, BestScores, GameKind, Leaderboard, ScoreSubmission, Tuning,
    };

    /// LocalStorage key holding the signed-in user id
    const USER_KEY: &str = "ramadan_arcade_user";

    /// Menu rows: the three games, then the leaderboard
    const MENU_ENTRIES: usize = GameKind::ALL.len() + 1;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Screen {
        Menu,
        Leaderboard,
        Play(GameKind),
    }

    /// Hub instance holding all state
    struct App {
        screen: Screen,
        runner: Runner,
        tap: TapGame,
        dilemma: DilemmaGame,
        best: BestScores,
        leaderboard: Leaderboard,
        renderer: CanvasRenderer,
        input: TickInput,
        user_id: String,
        last_time: f64,
    }

    impl App {
        fn new(renderer: CanvasRenderer, seed: u64) -> Self {
            let tuning = Tuning::load();
            let field = renderer.viewport();
            Self {
                screen: Screen::Menu,
                runner: Runner::new(RunnerRules::new(tuning.runner, field, seed)),
                tap: TapGame::new(TapRules::new(tuning.tap, seed.wrapping_add(1))),
                dilemma: DilemmaGame::new(DilemmaRules::new(
                    ScenarioGraph::ramadan(),
                    tuning.dilemma,
                )),
                best: BestScores::load(),
                leaderboard: Leaderboard::load(),
                renderer,
                input: TickInput::default(),
                user_id: platform::load_json(USER_KEY).unwrap_or_else(|| "guest".to_string()),
                last_time: 0.0,
            }
        }

        fn update(&mut self, dt: f32) {
            match self.screen {
                Screen::Play(GameKind::SlideJannah) => {
                    self.runner.frame(dt, &self.input);
                }
                Screen::Play(GameKind::WarTakjil) => self.tap.frame(dt),
                _ => {}
            }

            let events = [
                self.runner.take_game_over(),
                self.tap.take_game_over(),
                self.dilemma.take_game_over(),
            ];
            for event in events.into_iter().flatten() {
                self.on_game_over(event);
            }
        }

        fn render(&self) {
            match self.screen {
                Screen::Menu => self.renderer.draw_menu(&self.best),
                Screen::Leaderboard => {
                    self.renderer.draw_leaderboard(&self.leaderboard, &self.user_id)
                }
                Screen::Play(GameKind::SlideJannah) => {
                    self.renderer.draw_runner(&self.runner.snapshot())
                }
                Screen::Play(GameKind::WarTakjil) => self.renderer.draw_tap(&self.tap.snapshot()),
                Screen::Play(GameKind::Dilema) => {
                    self.renderer.draw_dilemma(&self.dilemma.snapshot())
                }
            }
        }

        /// Cache the best score locally, then hand the payload to the score service
        fn on_game_over(&mut self, event: GameOver) {
            if self.best.record(event.game, event.score) {
                self.best.save();
                log::info!("New best for {}: {}", event.game.title(), event.score);
                match self.leaderboard.upsert(&self.user_id, self.best.total()) {
                    Some(rank) => log::info!("Leaderboard rank: #{}", rank),
                    None => log::info!("Total {} is outside the top list", self.best.total()),
                }
                self.leaderboard.save();
            }
            let submission = ScoreSubmission::new(self.user_id.clone(), event.game, event.score);
            match submission.to_json() {
                Ok(json) => log::info!("Score submission: {}", json),
                Err(e) => log::warn!("Could not encode score submission: {}", e),
            }
        }

        fn enter(&mut self, game: GameKind) {
            self.exit();
            self.screen = Screen::Play(game);
            self.start();
        }

        /// Menu row picked by key or pointer
        fn pick(&mut self, entry: usize) {
            match GameKind::ALL.get(entry) {
                Some(game) => self.enter(*game),
                None => {
                    self.exit();
                    self.screen = Screen::Leaderboard;
                }
            }
        }

        /// Abandon the current run and go back to the hub
        fn exit(&mut self) {
            match self.screen {
                Screen::Menu | Screen::Leaderboard => {}
                Screen::Play(GameKind::SlideJannah) => self.runner.exit(),
                Screen::Play(GameKind::WarTakjil) => self.tap.exit(),
                Screen::Play(GameKind::Dilema) => self.dilemma.exit(),
            }
            self.screen = Screen::Menu;
        }

        fn start(&mut self) {
            match self.screen {
                Screen::Menu | Screen::Leaderboard => {}
                Screen::Play(GameKind::SlideJannah) => {
                    self.runner.start();
                }
                Screen::Play(GameKind::WarTakjil) => {
                    self.tap.start();
                }
                Screen::Play(GameKind::Dilema) => {
                    self.dilemma.start();
                }
            }
        }

        /// Space / Enter: jump while running, otherwise (re)start
        fn primary(&mut self) {
            if self.screen == Screen::Play(GameKind::SlideJannah) && self.runner.is_playing() {
                self.runner.jump();
            } else if !self.is_playing() {
                self.start();
            }
        }

        fn is_playing(&self) -> bool {
            match self.screen {
                Screen::Menu | Screen::Leaderboard => false,
                Screen::Play(GameKind::SlideJannah) => self.runner.is_playing(),
                Screen::Play(GameKind::WarTakjil) => self.tap.is_playing(),
                Screen::Play(GameKind::Dilema) => self.dilemma.is_playing(),
            }
        }

        fn pointer(&mut self, point: Vec2) {
            let viewport = self.renderer.viewport();
            if self.screen != Screen::Menu && back_rect(&viewport).contains(point) {
                self.exit();
                return;
            }
            match self.screen {
                Screen::Menu => {
                    if let Some(entry) = menu_at(&viewport, MENU_ENTRIES, point) {
                        self.pick(entry);
                    }
                }
                Screen::Leaderboard => {}
                Screen::Play(GameKind::WarTakjil) if self.tap.is_playing() => {
                    let cells = self.tap.rules().tuning.cells;
                    if let Some(index) = grid_cell_at(&viewport, cells, point) {
                        self.tap.click(index);
                    }
                }
                Screen::Play(GameKind::Dilema) if self.dilemma.is_playing() => {
                    if let Some(index) = option_at(&viewport, 2, point) {
                        self.dilemma.choose(index);
                    }
                }
                _ => self.primary(),
            }
        }

        fn key(&mut self, key: &str) -> bool {
            match key {
                "1" => self.pick(0),
                "2" => self.pick(1),
                "3" => self.pick(2),
                "4" | "l" | "L" => self.pick(3),
                "Escape" => self.exit(),
                " " | "Enter" | "ArrowUp" => self.primary(),
                "a" | "A" if self.screen == Screen::Play(GameKind::Dilema) => {
                    self.dilemma.choose(0);
                }
                "b" | "B" if self.screen == Screen::Play(GameKind::Dilema) => {
                    self.dilemma.choose(1);
                }
                "i" | "I" => {
                    self.input.autopilot = !self.input.autopilot;
                    log::info!("Autopilot: {}", self.input.autopilot);
                }
                _ => return false,
            }
            true
        }
    }

    fn to_js(error: ArcadeError) -> JsValue {
        log::error!("{}", error);
        JsValue::from_str(&error.to_string())
    }

    fn surface_error(msg: &str) -> JsValue {
        to_js(ArcadeError::SurfaceUnavailable(msg.to_string()))
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Ramadan Arcade starting...");

        let window = web_sys::window().ok_or_else(|| surface_error("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| surface_error("no document"))?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| surface_error("no #canvas element"))?
            .dyn_into()
            .map_err(|_| surface_error("#canvas is not a canvas"))?;

        // Canvas pixels follow CSS pixels so pointer offsets map 1:1
        let (client_w, client_h) = (canvas.client_width(), canvas.client_height());
        if client_w > 0 && client_h > 0 {
            canvas.set_width(client_w as u32);
            canvas.set_height(client_h as u32);
        }
        let renderer = CanvasRenderer::new(&canvas).map_err(to_js)?;

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(renderer, seed)));
        log::info!("Hub initialized with seed: {}", seed);

        setup_input_handlers(&canvas, app.clone());
        request_animation_frame(app);

        log::info!("Ramadan Arcade running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Mouse click
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let point = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                app.borrow_mut().pointer(point);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let point = Vec2::new(
                        touch.client_x() as f32 - rect.left() as f32,
                        touch.client_y() as f32 - rect.top() as f32,
                    );
                    app.borrow_mut().pointer(point);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if app.borrow_mut().key(event.key().as_str()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
        {
            let mut a = app.borrow_mut();

            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.update(dt);
            a.render();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    web::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use ramadan_arcade::consts::SIM_DT;
    use ramadan_arcade::platform::Viewport;
    use ramadan_arcade::sim::{
        CellKind, DilemmaGame, DilemmaRules, DilemmaRun, Ending, GameOver, Next, Node, Runner,
        RunnerRules, Scenario, ScenarioGraph, TapGame, TapRules, TickInput,
    };
    use ramadan_arcade::{Leaderboard, Tuning};

    /// Ninety seconds of runner play
    const RUNNER_FRAMES: u32 = 60 * 90;
    /// Tap demo reaction time (ms)
    const TAP_STEP_MS: u64 = 250;

    pub fn load_tuning(path: Option<String>) -> Tuning {
        let Some(path) = path else {
            return Tuning::default();
        };
        match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {} ({}), using defaults", path, e);
                Tuning::default()
            }
        }
    }

    /// Leaderboard list saved from the score service, empty without a file
    pub fn load_leaderboard(path: Option<String>) -> Leaderboard {
        let Some(path) = path else {
            return Leaderboard::default();
        };
        match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Leaderboard::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(board) => board,
            Err(e) => {
                log::warn!("Ignoring leaderboard file {} ({})", path, e);
                Leaderboard::default()
            }
        }
    }

    pub fn print_leaderboard(board: &Leaderboard, you: &str) {
        println!("TOP PEMAIN");
        for (i, entry) in board.entries.iter().enumerate() {
            let marker = if entry.username == you { "<" } else { "" };
            println!("#{:<3} {:<20} {:>8} {}", i + 1, entry.username, entry.total_score, marker);
        }
        if board.is_empty() {
            println!("(no records yet)");
        }
    }

    /// Autopilot runner until it crashes or time is up
    pub fn runner(tuning: &Tuning, seed: u64) -> Option<GameOver> {
        let mut game = Runner::new(RunnerRules::new(
            tuning.runner.clone(),
            Viewport::default(),
            seed,
        ));
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        game.start();
        for _ in 0..RUNNER_FRAMES {
            game.frame(SIM_DT, &input);
            if !game.is_playing() {
                break;
            }
        }
        if game.is_playing() {
            let score = game.run().map_or(0, |run| run.state.score);
            log::info!("Autopilot survived the whole demo with score {}", score);
            game.exit();
        }
        game.take_game_over()
    }

    /// Tap the first GOOD item every step until time runs out
    pub fn tap(tuning: &Tuning, seed: u64) -> Option<GameOver> {
        let mut game = TapGame::new(TapRules::new(tuning.tap.clone(), seed));
        game.start();
        while game.is_playing() {
            game.advance(TAP_STEP_MS);
            let target = game
                .run()
                .and_then(|run| run.cells.iter().position(|c| c.kind == CellKind::Good));
            if let Some(index) = target {
                game.click(index);
            }
        }
        game.take_game_over()
    }

    /// Always pick the option that keeps the weaker attribute highest
    pub fn dilemma(tuning: &Tuning) -> Option<GameOver> {
        let mut game = DilemmaGame::new(DilemmaRules::new(
            ScenarioGraph::ramadan(),
            tuning.dilemma.clone(),
        ));
        game.start();
        while game.is_playing() {
            let pick = game.run().and_then(|run| match run.node {
                Node::Scenario(id) => game.rules().graph.get(id).map(|s| safest(s, run)),
                _ => None,
            });
            let Some(index) = pick else {
                break;
            };
            game.choose(index);
        }
        game.take_game_over()
    }

    fn safest(scenario: &Scenario, run: &DilemmaRun) -> usize {
        scenario
            .options
            .iter()
            .enumerate()
            .max_by_key(|(_, choice)| {
                if choice.next == Next::End(Ending::Lose) {
                    i32::MIN
                } else {
                    let iman = run.iman.saturating_add(choice.effect.iman);
                    iman.min(run.social.saturating_add(choice.effect.social))
                }
            })
            .map_or(0, |(index, _)| index)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use ramadan_arcade::{BestScores, ScoreSubmission};

    env_logger::init();
    log::info!("Ramadan Arcade (native) starting headless demo...");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1447);
    let tuning = headless::load_tuning(args.next());
    let mut board = headless::load_leaderboard(args.next());
    log::info!("Seed: {}", seed);

    let results = [
        headless::runner(&tuning, seed),
        headless::tap(&tuning, seed),
        headless::dilemma(&tuning),
    ];

    let mut best = BestScores::new();
    for over in results.into_iter().flatten() {
        best.record(over.game, over.score);
        println!("{:<16} {:?} score {}", over.game.title(), over.outcome, over.score);
        match ScoreSubmission::new("headless", over.game, over.score).to_json() {
            Ok(json) => log::info!("Score submission: {}", json),
            Err(e) => log::warn!("Could not encode score submission: {}", e),
        }
    }
    println!("Total best score: {}", best.total());

    match board.upsert("headless", best.total()) {
        Some(rank) => log::info!("Demo player ranks #{}", rank),
        None => log::info!("Demo total {} is outside the top list", best.total()),
    }
    headless::print_leaderboard(&board, "headless");
}
