use crate::config::{load_settings, save_settings_atomic, settings_path, Settings};
use crate::games::{
    CatchGame, LaserGame, PlayArea, CATCH_REWARD, LASER_HIT_REWARD,
};
use crate::input::{collect_input_nonblocking, map_key_to_command, Command, SceneKind};
use crate::model::{Action, BlockReason, Character, Notice, TICK_PERIOD_MS};
use crate::render::{
    draw_catch_scene, draw_center_box, draw_character_select, draw_footer, draw_laser_scene,
    draw_pet, draw_speech_bubble, draw_status_panel, draw_toasts, Terminal, GAME_ORIGIN,
};
use crate::sim::Engine;
use crate::speech::{self, Topic};
use rand::{rngs::StdRng, SeedableRng};
use std::path::PathBuf;
use std::time::{Duration, Instant};

const TOAST_TTL: Duration = Duration::from_secs(4);
const MAX_TOASTS: usize = 4;
const SPEECH_REFRESH: Duration = Duration::from_secs(12);

enum Scene {
    CharacterSelect { cursor: usize },
    Main,
    Help,
    Laser(LaserGame),
    Catch(CatchGame),
    Dead,
}

impl Scene {
    fn kind(&self) -> SceneKind {
        match self {
            Scene::CharacterSelect { .. } => SceneKind::CharacterSelect,
            Scene::Main => SceneKind::Main,
            Scene::Help => SceneKind::Help,
            Scene::Laser(_) => SceneKind::Laser,
            Scene::Catch(_) => SceneKind::Catch,
            Scene::Dead => SceneKind::Dead,
        }
    }
}

struct Toast {
    text: String,
    expires_at: Instant,
}

pub(crate) struct App {
    settings: Settings,
    settings_path: PathBuf,
    term: Terminal,
    scene: Scene,
    engine: Option<Engine>,
    rng: StdRng,
    toasts: Vec<Toast>,
    speech: Option<&'static str>,
    speech_refresh_at: Instant,
    next_sim_tick: Instant,
    started: Instant,
    should_quit: bool,
}

impl App {
    fn init() -> anyhow::Result<Self> {
        let settings_path = settings_path()?;
        let settings = load_settings(&settings_path);
        let term = Terminal::begin()?;

        Ok(Self {
            settings,
            settings_path,
            term,
            scene: Scene::CharacterSelect { cursor: 0 },
            engine: None,
            rng: StdRng::from_entropy(),
            toasts: Vec::new(),
            speech: None,
            speech_refresh_at: Instant::now(),
            next_sim_tick: Instant::now(),
            started: Instant::now(),
            should_quit: false,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let fps = self.settings.fps_cap.clamp(10, 240);
        let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);
        let sim_step = Duration::from_millis(TICK_PERIOD_MS);

        while !self.should_quit {
            let _resized = self.term.resize_if_needed()?;

            let keys = collect_input_nonblocking(frame_dt)?;
            for key in keys {
                if let Some(cmd) = map_key_to_command(self.scene.kind(), key) {
                    self.handle_command(cmd);
                    if self.should_quit {
                        break;
                    }
                }
            }

            // The one decay timer: fires every 5s of wall clock, even while
            // a mini-game scene is up. The pet keeps aging.
            let now = Instant::now();
            if self.engine.is_some() {
                while Instant::now() >= self.next_sim_tick {
                    self.next_sim_tick += sim_step;
                    let notices = self
                        .engine
                        .as_mut()
                        .map(|e| e.tick(chrono::Utc::now()))
                        .unwrap_or_default();
                    self.process_notices(&notices);
                }
            }

            self.update_games(now);
            self.refresh_speech(now);
            self.toasts.retain(|t| t.expires_at > now);

            self.render_frame(now)?;

            spin_sleep(frame_dt, Instant::now());
        }

        self.term.end()?;
        save_settings_atomic(&self.settings_path, &self.settings)?;
        Ok(())
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Quit => self.should_quit = true,
            Command::HelpToggle => {
                self.scene = match self.scene {
                    Scene::Help => Scene::Main,
                    _ => Scene::Help,
                };
            }
            Command::Back => match &mut self.scene {
                Scene::Laser(_) => self.finish_laser(),
                Scene::Catch(_) => self.finish_catch(),
                _ => self.scene = Scene::Main,
            },
            Command::SelectMove(delta) => {
                if let Scene::CharacterSelect { cursor } = &mut self.scene {
                    *cursor = (*cursor as i32 + delta).rem_euclid(2) as usize;
                }
            }
            Command::SelectConfirm => {
                if let Scene::CharacterSelect { cursor } = self.scene {
                    let character = if cursor == 0 { Character::Merc } else { Character::Wolf };
                    self.adopt(character);
                }
            }
            Command::Do(action) => {
                let Some(engine) = self.engine.as_mut() else { return };
                let notices = engine.act(action);
                let applied = !notices.iter().any(|n| matches!(n, Notice::Blocked(_)));
                if applied {
                    if let Some(topic) = action_topic(action) {
                        let character = engine.state().character;
                        let line = speech::pick(&mut self.rng, character, topic);
                        self.push_toast(line.to_string());
                    }
                }
                self.process_notices(&notices);
            }
            Command::StartLaser => {
                let area = self.game_area();
                self.scene = Scene::Laser(LaserGame::new(area, Instant::now()));
            }
            Command::StartCatch => {
                let area = self.game_area();
                self.scene = Scene::Catch(CatchGame::new(area, Instant::now()));
            }
            Command::ResetPet => {
                if let Some(engine) = self.engine.as_mut() {
                    let character = engine.state().character;
                    engine.reset(character, chrono::Utc::now());
                    self.next_sim_tick = Instant::now() + Duration::from_millis(TICK_PERIOD_MS);
                    let line = speech::pick(&mut self.rng, character, Topic::Birth);
                    self.push_toast(line.to_string());
                    self.scene = Scene::Main;
                }
            }
            Command::GameMove(dx, dy) => match &mut self.scene {
                Scene::Laser(game) => game.move_cursor(dx, dy),
                Scene::Catch(game) => game.move_basket(dx),
                _ => {}
            },
            Command::Zap => {
                if let Scene::Laser(game) = &mut self.scene {
                    if game.zap(Instant::now()) {
                        if let Some(engine) = self.engine.as_mut() {
                            let (hap, en, xp) = LASER_HIT_REWARD;
                            let notices = engine.apply_laser_result(hap, en, xp);
                            self.process_notices(&notices);
                        }
                    }
                }
            }
            Command::NewGame => {
                self.engine = None;
                self.speech = None;
                self.scene = Scene::CharacterSelect { cursor: 0 };
            }
        }
    }

    fn adopt(&mut self, character: Character) {
        self.engine = Some(Engine::new(character, chrono::Utc::now()));
        self.next_sim_tick = Instant::now() + Duration::from_millis(TICK_PERIOD_MS);
        let line = speech::pick(&mut self.rng, character, Topic::Birth);
        self.push_toast(line.to_string());
        self.scene = Scene::Main;
    }

    fn update_games(&mut self, now: Instant) {
        match &mut self.scene {
            Scene::Laser(game) => {
                game.update(now, &mut self.rng);
                if game.finished(now) {
                    self.finish_laser();
                }
            }
            Scene::Catch(game) => {
                let caught = game.update(now, &mut self.rng);
                for _ in 0..caught {
                    if let Some(engine) = self.engine.as_mut() {
                        let (hun, hap, xp) = CATCH_REWARD;
                        let notices = engine.apply_catch_result(hun, hap, xp);
                        self.process_notices(&notices);
                    }
                }
                if let Scene::Catch(game) = &self.scene {
                    if game.finished(now) {
                        self.finish_catch();
                    }
                }
            }
            _ => {}
        }
    }

    fn finish_laser(&mut self) {
        if let Scene::Laser(game) = &self.scene {
            let score = game.score;
            let rating = game.rating();
            self.push_toast(format!("Laser chase over: {score} hits ({rating})"));
            if let Some(engine) = self.engine.as_mut() {
                let notices = engine.record_laser_score(score);
                self.process_notices(&notices);
            }
        }
        self.scene = if self.pet_dead() { Scene::Dead } else { Scene::Main };
    }

    fn finish_catch(&mut self) {
        if let Scene::Catch(game) = &self.scene {
            self.push_toast(format!(
                "Burger rain over: {} caught ({})",
                game.score,
                game.rating()
            ));
        }
        self.scene = if self.pet_dead() { Scene::Dead } else { Scene::Main };
    }

    fn pet_dead(&self) -> bool {
        self.engine
            .as_ref()
            .is_some_and(|e| !e.state().is_alive)
    }

    fn process_notices(&mut self, notices: &[Notice]) {
        for n in notices {
            match n {
                Notice::LevelUp(level) => self.push_toast(format!("Level up! Now level {level}")),
                Notice::Evolved(stage) => {
                    let name = crate::model::STAGE_NAMES[*stage];
                    self.push_toast(format!("Evolution! Your pet is now {name}!"));
                }
                Notice::Unlocked(a) => {
                    self.push_toast(format!("Trophy unlocked: {}", a.label()));
                }
                Notice::Died => {
                    self.push_toast("Your pet has passed away...".to_string());
                    if !matches!(self.scene, Scene::Laser(_) | Scene::Catch(_)) {
                        self.scene = Scene::Dead;
                    }
                }
                Notice::Blocked(reason) => self.push_toast(blocked_text(*reason).to_string()),
                Notice::HighScore(score) => {
                    self.push_toast(format!("New high score: {score}!"))
                }
            }
        }
        if self.pet_dead() && matches!(self.scene, Scene::Main | Scene::Help) {
            self.scene = Scene::Dead;
        }
    }

    fn refresh_speech(&mut self, now: Instant) {
        if now < self.speech_refresh_at {
            return;
        }
        self.speech_refresh_at = now + SPEECH_REFRESH;
        let Some(engine) = self.engine.as_ref() else {
            self.speech = None;
            return;
        };
        let st = engine.state();
        if !st.is_alive {
            self.speech = None;
            return;
        }
        self.speech = Some(speech::pick(
            &mut self.rng,
            st.character,
            Topic::for_mood(st.mood),
        ));
    }

    fn push_toast(&mut self, text: String) {
        if self.toasts.len() >= MAX_TOASTS {
            self.toasts.remove(0);
        }
        self.toasts.push(Toast {
            text,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn game_area(&self) -> PlayArea {
        PlayArea {
            w: (self.term.cols as i32 - 2).max(20),
            h: (self.term.rows as i32 - GAME_ORIGIN.1 as i32 - 2).max(8),
        }
    }

    fn render_frame(&mut self, now: Instant) -> anyhow::Result<()> {
        let bg = crossterm::style::Color::Black;
        self.term.cur.clear(bg);
        let color_on = self.settings.enable_color;

        match (&self.scene, self.engine.as_ref()) {
            (Scene::CharacterSelect { cursor }, _) => {
                draw_character_select(&mut self.term.cur, *cursor, color_on);
            }
            (Scene::Laser(game), _) => {
                let area = self.game_area();
                draw_laser_scene(&mut self.term.cur, game, area.w, area.h, now, color_on);
            }
            (Scene::Catch(game), _) => {
                let area = self.game_area();
                draw_catch_scene(&mut self.term.cur, game, area.w, area.h, now, color_on);
            }
            (_, Some(engine)) => {
                let st = engine.state();
                draw_status_panel(
                    &mut self.term.cur,
                    st,
                    engine.evolution_progress(),
                    &self.settings,
                );

                let cols = self.term.cols as i32;
                let rows = self.term.rows as i32;
                let panel_w = std::cmp::min(std::cmp::max(30, cols / 3), cols - 10);
                let cx = panel_w + (cols - panel_w) / 2;
                let cy = rows / 2;
                let phase = now.saturating_duration_since(self.started).as_secs_f64() * 4.0;
                draw_pet(&mut self.term.cur, st, cx, cy, phase, color_on);

                if st.is_alive {
                    if let Some(line) = self.speech {
                        draw_speech_bubble(&mut self.term.cur, line, cx, cy - 8);
                    }
                }

                if let Scene::Help = self.scene {
                    draw_center_box(
                        &mut self.term.cur,
                        "How to care for your hero",
                        "Needs decay over time; low hunger or happiness\n\
                         drains health, and zero health is the end.\n\n\
                         f Feed: +hunger, +happiness\n\
                         p Play: +happiness, -energy (needs energy 15)\n\
                         e Heal: +health, +energy\n\
                         s Sleep: +energy, +health, +happiness\n\
                         t Train: +happiness, -energy, big XP (needs 25)\n\
                         g Treat: +happiness, +hunger\n\
                         space Pet: small happiness bump\n\n\
                         l Laser chase, b Burger rain: mini-games for\n\
                         extra stats and XP. Your pet ages while you play.",
                    );
                }

                if let Scene::Dead = self.scene {
                    draw_center_box(
                        &mut self.term.cur,
                        "Your hero has passed on.",
                        "Every click, every burger, every zap mattered.\n\nPress N to adopt a new hero, or Q to quit.",
                    );
                }
            }
            _ => {}
        }

        let toast_lines: Vec<String> = self.toasts.iter().map(|t| t.text.clone()).collect();
        draw_toasts(&mut self.term.cur, &toast_lines);
        draw_footer(&mut self.term.cur, self.scene.kind());

        self.term.present(true)?;
        Ok(())
    }
}

fn action_topic(action: Action) -> Option<Topic> {
    match action {
        Action::Feed => Some(Topic::Feed),
        Action::Play => Some(Topic::Happy),
        Action::Heal => Some(Topic::Heal),
        Action::Sleep => Some(Topic::Sleeping),
        Action::Train => Some(Topic::Training),
        Action::Treat => Some(Topic::Treat),
        Action::Click => None,
    }
}

fn blocked_text(reason: BlockReason) -> &'static str {
    match reason {
        BlockReason::TooTiredToPlay => "I'm too tired to play right now...",
        BlockReason::NotEnoughEnergyToTrain => "I need more energy to train!",
    }
}

pub(crate) fn run() -> anyhow::Result<()> {
    let mut app = App::init()?;
    app.run()?;
    Ok(())
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
