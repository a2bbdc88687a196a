//! Game state machine and frame driver
//!
//! `Game` is the outer shell around the pure simulation: it owns the phase
//! transitions, the frame scheduler, the effects layer and persistence, and
//! talks to the platform only through `Command`s in, and `Snapshot`s plus
//! `AudioCue`s out.

pub mod scheduler;

pub use scheduler::{FrameScheduler, MAX_CATCH_UP_TICKS, TickPolicy};

use crate::config::GameConfig;
use crate::highscores::HighScore;
use crate::persistence::KeyValueStore;
use crate::settings::Settings;
use crate::sim::state::APPLE_COLOR;
use crate::sim::{Effects, GameEvent, GamePhase, GameState, Heading, Snapshot, tick};

/// Where a directional intent came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Keyboard,
    /// On-screen buttons and swipes
    Touch,
}

/// Discrete input delivered by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Steer(Heading, InputSource),
    TogglePause,
    /// Enter
    Confirm,
    /// Click or tap on the playfield
    Tap,
    /// Any other key
    AnyKey,
    ToggleMute,
}

/// Fire-and-forget audio triggers for the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Eat,
    GameOver,
    /// Start (or resume) background music; `rewind` restarts the track
    MusicStart { rewind: bool },
    MusicStop,
}

/// A play session: one per page load
pub struct Game<S: KeyValueStore> {
    config: GameConfig,
    state: GameState,
    effects: Effects,
    scheduler: FrameScheduler,
    high_score: HighScore,
    settings: Settings,
    store: S,
    seed: u64,
    runs: u64,
    last_frame_time: f64,
    events: Vec<GameEvent>,
    cues: Vec<AudioCue>,
}

impl<S: KeyValueStore> Game<S> {
    /// New session in the menu. Reads the store once.
    pub fn new(config: GameConfig, store: S, seed: u64) -> Self {
        Self::with_policy(config, store, seed, TickPolicy::default())
    }

    pub fn with_policy(config: GameConfig, store: S, seed: u64, policy: TickPolicy) -> Self {
        let high_score = HighScore::load(&store);
        let settings = Settings::load(&store);
        let state = GameState::new(&config, seed);
        Self {
            effects: Effects::new(seed),
            state,
            config,
            scheduler: FrameScheduler::new(policy),
            high_score,
            settings,
            store,
            seed,
            runs: 0,
            last_frame_time: 0.0,
            events: Vec::new(),
            cues: Vec::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    pub fn high_score(&self) -> u32 {
        self.high_score.best()
    }

    pub fn muted(&self) -> bool {
        self.settings.muted
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Audio cues raised since the last drain
    pub fn drain_cues(&mut self) -> Vec<AudioCue> {
        std::mem::take(&mut self.cues)
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::capture(
            &self.state,
            &self.effects,
            &self.config,
            self.high_score.best(),
            self.settings.muted,
            self.last_frame_time,
        )
    }

    /// Apply one input. Inputs that make no sense in the current phase are ignored.
    pub fn handle(&mut self, command: Command, now: f64) {
        if command == Command::ToggleMute {
            self.settings.toggle_mute(&mut self.store);
            return;
        }

        match self.state.phase {
            GamePhase::Menu => self.start(now),
            GamePhase::Playing => match command {
                Command::Steer(heading, _) => {
                    self.state.snake.steer(heading);
                }
                Command::TogglePause => self.pause(),
                _ => {}
            },
            GamePhase::Paused => {
                if matches!(command, Command::TogglePause | Command::Tap) {
                    self.resume(now);
                }
            }
            GamePhase::GameOver => {
                if matches!(
                    command,
                    Command::Confirm | Command::Tap | Command::Steer(_, InputSource::Touch)
                ) {
                    self.restart(now);
                }
            }
        }
    }

    /// Drive one display refresh at timestamp `now` (ms)
    pub fn frame(&mut self, now: f64) {
        let dt = self.scheduler.begin_frame(now);
        self.last_frame_time = now;
        self.effects.advance(dt);

        if self.state.phase != GamePhase::Playing {
            return;
        }

        let mut ticks = 0;
        while self.state.phase == GamePhase::Playing
            && ticks < MAX_CATCH_UP_TICKS
            && self.scheduler.take_tick(now, self.state.tick_interval_ms())
        {
            tick(&mut self.state, &self.config, now, &mut self.events);
            ticks += 1;
            self.process_events();
        }
        if self.state.phase == GamePhase::Playing {
            self.scheduler.settle(now, self.state.tick_interval_ms());
        }
    }

    fn start(&mut self, now: f64) {
        self.state.phase = GamePhase::Playing;
        self.scheduler.reset_tick_clock(now);
        self.cues.push(AudioCue::MusicStart { rewind: false });
        log::info!("Game started (seed {})", self.state.seed);
    }

    fn pause(&mut self) {
        self.state.phase = GamePhase::Paused;
        self.cues.push(AudioCue::MusicStop);
        log::info!("Paused");
    }

    fn resume(&mut self, now: f64) {
        self.state.phase = GamePhase::Playing;
        self.scheduler.reset_tick_clock(now);
        self.cues.push(AudioCue::MusicStart { rewind: false });
        log::info!("Resumed");
    }

    /// Full re-init, straight into play
    fn restart(&mut self, now: f64) {
        self.runs += 1;
        let seed = self
            .seed
            .wrapping_add(self.runs.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.state = GameState::new(&self.config, seed);
        self.effects.clear();
        self.events.clear();

        self.state.phase = GamePhase::Playing;
        self.scheduler.reset_tick_clock(now);
        self.cues.push(AudioCue::MusicStart { rewind: true });
        log::info!("Game restarted (run {}, seed {})", self.runs + 1, seed);
    }

    fn game_over(&mut self) {
        self.cues.push(AudioCue::MusicStop);
        self.cues.push(AudioCue::GameOver);
        self.effects
            .start_shake(self.config.shake_duration_ms, self.config.shake_intensity);
        self.high_score.submit(self.state.score, &mut self.store);
        log::info!(
            "Game over: score {}, best {}",
            self.state.score,
            self.high_score.best()
        );
    }

    /// React to what the last tick did
    fn process_events(&mut self) {
        for event in std::mem::take(&mut self.events) {
            match event {
                GameEvent::Ate { cell, points } => {
                    let origin = self.config.cell_center(cell);
                    self.effects
                        .burst(origin, APPLE_COLOR, self.config.apple_particles);
                    self.cues.push(AudioCue::Eat);
                    log::debug!("Ate apple (+{}), score {}", points, self.state.score);
                }
                GameEvent::PowerUpCollected { cell, kind } => {
                    let origin = self.config.cell_center(cell);
                    self.effects
                        .burst(origin, kind.color(), self.config.powerup_particles);
                    log::debug!("Collected {} power-up", kind.name());
                }
                GameEvent::Collided { .. } => self.game_over(),
                GameEvent::PowerUpSpawned { cell, kind } => {
                    log::debug!("{} power-up spawned at {:?}", kind.name(), cell);
                }
                GameEvent::PowerUpExpired { kind } | GameEvent::EffectExpired { kind } => {
                    log::debug!("{} power-up expired", kind.name());
                }
                GameEvent::ObstacleAdded { cell } => {
                    log::debug!("Obstacle added at {:?}", cell);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HIGH_SCORE_KEY, MUTED_KEY};
    use crate::persistence::MemoryStore;
    use crate::sim::{Cell, PowerUpKind};

    const KEY_RIGHT: Command = Command::Steer(Heading::Right, InputSource::Keyboard);

    fn new_game() -> Game<MemoryStore> {
        Game::new(GameConfig::default(), MemoryStore::new(), 42)
    }

    /// Start, steer right and keep the apple out of the way
    fn started_game(now: f64) -> Game<MemoryStore> {
        let mut game = new_game();
        game.handle(Command::AnyKey, now);
        game.state.apple = Cell::new(0, 0);
        game.handle(KEY_RIGHT, now);
        game
    }

    #[test]
    fn test_menu_starts_on_any_input() {
        let mut game = new_game();
        assert_eq!(game.phase(), GamePhase::Menu);
        // A direction key starts the game but is not applied
        game.handle(KEY_RIGHT, 0.0);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.state().snake.heading, Heading::Still);
        assert_eq!(
            game.drain_cues(),
            vec![AudioCue::MusicStart { rewind: false }]
        );
    }

    #[test]
    fn test_mute_does_not_start() {
        let mut game = new_game();
        game.handle(Command::ToggleMute, 0.0);
        assert_eq!(game.phase(), GamePhase::Menu);
        assert!(game.muted());
        assert_eq!(game.store().get(MUTED_KEY).as_deref(), Some("true"));
    }

    #[test]
    fn test_five_ticks_through_frames() {
        let mut game = started_game(0.0);
        for i in 1..=5 {
            game.frame(i as f64 * 150.0);
        }
        let state = game.state();
        assert_eq!(state.snake.head, Cell::new(15, 10));
        assert_eq!(state.snake.body.len(), 2);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_no_tick_before_interval() {
        let mut game = started_game(0.0);
        // 7 cells/sec -> ~142.9 ms
        game.frame(16.0);
        game.frame(100.0);
        game.frame(142.0);
        assert_eq!(game.state().snake.head, Cell::new(10, 10));
        game.frame(143.0);
        assert_eq!(game.state().snake.head, Cell::new(11, 10));
    }

    #[test]
    fn test_slow_frame_ticks_once() {
        let mut game = started_game(0.0);
        game.frame(1000.0);
        assert_eq!(game.state().snake.head, Cell::new(11, 10));
    }

    #[test]
    fn test_fixed_step_catches_up() {
        let mut game = Game::with_policy(
            GameConfig::default(),
            MemoryStore::new(),
            42,
            TickPolicy::FixedStep,
        );
        game.handle(Command::AnyKey, 0.0);
        game.state.apple = Cell::new(0, 0);
        game.handle(KEY_RIGHT, 0.0);
        game.frame(1050.0);
        // floor(1050 / (1000/7)) = 7
        assert_eq!(game.state().snake.head, Cell::new(17, 10));
    }

    #[test]
    fn test_pause_freezes_ticks_but_not_effects() {
        let mut game = started_game(0.0);
        game.frame(150.0);
        game.effects.burst(glam::Vec2::new(10.0, 10.0), 0xffffff, 4);
        game.handle(Command::TogglePause, 160.0);
        assert_eq!(game.phase(), GamePhase::Paused);

        let head = game.state().snake.head;
        let age_before = game.effects().particles[0].age;
        game.frame(400.0);
        game.frame(600.0);
        assert_eq!(game.state().snake.head, head);
        assert!(game.effects().particles.is_empty() || game.effects().particles[0].age > age_before);

        // Direction is ignored while paused
        game.handle(Command::Steer(Heading::Down, InputSource::Keyboard), 610.0);
        assert_eq!(game.state().snake.heading, Heading::Right);

        game.handle(Command::TogglePause, 1000.0);
        assert_eq!(game.phase(), GamePhase::Playing);
        // Resuming resets the tick clock
        game.frame(1100.0);
        assert_eq!(game.state().snake.head, head);
        game.frame(1143.0);
        assert_eq!(game.state().snake.head, head.step(Heading::Right));

        assert_eq!(
            game.drain_cues(),
            vec![
                AudioCue::MusicStart { rewind: false },
                AudioCue::MusicStop,
                AudioCue::MusicStart { rewind: false },
            ]
        );
    }

    #[test]
    fn test_tap_resumes_from_pause() {
        let mut game = started_game(0.0);
        game.handle(Command::TogglePause, 10.0);
        game.handle(Command::Confirm, 20.0);
        assert_eq!(game.phase(), GamePhase::Paused);
        game.handle(Command::Tap, 30.0);
        assert_eq!(game.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_reversal_rejected_through_commands() {
        let mut game = started_game(0.0);
        game.handle(Command::Steer(Heading::Left, InputSource::Keyboard), 1.0);
        assert_eq!(game.state().snake.heading, Heading::Right);
        game.handle(Command::Steer(Heading::Up, InputSource::Touch), 2.0);
        assert_eq!(game.state().snake.heading, Heading::Up);
    }

    fn run_into_right_wall(game: &mut Game<MemoryStore>) -> f64 {
        let mut now = 0.0;
        while game.phase() == GamePhase::Playing {
            now += 150.0;
            game.frame(now);
            assert!(now < 10_000.0, "never reached the wall");
        }
        now
    }

    #[test]
    fn test_game_over_records_high_score() {
        let mut game = Game::new(
            GameConfig::default(),
            MemoryStore::with_entries([(HIGH_SCORE_KEY, "not a number")]),
            42,
        );
        assert_eq!(game.high_score(), 0);
        game.handle(Command::AnyKey, 0.0);
        game.state.apple = Cell::new(11, 10);
        game.handle(KEY_RIGHT, 0.0);
        game.frame(150.0);
        assert_eq!(game.state().score, 1);
        // Make sure the relocated apple is not on the remaining path
        game.state.apple = Cell::new(0, 0);
        game.drain_cues();

        let now = run_into_right_wall(&mut game);
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.high_score(), 1);
        assert_eq!(game.store().get(HIGH_SCORE_KEY).as_deref(), Some("1"));
        assert_eq!(
            game.drain_cues(),
            vec![AudioCue::MusicStop, AudioCue::GameOver]
        );
        assert!(game.effects().shake.is_active());

        // Ticks stop; shake keeps animating
        let head = game.state().snake.head;
        game.frame(now + 100.0);
        assert_eq!(game.state().snake.head, head);
        assert_ne!(game.snapshot().shake_offset, glam::Vec2::ZERO);
    }

    #[test]
    fn test_lower_score_keeps_record() {
        let mut game = Game::new(
            GameConfig::default(),
            MemoryStore::with_entries([(HIGH_SCORE_KEY, "50")]),
            42,
        );
        game.handle(Command::AnyKey, 0.0);
        game.state.apple = Cell::new(0, 0);
        game.handle(KEY_RIGHT, 0.0);
        run_into_right_wall(&mut game);
        assert_eq!(game.high_score(), 50);
        assert_eq!(game.store().get(HIGH_SCORE_KEY).as_deref(), Some("50"));
    }

    #[test]
    fn test_restart_inputs_from_game_over() {
        let mut game = started_game(0.0);
        let now = run_into_right_wall(&mut game);
        game.drain_cues();

        // Keyboard direction and space do nothing after game over
        game.handle(KEY_RIGHT, now);
        game.handle(Command::TogglePause, now);
        game.handle(Command::AnyKey, now);
        assert_eq!(game.phase(), GamePhase::GameOver);

        game.handle(Command::Confirm, now + 10.0);
        assert_eq!(game.phase(), GamePhase::Playing);
        let state = game.state();
        assert_eq!(state.snake.head, Cell::new(10, 10));
        assert_eq!(state.snake.heading, Heading::Still);
        assert_eq!(state.score, 0);
        assert!(state.obstacles.is_empty());
        assert!(game.effects().particles.is_empty());
        assert!(!game.effects().shake.is_active());
        assert_eq!(
            game.drain_cues(),
            vec![AudioCue::MusicStart { rewind: true }]
        );
    }

    #[test]
    fn test_touch_steer_restarts() {
        let mut game = started_game(0.0);
        let now = run_into_right_wall(&mut game);
        game.handle(Command::Steer(Heading::Up, InputSource::Touch), now);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.state().snake.heading, Heading::Still);
    }

    #[test]
    fn test_eating_emits_cue_and_particles() {
        let mut game = new_game();
        game.handle(Command::AnyKey, 0.0);
        game.state.apple = Cell::new(11, 10);
        game.handle(KEY_RIGHT, 0.0);
        game.drain_cues();
        game.frame(150.0);
        assert_eq!(game.drain_cues(), vec![AudioCue::Eat]);
        assert_eq!(game.effects().particles.len(), game.config().apple_particles);
    }

    #[test]
    fn test_powerup_pickup_bursts() {
        let mut game = started_game(0.0);
        game.state.power_up = Some(crate::sim::PowerUpField {
            cell: Cell::new(11, 10),
            kind: PowerUpKind::X2,
            spawn_time: 0.0,
        });
        game.frame(150.0);
        assert!(game.state().power_up.is_none());
        assert_eq!(
            game.effects().particles.len(),
            game.config().powerup_particles
        );
        let snap = game.snapshot();
        assert_eq!(snap.active_effect.map(|e| e.kind), Some(PowerUpKind::X2));
    }

    #[test]
    fn test_persisted_values_loaded_once() {
        let store = MemoryStore::with_entries([(HIGH_SCORE_KEY, "9"), (MUTED_KEY, "true")]);
        let game = Game::new(GameConfig::default(), store, 1);
        assert_eq!(game.high_score(), 9);
        assert!(game.muted());
        let snap = game.snapshot();
        assert_eq!(snap.high_score, 9);
        assert!(snap.muted);
    }
}
