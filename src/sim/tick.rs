//! Discrete simulation tick
//!
//! Advances the world by exactly one grid step. The caller supplies the
//! simulation clock so ticks are replayable with injected time.

use super::collision::detect_collision;
use super::powerup;
use super::progression::{base_speed, obstacle_target};
use super::state::{GameEvent, GamePhase, GameState};
use crate::config::GameConfig;

/// Advance the game state by one grid step.
///
/// No-op unless playing with a non-zero heading. Order matters: trail is
/// recorded before the head moves, and collisions are tested against the
/// post-move head before any apple-driven growth.
pub fn tick(state: &mut GameState, config: &GameConfig, now: f64, events: &mut Vec<GameEvent>) {
    if state.phase != GamePhase::Playing || !state.snake.heading.is_moving() {
        return;
    }

    state.time_ticks += 1;

    state.snake.record_trail();
    state.snake.advance();

    if let Some(collision) = detect_collision(config, &state.snake, &state.obstacles) {
        log::info!(
            "Collision ({:?}) at {:?}, final score {}",
            collision,
            state.snake.head,
            state.score
        );
        state.phase = GamePhase::GameOver;
        events.push(GameEvent::Collided {
            collision,
            cell: state.snake.head,
        });
        return;
    }

    if state.snake.head == state.apple {
        eat_apple(state, config, now, events);
    }

    powerup::collect_field(state, config, now, events);
    powerup::expire(state, config, now, events);
    update_speed(state, config);
}

/// Score, grow, relocate the apple and let difficulty catch up
fn eat_apple(state: &mut GameState, config: &GameConfig, now: f64, events: &mut Vec<GameEvent>) {
    let cell = state.apple;
    let points = state.points_per_apple();

    state.snake.grow();
    state.score += points;
    events.push(GameEvent::Ate { cell, points });

    match state.random_free_cell(config) {
        Some(next) => state.apple = next,
        None => log::debug!("No room to relocate apple, leaving it at {:?}", cell),
    }

    spawn_obstacles(state, config, events);
    powerup::try_spawn_field(state, config, now, events);
}

/// Add obstacles until the score's target is met.
///
/// Never removes any. Stops early if the board has no room.
pub fn spawn_obstacles(state: &mut GameState, config: &GameConfig, events: &mut Vec<GameEvent>) {
    let target = obstacle_target(config, state.score);
    while state.obstacles.len() < target {
        let Some(cell) = state.random_free_cell(config) else {
            log::debug!(
                "Obstacle spawn skipped: {} of {} placed",
                state.obstacles.len(),
                target
            );
            break;
        };
        state.obstacles.push(cell);
        events.push(GameEvent::ObstacleAdded { cell });
    }
}

/// Recompute base speed from score; slow keeps its own speed until expiry
pub fn update_speed(state: &mut GameState, config: &GameConfig) {
    state.base_speed = base_speed(config, state.score);
    if !state.slow_active() {
        state.speed = state.base_speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Collision;
    use crate::sim::grid::{Cell, Heading};
    use crate::sim::state::{PowerUpField, PowerUpKind};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn playing(config: &GameConfig, seed: u64) -> GameState {
        let mut state = GameState::new(config, seed);
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_still_heading_is_noop() {
        let config = GameConfig::default();
        let mut state = playing(&config, 1);
        let before = state.clone();
        let mut events = Vec::new();
        for t in 0..10 {
            tick(&mut state, &config, t as f64 * 100.0, &mut events);
        }
        assert_eq!(state.snake, before.snake);
        assert_eq!(state.score, 0);
        assert_eq!(state.time_ticks, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_not_playing_is_noop() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 1);
        state.snake.steer(Heading::Right);
        let mut events = Vec::new();
        for phase in [GamePhase::Menu, GamePhase::Paused, GamePhase::GameOver] {
            state.phase = phase;
            tick(&mut state, &config, 0.0, &mut events);
            assert_eq!(state.snake.head, Cell::new(10, 10));
        }
    }

    #[test]
    fn test_five_ticks_right() {
        let config = GameConfig::default();
        let mut state = playing(&config, 1);
        state.snake.steer(Heading::Right);
        let mut events = Vec::new();
        for t in 0..5 {
            tick(&mut state, &config, t as f64 * 150.0, &mut events);
        }
        assert_eq!(state.snake.head, Cell::new(15, 10));
        assert_eq!(state.snake.body.len(), 2);
        assert_eq!(
            state.snake.body.iter().copied().collect::<Vec<_>>(),
            vec![Cell::new(13, 10), Cell::new(14, 10)]
        );
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_eating_apple() {
        let config = GameConfig::default();
        let mut state = playing(&config, 9);
        state.apple = Cell::new(11, 10);
        state.snake.steer(Heading::Right);
        let mut events = Vec::new();
        tick(&mut state, &config, 0.0, &mut events);

        assert_eq!(state.score, 1);
        assert_eq!(state.snake.tail_length, 3);
        assert_ne!(state.apple, Cell::new(11, 10));
        assert!(config.in_bounds(state.apple));
        assert!(!state.snake.occupies(state.apple));
        assert!(!state.obstacles.contains(&state.apple));
        assert_eq!(
            events[0],
            GameEvent::Ate {
                cell: Cell::new(11, 10),
                points: 1
            }
        );
    }

    #[test]
    fn test_eating_under_x2() {
        let config = GameConfig::default();
        let mut state = playing(&config, 9);
        powerup::apply(&mut state, &config, PowerUpKind::X2, 0.0);
        state.apple = Cell::new(11, 10);
        state.snake.steer(Heading::Right);
        let mut events = Vec::new();
        tick(&mut state, &config, 10.0, &mut events);
        assert_eq!(state.score, 2);
        assert_eq!(state.snake.tail_length, 3);
    }

    #[test]
    fn test_game_over_exactly_on_leaving_grid() {
        let config = GameConfig::default();
        let mut state = playing(&config, 1);
        state.apple = Cell::new(0, 0);
        state.snake.steer(Heading::Right);
        let mut events = Vec::new();
        // 10 -> 19 is nine steps, all legal
        for t in 0..9 {
            tick(&mut state, &config, t as f64, &mut events);
            assert_eq!(state.phase, GamePhase::Playing);
        }
        assert_eq!(state.snake.head, Cell::new(19, 10));

        tick(&mut state, &config, 9.0, &mut events);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(
            events.last(),
            Some(&GameEvent::Collided {
                collision: Collision::Wall,
                cell: Cell::new(20, 10)
            })
        );

        // Further ticks do nothing
        let head = state.snake.head;
        tick(&mut state, &config, 10.0, &mut events);
        assert_eq!(state.snake.head, head);
    }

    #[test]
    fn test_self_collision() {
        let config = GameConfig::default();
        let mut state = playing(&config, 1);
        state.apple = Cell::new(0, 0);
        state.snake.tail_length = 5;
        let mut events = Vec::new();
        let mut now = 0.0;
        for heading in [
            Heading::Right,
            Heading::Right,
            Heading::Down,
            Heading::Left,
            Heading::Up,
        ] {
            state.snake.steer(heading);
            tick(&mut state, &config, now, &mut events);
            now += 100.0;
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(matches!(
            events.last(),
            Some(GameEvent::Collided {
                collision: Collision::SelfBody,
                ..
            })
        ));
    }

    #[test]
    fn test_obstacle_blocks_apple_in_same_cell() {
        let config = GameConfig::default();
        let mut state = playing(&config, 1);
        // An obstacle stacked on the apple still kills before the apple counts
        state.apple = Cell::new(11, 10);
        state.obstacles.push(Cell::new(11, 10));
        state.snake.steer(Heading::Right);
        let mut events = Vec::new();
        tick(&mut state, &config, 0.0, &mut events);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score, 0);
        assert_eq!(state.snake.tail_length, 2);
    }

    #[test]
    fn test_obstacles_follow_score() {
        let config = GameConfig::default();
        let mut state = playing(&config, 4);
        let mut events = Vec::new();

        state.score = 4;
        spawn_obstacles(&mut state, &config, &mut events);
        assert_eq!(state.obstacles.len(), 0);

        state.score = 5;
        spawn_obstacles(&mut state, &config, &mut events);
        assert_eq!(state.obstacles.len(), 1);

        state.score = 12;
        spawn_obstacles(&mut state, &config, &mut events);
        assert_eq!(state.obstacles.len(), 2);

        state.score = 20;
        spawn_obstacles(&mut state, &config, &mut events);
        assert_eq!(state.obstacles.len(), 3);

        let unique: HashSet<_> = state.obstacles.iter().collect();
        assert_eq!(unique.len(), 3);
        for obstacle in &state.obstacles {
            assert!(!state.snake.occupies(*obstacle));
            assert_ne!(*obstacle, state.apple);
        }
    }

    #[test]
    fn test_full_board_skips_every_spawn() {
        // 2x2 board: after this move the snake covers all four cells
        let config = GameConfig::with_grid(40.0, 2).with_powerups(1.0, 0);
        let mut state = playing(&config, 11);
        state.score = 4;
        state.apple = Cell::new(0, 0);
        state.snake.head = Cell::new(0, 1);
        state.snake.tail_length = 3;
        state.snake.body.clear();
        state.snake.body.extend([Cell::new(1, 0), Cell::new(1, 1)]);
        state.snake.heading = Heading::Up;

        let mut events = Vec::new();
        tick(&mut state, &config, 0.0, &mut events);

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 5);
        assert_eq!(state.snake.tail_length, 4);
        // Apple stays put, no obstacle fits, the power-up roll finds no room
        assert_eq!(state.apple, Cell::new(0, 0));
        assert!(state.obstacles.is_empty());
        assert!(state.power_up.is_none());
        assert_eq!(
            events,
            vec![GameEvent::Ate {
                cell: Cell::new(0, 0),
                points: 1
            }]
        );
    }

    #[test]
    fn test_new_apple_avoids_live_field() {
        let config = GameConfig::default();
        for seed in 0..50 {
            let mut state = playing(&config, seed);
            let field = PowerUpField {
                cell: Cell::new(3, 3),
                kind: PowerUpKind::X2,
                spawn_time: 0.0,
            };
            state.power_up = Some(field);
            state.apple = Cell::new(11, 10);
            state.snake.steer(Heading::Right);

            let mut events = Vec::new();
            tick(&mut state, &config, 0.0, &mut events);

            assert_eq!(state.score, 1);
            assert_eq!(state.power_up, Some(field));
            assert_ne!(state.apple, field.cell, "seed {}", seed);
            assert!(!state.snake.occupies(state.apple));
        }
    }

    #[test]
    fn test_obstacles_never_removed() {
        let config = GameConfig::default();
        let mut state = playing(&config, 4);
        let mut events = Vec::new();
        state.score = 20;
        spawn_obstacles(&mut state, &config, &mut events);
        state.score = 0;
        spawn_obstacles(&mut state, &config, &mut events);
        assert_eq!(state.obstacles.len(), 3);
    }

    #[test]
    fn test_speed_tracks_score_unless_slowed() {
        let config = GameConfig::default();
        let mut state = playing(&config, 4);
        state.score = 6;
        update_speed(&mut state, &config);
        assert_eq!(state.speed, 15);

        powerup::apply(&mut state, &config, PowerUpKind::Slow, 0.0);
        assert_eq!(state.speed, 7);
        state.score = 10;
        update_speed(&mut state, &config);
        assert_eq!(state.base_speed, 20);
        assert_eq!(state.speed, 7);
    }

    #[test]
    fn test_pickup_and_expiry_through_tick() {
        let config = GameConfig::default();
        let mut state = playing(&config, 4);
        state.apple = Cell::new(0, 0);
        state.power_up = Some(PowerUpField {
            cell: Cell::new(11, 10),
            kind: PowerUpKind::Slow,
            spawn_time: 0.0,
        });
        state.snake.steer(Heading::Right);
        let mut events = Vec::new();
        tick(&mut state, &config, 1000.0, &mut events);
        assert!(state.power_up.is_none());
        assert_eq!(state.speed, 4);

        // Effect lasts until strictly after 6000 ms
        tick(&mut state, &config, 6000.0, &mut events);
        assert_eq!(state.speed, 4);
        tick(&mut state, &config, 6001.0, &mut events);
        assert_eq!(state.speed, 7);
        assert!(state.active_effect.is_none());
    }

    #[test]
    fn test_determinism() {
        let config = GameConfig::default().with_powerups(1.0, 0);
        let run = || {
            let mut state = playing(&config, 99999);
            let mut events = Vec::new();
            let mut now = 0.0;
            for i in 0..60u32 {
                // Chase the apple greedily
                let h = if state.apple.x > state.snake.head.x {
                    Heading::Right
                } else if state.apple.x < state.snake.head.x {
                    Heading::Left
                } else if state.apple.y > state.snake.head.y {
                    Heading::Down
                } else {
                    Heading::Up
                };
                if !state.snake.steer(h) {
                    state.snake.steer(if i % 2 == 0 { Heading::Up } else { Heading::Down });
                }
                tick(&mut state, &config, now, &mut events);
                now += 100.0;
            }
            (state, events)
        };
        let (a, ea) = run();
        let (b, eb) = run();
        assert_eq!(a.snake, b.snake);
        assert_eq!(a.apple, b.apple);
        assert_eq!(a.obstacles, b.obstacles);
        assert_eq!(a.score, b.score);
        assert_eq!(ea, eb);
    }

    fn heading_strategy() -> impl Strategy<Value = Heading> {
        prop_oneof![
            Just(Heading::Still),
            Just(Heading::Up),
            Just(Heading::Down),
            Just(Heading::Left),
            Just(Heading::Right),
        ]
    }

    proptest! {
        #[test]
        fn tick_keeps_snake_consistent(
            seed in any::<u64>(),
            inputs in proptest::collection::vec(heading_strategy(), 1..120),
        ) {
            let config = GameConfig::default();
            let mut state = playing(&config, seed);
            let mut now = 0.0;

            for heading in inputs {
                let before = state.snake.clone();
                let steered = state.snake.steer(heading);
                if before.heading.is_reverse_of(heading) {
                    prop_assert!(!steered);
                    prop_assert_eq!(state.snake.heading, before.heading);
                }

                let mut events = Vec::new();
                tick(&mut state, &config, now, &mut events);
                now += 100.0;

                if state.phase == GamePhase::GameOver {
                    break;
                }
                if !state.snake.heading.is_moving() {
                    prop_assert_eq!(&state.snake, &before);
                    continue;
                }

                let reshaped = events.iter().any(|e| matches!(
                    e,
                    GameEvent::PowerUpCollected { kind: PowerUpKind::Shrink, .. }
                ));
                if !reshaped {
                    prop_assert_eq!(
                        state.snake.body.len(),
                        before.tail_length.min(before.body.len() + 1)
                    );
                }
                prop_assert!(state.snake.body.len() <= state.snake.tail_length);
                prop_assert!(state.snake.tail_length >= config.min_tail_length);

                let mut cells: HashSet<Cell> = state.snake.body.iter().copied().collect();
                prop_assert_eq!(cells.len(), state.snake.body.len());
                prop_assert!(cells.insert(state.snake.head));
                prop_assert!(config.in_bounds(state.snake.head));
                prop_assert!(state.power_up.iter().count() <= 1);
            }
        }
    }
}
