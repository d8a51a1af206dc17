//! Frame step
//!
//! Input is applied at the current virtual time, then the clock advances
//! and every timer that came due is dispatched in order.

use glam::Vec2;

use super::duck::{self, DuckId, DuckState};
use super::state::{Bounds, GameEvent, GameState};
use super::timer::TimerEvent;

/// Input collected during one frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer-down positions in playfield coordinates
    pub clicks: Vec<Vec2>,
    /// Debug: kill every duck that isn't dead yet
    pub kill_all: bool,
    /// New playfield size after a window resize
    pub resize: Option<Bounds>,
}

/// Advance the game state by `dt_ms` of virtual time
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: u64) {
    if let Some(bounds) = input.resize {
        state.bounds = bounds;
    }

    // Input handlers are detached once the game is over
    if !state.is_over() {
        for &point in &input.clicks {
            shoot(state, point);
        }
        if input.kill_all && state.tuning.debug_kill_all {
            kill_all(state);
        }
    }

    let target = state.time_ms + dt_ms;
    while let Some((due, event)) = state.scheduler.pop_due(target) {
        state.time_ms = due.max(state.time_ms);
        dispatch(state, event);
    }
    state.time_ms = target;
    state.effects.expire(target);
}

/// Fire one timer
pub fn dispatch(state: &mut GameState, event: TimerEvent) {
    match event {
        TimerEvent::Escape(id) => duck::on_escape_timer(state, id),
        TimerEvent::MotionDone(id, motion) => duck::on_motion_done(state, id, motion),
    }
}

/// Topmost duck under `point`
pub fn hit_test(state: &GameState, point: Vec2) -> Option<DuckId> {
    let now = state.time_ms;
    state
        .ducks
        .iter()
        .rev()
        .find(|d| d.contains(point, now))
        .map(|d| d.id)
}

/// One playfield click: always a shot, a hit if it lands on a duck
pub fn shoot(state: &mut GameState, point: Vec2) {
    if state.is_over() {
        return;
    }
    state.shots += 1;
    state.events.push(GameEvent::Shot);

    if let Some(id) = hit_test(state, point) {
        duck::shoot_duck(state, id);
    }
}

/// Debug action: every duck not already dead starts falling
pub fn kill_all(state: &mut GameState) {
    let ids: Vec<DuckId> = state
        .ducks
        .iter()
        .filter(|d| d.state != DuckState::Dead)
        .map(|d| d.id)
        .collect();
    log::info!("Debug: killing {} ducks", ids.len());
    for id in ids {
        duck::kill_duck(state, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::start_level;
    use crate::sim::state::GamePhase;
    use crate::tuning::Tuning;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default(), Bounds::new(1280.0, 720.0));
        start_level(&mut state);
        state
    }

    fn click(point: Vec2) -> TickInput {
        TickInput {
            clicks: vec![point],
            ..Default::default()
        }
    }

    #[test]
    fn test_miss_counts_shot_only() {
        let mut state = playing(1);
        tick(&mut state, &click(Vec2::new(-5_000.0, -5_000.0)), 0);
        assert_eq!(state.shots, 1);
        assert_eq!(state.hits, 0);
        assert_eq!(state.score, 0);
        assert_eq!(state.drain_events(), vec![GameEvent::LevelStarted(1), GameEvent::Shot]);
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut state = playing(2);
        state.level = 1;
        start_level(&mut state);
        let now = state.time_ms;
        let (a, b) = (state.ducks[0].id, state.ducks[1].id);
        // Stack both ducks on the same spot
        for duck in state.ducks.iter_mut() {
            duck.animation = None;
            duck.pos = Vec2::new(100.0, 100.0);
        }
        assert_eq!(hit_test(&state, Vec2::new(150.0, 150.0)), Some(b));
        state.ducks.retain(|d| d.id != b);
        assert_eq!(hit_test(&state, Vec2::new(150.0, 150.0)), Some(a));
        assert_eq!(hit_test(&state, Vec2::new(10.0, 10.0)), None);
        assert_eq!(state.time_ms, now);
    }

    #[test]
    fn test_click_cancels_escape_in_same_tick() {
        let mut state = playing(3);
        let id = state.ducks[0].id;
        let escape_at = state.ducks[0].escape_timer.unwrap().due_ms();

        // Land just before the escape fires
        tick(&mut state, &TickInput::default(), escape_at - 1);
        let target = state.ducks[0].center(state.time_ms);
        tick(&mut state, &click(target), 1);

        let duck = state.duck(id).unwrap();
        assert_eq!(duck.state, DuckState::Dead);
        assert_eq!(state.hits, 1);
        assert!(
            !state.drain_events().contains(&GameEvent::FlyAway),
            "escape fired after the duck was shot"
        );
    }

    #[test]
    fn test_resize_updates_bounds() {
        let mut state = playing(4);
        let input = TickInput {
            resize: Some(Bounds::new(640.0, 480.0)),
            ..Default::default()
        };
        tick(&mut state, &input, 16);
        assert_eq!(state.bounds, Bounds::new(640.0, 480.0));
        assert_eq!(state.time_ms, 16);
    }

    #[test]
    fn test_kill_all_then_next_level() {
        let mut state = playing(5);
        state.level = 2;
        start_level(&mut state);
        let input = TickInput {
            kill_all: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0);
        assert!(state.ducks.iter().all(|d| d.state == DuckState::Dead));
        assert_eq!(state.score, 0);

        let fall_ms = state.tuning.fall_ms;
        tick(&mut state, &TickInput::default(), fall_ms);
        assert_eq!(state.level, 4);
        assert_eq!(state.ducks.len(), 4);
    }

    #[test]
    fn test_kill_all_disabled_by_tuning() {
        let mut state = GameState::new(
            6,
            Tuning {
                debug_kill_all: false,
                ..Tuning::default()
            },
            Bounds::new(800.0, 600.0),
        );
        start_level(&mut state);
        let input = TickInput {
            kill_all: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0);
        assert_eq!(state.ducks[0].state, DuckState::Alive);
    }

    #[test]
    fn test_input_ignored_after_game_over() {
        let mut state = playing(7);
        crate::sim::level::game_over(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);
        state.drain_events();

        let target = state.ducks[0].center(state.time_ms);
        let input = TickInput {
            clicks: vec![target],
            kill_all: true,
            ..Default::default()
        };
        tick(&mut state, &input, 100_000);
        assert_eq!(state.shots, 0);
        assert_eq!(state.ducks[0].state, DuckState::Alive);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_effects_expire_with_time() {
        let mut state = playing(8);
        assert_eq!(state.effects.banners.len(), 1);
        tick(&mut state, &TickInput::default(), 600);
        assert!(state.effects.banners.is_empty());
    }
}
