//! Level progression and game over

use rand::Rng;

use super::duck::spawn_duck;
use super::state::{GameEvent, GamePhase, GameState};

/// Clear the screen and start the next level with `level` ducks
pub fn start_level(state: &mut GameState) {
    if state.is_over() {
        log::warn!("start_level called after game over");
        return;
    }

    clear_ducks(state);
    state.effects.clear();

    state.level += 1;
    state.phase = GamePhase::Playing;
    let level = state.level;
    let now = state.time_ms;
    state.effects.banner(format!("Level {}", level), now);
    state.events.push(GameEvent::LevelStarted(level));
    log::info!("Level {} ({} ducks)", level, level);

    let (lo, hi) = state.tuning.escape_range(level);
    for _ in 0..level {
        let escape_ms = if hi > lo {
            state.rng.random_range(lo..=hi)
        } else {
            lo
        };
        spawn_duck(state, escape_ms.round() as u64);
    }
}

/// Remove every duck along with its pending timers
pub fn clear_ducks(state: &mut GameState) {
    let now = state.time_ms;
    for mut duck in state.ducks.drain(..) {
        duck.cancel_all(&mut state.scheduler, now);
    }
}

/// Start the next level if no duck is alive or flying away.
/// Returns true if a level was started.
pub fn advance_if_cleared(state: &mut GameState) -> bool {
    if state.is_over() || state.life == 0 || state.active_ducks() > 0 {
        return false;
    }
    start_level(state);
    true
}

/// A duck escaped: lose a life, then end the game or maybe advance
pub fn lose_life(state: &mut GameState) {
    if state.is_over() {
        log::warn!("Life loss after game over ignored");
        return;
    }
    if state.life == 0 {
        debug_assert!(false, "life already 0 while still playing");
        game_over(state);
        return;
    }

    state.life -= 1;
    state.events.push(GameEvent::LifeLost {
        remaining: state.life,
    });
    log::debug!("Life lost, {} left", state.life);

    if state.life == 0 {
        game_over(state);
    } else {
        advance_if_cleared(state);
    }
}

/// Freeze every duck and stop accepting input (terminal)
pub fn game_over(state: &mut GameState) {
    if state.is_over() {
        return;
    }
    state.phase = GamePhase::GameOver;

    let now = state.time_ms;
    for duck in state.ducks.iter_mut() {
        duck.cancel_all(&mut state.scheduler, now);
    }

    state.effects.banner("GAME OVER !", now);
    state.events.push(GameEvent::GameOver {
        score: state.score,
        level: state.level,
    });
    log::info!(
        "Game over at level {} with {} points ({} hits / {} shots)",
        state.level,
        state.score,
        state.hits,
        state.shots
    );
}
