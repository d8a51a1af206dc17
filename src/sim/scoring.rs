//! Hit scoring
//!
//! Smaller ducks are worth more: a hit scores `floor(numerator / height)`.

use super::duck::DuckId;
use super::effects::DialogKind;
use super::state::{GameEvent, GameState};

/// Points for hitting a duck `height` pixels tall
pub fn score_for_height(numerator: f32, height: f32) -> u32 {
    debug_assert!(height > 0.0, "duck height must be positive, got {height}");
    if height <= 0.0 || !height.is_finite() {
        return 0;
    }
    (numerator as f64 / height as f64).floor().max(0.0) as u32
}

/// Score one hit on a duck and pop its dialog. Counts toward `hits`.
pub fn award(state: &mut GameState, id: DuckId, kind: DialogKind) -> Option<u32> {
    let now = state.time_ms;
    let duck = state.duck(id)?;
    let points = score_for_height(state.tuning.score_numerator, duck.size.y);
    let origin = duck.position(now);
    let width = duck.size.x;

    state.score += points as u64;
    state.hits += 1;
    state
        .effects
        .dialog(kind, points.to_string(), origin, width, now);
    state.events.push(GameEvent::Hit {
        duck: id,
        points,
        bonus: kind == DialogKind::Bonus,
    });
    log::debug!("Duck {} hit for {} ({:?})", id.0, points, kind);
    Some(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SCORE_NUMERATOR;

    #[test]
    fn test_score_for_height() {
        assert_eq!(score_for_height(SCORE_NUMERATOR, 104.0), 125);
        assert_eq!(score_for_height(SCORE_NUMERATOR, 208.0), 62);
        assert_eq!(score_for_height(SCORE_NUMERATOR, 150.0), 86);
        assert_eq!(score_for_height(SCORE_NUMERATOR, 13000.0), 1);
        assert_eq!(score_for_height(SCORE_NUMERATOR, 20000.0), 0);
    }

    #[test]
    fn test_smaller_ducks_score_more() {
        assert!(score_for_height(SCORE_NUMERATOR, 110.0) > score_for_height(SCORE_NUMERATOR, 200.0));
    }
}
