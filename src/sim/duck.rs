//! Duck entities and their lifecycle
//!
//! ```text
//! Alive --escape timer--> FlyingAway --arrives off screen--> removed (life lost)
//!   |                         |
//!   +--------shot-------------+--> Dead --fall done--> removed
//! ```
//!
//! Every transition that waits on time goes through the scheduler, so a duck
//! never owns more than one escape timer and one animation timer.

use glam::Vec2;
use rand::Rng;

use super::effects::{DialogKind, random_taunt};
use super::level;
use super::scoring;
use super::state::{Bounds, GameEvent, GameState};
use super::timer::{Scheduler, TimerEvent, TimerHandle};
use super::tween::{Easing, Tween};
use crate::rand_int;

/// Unique duck identifier (never reused within a run)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DuckId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuckState {
    Alive,
    FlyingAway,
    Dead,
}

/// Sprite direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

/// Kind of movement an animation performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Random leg inside the screen
    Wander,
    /// Leaving the screen after the escape timer fired
    FlyAway,
    /// Dropping off the bottom after being shot
    Fall,
}

/// In-flight animation and the timer that completes it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub motion: Motion,
    pub tween: Tween,
    pub done: TimerHandle,
}

#[derive(Debug, Clone)]
pub struct Duck {
    pub id: DuckId,
    /// Top-left corner while no animation runs
    pub pos: Vec2,
    /// Random size multiplier
    pub scale: f32,
    /// Sprite size in pixels
    pub size: Vec2,
    pub state: DuckState,
    pub facing: Facing,
    pub escape_timer: Option<TimerHandle>,
    pub animation: Option<Animation>,
}

impl Duck {
    pub fn new(id: DuckId, pos: Vec2, scale: f32, size: Vec2) -> Self {
        Self {
            id,
            pos,
            scale,
            size,
            state: DuckState::Alive,
            facing: Facing::Right,
            escape_timer: None,
            animation: None,
        }
    }

    /// Top-left corner at `now_ms`
    pub fn position(&self, now_ms: u64) -> Vec2 {
        match &self.animation {
            Some(anim) => anim.tween.sample(now_ms),
            None => self.pos,
        }
    }

    pub fn center(&self, now_ms: u64) -> Vec2 {
        self.position(now_ms) + self.size / 2.0
    }

    /// Whether `point` lies on the sprite at `now_ms`
    pub fn contains(&self, point: Vec2, now_ms: u64) -> bool {
        let min = self.position(now_ms);
        let max = min + self.size;
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// Alive or flying away (keeps the level running)
    pub fn is_active(&self) -> bool {
        matches!(self.state, DuckState::Alive | DuckState::FlyingAway)
    }

    pub fn sprite(&self) -> &'static str {
        match (self.state, self.facing) {
            (DuckState::Dead, _) => "img/duck-dead.gif",
            (_, Facing::Right) => "img/duck-right.gif",
            (_, Facing::Left) => "img/duck-left.gif",
        }
    }

    /// Freeze the duck where it is, dropping any queued completion
    pub fn stop(&mut self, scheduler: &mut Scheduler, now_ms: u64) {
        if let Some(anim) = self.animation.take() {
            self.pos = anim.tween.sample(now_ms);
            scheduler.cancel(anim.done);
        }
    }

    /// Disarm the escape timer. Returns true if it was still pending.
    pub fn cancel_escape(&mut self, scheduler: &mut Scheduler) -> bool {
        self.escape_timer
            .take()
            .map(|handle| scheduler.cancel(handle))
            .unwrap_or(false)
    }

    /// Drop every pending timer this duck owns
    pub fn cancel_all(&mut self, scheduler: &mut Scheduler, now_ms: u64) {
        self.cancel_escape(scheduler);
        self.stop(scheduler, now_ms);
    }

    fn face_toward(&mut self, x: f32) {
        self.facing = if x > self.pos.x {
            Facing::Right
        } else {
            Facing::Left
        };
    }

    /// Replace the current animation with a move to `to`
    fn animate(
        &mut self,
        scheduler: &mut Scheduler,
        now_ms: u64,
        motion: Motion,
        to: Vec2,
        duration_ms: u64,
    ) {
        self.stop(scheduler, now_ms);
        if motion != Motion::Fall {
            self.face_toward(to.x);
        }
        let tween = Tween::new(self.pos, to, now_ms, duration_ms, Easing::Swing);
        let done = scheduler.schedule(tween.end_ms(), TimerEvent::MotionDone(self.id, motion));
        self.animation = Some(Animation {
            motion,
            tween,
            done,
        });
    }

    /// Settle at the end of the current animation
    fn finish_animation(&mut self) {
        if let Some(anim) = self.animation.take() {
            self.pos = anim.tween.to;
        }
    }
}

/// Random x just past the left or right edge
pub fn edge_x<R: Rng + ?Sized>(rng: &mut R, bounds: Bounds, width: f32) -> f32 {
    if rng.random_bool(0.5) {
        bounds.width + width
    } else {
        -width
    }
}

/// Spawn a duck at a screen edge and arm its escape timer
pub fn spawn_duck(state: &mut GameState, escape_after_ms: u64) -> DuckId {
    let id = state.next_duck_id();
    let now = state.time_ms;
    let bounds = state.bounds;
    let tuning = &state.tuning;
    let base = Vec2::new(tuning.duck_width, tuning.duck_height);
    let (scale_min, scale_max) = (tuning.scale_min, tuning.scale_max);

    let scale = if scale_max > scale_min {
        state.rng.random_range(scale_min..scale_max)
    } else {
        scale_min
    };
    let size = base * scale;
    let x = edge_x(&mut state.rng, bounds, size.x);
    let y = rand_int(&mut state.rng, 0, bounds.height as i64) as f32;

    let mut duck = Duck::new(id, Vec2::new(x, y), scale, size);
    duck.escape_timer = Some(
        state
            .scheduler
            .schedule(now + escape_after_ms, TimerEvent::Escape(id)),
    );
    state.ducks.push(duck);
    log::debug!(
        "Duck {} spawned at ({}, {}) scale {:.2}, escapes in {} ms",
        id.0,
        x,
        y,
        scale,
        escape_after_ms
    );

    wander(state, id);
    id
}

/// Start a random leg inside the screen (alive ducks only)
pub fn wander(state: &mut GameState, id: DuckId) {
    let now = state.time_ms;
    let bounds = state.bounds;
    let range = state.tuning.wander_ms;
    let GameState {
        ducks,
        rng,
        scheduler,
        ..
    } = state;

    let Some(duck) = ducks.iter_mut().find(|d| d.id == id) else {
        log::warn!("wander: duck {} not found", id.0);
        return;
    };
    if duck.state != DuckState::Alive {
        return;
    }

    let x = rand_int(rng, 0, (bounds.width - duck.size.x) as i64) as f32;
    let y = rand_int(rng, 0, (bounds.height - duck.size.y) as i64) as f32;
    let duration = rand_int(rng, range.min as i64, range.max as i64) as u64;
    duck.animate(scheduler, now, Motion::Wander, Vec2::new(x, y), duration);
}

/// Escape timer fired: leave the screen if still alive
pub fn fly_away(state: &mut GameState, id: DuckId) -> bool {
    let now = state.time_ms;
    let bounds = state.bounds;
    let range = state.tuning.fly_away_ms;
    let GameState {
        ducks,
        rng,
        scheduler,
        ..
    } = state;

    let Some(duck) = ducks.iter_mut().find(|d| d.id == id) else {
        log::warn!("fly_away: duck {} not found", id.0);
        return false;
    };
    if duck.state != DuckState::Alive {
        return false;
    }

    duck.cancel_escape(scheduler);
    duck.state = DuckState::FlyingAway;
    let x = edge_x(rng, bounds, duck.size.x);
    let y = rand_int(rng, 0, bounds.height as i64) as f32;
    let duration = rand_int(rng, range.min as i64, range.max as i64) as u64;
    duck.animate(scheduler, now, Motion::FlyAway, Vec2::new(x, y), duration);

    // Taunt appears where the duck was when it turned to leave
    let origin = duck.pos;
    let width = duck.size.x;
    let taunt = random_taunt(rng);
    state
        .effects
        .dialog(DialogKind::Bubble, taunt, origin, width, now);
    state.events.push(GameEvent::FlyAway);
    log::debug!("Duck {} flying away", id.0);
    true
}

/// Shoot a duck down. Returns false if it was already dead.
pub fn kill_duck(state: &mut GameState, id: DuckId) -> bool {
    let now = state.time_ms;
    let floor = state.bounds.height;
    let fall_ms = state.tuning.fall_ms;
    let GameState {
        ducks, scheduler, ..
    } = state;

    let Some(duck) = ducks.iter_mut().find(|d| d.id == id) else {
        log::warn!("kill_duck: duck {} not found", id.0);
        return false;
    };
    if duck.state == DuckState::Dead {
        return false;
    }

    duck.cancel_all(scheduler, now);
    duck.state = DuckState::Dead;
    let to = Vec2::new(duck.pos.x, floor + duck.size.y);
    duck.animate(scheduler, now, Motion::Fall, to, fall_ms);
    true
}

/// Take a duck off the screen. Safe to call twice.
pub fn remove_duck(state: &mut GameState, id: DuckId) -> Option<Duck> {
    let idx = state.ducks.iter().position(|d| d.id == id)?;
    let mut duck = state.ducks.remove(idx);
    duck.cancel_all(&mut state.scheduler, state.time_ms);
    Some(duck)
}

/// Player clicked on this duck
pub fn shoot_duck(state: &mut GameState, id: DuckId) {
    let now = state.time_ms;
    let Some(duck) = state.ducks.iter_mut().find(|d| d.id == id) else {
        log::warn!("shoot_duck: duck {} not found", id.0);
        return;
    };
    duck.cancel_escape(&mut state.scheduler);
    let duck_state = duck.state;
    let center = duck.center(now);

    let size = rand_int(&mut state.rng, 50, 150) as f32;
    state.effects.splatter(center, size, now);

    match duck_state {
        DuckState::Alive => {
            scoring::award(state, id, DialogKind::Score);
            kill_duck(state, id);
        }
        DuckState::FlyingAway => {
            scoring::award(state, id, DialogKind::Score);
            scoring::award(state, id, DialogKind::Bonus);
            if state.tuning.bonus_hit_kills {
                kill_duck(state, id);
            }
        }
        DuckState::Dead => {
            let (origin, width) = state
                .duck(id)
                .map(|d| (d.position(now), d.size.x))
                .unwrap_or((center, 0.0));
            state
                .effects
                .dialog(DialogKind::Combo, "COMBO HIT !", origin, width, now);
            state.events.push(GameEvent::ComboHit);
        }
    }
}

/// Escape timer callback
pub fn on_escape_timer(state: &mut GameState, id: DuckId) {
    if state.is_over() {
        log::warn!("Escape timer for duck {} fired after game over", id.0);
        return;
    }
    if let Some(duck) = state.duck_mut(id) {
        // The handle just fired; forget it so nothing cancels a stale entry
        duck.escape_timer = None;
    }
    fly_away(state, id);
}

/// Animation completion callback
pub fn on_motion_done(state: &mut GameState, id: DuckId, motion: Motion) {
    let Some(duck) = state.duck_mut(id) else {
        log::warn!("Motion {:?} finished for missing duck {}", motion, id.0);
        return;
    };
    if duck.animation.map(|a| a.motion) != Some(motion) {
        log::warn!("Stale {:?} completion for duck {}", motion, id.0);
        return;
    }
    duck.finish_animation();

    match motion {
        Motion::Wander => wander(state, id),
        Motion::FlyAway => {
            remove_duck(state, id);
            log::debug!("Duck {} escaped", id.0);
            level::lose_life(state);
        }
        Motion::Fall => {
            remove_duck(state, id);
            level::advance_if_cleared(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GamePhase;
    use crate::tuning::Tuning;

    fn state() -> GameState {
        let mut state = GameState::new(1234, Tuning::default(), Bounds::new(800.0, 600.0));
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_spawn_at_edge_with_escape_timer() {
        let mut state = state();
        let id = spawn_duck(&mut state, 5_000);
        let duck = state.duck(id).unwrap();

        assert_eq!(duck.state, DuckState::Alive);
        assert!(duck.pos.x == -duck.size.x || duck.pos.x == 800.0 + duck.size.x);
        assert!((1.0..2.0).contains(&duck.scale));
        assert!((duck.size.y - 104.0 * duck.scale).abs() < 1e-3);
        assert_eq!(duck.escape_timer.unwrap().due_ms(), 5_000);
        assert_eq!(duck.animation.unwrap().motion, Motion::Wander);
        assert_eq!(state.duck_counter, 1);
    }

    #[test]
    fn test_wander_stays_on_screen() {
        let mut state = state();
        let id = spawn_duck(&mut state, 60_000);
        for _ in 0..50 {
            let anim = state.duck(id).unwrap().animation.unwrap();
            let to = anim.tween.to;
            let size = state.duck(id).unwrap().size;
            assert!(to.x >= 0.0 && to.x + size.x <= 800.0);
            assert!(to.y >= 0.0 && to.y + size.y <= 600.0);
            assert!((500..2000).contains(&anim.tween.duration_ms));
            state.time_ms = anim.tween.end_ms();
            on_motion_done(&mut state, id, Motion::Wander);
        }
    }

    #[test]
    fn test_facing_follows_destination() {
        let mut duck = Duck::new(DuckId(1), Vec2::new(100.0, 0.0), 1.0, Vec2::new(130.0, 104.0));
        let mut scheduler = Scheduler::new();
        duck.animate(&mut scheduler, 0, Motion::Wander, Vec2::new(300.0, 0.0), 500);
        assert_eq!(duck.facing, Facing::Right);
        assert_eq!(duck.sprite(), "img/duck-right.gif");

        duck.animate(&mut scheduler, 500, Motion::Wander, Vec2::new(0.0, 0.0), 500);
        assert_eq!(duck.facing, Facing::Left);
        // Equal x counts as left
        duck.stop(&mut scheduler, 1_000);
        duck.animate(&mut scheduler, 1_000, Motion::Wander, duck.pos, 500);
        assert_eq!(duck.facing, Facing::Left);
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_stop_freezes_and_cancels() {
        let mut duck = Duck::new(DuckId(1), Vec2::ZERO, 1.0, Vec2::new(130.0, 104.0));
        let mut scheduler = Scheduler::new();
        duck.animate(&mut scheduler, 0, Motion::Wander, Vec2::new(100.0, 0.0), 1000);
        duck.stop(&mut scheduler, 500);
        assert!(duck.animation.is_none());
        assert!((duck.pos.x - 50.0).abs() < 1e-3);
        assert!(scheduler.is_empty());
        assert_eq!(duck.position(10_000), duck.pos);
    }

    #[test]
    fn test_fly_away_only_from_alive() {
        let mut state = state();
        let id = spawn_duck(&mut state, 1_000);
        assert!(fly_away(&mut state, id));
        let duck = state.duck(id).unwrap();
        assert_eq!(duck.state, DuckState::FlyingAway);
        assert_eq!(duck.animation.unwrap().motion, Motion::FlyAway);
        assert!(duck.escape_timer.is_none());
        assert_eq!(state.effects.dialogs.len(), 1);
        assert_eq!(state.effects.dialogs[0].kind, DialogKind::Bubble);

        // Second attempt is a no-op
        assert!(!fly_away(&mut state, id));
    }

    #[test]
    fn test_kill_falls_off_bottom() {
        let mut state = state();
        let id = spawn_duck(&mut state, 1_000);
        assert!(kill_duck(&mut state, id));
        let duck = state.duck(id).unwrap();
        assert_eq!(duck.state, DuckState::Dead);
        assert_eq!(duck.sprite(), "img/duck-dead.gif");
        assert!(duck.escape_timer.is_none());
        let anim = duck.animation.unwrap();
        assert_eq!(anim.motion, Motion::Fall);
        assert_eq!(anim.tween.duration_ms, 1_000);
        assert_eq!(anim.tween.to.y, 600.0 + duck.size.y);
        assert_eq!(anim.tween.to.x, anim.tween.from.x);
        // Only the fall completion remains scheduled
        assert_eq!(state.scheduler.len(), 1);

        assert!(!kill_duck(&mut state, id));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut state = state();
        let id = spawn_duck(&mut state, 1_000);
        assert!(remove_duck(&mut state, id).is_some());
        assert!(remove_duck(&mut state, id).is_none());
        assert!(state.scheduler.is_empty());
    }

    #[test]
    fn test_shoot_dead_duck_is_combo_only() {
        let mut state = state();
        let id = spawn_duck(&mut state, 60_000);
        shoot_duck(&mut state, id);
        let (score, hits) = (state.score, state.hits);

        shoot_duck(&mut state, id);
        assert_eq!(state.score, score);
        assert_eq!(state.hits, hits);
        assert!(state
            .effects
            .dialogs
            .iter()
            .any(|d| d.kind == DialogKind::Combo && d.text == "COMBO HIT !"));
        assert_eq!(state.effects.splatters.len(), 2);
    }

    #[test]
    fn test_stale_motion_is_ignored() {
        let mut state = state();
        let id = spawn_duck(&mut state, 60_000);
        let before = state.duck(id).unwrap().animation;
        on_motion_done(&mut state, id, Motion::Fall);
        assert_eq!(state.duck(id).unwrap().animation, before);
        assert_eq!(state.ducks.len(), 1);
    }
}
