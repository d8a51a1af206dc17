//! Cosmetic feedback: dialogs, blood splatters and full-screen banners
//!
//! None of this affects gameplay; it only has to look the same every time.

use glam::Vec2;
use rand::Rng;

use super::tween::{Easing, progress};
use crate::consts::*;

/// Lines a duck shouts when it flies away
pub const TAUNTS: [&str; 5] = [
    "Bye !",
    "See you !",
    "Catch me if you can !",
    "Hasta la vista baby !",
    "Ciao !",
];

pub fn random_taunt<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    TAUNTS[rng.random_range(0..TAUNTS.len())]
}

/// Dialog categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    /// Taunt from a duck flying away
    Bubble,
    /// Points for a hit
    Score,
    /// Hit on an already dead duck
    Combo,
    /// Extra points for a flying-away duck
    Bonus,
}

impl DialogKind {
    /// How far the dialog floats up (pixels)
    pub fn rise(self) -> f32 {
        match self {
            DialogKind::Bubble => 10.0,
            DialogKind::Score => 20.0,
            DialogKind::Combo => 30.0,
            DialogKind::Bonus => 40.0,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            DialogKind::Bubble => "bubble",
            DialogKind::Score => "score",
            DialogKind::Combo => "combo",
            DialogKind::Bonus => "bonus",
        }
    }

    /// Centered over the duck (bubbles hang off its left edge)
    pub fn centered(self) -> bool {
        self != DialogKind::Bubble
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dialog {
    pub id: u32,
    pub kind: DialogKind,
    pub text: String,
    /// Duck top-left when the dialog appeared
    pub origin: Vec2,
    /// Duck width, used for centering
    pub anchor_width: f32,
    pub spawned_ms: u64,
}

impl Dialog {
    /// Anchor point at `now_ms`. Centered kinds anchor on the duck's middle.
    pub fn position(&self, now_ms: u64) -> Vec2 {
        let t = Easing::Swing.apply(progress(self.spawned_ms, DIALOG_RISE_MS, now_ms));
        let x = if self.kind.centered() {
            self.origin.x + self.anchor_width / 2.0
        } else {
            self.origin.x
        };
        Vec2::new(x, self.origin.y - self.kind.rise() * t)
    }

    pub fn opacity(&self, now_ms: u64) -> f32 {
        1.0 - progress(self.spawned_ms, DIALOG_FADE_MS, now_ms)
    }

    pub fn expired(&self, now_ms: u64) -> bool {
        now_ms >= self.spawned_ms + DIALOG_FADE_MS
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Splatter {
    pub id: u32,
    pub center: Vec2,
    /// Square side (pixels)
    pub size: f32,
    pub spawned_ms: u64,
}

impl Splatter {
    pub fn opacity(&self, now_ms: u64) -> f32 {
        1.0 - progress(self.spawned_ms, SPLATTER_FADE_MS, now_ms)
    }

    pub fn expired(&self, now_ms: u64) -> bool {
        now_ms >= self.spawned_ms + SPLATTER_FADE_MS
    }
}

/// Full-screen message ("Level 3", "GAME OVER !")
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub id: u32,
    pub text: String,
    pub spawned_ms: u64,
}

impl Banner {
    pub fn opacity(&self, now_ms: u64) -> f32 {
        1.0 - progress(self.spawned_ms, BANNER_FADE_MS, now_ms)
    }

    pub fn expired(&self, now_ms: u64) -> bool {
        now_ms >= self.spawned_ms + BANNER_FADE_MS
    }
}

/// All live cosmetic effects
#[derive(Debug, Clone, Default)]
pub struct Effects {
    pub dialogs: Vec<Dialog>,
    pub splatters: Vec<Splatter>,
    pub banners: Vec<Banner>,
    next_id: u32,
}

impl Effects {
    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn dialog(
        &mut self,
        kind: DialogKind,
        text: impl Into<String>,
        origin: Vec2,
        anchor_width: f32,
        now_ms: u64,
    ) -> u32 {
        let id = self.next_id();
        self.dialogs.push(Dialog {
            id,
            kind,
            text: text.into(),
            origin,
            anchor_width,
            spawned_ms: now_ms,
        });
        id
    }

    pub fn splatter(&mut self, center: Vec2, size: f32, now_ms: u64) -> u32 {
        let id = self.next_id();
        self.splatters.push(Splatter {
            id,
            center,
            size,
            spawned_ms: now_ms,
        });
        id
    }

    pub fn banner(&mut self, text: impl Into<String>, now_ms: u64) -> u32 {
        let id = self.next_id();
        self.banners.push(Banner {
            id,
            text: text.into(),
            spawned_ms: now_ms,
        });
        id
    }

    /// Drop effects whose fade has finished
    pub fn expire(&mut self, now_ms: u64) {
        self.dialogs.retain(|d| !d.expired(now_ms));
        self.splatters.retain(|s| !s.expired(now_ms));
        self.banners.retain(|b| !b.expired(now_ms));
    }

    /// Empty the screen (ids keep counting up)
    pub fn clear(&mut self) {
        self.dialogs.clear();
        self.splatters.clear();
        self.banners.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty() && self.splatters.is_empty() && self.banners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_rise_per_kind() {
        let mut effects = Effects::default();
        let origin = Vec2::new(100.0, 200.0);
        for kind in [
            DialogKind::Bubble,
            DialogKind::Score,
            DialogKind::Combo,
            DialogKind::Bonus,
        ] {
            effects.dialog(kind, "x", origin, 130.0, 0);
        }
        let rises: Vec<f32> = effects
            .dialogs
            .iter()
            .map(|d| origin.y - d.position(DIALOG_RISE_MS).y)
            .collect();
        assert_eq!(rises, vec![10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_centering() {
        let mut effects = Effects::default();
        let origin = Vec2::new(100.0, 200.0);
        effects.dialog(DialogKind::Bubble, "Ciao !", origin, 130.0, 0);
        effects.dialog(DialogKind::Score, "125", origin, 130.0, 0);
        assert_eq!(effects.dialogs[0].position(0), origin);
        assert_eq!(effects.dialogs[1].position(0), Vec2::new(165.0, 200.0));
    }

    #[test]
    fn test_fade_and_expire() {
        let mut effects = Effects::default();
        effects.dialog(DialogKind::Score, "10", Vec2::ZERO, 0.0, 1_000);
        effects.splatter(Vec2::ZERO, 80.0, 1_000);
        effects.banner("Level 1", 1_000);

        assert_eq!(effects.dialogs[0].opacity(1_000), 1.0);
        assert!((effects.dialogs[0].opacity(1_350) - 0.5).abs() < 1e-6);

        effects.expire(1_500);
        assert_eq!(effects.splatters.len(), 0);
        assert_eq!(effects.banners.len(), 1);
        assert_eq!(effects.dialogs.len(), 1);

        effects.expire(1_700);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_ids_are_unique_across_kinds() {
        let mut effects = Effects::default();
        let a = effects.banner("a", 0);
        let b = effects.splatter(Vec2::ZERO, 1.0, 0);
        effects.clear();
        let c = effects.dialog(DialogKind::Combo, "c", Vec2::ZERO, 0.0, 0);
        assert!(a < b && b < c);
    }

    #[test]
    fn test_random_taunt_is_known() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..20 {
            assert!(TAUNTS.contains(&random_taunt(&mut rng)));
        }
    }
}
