//! DOM renderer
//!
//! Mirrors the simulation into absolutely positioned nodes under `#screen`:
//! one `<img>` per duck and splatter, one `<div>` per dialog and banner.
//! Nodes are created when an entity appears and removed when it is gone.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, Window};

use crate::sim::{Bounds, DuckId, GameState};

/// Banner font size (pixels)
const BANNER_FONT_PX: u32 = 200;

/// Last values written to the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HudValues {
    level: u32,
    score: u64,
    shots: u32,
    hits: u32,
    life: u32,
}

impl HudValues {
    fn of(state: &GameState) -> Self {
        Self {
            level: state.level,
            score: state.score,
            shots: state.shots,
            hits: state.hits,
            life: state.life,
        }
    }
}

pub struct DomView {
    document: Document,
    screen: HtmlElement,
    ducks: HashMap<DuckId, HtmlImageElement>,
    /// Dialogs, splatters and banners share one id space
    effects: HashMap<u32, HtmlElement>,
    hud: Option<HudValues>,
}

fn px(v: f32) -> String {
    format!("{}px", v.round())
}

fn set_style(el: &HtmlElement, props: &[(&str, String)]) -> Result<(), JsValue> {
    let style = el.style();
    for (name, value) in props {
        style.set_property(name, value)?;
    }
    Ok(())
}

/// Ducks and effects can't be selected or dragged
fn make_unselectable(el: &Element) -> Result<(), JsValue> {
    el.class_list().add_1("unselectable")?;
    el.set_attribute("unselectable", "on")?;
    el.set_attribute("draggable", "false")?;
    Ok(())
}

impl DomView {
    pub fn new(document: Document, screen: HtmlElement) -> Self {
        Self {
            document,
            screen,
            ducks: HashMap::new(),
            effects: HashMap::new(),
            hud: None,
        }
    }

    /// Size the playfield to the window and return its bounds
    pub fn fit_to_window(&self, window: &Window) -> Result<Bounds, JsValue> {
        let width = window.inner_width()?.as_f64().unwrap_or(0.0) as f32;
        let height = window.inner_height()?.as_f64().unwrap_or(0.0) as f32;
        set_style(
            &self.screen,
            &[("width", px(width)), ("height", px(height))],
        )?;
        Ok(Bounds::new(width, height))
    }

    /// Playfield coordinates of a viewport point
    pub fn to_playfield(&self, client_x: i32, client_y: i32) -> (f32, f32) {
        let rect = self.screen.get_bounding_client_rect();
        (
            client_x as f32 - rect.left() as f32,
            client_y as f32 - rect.top() as f32,
        )
    }

    fn create<T: JsCast>(&self, tag: &str, classes: &[&str]) -> Result<T, JsValue> {
        let el = self.document.create_element(tag)?;
        for class in classes {
            el.class_list().add_1(class)?;
        }
        make_unselectable(&el)?;
        self.screen.append_child(&el)?;
        Ok(el.dyn_into::<T>()?)
    }

    /// Bring the DOM in line with the state
    pub fn render(&mut self, state: &GameState) -> Result<(), JsValue> {
        self.render_ducks(state)?;
        self.render_effects(state)?;
        self.update_hud(state);
        Ok(())
    }

    fn render_ducks(&mut self, state: &GameState) -> Result<(), JsValue> {
        let now = state.time_ms;
        self.ducks.retain(|id, el| {
            let alive = state.duck(*id).is_some();
            if !alive {
                el.remove();
            }
            alive
        });

        for duck in &state.ducks {
            let existing = self.ducks.get(&duck.id).cloned();
            let el = match existing {
                Some(el) => el,
                None => {
                    let el: HtmlImageElement = self.create("img", &["image", "duck"])?;
                    self.ducks.insert(duck.id, el.clone());
                    el
                }
            };

            let sprite = duck.sprite();
            if el.get_attribute("src").as_deref() != Some(sprite) {
                el.set_src(sprite);
            }
            let pos = duck.position(now);
            set_style(
                &el,
                &[
                    ("left", px(pos.x)),
                    ("top", px(pos.y)),
                    ("width", px(duck.size.x)),
                    ("height", px(duck.size.y)),
                ],
            )?;
        }
        Ok(())
    }

    fn effect_element(
        &mut self,
        id: u32,
        tag: &str,
        classes: &[&str],
    ) -> Result<(HtmlElement, bool), JsValue> {
        if let Some(el) = self.effects.get(&id) {
            return Ok((el.clone(), false));
        }
        let el: HtmlElement = self.create(tag, classes)?;
        self.effects.insert(id, el.clone());
        Ok((el, true))
    }

    fn render_effects(&mut self, state: &GameState) -> Result<(), JsValue> {
        let now = state.time_ms;
        let effects = &state.effects;

        self.effects.retain(|id, el| {
            let live = effects.dialogs.iter().any(|d| d.id == *id)
                || effects.splatters.iter().any(|s| s.id == *id)
                || effects.banners.iter().any(|b| b.id == *id);
            if !live {
                el.remove();
            }
            live
        });

        for dialog in &effects.dialogs {
            let (el, fresh) =
                self.effect_element(dialog.id, "div", &["dialog", dialog.kind.css_class()])?;
            if fresh {
                el.set_text_content(Some(&dialog.text));
                if dialog.kind.centered() {
                    set_style(&el, &[("transform", "translateX(-50%)".to_string())])?;
                }
            }
            let pos = dialog.position(now);
            set_style(
                &el,
                &[
                    ("left", px(pos.x)),
                    ("top", px(pos.y)),
                    ("opacity", dialog.opacity(now).to_string()),
                ],
            )?;
        }

        for splatter in &effects.splatters {
            let (el, fresh) = self.effect_element(splatter.id, "img", &["splatter", "image"])?;
            if fresh {
                el.set_attribute("src", "img/blood.gif")?;
                set_style(
                    &el,
                    &[
                        ("left", px(splatter.center.x)),
                        ("top", px(splatter.center.y)),
                        ("width", px(splatter.size)),
                        ("height", px(splatter.size)),
                    ],
                )?;
            }
            set_style(&el, &[("opacity", splatter.opacity(now).to_string())])?;
        }

        for banner in &effects.banners {
            let (el, fresh) = self.effect_element(banner.id, "div", &["display"])?;
            if fresh {
                el.set_text_content(Some(&banner.text));
                set_style(
                    &el,
                    &[
                        ("width", px(state.bounds.width)),
                        ("height", px(state.bounds.height)),
                        ("font-size", format!("{}px", BANNER_FONT_PX)),
                    ],
                )?;
            }
            set_style(&el, &[("opacity", banner.opacity(now).to_string())])?;
        }
        Ok(())
    }

    fn set_hud(&self, id: &str, text: String) {
        if let Some(el) = self.document.get_element_by_id(id) {
            el.set_text_content(Some(&text));
        }
    }

    /// Rewrite HUD fields whose counters changed
    fn update_hud(&mut self, state: &GameState) {
        let values = HudValues::of(state);
        let last = self.hud;
        let changed = |f: fn(&HudValues) -> u64| last.map(|l| f(&l) != f(&values)).unwrap_or(true);

        if changed(|v| v.level as u64) {
            self.set_hud("level", format!("Level : {}", values.level));
        }
        if changed(|v| v.score) {
            self.set_hud("score", format!("Score : {}", values.score));
        }
        if changed(|v| v.shots as u64) {
            self.set_hud("shots", format!("Shots : {}", values.shots));
        }
        if changed(|v| v.hits as u64) {
            self.set_hud("hits", format!("Hits : {}", values.hits));
        }
        if changed(|v| v.life as u64) {
            self.set_hud("life", format!("Life : {}", values.life));
        }
        self.hud = Some(values);
    }
}
