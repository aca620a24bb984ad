//! DOM presenter
//!
//! Turns engine effects into class and CSS custom property changes on the
//! page's elements. Cups are positioned with `--x`/`--y`, transitions use
//! `--dur`, and the ball uses `--bx`/`--by`; the stylesheet does the rest.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, MouseEvent};

use super::modal::DeclineButton;
use crate::consts::CUP_FLOAT_Y;
use crate::sim::{BallCue, CupHandle, CupPlacement, Effect, Level, Presenter};

const CUP_SHELL_HTML: &str = r#"
  <div class="cup-shell">
    <div class="cup-rim"></div>
    <div class="cup-mouth"></div>
    <div class="cup-highlight"></div>
    <div class="cup-base"></div>
  </div>
"#;

/// One cup element and its shadow, indexed by `CupHandle`
struct CupView {
    cup: HtmlElement,
    shadow: HtmlElement,
}

/// Callback invoked with the handle of a clicked cup
pub type CupClickHandler = Rc<dyn Fn(CupHandle)>;

fn by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))
}

fn html(element: Element) -> Result<HtmlElement, JsValue> {
    element
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str("not an HTML element"))
}

fn set_var(element: &HtmlElement, name: &str, value: String) {
    let _ = element.style().set_property(name, &value);
}

pub struct DomPresenter {
    document: Document,
    table: Element,
    level_text: Element,
    cups_text: Element,
    state_text: Element,
    message: Element,
    start_btn: Element,
    modal: Element,
    decline: DeclineButton,
    ball: Option<HtmlElement>,
    cups: Vec<CupView>,
    on_cup_click: Option<CupClickHandler>,
    /// Click listeners of the current cups; dropped with them on rebuild
    listeners: Vec<Closure<dyn FnMut(MouseEvent)>>,
}

impl DomPresenter {
    pub fn new(document: Document) -> Result<Self, JsValue> {
        let decline = DeclineButton::new(
            html(by_id(&document, "noBtn")?)?,
            by_id(&document, "valentineResult")?,
        );
        Ok(Self {
            table: by_id(&document, "table")?,
            level_text: by_id(&document, "levelText")?,
            cups_text: by_id(&document, "cupsText")?,
            state_text: by_id(&document, "stateText")?,
            message: by_id(&document, "message")?,
            start_btn: by_id(&document, "startBtn")?,
            modal: by_id(&document, "valentineModal")?,
            decline,
            document,
            ball: None,
            cups: Vec::new(),
            on_cup_click: None,
            listeners: Vec::new(),
        })
    }

    pub fn set_cup_click_handler(&mut self, handler: CupClickHandler) {
        self.on_cup_click = Some(handler);
    }

    /// The "No" button wiring, for the input layer
    pub fn decline_button(&self) -> DeclineButton {
        self.decline.clone()
    }

    fn create(&self, class: &str) -> Result<HtmlElement, JsValue> {
        let element = html(self.document.create_element("div")?)?;
        element.set_class_name(class);
        Ok(element)
    }

    fn build_table(&mut self, level: Level, placements: &[CupPlacement]) -> Result<(), JsValue> {
        self.table.set_inner_html("");
        self.cups.clear();
        self.listeners.clear();

        let ball = self.create("ball")?;
        set_var(&ball, "--bx", "0px".to_string());
        set_var(&ball, "--by", "-180px".to_string());
        self.table.append_child(&ball)?;
        self.ball = Some(ball);

        for placement in placements {
            let cup = self.create("cup levitate")?;
            set_var(&cup, "--x", format!("{}px", placement.x));
            set_var(&cup, "--y", format!("{}px", CUP_FLOAT_Y));
            set_var(&cup, "--dur", "0ms".to_string());
            cup.set_inner_html(CUP_SHELL_HTML);

            // The handle, not the slot: cups move between slots
            if let Some(handler) = self.on_cup_click.clone() {
                let handle = placement.cup;
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    handler(handle);
                });
                cup.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
                self.listeners.push(closure);
            }
            self.table.append_child(&cup)?;

            let shadow = self.create("cup-shadow")?;
            set_var(&shadow, "--x", format!("{}px", placement.x));
            set_var(&shadow, "--dur", "0ms".to_string());
            self.table.append_child(&shadow)?;

            debug_assert_eq!(placement.cup.0, self.cups.len());
            self.cups.push(CupView { cup, shadow });
        }

        self.level_text
            .set_text_content(Some(&level.number().to_string()));
        self.cups_text
            .set_text_content(Some(&placements.len().to_string()));
        Ok(())
    }

    fn cup(&self, handle: CupHandle) -> Option<&CupView> {
        self.cups.get(handle.0)
    }

    fn show_ball(&self, cue: &BallCue) {
        let Some(ball) = &self.ball else {
            return;
        };
        let classes = ball.class_list();
        if cue.teleport {
            let _ = classes.add_1("teleport");
        }
        set_var(ball, "--bx", format!("{}px", cue.pos.x));
        set_var(ball, "--by", format!("{}px", cue.pos.y));
        let _ = classes.toggle_with_force("show", cue.visible);
        let _ = classes.toggle_with_force("drop", cue.drop);
        if cue.teleport {
            // Force a reflow so the jump is not animated
            let _ = ball.offset_height();
            let _ = classes.remove_1("teleport");
        }
    }
}

impl Presenter for DomPresenter {
    fn apply(&mut self, effect: &Effect) {
        match effect {
            Effect::BuildTable { level, cups } => {
                if let Err(err) = self.build_table(*level, cups) {
                    log::error!("Failed to build table: {:?}", err);
                }
            }
            Effect::SetCupDuration(ms) => {
                for view in &self.cups {
                    set_var(&view.cup, "--dur", format!("{ms}ms"));
                    set_var(&view.shadow, "--dur", format!("{ms}ms"));
                }
            }
            Effect::SetFloating(on) => {
                for view in &self.cups {
                    let classes = view.cup.class_list();
                    let _ = classes.toggle_with_force("levitate", *on);
                    let _ = classes.toggle_with_force("landed", !*on);
                    let _ = classes.remove_1("lift");
                }
            }
            Effect::SetCupX { cup, x } => {
                if let Some(view) = self.cup(*cup) {
                    set_var(&view.cup, "--x", format!("{x}px"));
                    set_var(&view.shadow, "--x", format!("{x}px"));
                }
            }
            Effect::SetCupY { cup, y } => {
                if let Some(view) = self.cup(*cup) {
                    set_var(&view.cup, "--y", format!("{y}px"));
                }
            }
            Effect::LiftCup(cup) => {
                if let Some(view) = self.cup(*cup) {
                    let _ = view.cup.class_list().add_1("lift");
                }
            }
            Effect::SetInputEnabled(enabled) => {
                for view in &self.cups {
                    let _ = view.cup.class_list().toggle_with_force("disabled", !*enabled);
                }
            }
            Effect::Ball(cue) => self.show_ball(cue),
            Effect::Status(text) => self.state_text.set_text_content(Some(*text)),
            Effect::Message { html: markup, tone } => {
                self.message.set_class_name(&format!("message {}", tone.as_str()));
                self.message.set_inner_html(markup);
            }
            Effect::SetPlaying(playing) => {
                let label = if *playing { "Playing…" } else { "Play" };
                self.start_btn.set_text_content(Some(label));
            }
            Effect::OpenModal => {
                self.decline.reset();
                let _ = self.modal.class_list().remove_1("hidden");
                let _ = self.modal.set_attribute("aria-hidden", "false");
            }
            Effect::CelebrateModal => self.decline.celebrate(),
            Effect::CloseModal => {
                let _ = self.modal.class_list().add_1("hidden");
                let _ = self.modal.set_attribute("aria-hidden", "true");
            }
            // Timers belong to the driver
            Effect::Wait { .. } => {}
        }
    }
}
