//! The evasive "No" button
//!
//! Owned entirely by the modal; the engine never hears about it. Each press
//! shows a firmer taunt and moves the button to a random spot inside its
//! container, so in practice the dialog ends with "Yes" or a backdrop click.

/// Padding kept between the button and its container edge (px)
pub const DODGE_PAD: f64 = 6.0;

/// Text shown after the `dodges`-th press (1-based)
pub fn taunt_for(dodges: u32) -> &'static str {
    match dodges {
        0 => "",
        1 => "Are you sure?",
        2 => "Really sure??",
        _ => "I think you can press the yes button!",
    }
}

/// Top-left for the button inside a `container` (w, h), given a button of
/// size `button` and two rolls in `[0, 1)`.
pub fn dodge_target(container: (f64, f64), button: (f64, f64), roll: (f64, f64)) -> (f64, f64) {
    let max_x = DODGE_PAD.max(container.0 - button.0 - DODGE_PAD);
    let max_y = DODGE_PAD.max(container.1 - button.1 - DODGE_PAD);
    let clamp = |r: f64| if r.is_finite() { r.clamp(0.0, 1.0) } else { 0.0 };
    (
        DODGE_PAD + clamp(roll.0) * max_x,
        DODGE_PAD + clamp(roll.1) * max_y,
    )
}

#[cfg(target_arch = "wasm32")]
pub use button::DeclineButton;

#[cfg(target_arch = "wasm32")]
mod button {
    use std::cell::Cell;
    use std::rc::Rc;

    use web_sys::{Element, HtmlElement};

    use super::{dodge_target, taunt_for};

    /// Wiring for the "No" button and the result line under it
    #[derive(Clone)]
    pub struct DeclineButton {
        button: HtmlElement,
        result: Element,
        dodges: Rc<Cell<u32>>,
    }

    impl DeclineButton {
        pub fn new(button: HtmlElement, result: Element) -> Self {
            Self {
                button,
                result,
                dodges: Rc::new(Cell::new(0)),
            }
        }

        /// Back to the starting spot with no taunt (modal just opened)
        pub fn reset(&self) {
            self.dodges.set(0);
            self.result.set_text_content(Some(""));
            self.result.set_class_name("result muted");
            let style = self.button.style();
            let _ = style.set_property("position", "relative");
            let _ = style.set_property("left", "0px");
            let _ = style.set_property("top", "0px");
        }

        /// "Yes" was pressed
        pub fn celebrate(&self) {
            self.result.set_text_content(Some("YAYYYYY!!!"));
            self.result.set_class_name("result");
        }

        /// Handle one press
        pub fn dodge(&self) {
            let dodges = self.dodges.get() + 1;
            self.dodges.set(dodges);
            self.result.set_text_content(Some(taunt_for(dodges)));

            let Some(actions) = self.button.parent_element() else {
                return;
            };
            let style = self.button.style();
            let _ = style.set_property("position", "absolute");

            let area = actions.get_bounding_client_rect();
            let rect = self.button.get_bounding_client_rect();
            let (x, y) = dodge_target(
                (area.width(), area.height()),
                (rect.width(), rect.height()),
                (js_sys::Math::random(), js_sys::Math::random()),
            );
            let _ = style.set_property("left", &format!("{x}px"));
            let _ = style.set_property("top", &format!("{y}px"));
            log::debug!("No button dodged ({dodges})");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taunts_escalate_then_repeat() {
        assert_eq!(taunt_for(1), "Are you sure?");
        assert_eq!(taunt_for(2), "Really sure??");
        assert_eq!(taunt_for(3), "I think you can press the yes button!");
        assert_eq!(taunt_for(40), taunt_for(3));
    }

    #[test]
    fn test_dodge_stays_inside_container() {
        for roll in [(0.0, 0.0), (0.5, 0.25), (0.999, 0.999)] {
            let (x, y) = dodge_target((300.0, 80.0), (90.0, 40.0), roll);
            assert!(x >= DODGE_PAD && x + 90.0 <= 300.0 + DODGE_PAD);
            assert!(y >= DODGE_PAD && y + 40.0 <= 80.0 + DODGE_PAD);
        }
    }

    #[test]
    fn test_dodge_in_tiny_container() {
        let (x, y) = dodge_target((10.0, 10.0), (90.0, 40.0), (1.0, f64::NAN));
        assert_eq!(x, 2.0 * DODGE_PAD);
        assert_eq!(y, DODGE_PAD);
    }
}
