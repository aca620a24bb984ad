//! Shell Game entry point
//!
//! Wires the engine to the page on wasm; natively, plays a few headless
//! rounds on a virtual clock and logs the effect stream.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, MouseEvent};

    use shell_game::Settings;
    use shell_game::sim::{Effect, Event, GameState, Presenter};
    use shell_game::web::DomPresenter;

    struct App {
        state: GameState,
        presenter: DomPresenter,
    }

    /// Width the cups have to fit in
    fn table_width() -> f32 {
        let Some(window) = web_sys::window() else {
            return 0.0;
        };
        let wrap = window
            .document()
            .and_then(|d| d.query_selector(".table-wrap").ok().flatten());
        match wrap {
            Some(el) => el.client_width() as f32,
            None => window
                .inner_width()
                .ok()
                .and_then(|w| w.as_f64())
                .unwrap_or(0.0) as f32,
        }
    }

    /// Dispatch one event, present its effects, and arm the next timer
    fn pump(app: &Rc<RefCell<App>>, event: Event) {
        let timer = {
            let mut guard = app.borrow_mut();
            let App { state, presenter } = &mut *guard;
            let effects = state.dispatch(event);
            presenter.apply_all(&effects);
            effects.iter().find_map(|e| match e {
                Effect::Wait { ticket, ms } => Some((*ticket, *ms)),
                _ => None,
            })
        };
        if let Some((ticket, ms)) = timer {
            schedule(app.clone(), ticket, ms);
        }
    }

    fn schedule(app: Rc<RefCell<App>>, ticket: u64, ms: u32) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move || {
            pump(&app, Event::TimerElapsed { ticket });
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            ms.min(i32::MAX as u32) as i32,
        );
        closure.forget();
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Shell Game starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let settings = Settings::load();
        let (state, boot) = GameState::from_settings(&settings, table_width());

        let presenter = match DomPresenter::new(document.clone()) {
            Ok(p) => p,
            Err(err) => {
                log::error!("Page is missing game elements: {:?}", err);
                return;
            }
        };
        let decline = presenter.decline_button();

        let app = Rc::new(RefCell::new(App { state, presenter }));
        {
            let weak = Rc::downgrade(&app);
            app.borrow_mut()
                .presenter
                .set_cup_click_handler(Rc::new(move |cup| {
                    let Some(app) = weak.upgrade() else {
                        return;
                    };
                    // Resolve the cup's slot at click time
                    let slot = app.borrow().state.table.slot_of_cup(cup);
                    if let Some(slot) = slot {
                        pump(&app, Event::Pick { slot });
                    }
                }));
        }
        app.borrow_mut().presenter.apply_all(&boot);

        on_click(&document, "startBtn", app.clone(), |_| Some(Event::Start));
        on_click(&document, "resetBtn", app.clone(), |_| Some(Event::Reset));
        on_click(&document, "yesBtn", app.clone(), |_| Some(Event::ModalAccepted));
        on_click(&document, "valentineModal", app.clone(), |event| {
            // Only the backdrop itself closes the modal
            let target: Element = event.target()?.dyn_into().ok()?;
            target
                .class_list()
                .contains("backdrop")
                .then_some(Event::ModalDismissed)
        });

        if let Some(btn) = document.get_element_by_id("noBtn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                decline.dodge();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keep cups on-screen if the device rotates / resizes
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                pump(&app, Event::Resize { width: table_width() });
            });
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        log::info!("Shell Game running!");
    }

    /// Route clicks on `#id` into the engine
    fn on_click(
        document: &web_sys::Document,
        id: &str,
        app: Rc<RefCell<App>>,
        to_event: impl Fn(&MouseEvent) -> Option<Event> + 'static,
    ) {
        let Some(el) = document.get_element_by_id(id) else {
            log::warn!("No #{} on the page", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            if let Some(game_event) = to_event(&event) {
                pump(&app, game_event);
            }
        });
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use shell_game::Settings;
    use shell_game::sim::{Dice, Driver, Effect, Event, GameState, ModalState, Presenter, RandomSource};

    /// Logs every effect as JSON
    struct LogPresenter;

    impl Presenter for LogPresenter {
        fn apply(&mut self, effect: &Effect) {
            match serde_json::to_string(effect) {
                Ok(json) => log::debug!("effect {json}"),
                Err(err) => log::warn!("unserializable effect {:?}: {err}", effect),
            }
        }
    }

    env_logger::init();
    log::info!("Shell Game (native) starting...");
    log::info!("The browser version runs with `trunk serve`; playing headless rounds instead");

    let settings = Settings::load();
    let (state, boot) = GameState::from_settings(&settings, 1024.0);
    let mut driver = Driver::new(state, boot, LogPresenter);
    let mut guesser = Dice::seeded(settings.seed.unwrap_or(7) ^ 0x9E37_79B9);

    for round in 1..=6 {
        let level = driver.state.level.level.number();
        driver.send(Event::Start);
        driver.settle();

        let slot = guesser.next_int(driver.state.table.cup_count());
        driver.send(Event::Pick { slot });
        let correct = driver.state.last_pick_correct == Some(true);
        driver.settle();
        println!(
            "round {round}: level {level}, picked slot {slot}: {}",
            if correct { "correct" } else { "wrong" }
        );

        if driver.state.modal == ModalState::Open {
            println!("  modal opened, answering yes");
            driver.send(Event::ModalAccepted);
            driver.settle();
        }
    }

    println!(
        "finished at level {} after {:.1}s of virtual time",
        driver.state.level.level.number(),
        driver.elapsed_ms as f64 / 1000.0
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
