//! Browser collaborators
//!
//! - `dom`: presenter that drives the page's cup, ball and modal elements
//! - `modal`: the evasive "No" button

#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod modal;

#[cfg(target_arch = "wasm32")]
pub use dom::DomPresenter;
