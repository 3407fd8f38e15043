//! A personal landing page: text, buttons and a random background driven by
//! a JSON configuration document, with visitor edits kept in local storage.

pub mod app;
pub mod background;
pub mod cfg;
pub mod content;
pub mod editor;
pub mod logging;
pub mod modal;
pub mod render;
pub mod site;

#[cfg(target_family = "wasm")]
mod web;

#[cfg(all(not(target_family = "wasm"), feature = "is-bin"))]
pub mod desktop;
