//! GUI module for the Keystone game
//!
//! A thin egui/eframe front end over [`crate::Engine`].

mod app;
mod board_view;
mod theme;

pub use app::KeystoneApp;
