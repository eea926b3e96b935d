//! UI system - energy readout and status overlay text

pub mod hud;

pub use hud::{energy_label, Hud};
