//! Animation and tweening for cosmetic world motion.
//!
//! Provides `Transition` for once / back-and-forth / looping value
//! interpolation with easing.

mod tweens;

pub use tweens::{EaseType, Repeat, Transition};
