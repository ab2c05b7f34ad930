//! Food-collecting arcade minigame simulation library crate.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

#[cfg_attr(coverage_nightly, coverage(off))]
pub mod app;
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod audio;
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod error;
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod events;
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod formatter;
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod logging;
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod notify;

pub mod config;
pub mod constants;
pub mod direction;
pub mod food;
pub mod game;
pub mod snapshot;
pub mod systems;
