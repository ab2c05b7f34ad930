//! The Entity-Component-System (ECS) module.
//!
//! This module contains all the ECS-related logic, including components, systems,
//! and resources.

pub mod audio;
pub mod collision;
pub mod components;
pub mod countdown;
pub mod item;
pub mod lifetime;
pub mod movement;
pub mod notify;
pub mod particle;
pub mod profiling;
pub mod scheduler;
pub mod spawner;
pub mod state;

pub use self::audio::*;
pub use self::collision::*;
pub use self::components::*;
pub use self::countdown::*;
pub use self::item::*;
pub use self::lifetime::*;
pub use self::movement::*;
pub use self::notify::*;
pub use self::particle::*;
pub use self::profiling::*;
pub use self::scheduler::*;
pub use self::spawner::*;
pub use self::state::*;
