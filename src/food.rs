//! The fixed catalog of collectible food archetypes.

use bevy_ecs::component::Component;
use rand::Rng;
use serde::Serialize;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount, EnumIter, IntoStaticStr};

/// A food archetype. Doubles as the component that marks an entity as food.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumCount, EnumIter, IntoStaticStr, Serialize)]
pub enum FoodKind {
    Cake,
    Sushi,
    Donut,
    Apple,
    Cherry,
}

impl FoodKind {
    pub const fn points(self) -> u32 {
        match self {
            FoodKind::Cake => 10,
            FoodKind::Sushi => 15,
            FoodKind::Donut => 5,
            FoodKind::Apple => 8,
            FoodKind::Cherry => 12,
        }
    }

    /// Display name, as used in notifications.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Key the renderer uses to pick an icon.
    pub const fn visual_key(self) -> &'static str {
        match self {
            FoodKind::Cake => "cake",
            FoodKind::Sushi => "sushi",
            FoodKind::Donut => "donut",
            FoodKind::Apple => "apple",
            FoodKind::Cherry => "cherry",
        }
    }

    /// Draws an archetype uniformly from the catalog.
    pub fn random(rng: &mut impl Rng) -> Self {
        let index = rng.random_range(0..Self::COUNT);
        // nth is always in range, Cake only guards the iterator contract
        Self::iter().nth(index).unwrap_or(FoodKind::Cake)
    }
}
