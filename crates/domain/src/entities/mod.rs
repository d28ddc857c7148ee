//! Domain entities - Core bestiary records

mod legendary_group;
mod monster;

pub use legendary_group::{LegendaryGroup, LegendaryGroupTable};
pub use monster::{HitPoints, Monster};
