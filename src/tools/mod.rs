pub mod inspect_build;
pub mod list_weapon_types;
pub mod reload_catalog;
pub mod search;

pub use inspect_build::*;
pub use list_weapon_types::*;
pub use reload_catalog::*;
pub use search::*;
