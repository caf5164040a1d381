pub mod model;
pub mod scripts;

pub use model::{HtmlRecord, ScriptInventory, ScriptRecord};
pub use scripts::extract;
