pub mod directive;
pub mod instruction;
pub mod settings;
