pub mod instruction_loader;
pub mod settings_loader;

pub use instruction_loader::load_instruction;
pub use settings_loader::load_generation_settings;
