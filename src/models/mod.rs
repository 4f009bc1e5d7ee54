pub mod loaders;
pub mod object_key;
pub mod request;
pub mod settings;

pub use loaders::{load_generation_settings, load_instruction};
pub use object_key::{classify, output_key, InputKind};
pub use request::{GenerationRequest, ImageReference};
pub use settings::GenerationSettings;
