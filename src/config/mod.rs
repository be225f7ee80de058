pub mod env;
pub mod presets;
pub mod settings;
