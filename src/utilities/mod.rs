pub mod data_loader;
pub mod enums;
pub mod helpers;
pub mod input;
pub mod math_functions;
pub mod serde_fields;
pub mod trailing_window;
