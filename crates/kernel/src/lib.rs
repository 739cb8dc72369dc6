//! Module kernel: the `Module` trait, the registry that owns module
//! lifecycles, and layered settings.

pub mod module;
pub mod registry;
pub mod settings;

pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
pub use settings::Settings;
