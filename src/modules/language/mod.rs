//! Language modules

mod javascript;
mod php;
mod typescript;

pub use javascript::JavaScriptModule;
pub use php::PhpModule;
pub use typescript::TypeScriptModule;
