//! Libraries and tooling layered on top of a framework

mod filament;
mod inertia;
mod livewire;
mod pest;
mod tailwind;

pub use filament::FilamentModule;
pub use inertia::InertiaModule;
pub use livewire::LivewireModule;
pub use pest::PestModule;
pub use tailwind::TailwindModule;
