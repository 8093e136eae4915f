//! Framework and meta-framework modules
//!
//! Meta-frameworks list the framework they are built on in `excludes`, so a
//! Next.js project reports `nextjs` and not also `react`.

mod laravel;
mod nextjs;
mod nuxt;
mod react;
mod statamic;
mod vue;

pub use laravel::LaravelModule;
pub use nextjs::NextJsModule;
pub use nuxt::NuxtModule;
pub use react::ReactModule;
pub use statamic::StatamicModule;
pub use vue::VueModule;
