mod app;
mod env;

pub use app::*;
