mod announcement;
mod coercion;
mod errors;

pub use announcement::*;
pub use coercion::*;
pub use errors::*;
