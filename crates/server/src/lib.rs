pub mod routes;
pub mod startup;
pub mod errors;
pub mod bootstrap;

pub use startup::{init, serve};
