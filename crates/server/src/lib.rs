pub mod errors;
pub mod metrics;
pub mod offices;
pub mod openapi;
pub mod routes;
pub mod startup;

pub use startup::run;
