pub mod configuration;
pub mod constants;
pub mod domain;
pub mod email_client;
pub mod errors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod schemas;
pub mod startup;
pub mod stripe_client;
pub mod telemetry;
pub mod tests;
pub mod utils;
