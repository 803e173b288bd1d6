pub mod config;
pub mod controller;
pub mod dashboard;
pub mod errors;
pub mod gateway;
pub mod model;
pub mod query;
pub mod session;
pub mod store;
