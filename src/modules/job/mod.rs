pub mod model;
pub mod profiles;
pub mod runner;
pub mod service;
