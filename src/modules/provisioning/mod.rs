pub mod model;
pub mod rollback;
pub mod service;
