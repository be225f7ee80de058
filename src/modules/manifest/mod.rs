pub mod assembler;
pub mod model;
pub mod runner;
pub mod service;
