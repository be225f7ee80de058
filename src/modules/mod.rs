pub mod job;
pub mod manifest;
pub mod notification;
pub mod provisioning;
