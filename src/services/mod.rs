pub mod health;
pub mod report;
pub mod session_store;
pub mod session_sweeper;
pub mod subscription;
