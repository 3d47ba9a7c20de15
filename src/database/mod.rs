pub mod connection;
pub mod models;
pub mod repository;
