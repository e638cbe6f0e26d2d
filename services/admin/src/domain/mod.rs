pub mod observer;
pub mod repository;
pub mod types;
