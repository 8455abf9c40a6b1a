pub mod audit;
pub mod auth;
pub mod db;
pub mod errors;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod tables;
pub mod templates_structs;
