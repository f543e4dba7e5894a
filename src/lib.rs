pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod memory;
pub mod movies;
pub mod response;
pub mod routes;
pub mod sessions;
pub mod state;
