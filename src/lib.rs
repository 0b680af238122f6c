pub mod api_client;
pub mod app_config;
pub mod commands;
pub mod models;
pub mod profile_store;
pub mod session_manager;
pub mod utils;
pub mod webapp_bridge;
