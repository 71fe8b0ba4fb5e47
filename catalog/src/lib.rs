mod app;
pub mod app_core;
pub mod commands;
pub mod events;
pub mod logging;
pub mod routes;
pub mod screens;

pub use app::App;
