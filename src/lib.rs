pub mod config;
pub mod logging;
pub mod uno_game;
