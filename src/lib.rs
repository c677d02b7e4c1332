pub mod components;
pub mod config;
pub mod error;
pub mod game;
pub mod ghost;
pub mod input;
pub mod level;
pub mod player;
pub mod render;
pub mod runner;
pub mod terminal;
