// src/handlers/mod.rs
pub mod ui;
pub mod blog;
