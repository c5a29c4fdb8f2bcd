pub mod config;
pub mod locks;
pub mod state;
pub mod tokens;
