pub mod antibot;
pub mod session_store;
