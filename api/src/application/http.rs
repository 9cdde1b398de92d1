pub mod health;
pub mod server;
pub mod session;
