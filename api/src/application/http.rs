pub mod health;
pub mod nutrition;
pub mod server;
