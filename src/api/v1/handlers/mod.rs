pub mod health;
pub mod logs;
pub mod me;
pub mod users;
