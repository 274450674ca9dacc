pub mod assignment;
pub mod auth;
pub mod shared;
