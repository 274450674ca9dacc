pub mod assignment;
pub mod auth;
pub mod health;
pub mod review;
pub mod submission;
