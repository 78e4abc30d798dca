pub mod auth;
pub mod dashboard;
pub mod health;
pub mod home;
pub mod location;
pub mod registration;
