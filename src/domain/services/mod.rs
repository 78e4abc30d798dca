pub mod identifier;
pub mod registration;
pub mod safety;
pub mod session_service;
