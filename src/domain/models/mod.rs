pub mod identity;
pub mod risk_zone;
pub mod tourist;
