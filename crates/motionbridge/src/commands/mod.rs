pub mod battery;
pub mod blinds;
pub mod uuid;
