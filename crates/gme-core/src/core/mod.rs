pub mod cascade;
pub mod services;
