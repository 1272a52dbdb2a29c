pub mod account;
pub mod config;
pub mod contacts;
pub mod roadside;
pub mod sos;
