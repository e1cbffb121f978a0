mod server_config;

pub use server_config::*;
