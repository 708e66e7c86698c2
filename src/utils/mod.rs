pub mod errors;
pub mod colors;

#[cfg(test)]
pub mod stub_server;

pub use errors::JobsError;
pub use colors::parse_hex_color;
