pub mod address;
pub mod client;
pub mod commands;
pub mod errors;
pub mod from_mpd;
pub mod mpd_client;
pub mod proto_client;
pub mod version;
