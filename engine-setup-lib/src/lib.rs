pub mod archive;
pub mod components;
pub mod config;
pub mod download_client;
pub mod error;
pub mod github;
pub mod installer;
pub mod launcher;
pub mod logging;
pub mod manifest;
pub mod platform;
pub mod release_version;

#[cfg(test)]
pub mod test_helpers;
