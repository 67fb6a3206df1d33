pub mod credentials;
pub mod file_writer;
pub mod keyring_service;
