pub mod filters;
pub mod init;
pub mod launches;
