pub mod due;
pub mod import;
pub mod init;
pub mod stats;
pub mod users;
