pub mod check;
pub mod compose;
pub mod generate;
pub mod init;
