pub mod init;
pub mod rank;
pub mod score;
pub mod validate;
pub mod weak;
