pub mod init;
pub mod misc;
pub mod play;
