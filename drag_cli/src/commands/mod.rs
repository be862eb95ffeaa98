pub mod equations;
pub mod init;
pub mod run;
