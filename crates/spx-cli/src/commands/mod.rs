pub mod clear;
pub mod export;
pub mod init;
pub mod run;
pub mod web;
