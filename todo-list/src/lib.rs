pub mod config;
pub mod entities;
pub mod storage;
pub mod todo;
pub mod web;
