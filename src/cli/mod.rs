pub mod analyse;
pub mod app;
pub mod env;
pub mod find;
pub mod runtime;
