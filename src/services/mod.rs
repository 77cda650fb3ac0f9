pub mod accounts;
pub mod backend;
pub mod format;
pub mod listing;
