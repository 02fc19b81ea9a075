pub mod check;
pub mod document;
pub mod library;
pub mod ride;
pub mod schedule;
pub mod template;
