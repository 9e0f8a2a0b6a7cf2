pub mod page;
pub mod search;
