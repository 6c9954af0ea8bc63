pub mod categories;
pub mod dashboard;
pub mod fatal;
pub mod login;
pub mod profile;
pub mod transactions;
