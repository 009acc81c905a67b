/// Concrete popup types of the console.
pub mod alert;
pub mod confirm;
