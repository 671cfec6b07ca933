pub mod affiliate;
pub mod extract;
pub mod grocery;
