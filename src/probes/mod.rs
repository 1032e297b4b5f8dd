pub mod monthly;
pub mod prepost;
