pub mod project;
pub mod telegram;
pub mod tweet;
