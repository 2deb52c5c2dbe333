pub mod corona;
pub mod help;
pub mod nicknames;
pub mod seasons;
