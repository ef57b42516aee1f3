pub mod cli;
pub mod composer;
