pub mod common;

mod examples;
mod protocol;
