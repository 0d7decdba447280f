pub mod output;
pub mod renderer;
pub mod sink;
