pub mod emit;
pub mod generate;
pub mod link;
pub mod scan;
