pub mod config;
pub mod duck;
pub mod load;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod schema;
