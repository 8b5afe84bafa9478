pub mod consts;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod report;
pub mod segment;
pub mod volume;
