pub mod consts;
pub mod error;
pub mod frame;
pub mod io;
pub mod filters;
pub mod detection;
pub mod profile;
pub mod series;
pub mod pipeline;
