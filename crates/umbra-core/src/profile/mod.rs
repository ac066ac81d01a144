pub mod channels;
pub mod polar;
pub mod sampling;

pub use channels::{ChannelConfig, ChannelProfiles};
pub use polar::{BoundaryPolicy, PolarConfig, PolarSampler};
pub use sampling::SamplingStrategy;
