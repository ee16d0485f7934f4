//! Pure pipeline stages: normalize, filter, build, aggregate

pub mod normalizer;
pub mod noise_filter;
pub mod builder;
pub mod aggregator;

pub use noise_filter::NoiseRule;
