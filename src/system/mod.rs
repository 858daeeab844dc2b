pub mod collector;
pub mod provider;
pub mod rates;
pub mod sampler;
pub mod snapshot;
