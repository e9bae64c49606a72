mod batch;
mod config;
mod error;
mod registry;
mod service;

pub use batch::{BatchRunner, BatchSummary, output_path};
pub use config::{
    DEFAULT_BRIDGE, DEFAULT_HOST, DEFAULT_OUTPUT_FORMAT, DEFAULT_PORT, DEFAULT_REGISTRY, RunConfig,
    ServiceAddress,
};
pub use error::Error;
pub use registry::{DocumentFamily, FormatDescriptor, FormatRegistry};
pub use service::{ConversionService, ConversionTask, OfficeService, Session};

/// Convert every file of `config.input_dir` through the office service at
/// `config.service`, using `bridge` to talk to it.
pub fn convert_directory(config: &RunConfig, bridge: &str) -> Result<BatchSummary, Error> {
    let mut service = OfficeService::new(config.service.clone(), bridge);
    BatchRunner::new(config).run(&mut service)
}
