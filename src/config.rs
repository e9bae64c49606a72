use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_OUTPUT_FORMAT: &str = "pdfa";
pub const DEFAULT_REGISTRY: &str = "conf/document-formats.xml";
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Port an OpenOffice.org/LibreOffice listener uses unless told otherwise.
pub const DEFAULT_PORT: u16 = 8100;
pub const DEFAULT_BRIDGE: &str = "unoconv";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceAddress {
    pub host: String,
    pub port: u16,
}

impl ServiceAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// UNO connection string for a socket listener at this address.
    pub fn uno_url(&self) -> String {
        format!(
            "socket,host={},port={};urp;StarOffice.ComponentContext",
            self.host, self.port
        )
    }
}

impl Default for ServiceAddress {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl fmt::Display for ServiceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Everything one batch run needs, fixed before the run starts.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub service: ServiceAddress,
    pub output_format: String,
    pub registry_path: PathBuf,
    pub verbose: bool,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl RunConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            service: ServiceAddress::default(),
            output_format: DEFAULT_OUTPUT_FORMAT.to_string(),
            registry_path: PathBuf::from(DEFAULT_REGISTRY),
            verbose: false,
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn with_service(mut self, service: ServiceAddress) -> Self {
        self.service = service;
        self
    }

    pub fn with_output_format(mut self, format: impl Into<String>) -> Self {
        self.output_format = format.into();
        self
    }

    pub fn with_registry(mut self, path: impl Into<PathBuf>) -> Self {
        self.registry_path = path.into();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
