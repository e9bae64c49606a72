use std::ffi::OsString;
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use crate::config::ServiceAddress;
use crate::error::Error;
use crate::registry::{DocumentFamily, FormatDescriptor};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// One input file and where its converted form goes.
#[derive(Clone, Debug, PartialEq)]
pub struct ConversionTask {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Input family, if the registry recognises the input's extension.
    pub family: Option<DocumentFamily>,
}

pub trait ConversionService {
    fn connect(&mut self) -> Result<(), Error>;
    /// Create or overwrite `task.output` with `task.input` rendered as `format`.
    fn convert(&mut self, task: &ConversionTask, format: &FormatDescriptor) -> Result<(), Error>;
    fn disconnect(&mut self);
}

/// A connected service. Dropping the session disconnects it.
pub struct Session<'a, S: ConversionService + ?Sized> {
    service: &'a mut S,
}

impl<'a, S: ConversionService + ?Sized> Session<'a, S> {
    pub fn open(service: &'a mut S) -> Result<Self, Error> {
        service.connect()?;
        Ok(Session { service })
    }

    pub fn convert(&mut self, task: &ConversionTask, format: &FormatDescriptor) -> Result<(), Error> {
        self.service.convert(task, format)
    }
}

impl<S: ConversionService + ?Sized> Drop for Session<'_, S> {
    fn drop(&mut self) {
        self.service.disconnect();
    }
}

/// Talks to an OpenOffice.org/LibreOffice instance listening on a socket.
///
/// The session itself is a plain TCP connection that proves the listener is
/// up. Documents are pushed through an external bridge program (`unoconv` by
/// default) pointed at the same listener, so the UNO protocol never has to
/// be spoken from here.
pub struct OfficeService {
    address: ServiceAddress,
    bridge: PathBuf,
    connect_timeout: Duration,
    connection: Option<TcpStream>,
}

impl OfficeService {
    pub fn new(address: ServiceAddress, bridge: impl Into<PathBuf>) -> Self {
        Self {
            address,
            bridge: bridge.into(),
            connect_timeout: CONNECT_TIMEOUT,
            connection: None,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    fn unavailable(&self, source: std::io::Error) -> Error {
        Error::ServiceUnavailable {
            host: self.address.host.clone(),
            port: self.address.port,
            source,
        }
    }
}

impl ConversionService for OfficeService {
    fn connect(&mut self) -> Result<(), Error> {
        let addrs = (self.address.host.as_str(), self.address.port)
            .to_socket_addrs()
            .map_err(|e| self.unavailable(e))?;

        let mut last_err = std::io::Error::new(
            std::io::ErrorKind::AddrNotAvailable,
            format!("{} did not resolve to any address", self.address.host),
        );
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.connect_timeout) {
                Ok(stream) => {
                    log::debug!("connected to {addr}");
                    self.connection = Some(stream);
                    return Ok(());
                }
                Err(e) => last_err = e,
            }
        }
        Err(self.unavailable(last_err))
    }

    fn convert(&mut self, task: &ConversionTask, format: &FormatDescriptor) -> Result<(), Error> {
        if self.connection.is_none() {
            return Err(Error::conversion(&task.input, "not connected to the office service"));
        }
        let Some(family) = task.family else {
            return Err(Error::conversion(&task.input, "unknown input document format"));
        };
        let Some(filter) = format.filter_name(family) else {
            return Err(Error::conversion(
                &task.input,
                format!("{family} documents cannot be exported as {}", format.identifier),
            ));
        };
        log::debug!("exporting {} with filter {filter}", task.input.display());

        let output = Command::new(&self.bridge)
            .args(bridge_args(&self.address, task, family, filter, format))
            .output()
            .map_err(|e| {
                Error::conversion(
                    &task.input,
                    format!("cannot run bridge {}: {e}", self.bridge.display()),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.trim();
            let reason = if detail.is_empty() {
                format!("bridge exited with {}", output.status)
            } else {
                format!("bridge exited with {}: {detail}", output.status)
            };
            return Err(Error::conversion(&task.input, reason));
        }
        if !task.output.is_file() {
            return Err(Error::conversion(
                &task.input,
                format!("bridge produced no {}", task.output.display()),
            ));
        }
        Ok(())
    }

    fn disconnect(&mut self) {
        if let Some(stream) = self.connection.take() {
            if let Err(e) = stream.shutdown(Shutdown::Both) {
                log::debug!("closing connection to {}: {e}", self.address);
            }
        }
    }
}

fn bridge_args(
    address: &ServiceAddress,
    task: &ConversionTask,
    family: DocumentFamily,
    filter: &str,
    format: &FormatDescriptor,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--no-launch".into(),
        "--connection".into(),
        address.uno_url().into(),
        "--doctype".into(),
        family.doctype().into(),
        "--format".into(),
        format.bridge_format().into(),
        "--export".into(),
        format!("FilterName={filter}").into(),
    ];
    for (name, value) in &format.export_options {
        args.push("--export".into());
        args.push(format!("{name}={value}").into());
    }
    args.push("--output".into());
    args.push(task.output.as_os_str().to_owned());
    args.push(task.input.as_os_str().to_owned());
    args
}
