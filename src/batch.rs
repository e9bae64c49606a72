use std::fs;
use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::error::Error;
use crate::registry::{FormatDescriptor, FormatRegistry};
use crate::service::{ConversionService, ConversionTask, Session};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub converted: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Converts every eligible file of one input directory.
pub struct BatchRunner<'a> {
    config: &'a RunConfig,
}

impl<'a> BatchRunner<'a> {
    pub fn new(config: &'a RunConfig) -> Self {
        Self { config }
    }

    pub fn run<S: ConversionService + ?Sized>(&self, service: &mut S) -> Result<BatchSummary, Error> {
        let config = self.config;
        self.note(format_args!(
            "-- document format registry is {}",
            config.registry_path.display()
        ));
        let registry = FormatRegistry::load(&config.registry_path)?;
        let format = registry.descriptor(&config.output_format)?;

        prepare_directories(&config.input_dir, &config.output_dir)?;

        self.note(format_args!("-- connecting to OpenOffice.org on {}", config.service));
        let mut session = Session::open(service)?;
        let summary = self.convert_all(&mut session, &registry, format);
        self.note(format_args!("-- disconnecting"));
        drop(session);

        let summary = summary?;
        self.note(format_args!(
            "-- {} converted, {} failed, {} skipped",
            summary.converted, summary.failed, summary.skipped
        ));
        Ok(summary)
    }

    fn convert_all<S: ConversionService + ?Sized>(
        &self,
        session: &mut Session<'_, S>,
        registry: &FormatRegistry,
        format: &FormatDescriptor,
    ) -> Result<BatchSummary, Error> {
        let mut summary = BatchSummary::default();
        let entries = fs::read_dir(&self.config.input_dir)?;

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::error!("cannot read entry of {}: {e}", self.config.input_dir.display());
                    summary.failed += 1;
                    continue;
                }
            };
            let path = entry.path();
            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            // Follows symlinks, so a link to a directory is skipped as well.
            if hidden || path.is_dir() {
                self.note(format_args!("-- skipping directory or dot file {}", path.display()));
                summary.skipped += 1;
                continue;
            }

            let task = ConversionTask {
                output: output_path(&self.config.output_dir, &path, &self.config.output_format),
                family: registry.family_of(&path),
                input: path,
            };
            self.note(format_args!(
                "-- converting {} to {}",
                task.input.display(),
                task.output.display()
            ));
            match session.convert(&task, format) {
                Ok(()) => summary.converted += 1,
                Err(e) => {
                    log::error!("{e}");
                    summary.failed += 1;
                }
            }
        }
        Ok(summary)
    }

    fn note(&self, message: std::fmt::Arguments) {
        if self.config.verbose {
            log::info!("{message}");
        } else {
            log::debug!("{message}");
        }
    }
}

fn prepare_directories(input_dir: &Path, output_dir: &Path) -> Result<(), Error> {
    if !input_dir.is_dir() {
        return Err(Error::Config(format!(
            "input directory {} doesn't exist.",
            input_dir.display()
        )));
    }
    if !output_dir.is_dir() {
        fs::create_dir_all(output_dir).map_err(|e| {
            Error::Config(format!(
                "can't create output directory {}: {e}",
                output_dir.display()
            ))
        })?;
    }
    Ok(())
}

/// `<output_dir>/<input stem>.<format>`; the stem drops only the last extension.
pub fn output_path(output_dir: &Path, input: &Path, format: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_else(|| input.as_os_str());
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(format);
    output_dir.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_replaces_last_extension() {
        let out = Path::new("/out");
        assert_eq!(
            output_path(out, Path::new("/in/report.docx"), "pdf"),
            PathBuf::from("/out/report.pdf")
        );
        assert_eq!(
            output_path(out, Path::new("/in/archive.tar.gz"), "pdfa"),
            PathBuf::from("/out/archive.tar.pdfa")
        );
        assert_eq!(
            output_path(out, Path::new("/in/README"), "pdf"),
            PathBuf::from("/out/README.pdf")
        );
    }

    #[test]
    fn missing_input_directory_is_fatal() {
        let err = prepare_directories(Path::new("/nonexistent/input"), Path::new("/tmp")).unwrap_err();
        assert!(err.to_string().contains("input directory /nonexistent/input doesn't exist."));
    }
}
