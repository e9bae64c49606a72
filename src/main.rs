use clap::Parser;
use convertdoc::{RunConfig, ServiceAddress};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "convertdoc",
    version,
    about = "Convert every document in a directory through a running OpenOffice.org service"
)]
struct Args {
    /// Document format registry
    #[arg(short, long, default_value = convertdoc::DEFAULT_REGISTRY)]
    registry: PathBuf,
    /// Output format (e.g. pdf)
    #[arg(short = 'f', long, default_value = convertdoc::DEFAULT_OUTPUT_FORMAT)]
    output_format: String,
    /// OpenOffice.org port
    #[arg(short, long, default_value_t = convertdoc::DEFAULT_PORT)]
    port: u16,
    /// OpenOffice.org host
    #[arg(short = 'H', long, default_value = convertdoc::DEFAULT_HOST)]
    host: String,
    /// Program that relays conversions to the office service
    #[arg(short, long, default_value = convertdoc::DEFAULT_BRIDGE)]
    bridge: String,
    /// Verbose
    #[arg(short, long)]
    verbose: bool,
    /// Directory holding the documents to convert
    input_dir: PathBuf,
    /// Directory the converted documents are written to
    output_dir: PathBuf,
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Exiting either way; a failed write of the usage text changes nothing.
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    let level = if args.verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();

    let config = RunConfig::new(args.input_dir, args.output_dir)
        .with_service(ServiceAddress::new(args.host, args.port))
        .with_output_format(args.output_format)
        .with_registry(args.registry)
        .with_verbose(args.verbose);

    if let Err(e) = convertdoc::convert_directory(&config, &args.bridge) {
        eprintln!("ERROR: {e}");
        std::process::exit(1);
    }
}
