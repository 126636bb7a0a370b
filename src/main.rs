use std::process::ExitCode;

use drac_kvm::cli::Cli;
use drac_kvm::vendor::VendorRegistry;
use drac_kvm::{commands, logging};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let registry = VendorRegistry::builtin();
    let args = Cli::parse_for(&registry);

    logging::init_subscriber(args.verbose, "launch");
    let log = logging::Logger::new("launch");

    match commands::launch::run(&args, &registry, &log) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            if let Some(path) = log.log_path() {
                log.info(&format!("log: {}", path.display()));
            }
            ExitCode::FAILURE
        }
    }
}
