pub mod ir;
pub mod error;
pub mod preprocess;
pub mod extract;
pub mod inference;
pub mod lower;
pub mod codegen;
pub mod config;
pub mod path_de;
pub mod pipeline;
pub mod cli;

use colored::Colorize;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let command_line_interface = cli::CommandLineInterface::load();
    init_logging(command_line_interface.verbose);
    if let Err(error) = command_line_interface.run() {
        eprintln!("{} {error:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
