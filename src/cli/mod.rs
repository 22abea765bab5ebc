// FILE: src/cli/mod.rs

mod config;
mod handlers;

pub use config::{load as load_config, ConfigFile};

use crate::error::{CompilerError, Result};
use crate::types::Platform;
use crate::CompilerOptions;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::time::Instant;

const DEFAULT_OUTPUT_DIRECTORY: &str = "build/girc";

pub struct Cli {
    config: ConfigFile,
    start_time: Instant,
}

impl Default for Cli {
    fn default() -> Self {
        Self::new()
    }
}

impl Cli {
    pub fn new() -> Self {
        Self {
            config: ConfigFile::default(),
            start_time: Instant::now(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        self.start_time = Instant::now();
        let matches = Self::build_cli().get_matches();
        // Config loading logs, so the logger comes first
        self.setup_logging(matches.get_count("verbose"))?;

        if let Some(config_path) = matches.get_one::<String>("config") {
            self.config = config::load(config_path)?;
        }

        match matches.subcommand() {
            Some(("compile", sub_matches)) => handlers::handle_compile_command(self, sub_matches),
            Some(("check", sub_matches)) => handlers::handle_check_command(self, sub_matches),
            _ => {
                println!("No subcommand specified. Use --help for usage information.");
                Ok(())
            }
        }
    }

    fn input_args() -> Vec<Arg> {
        vec![
            Arg::new("linux").long("linux").value_name("DIR").help("Directory of Linux GIR files"),
            Arg::new("windows").long("windows").value_name("DIR").help("Directory of Windows GIR files"),
            Arg::new("macos").long("macos").value_name("DIR").help("Directory of macOS GIR files"),
            Arg::new("debug").short('d').long("debug").help("Enable debug mode with extra logging").action(ArgAction::SetTrue),
            Arg::new("package-prefix").long("package-prefix").value_name("PREFIX").help("Prefix of generated Java packages"),
            Arg::new("package").long("package").value_name("NS=PACKAGE").help("Java package of one namespace").action(ArgAction::Append),
            Arg::new("no-default-patches").long("no-default-patches").help("Do not apply the built-in patch list").action(ArgAction::SetTrue),
        ]
    }

    pub fn build_cli() -> Command {
        Command::new(crate::NAME)
            .version(crate::VERSION)
            .about(crate::DESCRIPTION)
            .author("girc Development Team")
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("Increase verbosity (can be used multiple times)")
                    .action(ArgAction::Count),
            )
            .subcommand(
                Command::new("compile")
                    .about("Compile GIR files into binding decision files")
                    .args(Self::input_args())
                    .arg(Arg::new("output").short('o').long("output").value_name("DIR").help("Output directory"))
                    .arg(Arg::new("pretty").long("pretty").help("Pretty-print JSON output").action(ArgAction::SetTrue))
                    .arg(Arg::new("stats").long("stats").help("Show detailed compilation statistics").action(ArgAction::SetTrue)),
            )
            .subcommand(
                Command::new("check")
                    .about("Run the compiler without writing output and report skipped declarations")
                    .args(Self::input_args()),
            )
    }

    fn setup_logging(&self, verbose_count: u8) -> Result<()> {
        let log_level = match verbose_count {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        let mut builder = env_logger::Builder::new();
        builder.filter_level(log_level).format_timestamp_secs();
        // RUST_LOG overrides -v
        if let Ok(filters) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filters);
        }
        builder.init();
        Ok(())
    }

    pub fn build_compiler_options(&self, matches: &ArgMatches) -> Result<CompilerOptions> {
        let mut options = CompilerOptions {
            debug_mode: matches.get_flag("debug"),
            ..Default::default()
        };

        if let Some(packages) = matches.get_many::<String>("package") {
            for package in packages {
                let (namespace, name) = package.split_once('=').ok_or_else(|| CompilerError::InvalidFormat {
                    message: format!("Invalid package mapping: {}. Use NS=PACKAGE format.", package),
                })?;
                options.packages.insert(namespace.to_string(), name.to_string());
            }
        }

        self.config.apply_to(&mut options);

        if let Some(prefix) = matches.get_one::<String>("package-prefix") {
            options.package_prefix = prefix.clone();
        }
        if matches.get_flag("no-default-patches") {
            options.default_patches = false;
        }
        if matches.try_get_one::<bool>("pretty").ok().flatten().copied().unwrap_or(false) {
            options.pretty_json = true;
        }

        Ok(options)
    }

    /// Input directories from the command line, or from the config file
    /// when none are given
    pub fn input_directories(&self, matches: &ArgMatches) -> Result<Vec<(Platform, PathBuf)>> {
        let mut dirs = Vec::new();
        for (arg, platform) in [
            ("linux", Platform::LINUX),
            ("windows", Platform::WINDOWS),
            ("macos", Platform::MACOS),
        ] {
            if let Some(dir) = matches.get_one::<String>(arg) {
                dirs.push((platform, PathBuf::from(dir)));
            }
        }

        if dirs.is_empty() {
            dirs = self
                .config
                .input_directories()?
                .into_iter()
                .map(|(platform, dir)| (platform, PathBuf::from(dir)))
                .collect();
        }

        if dirs.is_empty() {
            return Err(CompilerError::InvalidFormat {
                message: "No input directories. Use --linux, --windows or --macos.".to_string(),
            });
        }
        Ok(dirs)
    }

    pub fn output_directory(&self, matches: &ArgMatches) -> PathBuf {
        matches
            .get_one::<String>("output")
            .cloned()
            .or_else(|| self.config.output_directory.clone())
            .unwrap_or_else(|| DEFAULT_OUTPUT_DIRECTORY.to_string())
            .into()
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile_matches(args: &[&str]) -> ArgMatches {
        let mut argv = vec!["girc", "compile"];
        argv.extend_from_slice(args);
        let matches = Cli::build_cli().try_get_matches_from(argv).unwrap();
        matches.subcommand_matches("compile").unwrap().clone()
    }

    #[test]
    fn test_compiler_options_from_args() {
        let cli = Cli::new();
        let matches = compile_matches(&[
            "--linux",
            "gir/linux",
            "--package",
            "GLib=org.example.glib",
            "--package-prefix",
            "org.example",
            "--no-default-patches",
            "--pretty",
            "--debug",
        ]);
        let options = cli.build_compiler_options(&matches).unwrap();

        assert!(options.debug_mode);
        assert!(options.pretty_json);
        assert!(!options.default_patches);
        assert_eq!(options.package_prefix, "org.example");
        assert_eq!(options.packages["GLib"], "org.example.glib");

        let dirs = cli.input_directories(&matches).unwrap();
        assert_eq!(dirs, vec![(Platform::LINUX, PathBuf::from("gir/linux"))]);
        assert_eq!(cli.output_directory(&matches), PathBuf::from(DEFAULT_OUTPUT_DIRECTORY));
    }

    #[test]
    fn test_invalid_package_mapping() {
        let cli = Cli::new();
        let matches = compile_matches(&["--package", "GLib"]);
        assert!(cli.build_compiler_options(&matches).is_err());
    }

    #[test]
    fn test_inputs_are_required() {
        let cli = Cli::new();
        let matches = compile_matches(&["-o", "out"]);
        assert!(cli.input_directories(&matches).is_err());
        assert_eq!(cli.output_directory(&matches), PathBuf::from("out"));
    }

    #[test]
    fn test_check_has_no_output_flag() {
        let result = Cli::build_cli().try_get_matches_from(["girc", "check", "--linux", "x", "-o", "out"]);
        assert!(result.is_err());
    }
}
