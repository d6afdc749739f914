//! Main CLI application

use crate::error::{ExecutionError, ShipError};
use crate::runner::{run_build, BuildReport, Context, Registry, Verbosity};
use crate::script::{load_script, DEFAULT_SCRIPT};
use crate::ui;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use std::env;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

/// CLI application
pub struct App {
    /// The clap command
    command: Command,
    /// Task vocabulary available to scripts
    registry: Registry,
}

impl App {
    /// Create an app with the built-in tasks
    pub fn new() -> Self {
        Self::with_registry(Registry::with_builtins())
    }

    /// Create an app with a custom task registry
    pub fn with_registry(registry: Registry) -> Self {
        App {
            command: build_command(),
            registry,
        }
    }

    /// Run the application with the process arguments
    pub fn run(self) -> Result<(), ShipError> {
        let matches = self.command.clone().get_matches();
        self.run_matches(&matches)
    }

    /// Run the application with explicit arguments
    pub fn run_from<I, T>(self, args: I) -> Result<(), ShipError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command.clone().get_matches_from(args);
        self.run_matches(&matches)
    }

    fn run_matches(mut self, matches: &ArgMatches) -> Result<(), ShipError> {
        if matches.get_flag("no-color") {
            ui::set_color(false);
        }

        if let Some(shell) = matches.get_one::<Shell>("completions").copied() {
            clap_complete::generate(shell, &mut self.command, "ship", &mut io::stdout());
            return Ok(());
        }

        if matches.get_flag("list-tasks") {
            for entry in self.registry.entries() {
                println!("{:<10} {}", entry.keyword, entry.display_name);
            }
            return Ok(());
        }

        let script = matches
            .get_one::<String>("script")
            .map(String::as_str)
            .unwrap_or(DEFAULT_SCRIPT);
        let (plan, script_path) = load_script(Path::new(script), &self.registry)?;

        let mut ctx = Context::new()
            .with_working_dir(working_dir(matches, &script_path))
            .with_script_path(script_path)
            .with_verbosity(get_verbosity(matches))
            .with_dry_run(matches.get_flag("dry-run"));

        if let Some(shell) = matches.get_one::<String>("shell") {
            ctx = ctx.with_interpreter(vec![shell.clone(), "-c".to_string()]);
        }

        ctx.print_info(&format!(
            "Loaded {} ({} steps)",
            ctx.script_path
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            plan.len()
        ));

        let report = run_build(&plan, &ctx);
        report_to_result(report)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the clap command
pub fn build_command() -> Command {
    Command::new("ship")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Run a Ship build script")
        .arg(
            Arg::new("script")
                .value_name("SCRIPT")
                .help("Script to run (falls back to SCRIPT.ship)")
                .default_value(DEFAULT_SCRIPT),
        )
        .arg(
            Arg::new("dry-run")
                .short('n')
                .long("dry-run")
                .help("Print the plan without running any task")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("directory")
                .short('C')
                .long("directory")
                .value_name("DIR")
                .help("Run tasks in DIR instead of the script's directory"),
        )
        .arg(
            Arg::new("shell")
                .long("shell")
                .value_name("PROGRAM")
                .help("Shell used by `run` tasks (invoked as PROGRAM -c)"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print task output and errors")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Disable colored output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-tasks")
                .long("list-tasks")
                .help("List the available task keywords and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("completions")
                .long("completions")
                .value_name("SHELL")
                .help("Print shell completions and exit")
                .value_parser(value_parser!(Shell)),
        )
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// `-C DIR` if given, else the script's directory, else the current directory
fn working_dir(matches: &ArgMatches, script_path: &Path) -> PathBuf {
    if let Some(dir) = matches.get_one::<String>("directory") {
        return PathBuf::from(dir);
    }
    script_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Turn a failed build into an error so the process exits non-zero
fn report_to_result(report: BuildReport) -> Result<(), ShipError> {
    match report.failed {
        Some(failed) => Err(ExecutionError::TaskFailed {
            step: failed.step,
            name: failed.name,
            code: failed.output.status,
        }
        .into()),
        None => Ok(()),
    }
}

/// Run the CLI application with the process arguments
pub fn run() -> Result<(), ShipError> {
    App::new().run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{FailedStep, TaskOutput};

    fn matches(args: &[&str]) -> ArgMatches {
        build_command().try_get_matches_from(args).unwrap()
    }

    #[test]
    fn test_get_verbosity_normal() {
        assert_eq!(get_verbosity(&matches(&["ship"])), Verbosity::Normal);
    }

    #[test]
    fn test_get_verbosity_flags() {
        assert_eq!(get_verbosity(&matches(&["ship", "-q"])), Verbosity::Quiet);
        assert_eq!(get_verbosity(&matches(&["ship", "-v"])), Verbosity::Verbose);
        assert_eq!(
            get_verbosity(&matches(&["ship", "-s", "-v"])),
            Verbosity::Silent
        );
    }

    #[test]
    fn test_default_script() {
        let m = matches(&["ship"]);
        assert_eq!(m.get_one::<String>("script").unwrap(), "Shipfile");
        assert!(!m.get_flag("dry-run"));
    }

    #[test]
    fn test_script_and_dry_run() {
        let m = matches(&["ship", "release.ship", "--dry-run"]);
        assert_eq!(m.get_one::<String>("script").unwrap(), "release.ship");
        assert!(m.get_flag("dry-run"));
    }

    #[test]
    fn test_completions_parser() {
        let m = matches(&["ship", "--completions", "bash"]);
        assert_eq!(m.get_one::<Shell>("completions").copied(), Some(Shell::Bash));
        assert!(build_command()
            .try_get_matches_from(["ship", "--completions", "tcsh"])
            .is_err());
    }

    #[test]
    fn test_working_dir_defaults_to_script_dir() {
        let m = matches(&["ship"]);
        assert_eq!(
            working_dir(&m, Path::new("/work/app/Shipfile")),
            PathBuf::from("/work/app")
        );

        let m = matches(&["ship", "-C", "/elsewhere"]);
        assert_eq!(
            working_dir(&m, Path::new("/work/app/Shipfile")),
            PathBuf::from("/elsewhere")
        );
    }

    #[test]
    fn test_working_dir_for_bare_script_name() {
        let m = matches(&["ship"]);
        assert_eq!(
            working_dir(&m, Path::new("Shipfile")),
            env::current_dir().unwrap()
        );
    }

    #[test]
    fn test_report_to_result() {
        let ok = BuildReport {
            total: 1,
            completed: 1,
            failed: None,
        };
        assert!(report_to_result(ok).is_ok());

        let failed = BuildReport {
            total: 2,
            completed: 0,
            failed: Some(FailedStep {
                step: 1,
                name: "Run Command".to_string(),
                output: TaskOutput::failure(2, ""),
            }),
        };
        let err = report_to_result(failed).unwrap_err();
        assert!(matches!(
            err,
            ShipError::Execution(ExecutionError::TaskFailed { step: 1, code: 2, .. })
        ));
    }
}
