//! Execution context for build runs
//!
//! The context carries everything handlers and the build runner need besides
//! the plan itself: where to run, how to run shell commands, and how much to print.

use std::env;
use std::path::{Path, PathBuf};

/// Execution context shared by the runner and every handler
pub struct Context {
    /// Directory task paths are resolved against
    pub working_dir: PathBuf,

    /// Script file the plan came from
    pub script_path: Option<PathBuf>,

    /// Interpreter for `run` commands (e.g., ["sh", "-c"])
    pub interpreter: Vec<String>,

    /// Verbosity level
    pub verbosity: Verbosity,

    /// Print the plan without invoking handlers
    pub dry_run: bool,
}

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    Normal = 2,
    Verbose = 3,
}

impl Context {
    /// Create a new context with default settings
    pub fn new() -> Self {
        Context {
            working_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            script_path: None,
            interpreter: vec!["sh".to_string(), "-c".to_string()],
            verbosity: Verbosity::Normal,
            dry_run: false,
        }
    }

    /// Create a context with a specific working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    /// Set the script file path
    pub fn with_script_path(mut self, path: PathBuf) -> Self {
        self.script_path = Some(path);
        self
    }

    /// Set the interpreter
    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Set verbosity level
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Resolve a task path against the working directory
    pub fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.working_dir.join(p)
        }
    }

    /// Whether regular progress output is shown
    pub fn is_normal(&self) -> bool {
        self.verbosity >= Verbosity::Normal
    }

    /// Print info message
    pub fn print_info(&self, message: &str) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("[INFO] {}", message);
        }
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        if self.verbosity >= Verbosity::Quiet {
            eprintln!("[ERROR] {}", message);
        }
    }

    /// Print debug message (only in verbose mode)
    pub fn print_debug(&self, message: &str) {
        if self.verbosity >= Verbosity::Verbose {
            eprintln!("[DEBUG] {}", message);
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
