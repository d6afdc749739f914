//! Build plan types
//!
//! A plan is the flat, fully resolved list of tasks produced by the parser.
//! Conditionals are already evaluated by the time a plan exists.

use crate::runner::{Context, Handler};
use crate::script::ValueMap;
use std::fmt;

/// Default build title when a script has no `title` directive
pub const DEFAULT_TITLE: &str = "Ship Build";

/// Result of a single handler invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskOutput {
    pub stdout: String,
    pub stderr: String,
    /// 0 on success, anything else is a failure
    pub status: i32,
}

impl TaskOutput {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn with_stdout(stdout: impl Into<String>) -> Self {
        TaskOutput {
            stdout: stdout.into(),
            ..Self::default()
        }
    }

    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        TaskOutput {
            stdout: String::new(),
            stderr: stderr.into(),
            status,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 0
    }
}

/// One resolved step of a build
#[derive(Clone)]
pub struct Task {
    /// Keyword the task was called with (e.g. `run`)
    pub name: String,

    /// Human readable name captured from the registry
    pub display_name: String,

    /// Resolved arguments
    pub args: ValueMap,

    /// Source line of the task call
    pub line: usize,

    handler: Handler,
}

impl Task {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        args: ValueMap,
        line: usize,
        handler: Handler,
    ) -> Self {
        Task {
            name: name.into(),
            display_name: display_name.into(),
            args,
            line,
            handler,
        }
    }

    /// Name shown in progress lines
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }

    /// Invoke the bound handler
    pub fn invoke(&self, ctx: &Context) -> TaskOutput {
        (self.handler)(&self.args, ctx)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("display_name", &self.display_name)
            .field("args", &self.args)
            .field("line", &self.line)
            .finish_non_exhaustive()
    }
}

/// A `$name { ... }` declaration.
///
/// Custom tasks are recognized but have no handler binding yet; their bodies
/// are skipped and they never enter the task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomTask {
    pub name: String,
    pub line: usize,
}

/// Ordered, resolved build plan
#[derive(Debug, Clone)]
pub struct Plan {
    pub title: String,
    pub tasks: Vec<Task>,
    pub custom: Vec<CustomTask>,
}

impl Plan {
    pub fn new() -> Self {
        Plan {
            title: DEFAULT_TITLE.to_string(),
            tasks: Vec::new(),
            custom: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Keywords of the planned tasks, in order
    pub fn task_names(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.name.as_str()).collect()
    }
}

impl Default for Plan {
    fn default() -> Self {
        Self::new()
    }
}
