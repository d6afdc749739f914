//! Build runner
//!
//! Walks a plan in order and stops at the first failing step. Steps that
//! already ran are not undone.

use crate::runner::{Context, Plan, TaskOutput, Verbosity};
use crate::ui;

/// The step that stopped a build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedStep {
    /// 1-based step number
    pub step: usize,
    pub name: String,
    pub output: TaskOutput,
}

/// Outcome of a build run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub total: usize,
    /// Steps whose handler ran and succeeded
    pub completed: usize,
    pub failed: Option<FailedStep>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_none()
    }
}

/// Run every task of `plan`, or only print the steps when `ctx.dry_run` is set
pub fn run_build(plan: &Plan, ctx: &Context) -> BuildReport {
    let total = plan.len();
    let mut report = BuildReport {
        total,
        completed: 0,
        failed: None,
    };

    if ctx.is_normal() {
        for custom in &plan.custom {
            println!("{}", ui::custom_task(&custom.name));
        }
        println!("{}", ui::banner(&plan.title));
        println!("{}", ui::plan_summary(total));
    }

    for (index, task) in plan.tasks.iter().enumerate() {
        let step = index + 1;
        let name = task.label();

        if ctx.is_normal() {
            println!("{}", ui::step_start(step, total, name));
        }
        ctx.print_debug(&format!("{} {} (line {})", task.name, task.args, task.line));

        if ctx.dry_run {
            continue;
        }

        let output = task.invoke(ctx);
        if output.is_success() {
            if !output.stderr.is_empty() {
                ctx.print_debug(&output.stderr);
            }
            report.completed += 1;
            if ctx.is_normal() {
                println!("{}", ui::step_done(step, total, name));
            }
            continue;
        }

        if ctx.verbosity >= Verbosity::Quiet {
            println!("{}", ui::step_failed(step, total, name, output.status));
        }
        if !output.stderr.is_empty() {
            ctx.print_error(&output.stderr);
        }
        report.failed = Some(FailedStep {
            step,
            name: name.to_string(),
            output,
        });
        break;
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{Handler, Task};
    use crate::script::ValueMap;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording(log: &Rc<RefCell<Vec<String>>>, name: &str, status: i32) -> Task {
        let log = Rc::clone(log);
        let label = name.to_string();
        let handler: Handler = Rc::new(move |_: &ValueMap, _: &Context| {
            log.borrow_mut().push(label.clone());
            TaskOutput {
                status,
                ..TaskOutput::default()
            }
        });
        Task::new(name, "", ValueMap::new(), 1, handler)
    }

    fn quiet_ctx() -> Context {
        Context::new().with_verbosity(Verbosity::Silent)
    }

    #[test]
    fn test_runs_all_steps_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut plan = Plan::new();
        plan.tasks.push(recording(&log, "first", 0));
        plan.tasks.push(recording(&log, "second", 0));

        let report = run_build(&plan, &quiet_ctx());
        assert!(report.is_success());
        assert_eq!(report.completed, 2);
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_stops_at_first_failure() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut plan = Plan::new();
        plan.tasks.push(recording(&log, "first", 0));
        plan.tasks.push(recording(&log, "second", 2));
        plan.tasks.push(recording(&log, "third", 0));

        let report = run_build(&plan, &quiet_ctx());
        assert_eq!(*log.borrow(), vec!["first", "second"]);
        assert_eq!(report.completed, 1);
        assert_eq!(report.total, 3);

        let failed = report.failed.unwrap();
        assert_eq!(failed.step, 2);
        assert_eq!(failed.name, "second");
        assert_eq!(failed.output.status, 2);
    }

    #[test]
    fn test_dry_run_invokes_nothing() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut plan = Plan::new();
        plan.tasks.push(recording(&log, "first", 1));
        plan.tasks.push(recording(&log, "second", 0));

        let report = run_build(&plan, &quiet_ctx().with_dry_run(true));
        assert!(log.borrow().is_empty());
        assert!(report.is_success());
        assert_eq!(report.completed, 0);
        assert_eq!(report.total, 2);
    }

    #[test]
    fn test_empty_plan() {
        let report = run_build(&Plan::new(), &quiet_ctx());
        assert!(report.is_success());
        assert_eq!(report.total, 0);
    }
}
