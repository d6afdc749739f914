//! Built-in task handlers
//!
//! Every handler reports failure through `TaskOutput::status`; none of them
//! panic or return errors. Paths are resolved against the context's working
//! directory. Missing path arguments are a successful no-op, except for `run`.

use crate::runner::{Context, TaskOutput, Verbosity};
use crate::script::ValueMap;
use crate::ui;
use glob::{glob_with, MatchOptions, Pattern};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, Stdio};
use walkdir::WalkDir;

fn io_failure(action: &str, path: &Path, err: io::Error) -> TaskOutput {
    TaskOutput::failure(1, format!("{} '{}': {}", action, path.display(), err))
}

/// `dst` itself, or `dst/<name of src>` when `dst` is an existing directory
fn target_for(src: &Path, dst: &Path) -> PathBuf {
    match src.file_name() {
        Some(name) if dst.is_dir() => dst.join(name),
        _ => dst.to_path_buf(),
    }
}

fn src_dst(args: &ValueMap, ctx: &Context) -> Option<(PathBuf, PathBuf)> {
    let src = args.get_str("src")?;
    let dst = args.get_str("dst")?;
    Some((ctx.resolve(&src), ctx.resolve(&dst)))
}

/// `run { command: "..." }`
pub fn run(args: &ValueMap, ctx: &Context) -> TaskOutput {
    let command_line = match args.get_str("command") {
        Some(c) => c,
        None => return TaskOutput::failure(-1, "missing 'command' argument"),
    };
    let (program, interpreter_args) = match ctx.interpreter.split_first() {
        Some(split) => split,
        None => return TaskOutput::failure(-1, "no interpreter configured"),
    };

    ctx.print_debug(&format!("$ {}", command_line));

    let mut command = StdCommand::new(program);
    command.args(interpreter_args);
    command.arg(&command_line);
    command.current_dir(&ctx.working_dir);
    command.stdin(Stdio::inherit());
    command.stdout(Stdio::inherit());
    command.stderr(Stdio::inherit());

    match command.status() {
        Ok(status) => match status.code() {
            Some(0) => TaskOutput::success(),
            Some(code) => TaskOutput::failure(code, format!("command exited with {}", code)),
            // Killed by a signal
            None => TaskOutput::failure(-1, "command terminated by signal"),
        },
        Err(e) => TaskOutput::failure(-1, format!("failed to spawn '{}': {}", program, e)),
    }
}

/// `delete { path: ... }`: recursive, a missing path is not an error
pub fn delete(args: &ValueMap, ctx: &Context) -> TaskOutput {
    let Some(path) = args.get_str("path") else {
        return TaskOutput::success();
    };
    let path = ctx.resolve(&path);
    let meta = match fs::symlink_metadata(&path) {
        Ok(meta) => meta,
        Err(_) => return TaskOutput::success(),
    };
    let result = if meta.is_dir() {
        fs::remove_dir_all(&path)
    } else {
        fs::remove_file(&path)
    };
    match result {
        Ok(()) => TaskOutput::success(),
        Err(e) => io_failure("failed to delete", &path, e),
    }
}

/// `mkdir { path: ... }`: parents included
pub fn mkdir(args: &ValueMap, ctx: &Context) -> TaskOutput {
    let Some(path) = args.get_str("path") else {
        return TaskOutput::success();
    };
    let path = ctx.resolve(&path);
    match fs::create_dir_all(&path) {
        Ok(()) => TaskOutput::success(),
        Err(e) => io_failure("failed to create", &path, e),
    }
}

/// Canonical form of a path that may not exist yet: the deepest existing
/// ancestor is canonicalized and the missing tail appended
fn canonical_target(path: &Path) -> Option<PathBuf> {
    path.ancestors().find_map(|ancestor| {
        let base = ancestor.canonicalize().ok()?;
        let rest = path.strip_prefix(ancestor).ok()?;
        Some(base.join(rest))
    })
}

/// Whether `target` is `src` itself or lies somewhere below it
fn is_inside(src: &Path, target: &Path) -> bool {
    match (src.canonicalize(), canonical_target(target)) {
        (Ok(src), Some(target)) => target.starts_with(src),
        _ => false,
    }
}

fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(io::Error::other)?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(io::Error::other)?;
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// `copy { src: ..., dst: ... }`: files or whole directories
pub fn copy(args: &ValueMap, ctx: &Context) -> TaskOutput {
    let Some((src, dst)) = src_dst(args, ctx) else {
        return TaskOutput::success();
    };
    let target = target_for(&src, &dst);
    if src.is_dir() && is_inside(&src, &target) {
        return TaskOutput::failure(1, "cannot copy a directory into itself");
    }
    let result = if src.is_dir() {
        copy_tree(&src, &target)
    } else {
        fs::copy(&src, &target).map(|_| ())
    };
    match result {
        Ok(()) => TaskOutput::success(),
        Err(e) => io_failure("failed to copy", &src, e),
    }
}

/// `move { src: ..., dst: ... }`
pub fn move_path(args: &ValueMap, ctx: &Context) -> TaskOutput {
    let Some((src, dst)) = src_dst(args, ctx) else {
        return TaskOutput::success();
    };
    let target = target_for(&src, &dst);
    match fs::rename(&src, &target) {
        Ok(()) => TaskOutput::success(),
        Err(e) => io_failure("failed to move", &src, e),
    }
}

/// `move_all { src: ..., dst: ... }`: moves the visible entries of `src` into `dst`
pub fn move_all(args: &ValueMap, ctx: &Context) -> TaskOutput {
    let Some((src, dst)) = src_dst(args, ctx) else {
        return TaskOutput::success();
    };
    let pattern = format!("{}/*", Pattern::escape(&src.to_string_lossy()));
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let entries = match glob_with(&pattern, options) {
        Ok(paths) => paths.filter_map(Result::ok).collect::<Vec<_>>(),
        Err(e) => return TaskOutput::failure(1, format!("invalid source '{}': {}", src.display(), e)),
    };
    if entries.is_empty() {
        return TaskOutput::failure(1, format!("nothing to move in '{}'", src.display()));
    }
    for entry in entries {
        let Some(name) = entry.file_name() else {
            continue;
        };
        if let Err(e) = fs::rename(&entry, dst.join(name)) {
            return io_failure("failed to move", &entry, e);
        }
    }
    TaskOutput::success()
}

/// `zip { ... }`: placeholder, always succeeds
pub fn zip(_args: &ValueMap, ctx: &Context) -> TaskOutput {
    ctx.print_debug("zip is not implemented yet, skipping");
    TaskOutput::success()
}

/// `list { path: ... }`: visible entries, sorted
pub fn list(args: &ValueMap, ctx: &Context) -> TaskOutput {
    let Some(path) = args.get_str("path") else {
        return TaskOutput::success();
    };
    let path = ctx.resolve(&path);
    let read = match fs::read_dir(&path) {
        Ok(read) => read,
        Err(e) => return io_failure("cannot list", &path, e),
    };
    let mut names: Vec<String> = read
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('.'))
        .collect();
    names.sort();

    if ctx.verbosity >= Verbosity::Quiet {
        for name in &names {
            println!("{}", name);
        }
    }
    TaskOutput::with_stdout(names.join("\n"))
}

/// `echo { message: ... }`
pub fn echo(args: &ValueMap, ctx: &Context) -> TaskOutput {
    let message = args.get_str("message");
    if let Some(msg) = &message {
        if ctx.verbosity >= Verbosity::Quiet {
            println!("{}", ui::echo_line(msg));
        }
    }
    TaskOutput::with_stdout(message.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Value;
    use tempfile::TempDir;

    fn args(pairs: &[(&str, &str)]) -> ValueMap {
        pairs
            .iter()
            .map(|(k, v)| (*k, Value::String(v.to_string())))
            .collect()
    }

    fn ctx_in(dir: &TempDir) -> Context {
        Context::new()
            .with_working_dir(dir.path().to_path_buf())
            .with_verbosity(Verbosity::Silent)
    }

    #[test]
    fn test_run_success_and_failure() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_in(&temp);

        assert!(run(&args(&[("command", "true")]), &ctx).is_success());
        let failed = run(&args(&[("command", "exit 3")]), &ctx);
        assert_eq!(failed.status, 3);
    }

    #[test]
    fn test_run_uses_working_dir() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_in(&temp);

        let output = run(&args(&[("command", "touch marker.txt")]), &ctx);
        assert!(output.is_success());
        assert!(temp.path().join("marker.txt").exists());
    }

    #[test]
    fn test_run_without_command_fails() {
        let output = run(&ValueMap::new(), &Context::new());
        assert_eq!(output.status, -1);
    }

    #[test]
    fn test_mkdir_and_delete() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_in(&temp);

        assert!(mkdir(&args(&[("path", "a/b/c")]), &ctx).is_success());
        assert!(temp.path().join("a/b/c").is_dir());

        assert!(delete(&args(&[("path", "a")]), &ctx).is_success());
        assert!(!temp.path().join("a").exists());

        // Already gone
        assert!(delete(&args(&[("path", "a")]), &ctx).is_success());
    }

    #[test]
    fn test_copy_file_and_directory() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_in(&temp);
        fs::create_dir_all(temp.path().join("src/nested")).unwrap();
        fs::write(temp.path().join("src/nested/file.txt"), "data").unwrap();
        fs::write(temp.path().join("single.txt"), "one").unwrap();

        assert!(copy(&args(&[("src", "src"), ("dst", "out")]), &ctx).is_success());
        assert_eq!(
            fs::read_to_string(temp.path().join("out/nested/file.txt")).unwrap(),
            "data"
        );

        assert!(copy(&args(&[("src", "single.txt"), ("dst", "out")]), &ctx).is_success());
        assert!(temp.path().join("out/single.txt").exists());
    }

    #[test]
    fn test_copy_directory_into_itself_fails() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_in(&temp);
        fs::create_dir_all(temp.path().join("src/nested")).unwrap();
        fs::write(temp.path().join("src/file.txt"), "data").unwrap();

        for dst in ["src/out", "src", "src/nested/deeper/out", "./src/../src/out"] {
            let output = copy(&args(&[("src", "src"), ("dst", dst)]), &ctx);
            assert_eq!(output.status, 1, "dst = {}", dst);
            assert_eq!(output.stderr, "cannot copy a directory into itself");
        }
        assert!(!temp.path().join("src/out").exists());
        assert!(!temp.path().join("src/src").exists());
        assert!(!temp.path().join("src/nested/deeper").exists());

        // A sibling whose name shares the prefix is fine
        assert!(copy(&args(&[("src", "src"), ("dst", "src2")]), &ctx).is_success());
        assert!(temp.path().join("src2/file.txt").exists());
    }

    #[test]
    fn test_copy_missing_source_fails() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_in(&temp);
        let output = copy(&args(&[("src", "nope.txt"), ("dst", "x.txt")]), &ctx);
        assert!(!output.is_success());
        assert!(output.stderr.contains("failed to copy"));
    }

    #[test]
    fn test_move_into_directory() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_in(&temp);
        fs::write(temp.path().join("a.txt"), "a").unwrap();
        fs::create_dir(temp.path().join("dest")).unwrap();

        assert!(move_path(&args(&[("src", "a.txt"), ("dst", "dest")]), &ctx).is_success());
        assert!(temp.path().join("dest/a.txt").exists());
        assert!(!temp.path().join("a.txt").exists());
    }

    #[test]
    fn test_move_all_skips_hidden_entries() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_in(&temp);
        fs::create_dir_all(temp.path().join("build/sub")).unwrap();
        fs::write(temp.path().join("build/app.bin"), "bin").unwrap();
        fs::write(temp.path().join("build/.hidden"), "h").unwrap();
        fs::create_dir(temp.path().join("dist")).unwrap();

        let output = move_all(&args(&[("src", "build"), ("dst", "dist")]), &ctx);
        assert!(output.is_success());
        assert!(temp.path().join("dist/app.bin").exists());
        assert!(temp.path().join("dist/sub").is_dir());
        assert!(temp.path().join("build/.hidden").exists());
    }

    #[test]
    fn test_move_all_empty_source_fails() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_in(&temp);
        fs::create_dir(temp.path().join("empty")).unwrap();
        fs::create_dir(temp.path().join("dist")).unwrap();

        let output = move_all(&args(&[("src", "empty"), ("dst", "dist")]), &ctx);
        assert!(!output.is_success());
    }

    #[test]
    fn test_list_sorted_visible_entries() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_in(&temp);
        fs::write(temp.path().join("b.txt"), "").unwrap();
        fs::write(temp.path().join("a.txt"), "").unwrap();
        fs::write(temp.path().join(".git"), "").unwrap();

        let output = list(&args(&[("path", ".")]), &ctx);
        assert!(output.is_success());
        assert_eq!(output.stdout, "a.txt\nb.txt");
    }

    #[test]
    fn test_list_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_in(&temp);
        assert!(!list(&args(&[("path", "missing")]), &ctx).is_success());
    }

    #[test]
    fn test_echo_and_zip() {
        let ctx = Context::new().with_verbosity(Verbosity::Silent);
        let output = echo(&args(&[("message", "hello")]), &ctx);
        assert!(output.is_success());
        assert_eq!(output.stdout, "hello");

        assert!(zip(&ValueMap::new(), &ctx).is_success());
    }

    #[test]
    fn test_missing_path_arguments_are_noops() {
        let ctx = Context::new().with_verbosity(Verbosity::Silent);
        assert!(delete(&ValueMap::new(), &ctx).is_success());
        assert!(mkdir(&ValueMap::new(), &ctx).is_success());
        assert!(copy(&args(&[("src", "only")]), &ctx).is_success());
        assert!(list(&ValueMap::new(), &ctx).is_success());
    }
}
