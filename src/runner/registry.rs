//! Task registry
//!
//! Maps task keywords to handlers. Built once before parsing and passed to the
//! parser by reference; never mutated afterwards.

use crate::runner::{handlers, Context, TaskOutput};
use crate::script::ValueMap;
use std::rc::Rc;

/// A task handler: arguments in, output and status back
pub type Handler = Rc<dyn Fn(&ValueMap, &Context) -> TaskOutput>;

/// One registered task keyword
#[derive(Clone)]
pub struct RegistryEntry {
    pub keyword: String,
    pub display_name: String,
    pub handler: Handler,
}

/// Known task vocabulary
#[derive(Clone, Default)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in tasks
    pub fn with_builtins() -> Self {
        let mut registry = Registry::new();
        registry.register_fn("run", "Run Command", handlers::run);
        registry.register_fn("delete", "Delete", handlers::delete);
        registry.register_fn("mkdir", "Create Directory", handlers::mkdir);
        registry.register_fn("copy", "Copy", handlers::copy);
        registry.register_fn("move", "Move", handlers::move_path);
        registry.register_fn("move_all", "Move Contents", handlers::move_all);
        registry.register_fn("zip", "Create ZIP", handlers::zip);
        registry.register_fn("list", "List Directory", handlers::list);
        registry.register_fn("echo", "Echo", handlers::echo);
        registry
    }

    /// Append an entry. Duplicates are kept; lookups see the first one.
    pub fn register(&mut self, keyword: &str, display_name: Option<&str>, handler: Handler) {
        self.entries.push(RegistryEntry {
            keyword: keyword.to_string(),
            display_name: display_name.unwrap_or(keyword).to_string(),
            handler,
        });
    }

    /// Register a plain function as a handler
    pub fn register_fn(
        &mut self,
        keyword: &str,
        display_name: &str,
        handler: fn(&ValueMap, &Context) -> TaskOutput,
    ) {
        self.register(keyword, Some(display_name), Rc::new(handler));
    }

    fn entry(&self, keyword: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.keyword == keyword)
    }

    pub fn lookup(&self, keyword: &str) -> Option<Handler> {
        self.entry(keyword).map(|e| e.handler.clone())
    }

    pub fn exists(&self, keyword: &str) -> bool {
        self.entry(keyword).is_some()
    }

    /// Display name for a keyword, or the keyword itself when unregistered
    pub fn display_name_of(&self, keyword: &str) -> String {
        self.entry(keyword)
            .map(|e| e.display_name.clone())
            .unwrap_or_else(|| keyword.to_string())
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
