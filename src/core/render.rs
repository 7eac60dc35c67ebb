//! Text rendering of structured context.
//!
//! Output looks like
//!
//! ```text
//! {
//!   key: value
//!   nested: array {
//!     inner: 1
//!   }
//!   obj: Job {
//!     id: 7
//!   }
//! }
//! ```
//!
//! Every composite entered during one top-level call is remembered by
//! address. Meeting it again prints `<type> (already printed)` instead of
//! recursing, so shared and cyclic graphs terminate.
use std::collections::HashSet;
use std::rc::Rc;

use crate::core::context::{Context, Value};

pub const ALREADY_PRINTED: &str = "(already printed)";

const INDENT_STEP: usize = 2;

/// Renders contexts to indented text. Stateless between calls.
#[derive(Clone, Copy, Debug, Default)]
pub struct StructuredFormatter;

impl StructuredFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, context: &Context) -> String {
        self.render_indented(context, 0)
    }

    pub fn render_indented(&self, context: &Context, indent: usize) -> String {
        let mut pass = RenderPass::default();
        pass.block(context.iter(), indent);
        pass.out
    }

    /// Render any value. Scalars render as their natural string form; a
    /// top-level composite counts as already entered.
    pub fn render_value(&self, value: &Value) -> String {
        let mut pass = RenderPass::default();
        if let Some(id) = identity(value) {
            pass.seen.insert(id);
        }
        pass.value_body(value, 0);
        pass.out
    }
}

/// Convenience wrapper around [`StructuredFormatter::render`].
pub fn render(context: &Context) -> String {
    StructuredFormatter::new().render(context)
}

#[derive(Default)]
struct RenderPass {
    seen: HashSet<usize>,
    out: String,
}

impl RenderPass {
    fn block<'a>(&mut self, entries: impl Iterator<Item = (&'a str, &'a Value)>, indent: usize) {
        let pad = " ".repeat(indent);
        self.out.push_str("{\n");
        for (key, value) in entries {
            self.out.push_str(&pad);
            self.out.push_str("  ");
            self.out.push_str(key);
            self.out.push_str(": ");
            self.entry(value, indent);
        }
        self.out.push_str(&pad);
        self.out.push_str("}\n");
    }

    fn entry(&mut self, value: &Value, indent: usize) {
        let Some(id) = identity(value) else {
            self.out.push_str(&value.scalar_string());
            self.out.push('\n');
            return;
        };
        let label = value.scalar_string();
        if !self.seen.insert(id) {
            self.out.push_str(&label);
            self.out.push(' ');
            self.out.push_str(ALREADY_PRINTED);
            self.out.push('\n');
            return;
        }
        self.out.push_str(&label);
        self.out.push(' ');
        self.value_body(value, indent + INDENT_STEP);
    }

    fn value_body(&mut self, value: &Value, indent: usize) {
        match value {
            Value::List(items) => {
                let items = items.borrow();
                let keys: Vec<String> = (0..items.len()).map(|i| i.to_string()).collect();
                self.block(keys.iter().map(String::as_str).zip(items.iter()), indent);
            }
            Value::Map(map) => {
                let map = map.borrow();
                self.block(map.iter(), indent);
            }
            Value::Object(object) => {
                let fields = object.fields().borrow();
                self.block(fields.iter(), indent);
            }
            scalar => {
                self.out.push_str(&scalar.scalar_string());
                self.out.push('\n');
            }
        }
    }
}

fn identity(value: &Value) -> Option<usize> {
    match value {
        Value::List(rc) => Some(Rc::as_ptr(rc) as *const () as usize),
        Value::Map(rc) => Some(Rc::as_ptr(rc) as *const () as usize),
        Value::Object(rc) => Some(Rc::as_ptr(rc) as *const () as usize),
        _ => None,
    }
}
