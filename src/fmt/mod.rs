//! Dotted pre-order printers for the parse tree and the standard tree.
//!
//! One node per line, depth shown as leading `.` characters; literal leaves
//! are wrapped as `<ID:name>`, `<INT:n>`, `<STR:'..'>`. The `Display` impls
//! here back the `-ast` and `-st` command-line flags.

mod standard;
mod surface;

/// Line accumulator shared by both printers.
pub(crate) struct TreePrinter {
    buffer: String,
}

impl TreePrinter {
    pub(crate) fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    pub(crate) fn line(&mut self, depth: usize, label: &str) {
        for _ in 0..depth {
            self.buffer.push('.');
        }
        self.buffer.push_str(label);
        self.buffer.push('\n');
    }

    pub(crate) fn finish(self) -> String {
        self.buffer
    }
}
