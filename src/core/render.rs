//! Text and JSON rendering of process trees
//!
//! Text output is one node per line, depth-first pre-order, drawn with the
//! usual ASCII connectors:
//!
//! ```text
//! init(1)
//! `-- bash(2) -bash
//!     |-- [reader](5)
//!     |-- worker(3) worker --id 3
//!     `-- worker(4) worker --id 4
//! ```

use crate::core::models::{SeedTree, ThreadInfo, TreeNode};

const BRANCH: &str = "|-- ";
const LAST_BRANCH: &str = "`-- ";
const PIPE: &str = "|   ";
const BLANK: &str = "    ";

/// Appended to a node whose descent was cut because of a parent loop
pub const CYCLE_MARKER: &str = " ...";

/// What to show on each line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Append the full command line after `name(pid)`
    pub show_arguments: bool,
    /// List threads as bracketed entries under their process
    pub show_long_names: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_arguments: true,
            show_long_names: true,
        }
    }
}

/// Render a tree into lines
pub fn render(root: &TreeNode, options: RenderOptions) -> Vec<String> {
    let mut lines = Vec::with_capacity(root.node_count());
    lines.push(node_label(root, options));
    render_children(root, options, &mut lines);
    lines
}

/// Render a tree into a single newline terminated buffer
pub fn render_to_string(root: &TreeNode, options: RenderOptions) -> String {
    let mut out = String::new();
    for line in render(root, options) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Serialize seed trees as a pretty printed JSON array
pub fn render_json(trees: &[SeedTree]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(trees)
}

/// Entries still to draw below one node, and the prefix length to restore
/// once they are done
struct Frame<'a> {
    node: &'a TreeNode,
    next: usize,
    prefix_len: usize,
}

fn visible_threads(node: &TreeNode, options: RenderOptions) -> &[ThreadInfo] {
    if options.show_long_names {
        &node.record.threads
    } else {
        &[]
    }
}

/// Pre-order drawing of everything below `root`. One prefix buffer is
/// shared by all levels: a level pushes its column and truncates it again
/// when it is finished.
fn render_children(root: &TreeNode, options: RenderOptions, lines: &mut Vec<String>) {
    let mut prefix = String::new();
    let mut stack = vec![Frame {
        node: root,
        next: 0,
        prefix_len: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let node = frame.node;
        let index = frame.next;
        let prefix_len = frame.prefix_len;
        frame.next += 1;

        let threads = visible_threads(node, options);
        let total = threads.len() + node.children.len();
        if index >= total {
            prefix.truncate(prefix_len);
            stack.pop();
            continue;
        }

        let last = index + 1 == total;
        let connector = if last { LAST_BRANCH } else { BRANCH };

        if let Some(thread) = threads.get(index) {
            lines.push(format!("{prefix}{connector}{}", thread_label(thread)));
            continue;
        }

        let child = &node.children[index - threads.len()];
        lines.push(format!("{prefix}{connector}{}", node_label(child, options)));

        let child_prefix_len = prefix.len();
        prefix.push_str(if last { BLANK } else { PIPE });
        stack.push(Frame {
            node: child,
            next: 0,
            prefix_len: child_prefix_len,
        });
    }
}

fn node_label(node: &TreeNode, options: RenderOptions) -> String {
    let record = &node.record;
    let mut label = format!("{}({})", record.name, record.pid);
    if options.show_arguments && !record.cmdline.is_empty() {
        label.push(' ');
        label.push_str(&record.command_line());
    }
    if node.cycle_truncated {
        label.push_str(CYCLE_MARKER);
    }
    label
}

fn thread_label(thread: &ThreadInfo) -> String {
    format!("[{}]({})", thread.name, thread.tid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{ProcessRecord, ThreadInfo};
    use std::sync::Arc;

    fn leaf(record: ProcessRecord) -> TreeNode {
        TreeNode::new(Arc::new(record))
    }

    fn sample_tree() -> TreeNode {
        let mut root = leaf(ProcessRecord::new(1, None, "init").with_cmdline(["/sbin/init"]));
        let mut shell = leaf(
            ProcessRecord::new(2, Some(1), "bash")
                .with_cmdline(["-bash"])
                .with_threads([ThreadInfo::new(5, "reader")]),
        );
        shell.children.push(leaf(
            ProcessRecord::new(3, Some(2), "worker").with_cmdline(["worker", "--id", "3"]),
        ));
        shell.children.push(leaf(
            ProcessRecord::new(4, Some(2), "worker").with_cmdline(["worker", "--id", "4"]),
        ));
        root.children.push(shell);
        root.children.push(leaf(ProcessRecord::new(9, Some(1), "kthreadd")));
        root
    }

    #[test]
    fn renders_full_detail() {
        let lines = render(&sample_tree(), RenderOptions::default());
        assert_eq!(
            lines,
            vec![
                "init(1) /sbin/init",
                "|-- bash(2) -bash",
                "|   |-- [reader](5)",
                "|   |-- worker(3) worker --id 3",
                "|   `-- worker(4) worker --id 4",
                "`-- kthreadd(9)",
            ]
        );
    }

    #[test]
    fn hides_arguments_and_threads() {
        let options = RenderOptions {
            show_arguments: false,
            show_long_names: false,
        };
        let lines = render(&sample_tree(), options);
        assert_eq!(
            lines,
            vec![
                "init(1)",
                "|-- bash(2)",
                "|   |-- worker(3)",
                "|   `-- worker(4)",
                "`-- kthreadd(9)",
            ]
        );
    }

    #[test]
    fn last_thread_uses_last_connector_when_no_children() {
        let node = leaf(
            ProcessRecord::new(10, None, "server")
                .with_threads([ThreadInfo::new(11, "io"), ThreadInfo::new(12, "timer")]),
        );
        let lines = render(&node, RenderOptions::default());
        assert_eq!(lines, vec!["server(10)", "|-- [io](11)", "`-- [timer](12)"]);
    }

    #[test]
    fn deep_chain_renders_every_level() {
        const DEPTH: u32 = 3_000;
        let mut node = leaf(ProcessRecord::new(DEPTH, Some(DEPTH - 1), "leaf"));
        for pid in (1..DEPTH).rev() {
            let mut parent = leaf(ProcessRecord::new(pid, Some(pid - 1), "link"));
            parent.children.push(node);
            node = parent;
        }

        let lines = render(&node, RenderOptions::default());
        assert_eq!(lines.len(), DEPTH as usize);
        assert_eq!(lines[1], "`-- link(2)");
        let expected_last = format!("{}`-- leaf({DEPTH})", BLANK.repeat(DEPTH as usize - 2));
        assert_eq!(lines.last(), Some(&expected_last));
    }

    #[test]
    fn truncated_node_carries_marker() {
        let mut node = leaf(ProcessRecord::new(5, Some(5), "loop"));
        node.cycle_truncated = true;
        let text = render_to_string(&node, RenderOptions::default());
        assert_eq!(text, "loop(5) ...\n");
    }

    #[test]
    fn json_output_nests_children() {
        let tree = Arc::new(sample_tree());
        let trees = vec![SeedTree {
            seed: 3,
            root: Arc::clone(&tree),
        }];
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&trees).unwrap()).unwrap();

        assert_eq!(json[0]["seed"], 3);
        assert_eq!(json[0]["tree"]["pid"], 1);
        assert_eq!(json[0]["tree"]["children"][0]["name"], "bash");
        assert_eq!(json[0]["tree"]["children"][0]["threads"][0]["tid"], 5);
        assert_eq!(json[0]["tree"]["cycle_truncated"], false);
    }
}
