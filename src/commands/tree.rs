//! The tree command: snapshot, match, build, render

use super::parser::{OutputFormat, TreeSettings};
use crate::core::matcher::find_matches;
use crate::core::process_tree::TreeBuilder;
use crate::core::render::{render_json, render_to_string};
use crate::core::snapshot::ProcessSnapshot;
use crate::error::{PgtreeError, PgtreeResult};
use std::io::Write;
use tracing::{debug, info};

/// Capture the live process table and print the trees for `settings`.
///
/// Returns the number of trees written.
pub fn run(settings: &TreeSettings, out: &mut impl Write) -> PgtreeResult<usize> {
    let snapshot = ProcessSnapshot::capture()?;
    execute(&snapshot, settings, out)
}

/// Print the trees for `settings` from an already captured snapshot.
///
/// Nothing is written when the pattern matches no process.
pub fn execute(
    snapshot: &ProcessSnapshot,
    settings: &TreeSettings,
    out: &mut impl Write,
) -> PgtreeResult<usize> {
    let seeds = find_matches(snapshot, &settings.pattern, settings.match_options)?;
    info!(pattern = %settings.pattern, matches = seeds.len(), "Found matching processes");

    let trees = TreeBuilder::new(snapshot).build(&seeds);

    match settings.format {
        OutputFormat::Text => {
            for (index, tree) in trees.iter().enumerate() {
                // each tree is rendered fully before anything is written
                let mut buffer = render_to_string(&tree.root, settings.render_options);
                if index > 0 {
                    buffer.insert(0, '\n');
                }
                debug!(seed = tree.seed, root = tree.root.pid(), "Writing tree");
                out.write_all(buffer.as_bytes())?;
                out.flush()?;
            }
        }
        OutputFormat::Json => {
            let json = render_json(&trees).map_err(|err| PgtreeError::Output(err.into()))?;
            writeln!(out, "{json}")?;
            out.flush()?;
        }
    }

    Ok(trees.len())
}
