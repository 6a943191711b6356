//! Session dependency resolution.

use qadeck_error::{QadeckError, Result};
use tracing::debug;

use crate::registry::SessionRegistry;

/// Visit state for the coloring traversal. A session that is seen again
/// while still `Active` closes a dependency cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    Active,
    Placed,
}

/// Expand a request into the ordered session-execution list.
///
/// An empty request selects the registry's default sessions. Dependencies
/// are placed before their dependents in first-discovery order; a session
/// already placed is not re-emitted. Every requested name is validated
/// before any expansion starts, and a dependency cycle fails with the
/// offending path in [`QadeckError::SessionCycle`].
pub fn resolve(registry: &SessionRegistry, requested_names: &[String]) -> Result<Vec<String>> {
    let roots: Vec<usize> = if requested_names.is_empty() {
        registry
            .sessions()
            .iter()
            .enumerate()
            .filter(|(_, session)| session.is_default)
            .map(|(position, _)| position)
            .collect()
    } else {
        requested_names
            .iter()
            .map(|name| {
                registry
                    .index_of(name)
                    .ok_or_else(|| QadeckError::unknown_session(name))
            })
            .collect::<Result<_>>()?
    };
    debug!(
        requested = requested_names.len(),
        roots = roots.len(),
        "resolving session execution list"
    );

    let mut state = vec![Visit::Unvisited; registry.sessions().len()];
    let mut order = Vec::new();
    for root in roots {
        expand(registry, root, &mut state, &mut order)?;
    }
    Ok(order)
}

/// Depth-first expansion from one root, with an explicit stack so deep
/// dependency chains cannot exhaust the call stack.
fn expand(
    registry: &SessionRegistry,
    root: usize,
    state: &mut [Visit],
    order: &mut Vec<String>,
) -> Result<()> {
    if state[root] == Visit::Placed {
        return Ok(());
    }
    state[root] = Visit::Active;
    // (session, position of the next dependency to expand)
    let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
    // Names on the active path, for cycle context.
    let mut path: Vec<usize> = vec![root];

    while let Some(&(current, cursor)) = stack.last() {
        let session = &registry.sessions()[current];
        if let Some(dependency_name) = session.depends_on.get(cursor) {
            let top = stack.len() - 1;
            stack[top].1 += 1;
            let dependency = registry
                .index_of(dependency_name)
                .ok_or_else(|| QadeckError::unknown_session(dependency_name))?;
            match state[dependency] {
                Visit::Placed => {}
                Visit::Active => {
                    return Err(cycle_error(registry, &path, dependency));
                }
                Visit::Unvisited => {
                    state[dependency] = Visit::Active;
                    path.push(dependency);
                    stack.push((dependency, 0));
                }
            }
        } else {
            state[current] = Visit::Placed;
            order.push(session.name.clone());
            path.pop();
            stack.pop();
        }
    }
    Ok(())
}

/// Build the cycle error: the active path from the revisited session onward,
/// closed with the revisited name.
fn cycle_error(registry: &SessionRegistry, path: &[usize], revisited: usize) -> QadeckError {
    let start = path
        .iter()
        .position(|&position| position == revisited)
        .unwrap_or(0);
    let mut cycle: Vec<String> = path[start..]
        .iter()
        .map(|&position| registry.sessions()[position].name.clone())
        .collect();
    cycle.push(registry.sessions()[revisited].name.clone());
    QadeckError::SessionCycle { cycle }
}
