use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use ontoforge_core::EntityPool;

use crate::errors::GenerationError;

/// The single longest dependency chain of a precedence graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriticalPath {
    /// Chain members in predecessor-to-successor order.
    pub chain: Vec<String>,
    /// Chain length in edges (one less than the member count).
    pub edges: usize,
}

/// Compute the longest dependency chain by hop count and mark its members.
///
/// Roots are exactly the activities with an empty `depends_on`, independent
/// of absolute start time. Ties between successors of equal depth, and
/// between equally long root chains, are broken by lexicographic identifier
/// order, so the result is canonical for a given pool.
///
/// Every record's critical flag is overwritten (true on the chain, false
/// elsewhere), so running the analysis twice yields identical results.
pub fn mark_critical_path(pool: &mut EntityPool) -> Result<CriticalPath, GenerationError> {
    let best = {
        let mut successors: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        let mut roots: Vec<&str> = Vec::new();

        for record in pool.records() {
            successors.entry(record.id()).or_default();
            if record.depends_on().is_empty() {
                roots.push(record.id());
            }
            for predecessor in record.depends_on() {
                successors
                    .entry(predecessor.as_str())
                    .or_default()
                    .push(record.id());
            }
        }
        for list in successors.values_mut() {
            list.sort_unstable();
        }
        roots.sort_unstable();

        let mut memo: HashMap<&str, (usize, Vec<&str>)> = HashMap::new();
        let mut in_progress: HashSet<&str> = HashSet::new();

        let mut best: Option<(usize, Vec<&str>)> = None;
        for root in roots {
            let result = longest(root, &successors, &mut memo, &mut in_progress)?;
            let better = best
                .as_ref()
                .map(|(length, _)| result.0 > *length)
                .unwrap_or(true);
            if better {
                best = Some(result);
            }
        }

        best.map(|(edges, chain)| {
            let chain: Vec<String> = chain.into_iter().map(str::to_string).collect();
            (edges, chain)
        })
    };

    let Some((edges, chain)) = best else {
        // Either the pool is empty or every record has predecessors; the
        // latter only happens on a cyclic graph, which wiring cannot produce.
        if let Some(record) = pool.records().first() {
            return Err(GenerationError::CyclicPrecedenceGraph {
                id: record.id().to_string(),
            });
        }
        return Ok(CriticalPath {
            chain: Vec::new(),
            edges: 0,
        });
    };

    let members: BTreeSet<&str> = chain.iter().map(String::as_str).collect();
    for record in pool.records_mut() {
        let critical = members.contains(record.id());
        record.set_critical(critical);
    }

    Ok(CriticalPath { chain, edges })
}

/// Longest chain from `id` through the successor map, memoized per
/// identifier. The memo is what keeps shared suffixes from being re-explored
/// exponentially; the in-progress set turns unbounded recursion on a cyclic
/// graph into a hard error.
fn longest<'a>(
    id: &'a str,
    successors: &BTreeMap<&'a str, Vec<&'a str>>,
    memo: &mut HashMap<&'a str, (usize, Vec<&'a str>)>,
    in_progress: &mut HashSet<&'a str>,
) -> Result<(usize, Vec<&'a str>), GenerationError> {
    if let Some(cached) = memo.get(id) {
        return Ok(cached.clone());
    }
    if !in_progress.insert(id) {
        return Err(GenerationError::CyclicPrecedenceGraph { id: id.to_string() });
    }

    let mut best: Option<(usize, Vec<&'a str>)> = None;
    if let Some(children) = successors.get(id) {
        for &child in children {
            let (length, chain) = longest(child, successors, memo, in_progress)?;
            let better = best
                .as_ref()
                .map(|(best_length, _)| length + 1 > *best_length)
                .unwrap_or(true);
            if better {
                let mut extended = Vec::with_capacity(chain.len() + 1);
                extended.push(id);
                extended.extend(chain);
                best = Some((length + 1, extended));
            }
        }
    }

    let result = best.unwrap_or_else(|| (0, vec![id]));
    in_progress.remove(id);
    memo.insert(id, result.clone());
    Ok(result)
}
