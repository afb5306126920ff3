use chrono::NaiveDate;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use ontoforge_core::EntityPool;
use ontoforge_spec::ScheduleDecl;

use crate::errors::GenerationError;
use crate::seed::hash_seed;

/// Wire the `depends_on` field of every activity in the pool.
///
/// Activities are ordered by `(start, id)`; the candidate predecessors of
/// the activity at position i are exactly the earlier activities whose end
/// is at or before its start, so every wired edge respects temporal
/// precedence and the resulting graph is acyclic by construction. Up to
/// `max_predecessors` candidates are drawn without replacement; an activity
/// with no candidates stays a root.
///
/// This is the one permitted post-freeze mutation, part of construction
/// rather than later editing.
pub fn wire_precedence(
    pool: &mut EntityPool,
    schedule: &ScheduleDecl,
    entity_seed: u64,
) -> Result<(), GenerationError> {
    let mut windows = collect_windows(pool)?;
    windows.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));

    let max_predecessors = schedule.max_predecessors as usize;
    let mut wired: Vec<(String, Vec<String>)> = Vec::with_capacity(windows.len());

    for position in 0..windows.len() {
        let current = &windows[position];
        let candidates: Vec<&str> = windows[..position]
            .iter()
            .filter(|earlier| earlier.end <= current.start)
            .map(|earlier| earlier.id.as_str())
            .collect();

        let mut predecessors = Vec::new();
        let cap = candidates.len().min(max_predecessors);
        if cap > 0 {
            let mut rng =
                ChaCha8Rng::seed_from_u64(hash_seed(entity_seed, &format!("edges.{}", current.id)));
            let count = rng.random_range(0..=cap);
            predecessors = rand::seq::index::sample(&mut rng, candidates.len(), count)
                .iter()
                .map(|index| candidates[index].to_string())
                .collect();
            predecessors.sort();
        }

        wired.push((current.id.clone(), predecessors));
    }

    for (id, predecessors) in wired {
        if let Some(record) = pool.record_mut(&id) {
            record.set_depends_on(predecessors);
        }
    }

    Ok(())
}

struct ActivityWindow {
    id: String,
    start: NaiveDate,
    end: NaiveDate,
}

fn collect_windows(pool: &EntityPool) -> Result<Vec<ActivityWindow>, GenerationError> {
    let mut windows = Vec::with_capacity(pool.len());
    for record in pool.records() {
        let (Some(start), Some(end)) = (record.start(), record.end()) else {
            return Err(GenerationError::InvalidSpec(format!(
                "activity '{}' lacks schedule fields",
                record.id()
            )));
        };
        if start > end {
            return Err(GenerationError::InvalidActivityWindow {
                id: record.id().to_string(),
                start,
                end,
            });
        }
        windows.push(ActivityWindow {
            id: record.id().to_string(),
            start,
            end,
        });
    }
    Ok(windows)
}
