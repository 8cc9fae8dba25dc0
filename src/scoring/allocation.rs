use rand::seq::SliceRandom;
use rand::Rng;

/// Picks the team with the fewest allocated users, breaking ties uniformly at random.
///
/// Always choosing a least-allocated team keeps the allocation counts of all
/// teams within one of each other. Returns `None` when there are no teams.
pub fn pick_least_allocated<T, R>(counts: &[(T, i64)], rng: &mut R) -> Option<T>
where
    T: Clone,
    R: Rng + ?Sized,
{
    let min = counts.iter().map(|(_, count)| *count).min()?;
    let candidates: Vec<&T> = counts
        .iter()
        .filter(|(_, count)| *count == min)
        .map(|(team, _)| team)
        .collect();
    candidates.choose(rng).map(|team| T::clone(team))
}
