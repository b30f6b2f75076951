/// Index of the nearest item strictly before `before`, looking back at most
/// `max_back` items, that satisfies `predicate`.
pub(crate) fn find_nearest<T, P>(
    items: &[T],
    before: usize,
    max_back: usize,
    predicate: P,
) -> Option<usize>
where
    P: Fn(&T) -> bool,
{
    let end = before.min(items.len());
    let start = end.saturating_sub(max_back);
    (start..end).rev().find(|&idx| predicate(&items[idx]))
}

pub(crate) fn first_max_index(values: impl Iterator<Item = f64>) -> Option<(usize, f64)> {
    values.enumerate().fold(None, |best, (idx, value)| match best {
        Some((_, best_value)) if value <= best_value => best,
        _ => Some((idx, value)),
    })
}

pub(crate) fn first_min_index(values: impl Iterator<Item = f64>) -> Option<(usize, f64)> {
    values.enumerate().fold(None, |best, (idx, value)| match best {
        Some((_, best_value)) if value >= best_value => best,
        _ => Some((idx, value)),
    })
}

pub(crate) fn last_n<T: Clone>(items: &[T], n: usize) -> Vec<T> {
    items[items.len().saturating_sub(n)..].to_vec()
}
