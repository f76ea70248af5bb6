use tracing::debug;

use crate::models::Numbered;

/// Swaps `index` with the record above it. Returns `false` at the top or out of range.
pub fn move_up<T: Numbered>(items: &mut [T], index: usize) -> bool {
    if index == 0 || index >= items.len() {
        return false;
    }
    swap_and_renumber(items, index - 1, index);
    true
}

/// Swaps `index` with the record below it. Returns `false` at the bottom or out of range.
pub fn move_down<T: Numbered>(items: &mut [T], index: usize) -> bool {
    if index + 1 >= items.len() {
        return false;
    }
    swap_and_renumber(items, index, index + 1);
    true
}

fn swap_and_renumber<T: Numbered>(items: &mut [T], upper: usize, lower: usize) {
    items.swap(upper, lower);
    items[upper].set_queue_number(upper as u32 + 1);
    items[lower].set_queue_number(lower as u32 + 1);
    debug!("Swapped queue positions {} and {}", upper + 1, lower + 1);
}

/// Rewrites every number to its 1-based position. Returns how many changed.
pub fn renumber<T: Numbered>(items: &mut [T]) -> usize {
    let mut changed = 0;
    for (index, item) in items.iter_mut().enumerate() {
        let number = index as u32 + 1;
        if item.queue_number() != number {
            item.set_queue_number(number);
            changed += 1;
        }
    }
    changed
}

pub fn next_queue_number<T: Numbered>(items: &[T]) -> u32 {
    items.iter().map(Numbered::queue_number).max().unwrap_or(0) + 1
}
