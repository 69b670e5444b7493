//! Adjacent-swap reordering for ordered documents (questions, form fields).

use serde::Deserialize;

/// Request to move the item at `index` one step up (`-1`) or down (`1`).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MoveRequest {
    pub index: usize,
    pub direction: i32,
}

/// Swap `items[index]` with its neighbour in `direction`.
///
/// Only the sign of `direction` matters. Returns `false` and leaves the
/// slice untouched when `direction` is zero or the target position
/// falls outside the list (moving the first item up, the last item down, or
/// an out-of-range index).
pub fn move_item<T>(items: &mut [T], index: usize, direction: i32) -> bool {
    if index >= items.len() {
        return false;
    }
    let Some(target) = index.checked_add_signed(direction.signum() as isize) else {
        return false;
    };
    if target >= items.len() || target == index {
        return false;
    }
    items.swap(index, target);
    true
}
