//! Moore neighbourhood offsets

/// The eight `(dy, dx)` offsets around a cell, row-major order, centre excluded.
///
/// The order is fixed: the spread pass draws one random sample per offset in
/// this order, so changing it changes every seeded run.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Resolve `(row + dy, col + dx)` against a `rows x cols` grid.
///
/// Returns `None` when the neighbour falls off the edge; the grid does not wrap.
#[inline]
#[must_use]
pub fn neighbor(
    row: usize,
    col: usize,
    dy: i32,
    dx: i32,
    rows: usize,
    cols: usize,
) -> Option<(usize, usize)> {
    let r = row.checked_add_signed(dy as isize)?;
    let c = col.checked_add_signed(dx as isize)?;
    (r < rows && c < cols).then_some((r, c))
}
