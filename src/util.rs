use crate::error::{QuadError, Result};

// This is an abstraction over a double-nested loop. We use it to iterate over 2d arrays.
#[macro_export]
macro_rules! iter_arr_2d {
    ($n:expr) => {
        (0..$n).flat_map(move |i| (0..$n).map(move |j| (i, j)))
    };
}

/// Allocate a zeroed buffer of `len` values, surfacing allocation failure as an error instead
/// of aborting.
pub(crate) fn try_alloc_zeroed(len: usize, what: &'static str) -> Result<Vec<f64>> {
    let mut result = Vec::new();
    result
        .try_reserve_exact(len)
        .map_err(|_| QuadError::Allocation { what, len })?;
    result.resize(len, 0.);

    Ok(result)
}
