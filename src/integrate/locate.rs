use crate::error::Error;

/// Index of the axis entry closest to `target`.
///
/// Ties go to the lowest index. Targets outside the axis range snap to the
/// nearest endpoint. NaN distances never win, so NaN axis entries are skipped
/// and a NaN target resolves to index 0.
pub fn locate(axis: &[f64], target: f64) -> Result<usize, Error> {
    if axis.is_empty() {
        return Err(Error::EmptyAxis);
    }

    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, &x) in axis.iter().enumerate() {
        let dist = (x - target).abs();
        // strict `<` keeps the first of equal distances
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    Ok(best)
}
