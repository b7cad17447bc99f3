//! Small dense-vector algebra used by the selection engine. All functions expect operands of
//! equal length; the callers validate dimensions once at the engine boundary.

/// Calculate the dot product between two vectors. The order in which the vectors are given
/// does not matter as the product is commutative.
///
/// # Arguments
///
/// * `a`: The first vector.
/// * `b`: The second vector.
///
/// returns: `f64`
pub fn dot_product(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(v_a, v_b)| v_a * v_b).sum()
}

/// Calculate the squared L2 norm of a vector.
///
/// # Arguments
///
/// * `vector`: The vector.
///
/// returns: `f64`
pub fn squared_norm(vector: &[f64]) -> f64 {
    dot_product(vector, vector)
}

/// Calculate the element-wise minimum of two vectors.
///
/// # Arguments
///
/// * `a`: The first vector.
/// * `b`: The second vector.
///
/// returns: `Vec<f64>`
pub fn elementwise_min(a: &[f64], b: &[f64]) -> Vec<f64> {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(v_a, v_b)| v_a.min(*v_b)).collect()
}

/// Calculate the element-wise maximum of two vectors.
///
/// # Arguments
///
/// * `a`: The first vector.
/// * `b`: The second vector.
///
/// returns: `Vec<f64>`
pub fn elementwise_max(a: &[f64], b: &[f64]) -> Vec<f64> {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(v_a, v_b)| v_a.max(*v_b)).collect()
}

/// Subtract vector `b` from vector `a` element by element.
///
/// # Arguments
///
/// * `a`: The minuend vector.
/// * `b`: The subtrahend vector.
///
/// returns: `Vec<f64>`
pub fn elementwise_sub(a: &[f64], b: &[f64]) -> Vec<f64> {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(v_a, v_b)| v_a - v_b).collect()
}

/// Divide vector `a` by vector `b` element by element. The divisor entries must be checked
/// by the caller; the normalisation step guarantees strictly positive intercepts before
/// dividing.
///
/// # Arguments
///
/// * `a`: The dividend vector.
/// * `b`: The divisor vector.
///
/// returns: `Vec<f64>`
pub fn elementwise_div(a: &[f64], b: &[f64]) -> Vec<f64> {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(v_a, v_b)| v_a / v_b).collect()
}

/// Multiply a matrix (given as row vectors) by a column vector.
///
/// # Arguments
///
/// * `matrix`: The matrix rows.
/// * `vector`: The column vector.
///
/// returns: `Vec<f64>`. One value per matrix row.
pub fn mat_vec(matrix: &[Vec<f64>], vector: &[f64]) -> Vec<f64> {
    matrix.iter().map(|row| dot_product(row, vector)).collect()
}

/// Calculate the squared perpendicular distance between `point` and the line passing through
/// the origin with direction `line`. The distance is invariant under positive rescaling of
/// `line`, so reference directions do not need to be unit vectors.
///
/// # Arguments
///
/// * `line`: The direction of the reference line.
/// * `point`: The point coordinates.
///
/// returns: `f64`
pub fn perpendicular_distance_sq(line: &[f64], point: &[f64]) -> f64 {
    perpendicular_distance_sq_cached(line, squared_norm(line), point)
}

/// Same as [`perpendicular_distance_sq`] with the squared norm of `line` already known. The
/// association step calls this once per reference direction and caches the norms.
pub(crate) fn perpendicular_distance_sq_cached(
    line: &[f64],
    line_squared_norm: f64,
    point: &[f64],
) -> f64 {
    // scalar projection of the point onto the line, in units of the (non-unit) direction
    let projection = dot_product(point, line) / line_squared_norm;

    let mut distance = 0.0;
    for (p, r) in point.iter().zip(line) {
        let residual = p - projection * r;
        distance += residual * residual;
    }
    distance
}
