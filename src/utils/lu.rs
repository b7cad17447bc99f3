use crate::core::SelectError;

/// Pivot magnitude below which a factorisation is declared singular.
pub const PIVOT_EPSILON: f64 = 1e-12;

/// Invert a square matrix using LU decomposition with partial pivoting followed by forward
/// and backward substitution against the identity columns. This is the portable counterpart
/// of the `nalgebra`-backed path in the accelerated kernel.
///
/// # Arguments
///
/// * `matrix`: The matrix rows. Each row must have as many entries as there are rows.
///
/// returns: `Result<Vec<Vec<f64>>, SelectError>`. The inverse matrix rows, or
/// [`SelectError::Singular`] when a pivot magnitude falls below [`PIVOT_EPSILON`].
pub fn invert(matrix: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, SelectError> {
    let size = matrix.len();
    if size == 0 {
        return Err(SelectError::InvalidParam(
            "matrix",
            "cannot invert an empty matrix".to_string(),
        ));
    }
    if matrix.iter().any(|row| row.len() != size) {
        return Err(SelectError::InvalidParam(
            "matrix",
            format!("all rows must have {} entries", size),
        ));
    }

    // decompose a working copy in place; the strict lower triangle stores the elimination
    // factors and `permutation[r]` maps the working row `r` to its original row
    let mut lu: Vec<Vec<f64>> = matrix.to_vec();
    let mut permutation: Vec<usize> = (0..size).collect();

    for col in 0..size {
        let pivot_row = (col..size)
            .max_by(|a, b| lu[*a][col].abs().total_cmp(&lu[*b][col].abs()))
            .unwrap_or(col);
        if lu[pivot_row][col].abs() < PIVOT_EPSILON {
            return Err(SelectError::Singular(PIVOT_EPSILON));
        }
        lu.swap(col, pivot_row);
        permutation.swap(col, pivot_row);

        for row in (col + 1)..size {
            let factor = lu[row][col] / lu[col][col];
            lu[row][col] = factor;
            for k in (col + 1)..size {
                lu[row][k] -= factor * lu[col][k];
            }
        }
    }

    // solve L * U * x = P * e_k for every identity column e_k
    let mut inverse = vec![vec![0.0; size]; size];
    let mut column = vec![0.0; size];
    for k in 0..size {
        for row in 0..size {
            let mut value = if permutation[row] == k { 1.0 } else { 0.0 };
            for c in 0..row {
                value -= lu[row][c] * column[c];
            }
            column[row] = value;
        }
        for row in (0..size).rev() {
            let mut value = column[row];
            for c in (row + 1)..size {
                value -= lu[row][c] * column[c];
            }
            column[row] = value / lu[row][row];
        }
        for row in 0..size {
            inverse[row][k] = column[row];
        }
    }

    Ok(inverse)
}

#[cfg(test)]
mod test {
    use crate::core::test_utils::assert_approx_array_eq;
    use crate::core::SelectError;
    use crate::utils::lu::invert;

    #[test]
    fn test_inverse_2x2() {
        let matrix = vec![vec![2.0, 0.0], vec![0.0, 4.0]];
        let inverse = invert(&matrix).unwrap();
        assert_approx_array_eq(&inverse[0], &[0.5, 0.0], None);
        assert_approx_array_eq(&inverse[1], &[0.0, 0.25], None);
    }

    #[test]
    fn test_inverse_3x3() {
        let matrix = vec![
            vec![1.0, 2.0, 3.0],
            vec![0.0, 1.0, 4.0],
            vec![5.0, 6.0, 0.0],
        ];
        let inverse = invert(&matrix).unwrap();
        let expected = [
            [-24.0, 18.0, 5.0],
            [20.0, -15.0, -4.0],
            [-5.0, 4.0, 1.0],
        ];
        for (row, expected_row) in inverse.iter().zip(expected.iter()) {
            assert_approx_array_eq(row, expected_row, Some(1e-9));
        }
    }

    #[test]
    fn test_singular_matrix() {
        let matrix = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        assert!(matches!(
            invert(&matrix),
            Err(SelectError::Singular(_))
        ));
    }

    #[test]
    fn test_empty_matrix() {
        assert!(matches!(
            invert(&[]),
            Err(SelectError::InvalidParam(_, _))
        ));
    }
}
