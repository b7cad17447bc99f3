use float_cmp::approx_eq;

/// Compare two arrays of f64 values item by item.
///
/// # Arguments
///
/// * `calculated_values`: The values calculated by a test.
/// * `expected_values`: The expected values.
/// * `epsilon`: The absolute tolerance. This defaults to `0.0001`.
pub(crate) fn assert_approx_array_eq(
    calculated_values: &[f64],
    expected_values: &[f64],
    epsilon: Option<f64>,
) {
    let epsilon = epsilon.unwrap_or(0.0001);
    assert_eq!(
        calculated_values.len(),
        expected_values.len(),
        "the array lengths do not match"
    );
    for (i, (calculated, expected)) in calculated_values
        .iter()
        .zip(expected_values.iter())
        .enumerate()
    {
        if !approx_eq!(f64, *calculated, *expected, epsilon = epsilon) {
            panic!(
                "The values at index {} do not match: {} != {}",
                i, calculated, expected
            );
        }
    }
}
