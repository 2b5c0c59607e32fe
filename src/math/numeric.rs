/// Logistic sigmoid `1 / (1 + e^-x)`.
///
/// Inputs beyond ±40 saturate to exactly 0 or 1; the exponential would
/// only contribute rounding noise past that point.
pub fn sigmoid(x: f64) -> f64 {
    if x > 40.0 {
        1.0
    } else if x < -40.0 {
        0.0
    } else {
        1.0 / (1.0 + (-x).exp())
    }
}

pub fn sqr(x: f64) -> f64 {
    x * x
}

/// -1, 0 or 1.
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Percentual growth of `last` over `min`: `100 * (last / min - 1)`.
///
/// Returns 0 while no finite minimum exists. A zero minimum yields 0 when
/// `last` is also 0 and +inf otherwise, so callers never see NaN.
pub fn percent_growth(last: f64, min: f64) -> f64 {
    if !min.is_finite() || !last.is_finite() {
        return 0.0;
    }
    if min <= 0.0 {
        return if last <= 0.0 { 0.0 } else { f64::INFINITY };
    }
    100.0 * (last / min - 1.0)
}

/// `numerator / denominator`, with a zero denominator mapped to +inf for a
/// positive numerator and to 0 otherwise.
pub fn guarded_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        if numerator > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    } else {
        numerator / denominator
    }
}

/// Index of the maximum element in a slice.
pub fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}
