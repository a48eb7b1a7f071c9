//! Curve Interpolation
//! Natural cubic spline through a sequence of points, flattened to a polyline.

/// Sample a natural cubic spline through `points`.
///
/// Each coordinate is interpolated independently over the point index; the
/// segment between two points is a cubic Bezier whose control points come
/// from the tridiagonal system with zero second derivative at both ends.
pub fn natural_curve(points: &[(f64, f64)], samples_per_segment: usize) -> Vec<(f64, f64)> {
    match points.len() {
        0 => Vec::new(),
        1 | 2 => points.to_vec(),
        n => {
            let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
            let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
            let (ax, bx) = control_points(&xs);
            let (ay, by) = control_points(&ys);
            let samples = samples_per_segment.max(1);

            let mut path = Vec::with_capacity((n - 1) * samples + 1);
            path.push(points[0]);
            for i in 0..n - 1 {
                for s in 1..=samples {
                    let t = s as f64 / samples as f64;
                    path.push((
                        cubic_bezier(xs[i], ax[i], bx[i], xs[i + 1], t),
                        cubic_bezier(ys[i], ay[i], by[i], ys[i + 1], t),
                    ));
                }
            }
            path
        }
    }
}

/// Straight segments between consecutive points.
pub fn linear_curve(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    points.to_vec()
}

/// First and second Bezier control points for each of the `n - 1` segments.
/// Requires at least three values.
fn control_points(x: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = x.len() - 1;
    let mut a = vec![0.0; n];
    let mut b = vec![0.0; n];
    let mut r = vec![0.0; n];

    a[0] = 0.0;
    b[0] = 2.0;
    r[0] = x[0] + 2.0 * x[1];
    for i in 1..n - 1 {
        a[i] = 1.0;
        b[i] = 4.0;
        r[i] = 4.0 * x[i] + 2.0 * x[i + 1];
    }
    a[n - 1] = 2.0;
    b[n - 1] = 7.0;
    r[n - 1] = 8.0 * x[n - 1] + x[n];

    // Thomas algorithm
    for i in 1..n {
        let m = a[i] / b[i - 1];
        b[i] -= m;
        r[i] -= m * r[i - 1];
    }
    a[n - 1] = r[n - 1] / b[n - 1];
    for i in (0..n - 1).rev() {
        a[i] = (r[i] - a[i + 1]) / b[i];
    }
    b[n - 1] = (x[n] + a[n - 1]) / 2.0;
    for i in 0..n - 1 {
        b[i] = 2.0 * x[i + 1] - a[i + 1];
    }

    (a, b)
}

#[inline]
fn cubic_bezier(p0: f64, c1: f64, c2: f64, p1: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * c1 + 3.0 * u * t * t * c2 + t * t * t * p1
}
