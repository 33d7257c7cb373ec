//! Shape-based distance (k-Shape).
//!
//! ```text
//! SBD(x, y) = | 1 - max_w CC_w(x, y) / sqrt(<x, x> * <y, y>) |
//! ```
//!
//! The cross-correlation over every lag `w` is computed with a zero-padded
//! FFT, so the cost is `O((n + m) log(n + m))`.

use std::cell::RefCell;
use std::sync::Arc;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

thread_local! {
    // Plans are reused per length; every worker thread keeps its own planner.
    static PLANNER: RefCell<FftPlanner<f64>> = RefCell::new(FftPlanner::new());
}

fn plans(len: usize) -> (Arc<dyn Fft<f64>>, Arc<dyn Fft<f64>>) {
    PLANNER.with(|planner| {
        let mut planner = planner.borrow_mut();
        (planner.plan_fft_forward(len), planner.plan_fft_inverse(len))
    })
}

/// Full cross-correlation `CC_w = Σ_t x[t + w] * y[t]` for
/// `w = -(m - 1) ..= n - 1`, in that order.
fn cross_correlation(x: &[f64], y: &[f64]) -> Vec<f64> {
    let (n, m) = (x.len(), y.len());
    let full_len = n + m - 1;
    let fft_len = full_len.next_power_of_two();

    let (forward, inverse) = plans(fft_len);

    let pad = |s: &[f64]| -> Vec<Complex<f64>> {
        let mut buffer = vec![Complex::new(0.0, 0.0); fft_len];
        for (slot, v) in buffer.iter_mut().zip(s) {
            slot.re = *v;
        }
        buffer
    };

    let mut fx = pad(x);
    let mut fy = pad(y);
    forward.process(&mut fx);
    forward.process(&mut fy);

    let mut product: Vec<Complex<f64>> = fx.iter().zip(&fy).map(|(a, b)| a * b.conj()).collect();
    inverse.process(&mut product);

    // Circular result: non-negative lags at the front, negative lags wrap to the back.
    let scale = fft_len as f64;
    let negative = (fft_len - (m - 1)..fft_len).map(|k| product[k].re / scale);
    let positive = (0..n).map(|k| product[k].re / scale);
    negative.chain(positive).collect()
}

/// SBD distance in `[0, 2]`. A zero-energy input yields `1.0`.
pub fn sbd_distance(x: &[f64], y: &[f64]) -> f64 {
    if x.is_empty() || y.is_empty() {
        return 0.0;
    }

    let energy_x: f64 = x.iter().map(|v| v * v).sum();
    let energy_y: f64 = y.iter().map(|v| v * v).sum();
    let denominator = (energy_x * energy_y).sqrt();
    if denominator < f64::EPSILON {
        return 1.0;
    }

    let max_cc = cross_correlation(x, y)
        .into_iter()
        .fold(f64::NEG_INFINITY, f64::max);

    // abs() removes tiny negative residue from the FFT round trip.
    (1.0 - max_cc / denominator).abs().min(2.0)
}
