//! Pooling and normalization math shared by the local backend.
//!
//! Kept as pure functions over flat slices so the numeric contract is
//! testable without loading a model.

/// Mean-pools per-token hidden states over the sequence axis using the
/// attention mask.
///
/// `hidden` is a row-major `(batch, seq, dim)` tensor; `mask` is `(batch,
/// seq)` with nonzero entries marking real tokens. For each sample the
/// masked hidden states are summed and divided by the mask count, clamped
/// away from zero so an all-padding row yields zeros instead of NaN.
pub fn mean_pool(hidden: &[f32], batch: usize, seq: usize, dim: usize, mask: &[i64]) -> Vec<Vec<f32>> {
    debug_assert_eq!(hidden.len(), batch * seq * dim);
    debug_assert_eq!(mask.len(), batch * seq);

    let mut out = Vec::with_capacity(batch);
    for b in 0..batch {
        let mut sum = vec![0.0f32; dim];
        let mut count = 0.0f32;
        for t in 0..seq {
            if mask[b * seq + t] > 0 {
                let offset = (b * seq + t) * dim;
                let row = &hidden[offset..offset + dim];
                for (acc, v) in sum.iter_mut().zip(row) {
                    *acc += v;
                }
                count += 1.0;
            }
        }
        let denom = count.max(1e-9);
        for v in &mut sum {
            *v /= denom;
        }
        out.push(sum);
    }
    out
}

/// L2-normalizes a vector in place, with the norm clamped away from zero.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-12);
    for x in v.iter_mut() {
        *x /= norm;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_pool_ignores_padding_tokens() {
        // One sample, three tokens (last is padding), dim 2.
        let hidden = [1.0, 2.0, 3.0, 4.0, 100.0, 100.0];
        let mask = [1, 1, 0];
        let out = mean_pool(&hidden, 1, 3, 2, &mask);
        assert_eq!(out, vec![vec![2.0, 3.0]]);
    }

    #[test]
    fn mean_pool_all_padding_yields_zeros_not_nan() {
        let hidden = [5.0, 5.0, 5.0, 5.0];
        let mask = [0, 0];
        let out = mean_pool(&hidden, 1, 2, 2, &mask);
        assert!(out[0].iter().all(|v| v.is_finite()));
        assert_eq!(out, vec![vec![0.0, 0.0]]);
    }

    #[test]
    fn mean_pool_batch_matches_per_sample_results() {
        // Pooling a batch of two must equal pooling each sample alone.
        let a = [1.0, 0.0, 3.0, 0.0];
        let b = [0.0, 2.0, 0.0, 4.0];
        let mask = [1, 1];

        let mut batched_hidden = Vec::new();
        batched_hidden.extend_from_slice(&a);
        batched_hidden.extend_from_slice(&b);
        let batched_mask = [1, 1, 1, 1];

        let together = mean_pool(&batched_hidden, 2, 2, 2, &batched_mask);
        let alone_a = mean_pool(&a, 1, 2, 2, &mask);
        let alone_b = mean_pool(&b, 1, 2, 2, &mask);
        assert_eq!(together[0], alone_a[0]);
        assert_eq!(together[1], alone_b[0]);
    }

    #[test]
    fn l2_normalize_produces_unit_norm() {
        let mut v = [3.0, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
    }

    #[test]
    fn l2_normalize_zero_vector_stays_finite() {
        let mut v = [0.0, 0.0, 0.0];
        l2_normalize(&mut v);
        assert!(v.iter().all(|x| x.is_finite()));
    }
}
