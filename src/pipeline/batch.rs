//! Per-feature fan-out over a materialized DataFrame

use rayon::prelude::*;

use crate::config::EvalOptions;
use crate::error::Result;
use crate::utils::{create_progress_bar, finish_with_success, hidden_progress_bar};

/// Run `compute` once per feature, keeping feature order in the output.
///
/// With `opts.parallel` the features are spread over the rayon pool; the first error in
/// feature order is returned.
pub(crate) fn map_features<T, F>(
    features: &[String],
    opts: &EvalOptions,
    label: &str,
    compute: F,
) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(&str) -> Result<T> + Sync,
{
    let pb = if opts.show_progress {
        create_progress_bar(features.len() as u64, label)
    } else {
        hidden_progress_bar()
    };

    let results: Result<Vec<T>> = if opts.parallel {
        features
            .par_iter()
            .map(|name| {
                let out = compute(name);
                pb.inc(1);
                out
            })
            .collect()
    } else {
        features
            .iter()
            .map(|name| {
                let out = compute(name);
                pb.inc(1);
                out
            })
            .collect()
    };

    finish_with_success(&pb, &format!("{} over {} features", label, features.len()));
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoreError;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("f{}", i)).collect()
    }

    #[test]
    fn test_order_preserved_in_parallel() {
        let features = names(50);
        let out = map_features(&features, &EvalOptions::default(), "test", |n| {
            Ok(n.to_string())
        })
        .unwrap();
        assert_eq!(out, features);
    }

    #[test]
    fn test_error_surfaces_sequential() {
        let features = names(3);
        let opts = EvalOptions::default().with_parallel(false);
        let out: Result<Vec<()>> = map_features(&features, &opts, "test", |n| {
            if n == "f1" {
                Err(ScoreError::InvalidArgument(n.to_string()))
            } else {
                Ok(())
            }
        });
        assert!(matches!(out, Err(ScoreError::InvalidArgument(ref s)) if s == "f1"));
    }
}
