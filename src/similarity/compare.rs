//! Edit-distance comparison of CTPH signatures.
//!
//! The score is the Levenshtein distance between corresponding signature
//! parts; the smaller of the two parts is reported since either part alone
//! is evidence of shared content. 0 means one part is identical.

use rayon::prelude::*;
use tracing::debug;

use super::signature::Signature;
use crate::error::{FuzzError, Result, Side};

impl Signature {
    /// Distance to `other`, or [`FuzzError::BlockSizeMismatch`] when the two
    /// were computed at different granularity.
    pub fn distance(&self, other: &Signature) -> Result<usize> {
        if self.block_size() != other.block_size() {
            return Err(FuzzError::BlockSizeMismatch {
                first: self.block_size(),
                second: other.block_size(),
            });
        }

        let first = strsim::levenshtein(self.sig1(), other.sig1());
        let second = strsim::levenshtein(self.sig2(), other.sig2());
        Ok(first.min(second))
    }
}

/// Compare two rendered signatures.
pub fn compare(a: &str, b: &str) -> Result<usize> {
    let sa = Signature::parse_as(a, Side::First)?;
    let sb = Signature::parse_as(b, Side::Second)?;
    sa.distance(&sb)
}

/// Whether two signatures are comparable and within `max_distance`.
pub fn is_similar(a: &str, b: &str, max_distance: usize) -> Result<bool> {
    match compare(a, b) {
        Ok(d) => Ok(d <= max_distance),
        Err(FuzzError::BlockSizeMismatch { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Distances for every unordered pair `(i, j)`, `i < j`, up to `max_pairs`.
///
/// Pairs that cannot be compared (malformed input or differing block sizes)
/// carry `None`.
pub fn pairwise_matrix(
    digests: &[String],
    max_pairs: usize,
) -> Vec<(usize, usize, Option<usize>)> {
    let parsed: Vec<Option<Signature>> = digests.iter().map(|d| d.parse().ok()).collect();
    let n = parsed.len();
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .take(max_pairs)
        .collect();
    debug!(digests = n, pairs = pairs.len(), "computing pairwise distances");

    pairs
        .into_par_iter()
        .map(|(i, j)| {
            let d = match (&parsed[i], &parsed[j]) {
                (Some(a), Some(b)) => a.distance(b).ok(),
                _ => None,
            };
            (i, j, d)
        })
        .collect()
}

/// The `k` candidates closest to `query`, nearest first, skipping anything
/// incomparable or further than `max_distance`.
pub fn top_k<'a, I>(
    query: &str,
    candidates: I,
    k: usize,
    max_distance: usize,
) -> Result<Vec<(&'a str, usize)>>
where
    I: IntoIterator<Item = &'a str>,
{
    let query = Signature::parse_as(query, Side::First)?;
    let mut scored: Vec<(&'a str, usize)> = candidates
        .into_iter()
        .filter_map(|cand| {
            let sig = cand.parse::<Signature>().ok()?;
            let d = query.distance(&sig).ok()?;
            (d <= max_distance).then_some((cand, d))
        })
        .collect();
    scored.sort_by_key(|&(_, d)| d);
    scored.truncate(k);
    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CROW: &str = "24:O7XC9FZ2LBfaW3h+XdcDljuQJtNMMqF5DjQuwM0OHC:O7S9FZ2LwWEdcM6tNMjDEuwwHC";

    #[test]
    fn test_identical_is_zero() {
        assert_eq!(compare(CROW, CROW).unwrap(), 0);
    }

    #[test]
    fn test_smaller_half_wins() {
        // sig1 differs in 3 places, sig2 in 1
        assert_eq!(compare("3:abcdef:xyz", "3:abXXXf:xyQ").unwrap(), 1);
        assert_eq!(compare("3:abcdef:xyz", "3:abcdeQ:QQQ").unwrap(), 1);
    }

    #[test]
    fn test_malformed_names_side() {
        let err = compare("24O7XC9FZ2LBfaW3hM6tNMjDEuwwHC", CROW).unwrap_err();
        assert!(matches!(
            err,
            FuzzError::MalformedSignature {
                side: Side::First,
                ..
            }
        ));

        let err = compare(CROW, "24O7XC9FZ2LBfaW3hM6tNMjDEuwwHC").unwrap_err();
        assert!(matches!(
            err,
            FuzzError::MalformedSignature {
                side: Side::Second,
                ..
            }
        ));
    }

    #[test]
    fn test_block_size_mismatch() {
        let err = compare("24:0:0", "12:O:O").unwrap_err();
        assert!(matches!(
            err,
            FuzzError::BlockSizeMismatch {
                first: 24,
                second: 12
            }
        ));
    }

    #[test]
    fn test_block_sizes_compared_as_numbers() {
        assert_eq!(compare("024:a:b", "24:a:b").unwrap(), 0);
        assert!(matches!(
            compare("024:a:b", "240:a:b"),
            Err(FuzzError::BlockSizeMismatch {
                first: 24,
                second: 240
            })
        ));
    }

    #[test]
    fn test_is_similar() {
        assert!(is_similar("3:abcdef:xyz", "3:abcdeQ:xyz", 0).unwrap());
        assert!(!is_similar("3:abcdef:xyz", "3:QQQQQQ:QQQ", 2).unwrap());
        assert!(!is_similar("24:0:0", "12:O:O", 100).unwrap());
        assert!(is_similar("bad", "3:a:a", 1).is_err());
    }

    #[test]
    fn test_pairwise_matrix() {
        let digests = vec![
            "3:abc:de".to_string(),
            "3:abd:de".to_string(),
            "6:abc:de".to_string(),
            "garbage".to_string(),
        ];
        let matrix = pairwise_matrix(&digests, 100);
        assert_eq!(matrix.len(), 6);
        assert_eq!(matrix[0], (0, 1, Some(0)));
        assert_eq!(matrix[1], (0, 2, None));
        assert_eq!(matrix[2], (0, 3, None));

        assert_eq!(pairwise_matrix(&digests, 2).len(), 2);
    }

    #[test]
    fn test_top_k() {
        let candidates = [
            "3:abcdef:xyz",
            "3:abQQef:QQz",
            "6:abcdef:xyz",
            "3:abcdeQ:xyQ",
            "nope",
        ];
        let best = top_k("3:abcdef:xyz", candidates, 2, 5).unwrap();
        assert_eq!(best, vec![("3:abcdef:xyz", 0), ("3:abcdeQ:xyQ", 1)]);

        let near = top_k("3:abcdef:xyz", candidates, 10, 1).unwrap();
        assert_eq!(near.len(), 2);
    }
}
