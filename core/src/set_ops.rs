// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// Unordered multiset equality: true iff both lists contain the same
/// values with the same multiplicities. Lists of differing length are
/// never equal.
pub(crate) fn equal(a: &[i64], b: &[i64]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort_unstable();
    b.sort_unstable();

    a == b
}

/// Two-way difference: returns the elements of `a` absent from `b` and the
/// elements of `b` absent from `a`. An element's multiplicity in the output
/// follows the source list, so a value appearing twice in `a` and never in
/// `b` appears twice in the first result.
pub(crate) fn diff(a: &[i64], b: &[i64]) -> (Vec<i64>, Vec<i64>) {
    let a_not_b = a.iter().copied().filter(|v| !b.contains(v)).collect();
    let b_not_a = b.iter().copied().filter(|v| !a.contains(v)).collect();

    (a_not_b, b_not_a)
}

/// Serialize an id list as comma-joined values for query parameters.
pub(crate) fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<String>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_ignores_order() {
        assert!(equal(&[1, 2, 3], &[3, 1, 2]));
        assert!(equal(&[], &[]));
        assert!(!equal(&[1, 2], &[1, 2, 3]));
        assert!(!equal(&[1, 2, 3], &[1, 2, 4]));
    }

    #[test]
    fn equal_respects_multiplicity() {
        assert!(!equal(&[1, 1, 2], &[1, 2, 2]));
        assert!(equal(&[1, 1, 2], &[2, 1, 1]));
    }

    #[test]
    fn diff_of_identical_lists_is_empty() {
        let (add, remove) = diff(&[1, 2, 3], &[1, 2, 3]);
        assert!(add.is_empty());
        assert!(remove.is_empty());
    }

    #[test]
    fn diff_returns_both_directions() {
        let (a_not_b, b_not_a) = diff(&[1, 2, 3], &[2, 3, 4]);
        assert_eq!(a_not_b, vec![1]);
        assert_eq!(b_not_a, vec![4]);
    }

    #[test]
    fn diff_keeps_source_multiplicity() {
        // A value appearing twice in `a` and never in `b` appears twice
        // in the result.
        let (a_not_b, b_not_a) = diff(&[5, 5, 6], &[6]);
        assert_eq!(a_not_b, vec![5, 5]);
        assert!(b_not_a.is_empty());
    }

    #[test]
    fn diff_against_empty() {
        let (a_not_b, b_not_a) = diff(&[7, 8], &[]);
        assert_eq!(a_not_b, vec![7, 8]);
        assert!(b_not_a.is_empty());

        let (a_not_b, b_not_a) = diff(&[], &[7, 8]);
        assert!(a_not_b.is_empty());
        assert_eq!(b_not_a, vec![7, 8]);
    }

    #[test]
    fn join_ids_is_comma_separated() {
        assert_eq!(join_ids(&[]), "");
        assert_eq!(join_ids(&[42]), "42");
        assert_eq!(join_ids(&[1, 2, 3]), "1,2,3");
    }
}
