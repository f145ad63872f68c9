//! Deduplication against the exclusion set

use crate::domain::Domain;
use crate::exclusion::ExclusionSet;

/// Allow-list split by exclusion membership
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Domains still to publish, in input order
    pub kept: Vec<Domain>,
    /// Domains already covered by the exclusion set, in input order
    pub removed: Vec<Domain>,
}

/// Route every domain to `removed` if excluded, else to `kept`
pub fn deduplicate(domains: &[Domain], excluded: &ExclusionSet) -> Partition {
    let (removed, kept): (Vec<Domain>, Vec<Domain>) = domains
        .iter()
        .cloned()
        .partition(|domain| excluded.contains(domain.as_str()));

    Partition { kept, removed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainGrammar;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn domains(names: &[&str]) -> Vec<Domain> {
        let grammar = DomainGrammar::default();
        names.iter().map(|n| grammar.parse(n).unwrap()).collect()
    }

    fn names(domains: &[Domain]) -> Vec<&str> {
        domains.iter().map(Domain::as_str).collect()
    }

    #[test]
    fn test_removes_matches() {
        let allow = domains(&["a.com", "b.com", "c.com"]);
        let exclude: ExclusionSet = domains(&["b.com", "d.com"]).into_iter().collect();

        let partition = deduplicate(&allow, &exclude);
        assert_eq!(names(&partition.kept), ["a.com", "c.com"]);
        assert_eq!(names(&partition.removed), ["b.com"]);
    }

    #[test]
    fn test_no_overlap() {
        let allow = domains(&["a.com", "b.com"]);
        let exclude: ExclusionSet = domains(&["x.com", "y.com"]).into_iter().collect();

        let partition = deduplicate(&allow, &exclude);
        assert_eq!(names(&partition.kept), ["a.com", "b.com"]);
        assert!(partition.removed.is_empty());
    }

    #[test]
    fn test_empty_exclusions_keep_everything() {
        let allow = domains(&["a.com", "b.com"]);
        let partition = deduplicate(&allow, &ExclusionSet::default());
        assert_eq!(partition.kept, allow);
        assert!(partition.removed.is_empty());
    }

    #[test]
    fn test_everything_removed() {
        let allow = domains(&["a.com"]);
        let exclude: ExclusionSet = allow.iter().cloned().collect();
        let partition = deduplicate(&allow, &exclude);
        assert!(partition.kept.is_empty());
        assert_eq!(partition.removed, allow);
    }

    #[test]
    fn test_no_subdomain_matching() {
        let allow = domains(&["sub.a.com"]);
        let exclude: ExclusionSet = domains(&["a.com"]).into_iter().collect();
        assert_eq!(deduplicate(&allow, &exclude).kept, allow);
    }

    fn label() -> impl Strategy<Value = String> {
        "[a-e]{1,3}"
    }

    proptest! {
        #[test]
        fn prop_partition_is_exact(
            allow in prop::collection::btree_set(label(), 0..20),
            exclude in prop::collection::btree_set(label(), 0..20),
        ) {
            let grammar = DomainGrammar::default();
            let allow: Vec<Domain> = allow
                .iter()
                .map(|l| grammar.parse(&format!("{l}.com")).unwrap())
                .collect();
            let exclude: ExclusionSet = exclude
                .iter()
                .map(|l| grammar.parse(&format!("{l}.com")).unwrap())
                .collect();

            let partition = deduplicate(&allow, &exclude);

            prop_assert_eq!(partition.kept.len() + partition.removed.len(), allow.len());
            prop_assert!(partition.kept.iter().all(|d| !exclude.contains(d.as_str())));
            prop_assert!(partition.removed.iter().all(|d| exclude.contains(d.as_str())));

            let union: BTreeSet<&Domain> =
                partition.kept.iter().chain(partition.removed.iter()).collect();
            let input: BTreeSet<&Domain> = allow.iter().collect();
            prop_assert_eq!(union, input);

            // Relative order survives in both halves
            let order = |subset: &[Domain]| -> Vec<usize> {
                subset.iter().map(|d| allow.iter().position(|a| a == d).unwrap()).collect()
            };
            let kept_order = order(&partition.kept);
            let removed_order = order(&partition.removed);
            prop_assert!(kept_order.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(removed_order.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
