//! Apply ordering

use crate::types::{Decision, Plan};
use modbump_core::DesiredSet;

/// Module paths of `desired` in apply order.
///
/// Stable sort by effective index: the explicit `sequence_index`, or the
/// arrival position when none was given. Ties keep arrival order.
pub fn order_keys(desired: &DesiredSet) -> Vec<&str> {
    let mut keyed: Vec<(usize, &str)> = desired
        .indexed()
        .map(|(index, change)| (index, change.name.as_str()))
        .collect();
    keyed.sort_by_key(|&(index, _)| index);
    keyed.into_iter().map(|(_, name)| name).collect()
}

/// Arrange reconciled decisions into a plan, using the same ordering as
/// [`order_keys`].
pub fn into_plan(mut decisions: Vec<Decision>) -> Plan {
    decisions.sort_by_key(|d| d.sequence_index);
    Plan::new(decisions)
}


#[cfg(test)]
#[cfg(feature = "property-tests")]
mod proptests {
    use super::*;
    use modbump_core::DesiredChange;
    use proptest::prelude::*;

    proptest! {
        /// Property: every desired path appears exactly once, and effective
        /// indices never decrease along the order.
        #[test]
        fn order_is_a_sorted_permutation(
            indices in proptest::collection::vec(proptest::option::of(0usize..10), 1..12)
        ) {
            let desired = DesiredSet::from_changes(indices.iter().enumerate().map(|(i, index)| {
                let change = DesiredChange::require(format!("example.com/m{}", i), "v1.0.0");
                match index {
                    Some(index) => change.with_index(*index),
                    None => change,
                }
            }))
            .unwrap();

            let keys = order_keys(&desired);
            prop_assert_eq!(keys.len(), desired.len());

            let effective: Vec<usize> = keys
                .iter()
                .map(|name| {
                    desired
                        .indexed()
                        .find(|(_, c)| c.name == *name)
                        .map(|(i, _)| i)
                        .unwrap()
                })
                .collect();
            prop_assert!(effective.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
