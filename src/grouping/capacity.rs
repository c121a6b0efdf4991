//! Target group sizes.

/// Splits `total` individuals over `groups` groups as evenly as possible.
///
/// Every capacity is `total / groups` or one more; the first
/// `total % groups` groups get the extra one. Zero groups give an empty list.
///
/// # Examples
///
/// ```
/// use u_roster::grouping::plan_capacities;
///
/// assert_eq!(plan_capacities(10, 3), vec![4, 3, 3]);
/// ```
pub fn plan_capacities(total: usize, groups: usize) -> Vec<usize> {
    if groups == 0 {
        return Vec::new();
    }
    let base = total / groups;
    let remainder = total % groups;
    (0..groups)
        .map(|i| base + usize::from(i < remainder))
        .collect()
}
