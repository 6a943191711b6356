//! Action-group validation.
//!
//! An action group names a set of plugin-style items (by regex over the
//! item name) that must share a declared attribute. Exclusions opt
//! individual matching items out; the validator checks both directions so
//! exclusion lists stay honest as the inventory evolves. The result is a
//! report of every violation, not a first-fault check.

use std::collections::BTreeSet;

use qadeck_error::{QadeckError, Result};
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// One declared action group.
#[derive(Debug, Clone)]
pub struct ActionGroup {
    pub name: String,
    /// Full-name match over inventory item names.
    pattern: Regex,
    /// Attribute every matching, non-excluded item must declare.
    pub required_attribute: String,
    /// Matching items that are deliberately not part of the group.
    pub exclusions: BTreeSet<String>,
}

impl ActionGroup {
    /// Compile the match pattern eagerly; a bad pattern is a construction
    /// error, not a validation finding.
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        required_attribute: impl Into<String>,
        exclusions: impl IntoIterator<Item = String>,
    ) -> Result<Self> {
        let name = name.into();
        let anchored = format!("^(?:{pattern})$");
        let pattern = Regex::new(&anchored).map_err(|error| QadeckError::InvalidPattern {
            group: name.clone(),
            message: error.to_string(),
        })?;
        Ok(Self {
            name,
            pattern,
            required_attribute: required_attribute.into(),
            exclusions: exclusions.into_iter().collect(),
        })
    }

    /// Whether an item name belongs to this group's match set.
    #[must_use]
    pub fn matches(&self, item_name: &str) -> bool {
        self.pattern.is_match(item_name)
    }
}

/// One item of the plugin inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryItem {
    pub name: String,
    /// Attributes the item declares (e.g. via its documentation fragments).
    pub attributes: BTreeSet<String>,
}

impl InventoryItem {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        attributes: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            name: name.into(),
            attributes: attributes.into_iter().collect(),
        }
    }
}

/// A single inconsistency between declared groups and the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GroupViolation {
    /// The item matches the group's pattern, lacks the required attribute,
    /// and is not excluded.
    #[error("{item} matches action group {group} but does not declare {attribute}")]
    MissingAttribute {
        item: String,
        group: String,
        attribute: String,
    },

    /// The exclusion names something the group's pattern no longer matches.
    #[error("{item} is excluded from action group {group} but does not match its pattern")]
    StaleExclusion { item: String, group: String },

    /// The item declares the group's attribute without matching its pattern.
    #[error("{item} declares {attribute} but does not match action group {group}")]
    UnexpectedGroupMembership {
        item: String,
        group: String,
        attribute: String,
    },
}

/// Check every group against the whole inventory, collecting all
/// violations. An empty result means the declaration is consistent.
#[must_use]
pub fn validate(groups: &[ActionGroup], inventory: &[InventoryItem]) -> Vec<GroupViolation> {
    let mut violations = Vec::new();

    for item in inventory {
        for group in groups {
            let matches = group.matches(&item.name);
            let declares = item.attributes.contains(&group.required_attribute);
            if matches && !declares && !group.exclusions.contains(&item.name) {
                violations.push(GroupViolation::MissingAttribute {
                    item: item.name.clone(),
                    group: group.name.clone(),
                    attribute: group.required_attribute.clone(),
                });
            }
            if !matches && declares {
                violations.push(GroupViolation::UnexpectedGroupMembership {
                    item: item.name.clone(),
                    group: group.name.clone(),
                    attribute: group.required_attribute.clone(),
                });
            }
        }
    }

    // Exclusions are validated even for names no longer in the inventory;
    // a vanished item's stale exclusion still deserves the report.
    for group in groups {
        for exclusion in &group.exclusions {
            if !group.matches(exclusion) {
                violations.push(GroupViolation::StaleExclusion {
                    item: exclusion.clone(),
                    group: group.name.clone(),
                });
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(values: &[&str]) -> Vec<String> {
        values.iter().map(|&value| value.to_owned()).collect()
    }

    fn cloud_group(exclusions: &[&str]) -> ActionGroup {
        ActionGroup::new(
            "cloud",
            "cloud_.*",
            "cloud_attrs",
            exclusions.iter().map(|&name| name.to_owned()),
        )
        .expect("valid pattern")
    }

    #[test]
    fn consistent_declaration_yields_no_violations() {
        let groups = vec![cloud_group(&["cloud_legacy"])];
        let inventory = vec![
            InventoryItem::new("cloud_instance", attrs(&["cloud_attrs"])),
            InventoryItem::new("cloud_legacy", attrs(&[])),
            InventoryItem::new("local_facts", attrs(&[])),
        ];
        assert_eq!(validate(&groups, &inventory), Vec::new());
    }

    #[test]
    fn removing_an_exclusion_surfaces_exactly_one_missing_attribute() {
        let groups = vec![cloud_group(&[])];
        let inventory = vec![
            InventoryItem::new("cloud_instance", attrs(&["cloud_attrs"])),
            InventoryItem::new("cloud_legacy", attrs(&[])),
        ];
        let violations = validate(&groups, &inventory);
        assert_eq!(
            violations,
            vec![GroupViolation::MissingAttribute {
                item: "cloud_legacy".to_owned(),
                group: "cloud".to_owned(),
                attribute: "cloud_attrs".to_owned(),
            }]
        );
    }

    #[test]
    fn attribute_without_matching_pattern_is_unexpected_membership() {
        let groups = vec![cloud_group(&[])];
        let inventory = vec![InventoryItem::new("local_facts", attrs(&["cloud_attrs"]))];
        let violations = validate(&groups, &inventory);
        assert!(matches!(
            violations.as_slice(),
            [GroupViolation::UnexpectedGroupMembership { item, .. }] if item == "local_facts"
        ));
    }

    #[test]
    fn exclusion_not_matching_pattern_is_stale() {
        let groups = vec![cloud_group(&["local_facts"])];
        let violations = validate(&groups, &[]);
        assert_eq!(
            violations,
            vec![GroupViolation::StaleExclusion {
                item: "local_facts".to_owned(),
                group: "cloud".to_owned(),
            }]
        );
    }

    #[test]
    fn pattern_is_anchored_on_the_full_name() {
        let group = cloud_group(&[]);
        assert!(group.matches("cloud_instance"));
        assert!(!group.matches("my_cloud_instance"));
    }

    #[test]
    fn bad_pattern_fails_at_construction() {
        let result = ActionGroup::new("broken", "cloud_(", "cloud_attrs", []);
        assert!(matches!(
            result,
            Err(QadeckError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn all_violations_are_collected_in_declaration_order() {
        let groups = vec![
            cloud_group(&["gone"]),
            ActionGroup::new("db", "db_.*", "db_attrs", []).unwrap(),
        ];
        let inventory = vec![
            InventoryItem::new("cloud_a", attrs(&[])),
            InventoryItem::new("db_b", attrs(&[])),
        ];
        let violations = validate(&groups, &inventory);
        assert_eq!(violations.len(), 3, "violations: {violations:?}");
        assert!(matches!(
            violations[0],
            GroupViolation::MissingAttribute { .. }
        ));
        assert!(matches!(
            violations[2],
            GroupViolation::StaleExclusion { .. }
        ));
    }
}
