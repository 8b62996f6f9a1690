//! Part filtering: which raw parts take part in an analysis and under which label.
//!
//! Rules
//! - Excluded parts are dropped everywhere. Exclusion wins over grouping: an excluded member
//!   leaves its compound, and a compound without remaining members disappears.
//! - Compound members are replaced by the compound label.
//! - Every other part stays a disjoint unit under its own label.
//! - A part listed in two compounds, or a compound label equal to a part label, is rejected.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartFilter {
    #[serde(default)]
    pub excluded: BTreeSet<String>,
    /// Compound label -> member part labels.
    #[serde(default)]
    pub compounds: BTreeMap<String, Vec<String>>,
}

/// One component of the analysis: a disjoint part or a compound of parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisUnit {
    pub label: String,
    pub members: Vec<String>,
}

impl AnalysisUnit {
    #[inline]
    pub fn is_compound(&self) -> bool {
        self.members.len() != 1 || self.members[0] != self.label
    }
}

impl PartFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exclude(mut self, part: impl Into<String>) -> Self {
        self.excluded.insert(part.into());
        self
    }

    pub fn compound<I, S>(mut self, label: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.compounds
            .insert(label.into(), members.into_iter().map(Into::into).collect());
        self
    }

    /// Analysis units for `parts`: disjoint parts first (input order), then compounds
    /// (label order).
    pub fn resolve(&self, parts: &[String]) -> Result<Vec<AnalysisUnit>, ConfigError> {
        let known: BTreeSet<&str> = parts.iter().map(String::as_str).collect();
        let mut owner: HashMap<&str, &str> = HashMap::new();
        for (label, members) in &self.compounds {
            if known.contains(label.as_str()) {
                return Err(ConfigError::CompoundLabelCollision(label.clone()));
            }
            for m in members {
                if let Some(first) = owner.insert(m.as_str(), label.as_str()) {
                    if first != label {
                        return Err(ConfigError::DuplicateMembership {
                            part: m.clone(),
                            first: first.to_string(),
                            second: label.clone(),
                        });
                    }
                }
            }
        }

        let mut units: Vec<AnalysisUnit> = parts
            .iter()
            .filter(|p| !self.excluded.contains(*p) && !owner.contains_key(p.as_str()))
            .map(|p| AnalysisUnit {
                label: p.clone(),
                members: vec![p.clone()],
            })
            .collect();

        for (label, members) in &self.compounds {
            let mut kept: Vec<String> = Vec::new();
            for m in members {
                if self.excluded.contains(m) {
                    continue;
                }
                if !known.contains(m.as_str()) {
                    tracing::debug!(compound = %label, member = %m, "ignoring unknown compound member");
                    continue;
                }
                if !kept.contains(m) {
                    kept.push(m.clone());
                }
            }
            if kept.is_empty() {
                tracing::debug!(compound = %label, "compound has no remaining members");
                continue;
            }
            units.push(AnalysisUnit {
                label: label.clone(),
                members: kept,
            });
        }
        Ok(units)
    }
}

/// Labels of the resolved units, in unit order.
pub fn unit_labels(units: &[AnalysisUnit]) -> Vec<String> {
    units.iter().map(|u| u.label.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn disjoint_parts_pass_through() {
        let units = PartFilter::new().resolve(&parts(&["a", "b"])).unwrap();
        assert_eq!(unit_labels(&units), vec!["a", "b"]);
        assert!(units.iter().all(|u| !u.is_compound()));
    }

    #[test]
    fn compounds_replace_members_and_exclusion_wins() {
        let f = PartFilter::new()
            .exclude("c")
            .exclude("d")
            .compound("bolt", ["b", "c"])
            .compound("ghost", ["d"]);
        let units = f.resolve(&parts(&["a", "b", "c", "d", "e"])).unwrap();
        assert_eq!(unit_labels(&units), vec!["a", "e", "bolt"]);
        let bolt = &units[2];
        assert!(bolt.is_compound());
        assert_eq!(bolt.members, vec!["b"]);
    }

    #[test]
    fn duplicate_membership_is_rejected() {
        let f = PartFilter::new()
            .compound("x", ["a"])
            .compound("y", ["a", "b"]);
        let err = f.resolve(&parts(&["a", "b"])).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateMembership { ref part, .. } if part == "a"));
    }

    #[test]
    fn compound_label_must_not_shadow_a_part() {
        let f = PartFilter::new().compound("a", ["b"]);
        assert_eq!(
            f.resolve(&parts(&["a", "b"])).unwrap_err(),
            ConfigError::CompoundLabelCollision("a".into())
        );
    }

    #[test]
    fn filter_deserializes_with_defaults() {
        let f: PartFilter = serde_json::from_str(r#"{"excluded": ["z"]}"#).unwrap();
        assert!(f.compounds.is_empty());
        assert!(f.excluded.contains("z"));
    }
}
