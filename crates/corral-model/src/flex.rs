use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{InstanceCount, ModelError, RoleName};

/// A validated role -> desired-count delta, as carried by a flex request.
///
/// Two equivalent client-side input forms normalize into this type:
/// `role=count` pair lists and ordered `role,count` tuples. Counts are
/// absolute replacements, never increments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlexDelta(BTreeMap<RoleName, InstanceCount>);

impl FlexDelta {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn set(&mut self, role: impl Into<RoleName>, count: InstanceCount) {
        self.0.insert(role.into(), count);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, InstanceCount)> {
        self.0.iter().map(|(role, count)| (role.as_str(), *count))
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Parse the `role=count` pair form, e.g. `"master=1,worker=3"`.
    ///
    /// Empty input yields an empty delta. A malformed pair fails with a
    /// bad-argument error naming the offending token.
    pub fn from_pairs(input: &str) -> Result<Self, ModelError> {
        let mut delta = Self::new();
        for pair in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (role, count) = pair.split_once('=').ok_or_else(|| {
                ModelError::BadArgument(format!("expected role=count, got: {pair}"))
            })?;
            delta.set(role.trim(), parse_count(pair, count.trim())?);
        }
        Ok(delta)
    }

    /// Parse the ordered tuple form, e.g. `["master,1", "worker,3"]`.
    ///
    /// Normalizes to the same mapping as [`Self::from_pairs`].
    pub fn from_tuples<I, S>(tuples: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut delta = Self::new();
        for tuple in tuples {
            let tuple = tuple.as_ref();
            let (role, count) = tuple.split_once(',').ok_or_else(|| {
                ModelError::BadArgument(format!("expected role,count, got: {tuple}"))
            })?;
            delta.set(role.trim(), parse_count(tuple, count.trim())?);
        }
        Ok(delta)
    }
}

impl FromIterator<(RoleName, InstanceCount)> for FlexDelta {
    fn from_iter<I: IntoIterator<Item = (RoleName, InstanceCount)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn parse_count(token: &str, raw: &str) -> Result<InstanceCount, ModelError> {
    if raw.is_empty() {
        return Err(ModelError::BadArgument(format!(
            "missing instance count in: {token}"
        )));
    }
    raw.parse()
        .map_err(|_| ModelError::BadArgument(format!("non-numeric instance count in: {token}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_and_tuples_normalize_identically() {
        let from_pairs = FlexDelta::from_pairs("master=1,worker=3").unwrap();
        let from_tuples = FlexDelta::from_tuples(["master,1", "worker,3"]).unwrap();

        assert_eq!(from_pairs, from_tuples);

        let counts: Vec<_> = from_pairs.iter().collect();
        assert_eq!(counts, vec![("master", 1), ("worker", 3)]);
    }

    #[test]
    fn pairs_tolerate_whitespace_and_empty_segments() {
        let delta = FlexDelta::from_pairs(" master = 1 , worker=3 ,").unwrap();
        assert_eq!(delta.iter().count(), 2);
    }

    #[test]
    fn empty_input_is_empty_delta() {
        assert!(FlexDelta::from_pairs("").unwrap().is_empty());
        let none: [&str; 0] = [];
        assert!(FlexDelta::from_tuples(none).unwrap().is_empty());
    }

    #[test]
    fn pair_without_separator_names_the_token() {
        let err = FlexDelta::from_pairs("master=1,worker").unwrap_err();
        assert!(err.to_string().contains("worker"));
        assert!(matches!(err, ModelError::BadArgument(_)));
    }

    #[test]
    fn tuple_missing_count_names_the_token() {
        let err = FlexDelta::from_tuples(["master,"]).unwrap_err();
        assert!(err.to_string().contains("master,"));
    }

    #[test]
    fn non_numeric_count_names_the_token() {
        let err = FlexDelta::from_tuples(["worker,many"]).unwrap_err();
        assert!(err.to_string().contains("worker,many"));
        assert!(matches!(err, ModelError::BadArgument(_)));
    }

    #[test]
    fn later_mention_of_same_role_wins() {
        let delta = FlexDelta::from_pairs("worker=2,worker=5").unwrap();
        let counts: Vec<_> = delta.iter().collect();
        assert_eq!(counts, vec![("worker", 5)]);
    }

    #[test]
    fn zero_count_is_valid() {
        let delta = FlexDelta::from_pairs("worker=0").unwrap();
        assert_eq!(delta.iter().next(), Some(("worker", 0)));
    }
}
