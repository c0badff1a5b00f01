//! This module defines an abstract representation of a single runway ALP instance.
//!
//! Instances are read either from json or from the OR-Library airland text
//! format: the number of aircraft and the freeze time, then for every
//! aircraft its appearance, earliest, target and latest times, its penalty
//! rates before and after the target, and one separation time per aircraft.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::InstanceError;
use crate::model::AircraftStaticData;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlpInstance {
    pub nb_aircrafts: usize,
    pub freeze_time: isize,
    pub appearance: Vec<isize>,
    pub earliest: Vec<isize>,
    pub target: Vec<isize>,
    pub latest: Vec<isize>,
    pub early_penalty: Vec<f64>,
    pub late_penalty: Vec<f64>,
    /// `separation[i][j]` is the time required between `i` landing and `j` landing right after it
    pub separation: Vec<Vec<isize>>,
}

impl AlpInstance {
    /// Reads a json instance when the extension is `.json`, the OR-Library text format otherwise.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InstanceError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| InstanceError::Io { path: path.to_path_buf(), source })?;
        let instance = if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
            serde_json::from_str(&text)?
        } else {
            Self::from_orlib(&text)?
        };
        instance.validate()?;
        Ok(instance)
    }

    pub fn from_orlib(text: &str) -> Result<Self, InstanceError> {
        let mut tokens = Tokens::new(text);

        let nb_aircrafts = tokens.next::<usize>("aircraft count")?;
        let freeze_time = tokens.next::<isize>("freeze time")?;

        let mut instance = AlpInstance {
            nb_aircrafts,
            freeze_time,
            appearance: Vec::with_capacity(nb_aircrafts),
            earliest: Vec::with_capacity(nb_aircrafts),
            target: Vec::with_capacity(nb_aircrafts),
            latest: Vec::with_capacity(nb_aircrafts),
            early_penalty: Vec::with_capacity(nb_aircrafts),
            late_penalty: Vec::with_capacity(nb_aircrafts),
            separation: Vec::with_capacity(nb_aircrafts),
        };

        for _ in 0..nb_aircrafts {
            instance.appearance.push(tokens.next("appearance time")?);
            instance.earliest.push(tokens.next("earliest landing time")?);
            instance.target.push(tokens.next("target landing time")?);
            instance.latest.push(tokens.next("latest landing time")?);
            instance.early_penalty.push(tokens.next("penalty before target")?);
            instance.late_penalty.push(tokens.next("penalty after target")?);

            let mut row = Vec::with_capacity(nb_aircrafts);
            for _ in 0..nb_aircrafts {
                row.push(tokens.next("separation time")?);
            }
            instance.separation.push(row);
        }

        Ok(instance)
    }

    pub fn to_orlib(&self) -> String {
        let mut text = String::new();
        let _ = writeln!(text, " {} {}", self.nb_aircrafts, self.freeze_time);
        for i in 0..self.nb_aircrafts {
            let _ = writeln!(
                text,
                " {} {} {} {} {} {}",
                self.appearance[i], self.earliest[i], self.target[i], self.latest[i], self.early_penalty[i], self.late_penalty[i]
            );
            for chunk in self.separation[i].chunks(10) {
                for s in chunk {
                    let _ = write!(text, " {s}");
                }
                text.push('\n');
            }
        }
        text
    }

    pub fn validate(&self) -> Result<(), InstanceError> {
        let n = self.nb_aircrafts;
        if n == 0 {
            return Err(InstanceError::Invalid("the instance has no aircraft".into()));
        }

        let lengths = [
            ("appearance", self.appearance.len()),
            ("earliest", self.earliest.len()),
            ("target", self.target.len()),
            ("latest", self.latest.len()),
            ("early_penalty", self.early_penalty.len()),
            ("late_penalty", self.late_penalty.len()),
            ("separation", self.separation.len()),
        ];
        for (name, len) in lengths {
            if len != n {
                return Err(InstanceError::Invalid(format!("{name} has {len} entries for {n} aircraft")));
            }
        }

        for i in 0..n {
            if !(self.earliest[i] <= self.target[i] && self.target[i] <= self.latest[i]) {
                return Err(InstanceError::Invalid(format!(
                    "aircraft {i} window is not ordered: earliest {} target {} latest {}",
                    self.earliest[i], self.target[i], self.latest[i]
                )));
            }
            if !(self.early_penalty[i] >= 0.0 && self.late_penalty[i] >= 0.0) {
                return Err(InstanceError::Invalid(format!("aircraft {i} has a negative penalty")));
            }
            if self.separation[i].len() != n {
                return Err(InstanceError::Invalid(format!(
                    "separation row {i} has {} entries for {n} aircraft",
                    self.separation[i].len()
                )));
            }
        }
        Ok(())
    }

    /// Static data of every aircraft. Each gap vector is a column of the separation matrix.
    pub fn aircrafts(&self) -> Vec<Arc<AircraftStaticData>> {
        (0..self.nb_aircrafts)
            .map(|j| {
                Arc::new(AircraftStaticData {
                    aircraft_id: j,
                    appearance_time: self.appearance[j],
                    earliest_landing_time: self.earliest[j],
                    target_landing_time: self.target[j],
                    latest_landing_time: self.latest[j],
                    landing_before_target_time_penalty_cost: self.early_penalty[j],
                    landing_after_target_time_penalty_cost: self.late_penalty[j],
                    gap_time_between_landings: self.separation.iter().map(|row| row[j]).collect(),
                })
            })
            .collect()
    }
}

struct Tokens<'a> {
    inner: std::str::SplitWhitespace<'a>,
    position: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Tokens { inner: text.split_whitespace(), position: 0 }
    }

    fn next<T: FromStr>(&mut self, expected: &'static str) -> Result<T, InstanceError> {
        let position = self.position;
        let token = self.inner.next().ok_or(InstanceError::UnexpectedEnd { position, expected })?;
        self.position += 1;
        token.parse().map_err(|_| InstanceError::Token { position, token: token.to_string(), expected })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_AIRCRAFTS: &str = "
 2 0
 0 0 10 20 1.0 2.0
 0 5
 3 5 15 25 1.0 2.0
 7 0
";

    #[test]
    fn test_from_orlib() {
        let instance = AlpInstance::from_orlib(TWO_AIRCRAFTS).unwrap();
        assert_eq!(instance.nb_aircrafts, 2);
        assert_eq!(instance.appearance, vec![0, 3]);
        assert_eq!(instance.target, vec![10, 15]);
        assert_eq!(instance.late_penalty, vec![2.0, 2.0]);
        assert_eq!(instance.separation, vec![vec![0, 5], vec![7, 0]]);
        assert!(instance.validate().is_ok());
    }

    #[test]
    fn test_gap_vectors_are_columns() {
        let aircrafts = AlpInstance::from_orlib(TWO_AIRCRAFTS).unwrap().aircrafts();
        // aircraft 1 after aircraft 0 needs separation[0][1]
        assert_eq!(aircrafts[1].gap_after(0), 5);
        assert_eq!(aircrafts[0].gap_after(1), 7);
        assert_eq!(aircrafts[1].appearance_time, 3);
    }

    #[test]
    fn test_orlib_round_trip() {
        let instance = AlpInstance::from_orlib(TWO_AIRCRAFTS).unwrap();
        assert_eq!(AlpInstance::from_orlib(&instance.to_orlib()).unwrap(), instance);
    }

    #[test]
    fn test_truncated_input() {
        let err = AlpInstance::from_orlib(" 2 0\n 0 0 10 20 1.0 2.0\n 0").unwrap_err();
        assert!(matches!(err, InstanceError::UnexpectedEnd { position: 9, expected: "separation time" }));
    }

    #[test]
    fn test_bad_token() {
        let err = AlpInstance::from_orlib(" x 0").unwrap_err();
        assert!(matches!(err, InstanceError::Token { position: 0, expected: "aircraft count", .. }));
    }

    #[test]
    fn test_validate_rejects_unordered_window() {
        let mut instance = AlpInstance::from_orlib(TWO_AIRCRAFTS).unwrap();
        instance.latest[1] = 12;
        assert!(matches!(instance.validate(), Err(InstanceError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_ragged_separation() {
        let mut instance = AlpInstance::from_orlib(TWO_AIRCRAFTS).unwrap();
        instance.separation[0].pop();
        assert!(instance.validate().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = AlpInstance::load("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, InstanceError::Io { .. }));
    }
}
