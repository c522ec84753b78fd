/*
 * // Copyright (c) Radzivon Bartoshyk 10/2026. All rights reserved.
 * //
 * // Redistribution and use in source and binary forms, with or without modification,
 * // are permitted provided that the following conditions are met:
 * //
 * // 1.  Redistributions of source code must retain the above copyright notice, this
 * // list of conditions and the following disclaimer.
 * //
 * // 2.  Redistributions in binary form must reproduce the above copyright notice,
 * // this list of conditions and the following disclaimer in the documentation
 * // and/or other materials provided with the distribution.
 * //
 * // 3.  Neither the name of the copyright holder nor the names of its
 * // contributors may be used to endorse or promote products derived from
 * // this software without specific prior written permission.
 * //
 * // THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * // AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * // IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * // DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * // FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * // DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * // SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * // CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * // OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * // OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
//! Recorded planning outcomes, keyed by problem signature and patience.
use crate::flags::Patience;
use crate::strategy::StrategyDescriptor;
use crate::FftError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// How a construction attempt may consult wisdom.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum WisdomPolicy {
    Normal,
    /// Infeasibility markers are disregarded.
    IgnoreInfeasible,
    /// Wisdom is not consulted at all.
    IgnoreAll,
    /// Succeed only from wisdom; never search.
    Only,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ForgetScope {
    Everything,
    /// Entries not confirmed by a blessed construction.
    Accursed,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum Solution {
    Recorded {
        descriptor: StrategyDescriptor,
        cost: f64,
    },
    /// No strategy applies at this patience.
    Infeasible,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WisdomEntry {
    pub key: String,
    pub patience: Patience,
    pub solution: Solution,
    pub blessed: bool,
}

#[derive(Serialize, Deserialize)]
struct WisdomFile {
    version: u32,
    entries: Vec<WisdomEntry>,
}

const WISDOM_VERSION: u32 = 1;

#[derive(Debug, Copy, Clone, PartialEq)]
struct Slot {
    solution: Solution,
    blessed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct WisdomStore {
    slots: BTreeMap<(String, Patience), Slot>,
}

impl WisdomStore {
    pub fn new() -> WisdomStore {
        WisdomStore::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// A solution recorded at `patience` or any more thorough level, else an
    /// infeasibility marker recorded at exactly `patience`.
    pub fn lookup(&self, key: &str, patience: Patience) -> Option<Solution> {
        let recorded = Patience::LEVELS[patience.level()..]
            .iter()
            .rev()
            .filter_map(|&level| self.slots.get(&(key.to_string(), level)))
            .find(|slot| matches!(slot.solution, Solution::Recorded { .. }));
        if let Some(slot) = recorded {
            return Some(slot.solution);
        }
        self.slots
            .get(&(key.to_string(), patience))
            .map(|slot| slot.solution)
    }

    /// Stores `solution`, replacing what was known for the pair. A blessing
    /// is never withdrawn by a later unblessed record.
    pub fn record(&mut self, key: &str, patience: Patience, solution: Solution, blessed: bool) {
        let slot = self
            .slots
            .entry((key.to_string(), patience))
            .or_insert(Slot {
                solution,
                blessed,
            });
        slot.blessed |= blessed;
        slot.solution = solution;
    }

    /// Blesses the entry that [`lookup`](WisdomStore::lookup) would return.
    pub fn bless(&mut self, key: &str, patience: Patience) {
        for &level in Patience::LEVELS[patience.level()..].iter().rev() {
            if let Some(slot) = self.slots.get_mut(&(key.to_string(), level))
                && matches!(slot.solution, Solution::Recorded { .. })
            {
                slot.blessed = true;
                return;
            }
        }
        if let Some(slot) = self.slots.get_mut(&(key.to_string(), patience)) {
            slot.blessed = true;
        }
    }

    pub fn forget(&mut self, scope: ForgetScope) {
        match scope {
            ForgetScope::Everything => self.slots.clear(),
            ForgetScope::Accursed => self.slots.retain(|_, slot| slot.blessed),
        }
    }

    pub fn entries(&self) -> Vec<WisdomEntry> {
        self.slots
            .iter()
            .map(|((key, patience), slot)| WisdomEntry {
                key: key.clone(),
                patience: *patience,
                solution: slot.solution,
                blessed: slot.blessed,
            })
            .collect()
    }

    pub fn export_to_string(&self) -> Result<String, FftError> {
        let file = WisdomFile {
            version: WISDOM_VERSION,
            entries: self.entries(),
        };
        serde_json::to_string_pretty(&file).map_err(|x| FftError::WisdomFormat(x.to_string()))
    }

    /// Merges serialized wisdom; imported entries count as blessed.
    pub fn import_from_str(&mut self, wisdom: &str) -> Result<usize, FftError> {
        let file: WisdomFile =
            serde_json::from_str(wisdom).map_err(|x| FftError::WisdomFormat(x.to_string()))?;
        if file.version != WISDOM_VERSION {
            return Err(FftError::WisdomFormat(format!(
                "unsupported version {}",
                file.version
            )));
        }
        let count = file.entries.len();
        for entry in file.entries {
            self.record(&entry.key, entry.patience, entry.solution, true);
        }
        Ok(count)
    }

    pub fn export_to_path(&self, path: &Path) -> Result<(), FftError> {
        let serialized = self.export_to_string()?;
        std::fs::write(path, serialized)
            .map_err(|x| FftError::WisdomIo(format!("{}: {x}", path.display())))
    }

    pub fn import_from_path(&mut self, path: &Path) -> Result<usize, FftError> {
        let serialized = std::fs::read_to_string(path)
            .map_err(|x| FftError::WisdomIo(format!("{}: {x}", path.display())))?;
        self.import_from_str(&serialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transpose::TransposeMethod;

    fn radix2(n: usize) -> Solution {
        Solution::Recorded {
            descriptor: StrategyDescriptor::Radix2 { n },
            cost: 1.5,
        }
    }

    #[test]
    fn test_more_patient_wisdom_subsumes() {
        let mut store = WisdomStore::new();
        store.record("dft:16", Patience::Patient, radix2(16), false);
        assert_eq!(store.lookup("dft:16", Patience::Estimate), Some(radix2(16)));
        assert_eq!(store.lookup("dft:16", Patience::Patient), Some(radix2(16)));
        assert_eq!(store.lookup("dft:16", Patience::Exhaustive), None);
        assert_eq!(store.lookup("dft:32", Patience::Estimate), None);
    }

    #[test]
    fn test_infeasible_marker_matches_exact_patience() {
        let mut store = WisdomStore::new();
        store.record("dft:7", Patience::Measure, Solution::Infeasible, false);
        assert_eq!(
            store.lookup("dft:7", Patience::Measure),
            Some(Solution::Infeasible)
        );
        assert_eq!(store.lookup("dft:7", Patience::Estimate), None);
        store.record("dft:7", Patience::Exhaustive, radix2(8), false);
        assert_eq!(store.lookup("dft:7", Patience::Measure), Some(radix2(8)));
    }

    #[test]
    fn test_forget_accursed_keeps_blessed() {
        let mut store = WisdomStore::new();
        store.record("a", Patience::Estimate, radix2(4), false);
        store.record("b", Patience::Measure, radix2(8), true);
        store.record("c", Patience::Measure, radix2(2), false);
        store.bless("c", Patience::Estimate);
        store.record("b", Patience::Measure, radix2(16), false);
        store.forget(ForgetScope::Accursed);
        assert_eq!(store.len(), 2);
        assert_eq!(store.lookup("b", Patience::Measure), Some(radix2(16)));
        assert!(store.lookup("a", Patience::Estimate).is_none());
        store.forget(ForgetScope::Everything);
        assert!(store.is_empty());
    }

    #[test]
    fn test_string_exchange_blesses_imports() {
        let mut store = WisdomStore::new();
        store.record(
            "dft:81",
            Patience::Patient,
            Solution::Recorded {
                descriptor: StrategyDescriptor::FourStep {
                    n: 81,
                    inner: crate::strategy::InnerKernel::Dft,
                    transpose: TransposeMethod::TiledBuf,
                },
                cost: 0.25,
            },
            false,
        );
        let exported = store.export_to_string().unwrap();
        let mut imported = WisdomStore::new();
        assert_eq!(imported.import_from_str(&exported).unwrap(), 1);
        imported.forget(ForgetScope::Accursed);
        assert_eq!(
            imported.lookup("dft:81", Patience::Measure),
            store.lookup("dft:81", Patience::Patient)
        );
        assert!(imported.entries().iter().all(|x| x.blessed));
    }

    #[test]
    fn test_malformed_wisdom() {
        let mut store = WisdomStore::new();
        assert!(matches!(
            store.import_from_str("(legacy wisdom)"),
            Err(FftError::WisdomFormat(_))
        ));
        assert!(matches!(
            store.import_from_str(r#"{"version": 9, "entries": []}"#),
            Err(FftError::WisdomFormat(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_path_exchange() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wis.dat");
        let mut store = WisdomStore::new();
        store.record("dft:4", Patience::Estimate, radix2(4), true);
        store.export_to_path(&path).unwrap();
        let mut restored = WisdomStore::new();
        assert_eq!(restored.import_from_path(&path).unwrap(), 1);
        assert_eq!(restored.entries(), store.entries());
        assert!(matches!(
            restored.import_from_path(&dir.path().join("missing.dat")),
            Err(FftError::WisdomIo(_))
        ));
    }
}
