//! SMIRNOFF force-field loading and parameter typing
//!
//! the parameter table ships as `data/openff-2.2.0.offxml` and is parsed
//! once at startup. typing follows the SMIRNOFF rule: within a handler
//! section, every parameter's SMIRKS is matched in document order and a
//! later hit for the same atom environment overrides an earlier one

use std::collections::{HashMap, HashSet};

use crate::{
    rdkit::{find_smarts_matches_mol, ROMol},
    Error,
};

static OFFXML: &str = include_str!("../data/openff-2.2.0.offxml");

struct Parameter {
    /// the parameter's `id` attribute, falling back to `name` when `id` is
    /// absent
    label: String,
    query: ROMol,
    /// positions of the tagged (`:n`-mapped) atoms within a match tuple.
    /// only these atoms form the structural term the parameter applies to;
    /// the rest are context
    tagged: Vec<usize>,
}

/// positions of the tagged atoms in a SMIRKS pattern, in query-atom order.
/// RDKit match tuples follow query-atom order, so projecting a match onto
/// these positions yields the atoms of the structural term itself. atoms
/// inside recursive `$(...)` environments are part of their enclosing query
/// atom, not query atoms of their own, and bare organic-subset atoms can
/// never carry a map label
fn tagged_atom_positions(smirks: &str) -> Vec<usize> {
    let mut tagged = Vec::new();
    let mut atom = 0;
    let bytes = smirks.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'[' => {
                let mut brackets = 1;
                let mut parens = 0;
                let mut mapped = false;
                i += 1;
                while i < bytes.len() && brackets > 0 {
                    match bytes[i] {
                        b'[' => brackets += 1,
                        b']' => brackets -= 1,
                        b'(' => parens += 1,
                        b')' => parens -= 1,
                        b':' if brackets == 1
                            && parens == 0
                            && bytes
                                .get(i + 1)
                                .is_some_and(|b| b.is_ascii_digit()) =>
                        {
                            mapped = true;
                        }
                        _ => {}
                    }
                    i += 1;
                }
                if mapped {
                    tagged.push(atom);
                }
                atom += 1;
            }
            b'B' | b'C' | b'N' | b'O' | b'P' | b'S' | b'F' | b'I' | b'b'
            | b'c' | b'n' | b'o' | b'p' | b's' | b'*' => {
                // Cl and Br are two characters
                if matches!(
                    (bytes[i], bytes.get(i + 1).copied()),
                    (b'C', Some(b'l')) | (b'B', Some(b'r'))
                ) {
                    i += 1;
                }
                atom += 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    tagged
}

/// one parameter section of the force field (Bonds, Angles, ProperTorsions,
/// ImproperTorsions, vdW, ...), holding its parameters in document order
struct Handler {
    parameters: Vec<Parameter>,
}

impl Handler {
    /// insert the labels assigned to `mol` by this handler into `assigned`.
    /// last match wins per structural term: the match tuple is projected
    /// onto the parameter's tagged atoms, so parameters of different
    /// pattern arity still contend for the same term, and a term and its
    /// reversal are keyed identically
    fn assign(&self, mol: &ROMol, assigned: &mut HashSet<String>) {
        let mut matches: HashMap<Vec<usize>, &str> = HashMap::new();
        for p in &self.parameters {
            for mat in find_smarts_matches_mol(mol, &p.query) {
                let mut term: Vec<usize> =
                    p.tagged.iter().map(|&i| mat[i]).collect();
                if term.first() > term.last() {
                    term.reverse();
                }
                matches.insert(term, &p.label);
            }
        }
        assigned.extend(matches.into_values().map(str::to_owned));
    }
}

pub struct ForceField {
    handlers: Vec<Handler>,
}

impl ForceField {
    /// load the force field shipped with the crate
    pub fn load() -> Result<Self, Error> {
        Self::from_xml(OFFXML)
    }

    pub fn from_xml(xml: &str) -> Result<Self, Error> {
        let doc = roxmltree::Document::parse(xml)
            .map_err(|e| Error::ForceField(e.to_string()))?;

        let mut handlers = Vec::new();
        for section in doc.root_element().children().filter(|n| n.is_element())
        {
            let mut parameters = Vec::new();
            for node in section.children().filter(|n| n.is_element()) {
                let Some(smirks) = node.attribute("smirks") else {
                    continue;
                };
                let Some(label) =
                    node.attribute("id").or_else(|| node.attribute("name"))
                else {
                    // a parameter nothing can refer to is useless here
                    continue;
                };
                let query = ROMol::from_smarts(smirks).map_err(|e| {
                    Error::ForceField(format!("parameter {label}: {e}"))
                })?;
                parameters.push(Parameter {
                    label: label.to_owned(),
                    query,
                    tagged: tagged_atom_positions(smirks),
                });
            }
            if !parameters.is_empty() {
                handlers.push(Handler { parameters });
            }
        }

        if handlers.is_empty() {
            return Err(Error::ForceField(
                "no parameter sections found".to_owned(),
            ));
        }

        Ok(Self { handlers })
    }

    /// returns the set of parameter labels assigned to the structural terms
    /// of `mol` across all handler sections. typing on a loaded force field
    /// cannot fail; a term no parameter covers is simply not assigned
    pub fn assign_parameters(&self, mol: &ROMol) -> HashSet<String> {
        let mut assigned = HashSet::new();
        for handler in &self.handlers {
            handler.assign(mol, &mut assigned);
        }
        assigned
    }
}
