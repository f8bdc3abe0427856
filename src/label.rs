//! single-molecule labelling: one SMILES string in, one fixed-schema record
//! (or a skip) out

use log::debug;

use crate::{
    catalog::Catalog,
    forcefield::ForceField,
    rdkit::{find_smarts_matches_mol, ROMol},
};

/// per-molecule result, with one boolean per catalog field in column order.
/// `count` always equals the number of set fields
#[derive(Clone, Debug, PartialEq)]
pub struct LabelRecord {
    pub smiles: String,
    fields: Vec<bool>,
    count: usize,
}

impl LabelRecord {
    pub fn new(smiles: String, nfields: usize) -> Self {
        Self {
            smiles,
            fields: vec![false; nfields],
            count: 0,
        }
    }

    /// set field `idx`. setting a field twice counts it once
    pub fn set(&mut self, idx: usize) {
        if !self.fields[idx] {
            self.fields[idx] = true;
            self.count += 1;
        }
    }

    pub fn fields(&self) -> &[bool] {
        &self.fields
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

/// label one SMILES string against the catalog and force field. returns
/// `None` for input that cannot be labelled: unparseable strings and
/// molecules containing wildcard atoms. both are skips, not errors
pub fn label_molecule(
    smiles: &str,
    catalog: &Catalog,
    forcefield: &ForceField,
) -> Option<LabelRecord> {
    let mut mol = match ROMol::from_smiles(smiles) {
        Ok(mol) => mol,
        Err(e) => {
            debug!("skipping: {e}");
            return None;
        }
    };

    if catalog.has_wildcard_atom(&mol) {
        debug!("skipping {smiles}: contains a wildcard atom");
        return None;
    }

    mol.openff_clean();

    let mut record = LabelRecord::new(smiles.to_owned(), catalog.len());
    for (i, group) in catalog.groups().iter().enumerate() {
        if !find_smarts_matches_mol(&mol, &group.query).is_empty() {
            record.set(i);
        }
    }

    for label in forcefield.assign_parameters(&mol) {
        if let Some(i) = catalog.field_index(&label) {
            record.set(i);
        }
    }

    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures() -> (Catalog, ForceField) {
        (Catalog::load().unwrap(), ForceField::load().unwrap())
    }

    #[test]
    fn count_tracks_set_fields() {
        let mut rec = LabelRecord::new("C".to_owned(), 4);
        assert_eq!(rec.count(), 0);
        rec.set(1);
        rec.set(3);
        rec.set(1); // idempotent
        assert_eq!(rec.count(), 2);
        assert_eq!(rec.fields(), [false, true, false, true]);
        let ntrue = rec.fields().iter().filter(|&&b| b).count();
        assert_eq!(rec.count(), ntrue);
    }

    #[test]
    fn unparseable_input_is_skipped() {
        let (cat, ff) = fixtures();
        assert!(label_molecule("not-a-smiles", &cat, &ff).is_none());
        assert!(label_molecule("C(C", &cat, &ff).is_none());
    }

    #[test]
    fn wildcard_molecules_are_skipped() {
        let (cat, ff) = fixtures();
        assert!(label_molecule("C*", &cat, &ff).is_none());
        assert!(label_molecule("*", &cat, &ff).is_none());
    }

    #[test]
    fn ethanol_matches_nothing_rare() {
        let (cat, ff) = fixtures();
        let rec = label_molecule("CCO", &cat, &ff).unwrap();
        assert_eq!(rec.count(), 0);
        assert_eq!(rec.smiles, "CCO");
    }

    #[test]
    fn thioketone_group_is_detected() {
        let (cat, ff) = fixtures();
        let rec = label_molecule("CC(=S)C", &cat, &ff).unwrap();
        let i = cat.field_index("Thioketone").unwrap();
        assert!(rec.fields()[i]);
        assert!(rec.count() >= 1);
    }

    #[test]
    fn rare_parameters_are_detected() {
        let (cat, ff) = fixtures();

        // methanesulfenyl fluoride: S-F bond (b47) plus the Sulfenic Acid
        // Halide group
        let rec = label_molecule("CSF", &cat, &ff).unwrap();
        assert!(rec.fields()[cat.field_index("b47").unwrap()]);
        assert!(rec.fields()[cat.field_index("Sulfenic Acid Halide").unwrap()]);
        assert!(rec.count() >= 2);

        // bromamine: N-Br bond (b78)
        let rec = label_molecule("NBr", &cat, &ff).unwrap();
        assert!(rec.fields()[cat.field_index("b78").unwrap()]);

        // 1,2-dichloroethane: Cl-C-C-Cl torsion (t7)
        let rec = label_molecule("ClCCCl", &cat, &ff).unwrap();
        assert!(rec.fields()[cat.field_index("t7").unwrap()]);
    }

    #[test]
    fn undefined_stereo_is_allowed() {
        let (cat, ff) = fixtures();
        // bromochlorofluoromethane with unspecified chirality
        assert!(label_molecule("FC(Cl)Br", &cat, &ff).is_some());
    }

    #[test]
    fn count_invariant_holds_for_labelled_molecules() {
        let (cat, ff) = fixtures();
        for smiles in ["CCO", "CSF", "CC(=S)C", "ClCCCl", "c1ccccc1"] {
            let rec = label_molecule(smiles, &cat, &ff).unwrap();
            let ntrue = rec.fields().iter().filter(|&&b| b).count();
            assert_eq!(rec.count(), ntrue, "count mismatch for {smiles}");
        }
    }
}
