//! minimal safe wrapper over the rdkit-sys C shim, covering only what the
//! labelling pipeline needs: fallible SMILES/SMARTS construction, the OpenFF
//! cleaning sequence, and substructure matching

use std::ffi::{c_uint, CString};

use bitflags::bitflags;
use rdkit_sys::{
    RDKit_ROMol, RDKit_ROMol_delete, RDKit_SmartsToMol, RDKit_SmilesToMol,
};

/// a molecule or compiled substructure query failed to build from its text
/// representation
#[derive(Debug, PartialEq, thiserror::Error)]
#[error("RDKit could not parse {kind} {text:?}")]
pub struct RDError {
    kind: &'static str,
    text: String,
}

pub struct ROMol(*mut RDKit_ROMol);

// an ROMol is only mutated during construction and cleaning; afterwards the
// workers only run read-only substructure queries against it
unsafe impl Send for ROMol {}
unsafe impl Sync for ROMol {}

impl ROMol {
    pub fn from_smiles(smiles: &str) -> Result<Self, RDError> {
        let err = || RDError {
            kind: "SMILES",
            text: smiles.to_owned(),
        };
        let s = CString::new(smiles).map_err(|_| err())?;
        let inner = unsafe { RDKit_SmilesToMol(s.as_ptr()) };
        if inner.is_null() {
            return Err(err());
        }
        Ok(Self(inner))
    }

    pub fn from_smarts(smarts: &str) -> Result<Self, RDError> {
        let err = || RDError {
            kind: "SMARTS",
            text: smarts.to_owned(),
        };
        let s = CString::new(smarts).map_err(|_| err())?;
        let inner = unsafe { RDKit_SmartsToMol(s.as_ptr()) };
        if inner.is_null() {
            return Err(err());
        }
        Ok(Self(inner))
    }

    /// prepare a parsed molecule the way the OpenFF toolkit does before
    /// parameter assignment: sanitize without adjusting hydrogens or
    /// rewriting aromaticity, apply the MDL aromaticity model, assign
    /// stereochemistry, and make all hydrogens explicit. explicit hydrogens
    /// matter because both the group patterns and the force-field SMIRKS
    /// refer to `[#1]` atoms directly
    pub fn openff_clean(&mut self) {
        self.sanitize(
            SanitizeFlags::ALL
                ^ SanitizeFlags::ADJUSTHS
                ^ SanitizeFlags::SETAROMATICITY,
        );
        self.set_aromaticity(AromaticityModel::MDL);
        self.assign_stereochemistry();
        self.add_hs();
    }

    fn sanitize(&mut self, ops: SanitizeFlags) {
        unsafe {
            rdkit_sys::RDKit_SanitizeMol(self.0, ops.bits());
        }
    }

    fn set_aromaticity(&mut self, mdl: AromaticityModel) {
        unsafe {
            rdkit_sys::RDKit_SetAromaticity(self.0, mdl.bits());
        }
    }

    fn assign_stereochemistry(&mut self) {
        unsafe {
            rdkit_sys::RDKit_AssignStereochemistry(self.0);
        }
    }

    fn add_hs(&mut self) {
        unsafe {
            rdkit_sys::RDKit_AddHs(self.0);
        }
    }
}

impl Drop for ROMol {
    fn drop(&mut self) {
        unsafe {
            RDKit_ROMol_delete(self.0);
        }
    }
}

bitflags! {
    pub struct SanitizeFlags: c_uint {
        const NONE =                    0x0;
        const CLEANUP =                 0x1;
        const PROPERTIES =              0x2;
        const SYMMRINGS =               0x4;
        const KEKULIZE =                0x8;
        const FINDRADICALS =            0x10;
        const SETAROMATICITY =          0x20;
        const SETCONJUGATION =          0x40;
        const SETHYBRIDIZATION =        0x80;
        const CLEANUPCHIRALITY =        0x100;
        const ADJUSTHS =                0x200;
        const CLEANUP_ORGANOMETALLICS = 0x400;
        const ALL =                     0xFFFFFFF;
    }
}

bitflags! {
    pub struct AromaticityModel: c_uint {
        const DEFAULT = 0x0;
        const RDKIT = 0x1;
        const SIMPLE = 0x2;
        const MDL = 0x4;
        const CUSTOM = 0xFFFFFFF;
    }
}

/// returns the atom indices of every occurrence of the compiled query
/// `smarts` in `mol`, one `Vec` per occurrence. an empty result means the
/// pattern does not match at all
pub fn find_smarts_matches_mol(mol: &ROMol, smarts: &ROMol) -> Vec<Vec<usize>> {
    let mut len = 0;
    let mut match_size = 0;
    unsafe {
        let matches = rdkit_sys::find_smarts_matches_mol(
            mol.0,
            smarts.0,
            &mut len,
            &mut match_size,
        );
        if matches.is_null() || len == 0 || match_size == 0 {
            return Vec::new();
        }
        let matches = Vec::from_raw_parts(matches, len, len);

        let mut ret = Vec::new();
        for mat in matches.chunks(match_size) {
            ret.push(mat.iter().map(|&x| x as usize).collect());
        }
        ret
    }
}
