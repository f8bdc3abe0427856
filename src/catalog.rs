//! the embedded rare-chemistry catalog: named functional-group patterns and
//! low-coverage force-field parameter ids, loaded once per run and shared
//! read-only with every worker

use std::collections::HashMap;

use serde::Deserialize;

use crate::{
    rdkit::{find_smarts_matches_mol, ROMol},
    Error,
};

/// catalog payload shipped with the crate. versioned together with
/// `data/openff-2.2.0.offxml`: the parameter ids in one are only meaningful
/// against the parameter table in the other
static CATALOG_TOML: &str = include_str!("../data/catalog.toml");

#[derive(Deserialize)]
struct RawCatalog {
    parameters: Vec<String>,
    groups: Vec<RawGroup>,
}

#[derive(Deserialize)]
struct RawGroup {
    name: String,
    smirks: String,
}

/// a functional-group pattern with its compiled substructure query
pub struct Group {
    pub name: String,
    pub query: ROMol,
}

pub struct Catalog {
    groups: Vec<Group>,
    parameters: Vec<String>,
    /// every record field in column order: group names first, then
    /// parameter ids
    fields: Vec<String>,
    index: HashMap<String, usize>,
    /// compiled `[#0]` query for rejecting molecules with dummy atoms
    wildcard: ROMol,
}

impl Catalog {
    /// load the catalog shipped with the crate
    pub fn load() -> Result<Self, Error> {
        Self::from_toml(CATALOG_TOML)
    }

    pub fn from_toml(s: &str) -> Result<Self, Error> {
        let raw: RawCatalog =
            toml::from_str(s).map_err(|e| Error::Catalog(e.to_string()))?;

        let mut groups = Vec::with_capacity(raw.groups.len());
        for RawGroup { name, smirks } in raw.groups {
            let query = ROMol::from_smarts(&smirks).map_err(|e| {
                Error::Catalog(format!("group {name}: {e}"))
            })?;
            groups.push(Group { name, query });
        }

        let mut fields = Vec::with_capacity(groups.len() + raw.parameters.len());
        let mut index = HashMap::new();
        for name in groups
            .iter()
            .map(|g| &g.name)
            .chain(raw.parameters.iter())
        {
            if index.insert(name.clone(), fields.len()).is_some() {
                return Err(Error::Catalog(format!("duplicate field {name}")));
            }
            fields.push(name.clone());
        }

        // unwrap safe: the pattern is a fixed literal
        let wildcard = ROMol::from_smarts("[#0]").unwrap();

        Ok(Self {
            groups,
            parameters: raw.parameters,
            fields,
            index,
            wildcard,
        })
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// the column position of a field name, either a group name or a
    /// parameter id
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// total number of boolean fields in a record
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// reports whether `mol` contains any wildcard (atomic number 0) atom.
    /// such molecules cannot be typed and are skipped
    pub fn has_wildcard_atom(&self, mol: &ROMol) -> bool {
        !find_smarts_matches_mol(mol, &self.wildcard).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_loads() {
        let cat = Catalog::load().unwrap();
        assert_eq!(cat.groups().len(), 38);
        assert_eq!(cat.parameters().len(), 32);
        assert_eq!(cat.len(), 70);

        // schema order: groups first, then parameter ids
        assert_eq!(cat.fields()[0], "Acyl Bromide");
        assert_eq!(cat.field_index("Thiolactam"), Some(37));
        assert_eq!(cat.field_index("b83"), Some(38));
        assert_eq!(cat.field_index("t164"), Some(69));
        assert_eq!(cat.field_index("b1"), None);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let toml = r#"
            parameters = ["b1", "b1"]

            [[groups]]
            name = "Thioketone"
            smirks = "[#6X3:1](=[#16X1:2])(-[#6])-[#6]"
        "#;
        assert!(matches!(
            Catalog::from_toml(toml),
            Err(Error::Catalog(_))
        ));
    }

    #[test]
    fn bad_smirks_is_rejected() {
        let toml = r#"
            parameters = []

            [[groups]]
            name = "Broken"
            smirks = "[#6:1]("
        "#;
        assert!(matches!(
            Catalog::from_toml(toml),
            Err(Error::Catalog(_))
        ));
    }

    #[test]
    fn wildcard_detection() {
        let cat = Catalog::load().unwrap();
        assert!(cat.has_wildcard_atom(&ROMol::from_smiles("C*").unwrap()));
        assert!(!cat.has_wildcard_atom(&ROMol::from_smiles("CCO").unwrap()));
    }
}
