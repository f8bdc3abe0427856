//! select molecules whose chemistry is underrepresented in existing
//! training data. each input SMILES is matched against a catalog of named
//! functional-group patterns and a list of low-coverage force-field
//! parameters; molecules hitting enough rare fields are ranked and written
//! out for data-generation campaigns

use std::{io, path::Path};

pub mod catalog;
pub mod forcefield;
pub mod label;
pub mod rdkit;
pub mod report;
pub mod search;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("-n/--only-top-n cannot be 0")]
    InvalidTopN,

    #[error("invalid catalog: {0}")]
    Catalog(String),

    #[error("invalid force field: {0}")]
    ForceField(String),

    #[error("failed to build the worker pool: {0}")]
    Workers(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// load a sequence of newline-separated SMILES strings from `path`. blank
/// lines are ignored; order and duplicates are preserved
pub fn load_smiles(path: impl AsRef<Path>) -> io::Result<Vec<String>> {
    Ok(std::fs::read_to_string(path)?
        .lines()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_smiles_skips_blank_lines_and_keeps_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.smi");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "CCO\n\n  \nCSF\nCCO\n").unwrap();
        drop(f);

        let got = load_smiles(&path).unwrap();
        assert_eq!(got, ["CCO", "CSF", "CCO"]);
    }

    #[test]
    fn load_smiles_on_a_missing_file_is_an_io_error() {
        assert!(load_smiles("no-such-file.smi").is_err());
    }

    /// the full pipeline minus the CLI: load, label, rank, write. run twice
    /// with one worker to check the outputs are byte-identical
    #[test]
    fn full_pipeline() {
        use crate::{
            catalog::Catalog,
            forcefield::ForceField,
            report::{write_counts, write_full, write_smiles},
            search::{column_totals, finalize, search_all},
        };

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.smi");
        std::fs::write(&input, "CCO\nnot-a-smiles\nCSF\nC*\nNBr\n").unwrap();

        let catalog = Catalog::load().unwrap();
        let forcefield = ForceField::load().unwrap();

        let mut outputs = Vec::new();
        for pass in 0..2 {
            let smiles = load_smiles(&input).unwrap();
            let records =
                search_all(&smiles, &catalog, &forcefield, 1).unwrap();
            // the unparseable line and the wildcard line are dropped
            assert_eq!(records.len(), 3);

            let records = finalize(records, 1, -1);
            // ethanol matches nothing rare and falls below the threshold
            let got: Vec<_> =
                records.iter().map(|r| r.smiles.as_str()).collect();
            assert_eq!(got, ["CSF", "NBr"]);

            let out = dir.path().join(format!("out{pass}.smi"));
            let counts = dir.path().join(format!("counts{pass}.csv"));
            let full = dir.path().join(format!("full{pass}.csv"));
            write_smiles(&out, &records).unwrap();
            write_counts(&counts, &column_totals(&records, &catalog))
                .unwrap();
            write_full(&full, &records, &catalog).unwrap();
            outputs.push((
                std::fs::read(&out).unwrap(),
                std::fs::read(&counts).unwrap(),
                std::fs::read(&full).unwrap(),
            ));
        }
        assert_eq!(outputs[0], outputs[1]);
    }
}
