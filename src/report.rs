//! output writers. pure serialization of the final record set: the plain
//! SMILES list, the per-field count summary, and the full match matrix

use std::{
    fs::File,
    io::{self, Write},
    path::Path,
};

use crate::{catalog::Catalog, label::LabelRecord};

/// create the parent directory of `path` if it is missing. called for every
/// requested output path before any batch work starts
pub fn create_parent_dir(path: impl AsRef<Path>) -> io::Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// write the surviving SMILES strings, one per line with no trailing
/// newline, matching the original selection tool byte for byte
pub fn write_smiles(
    path: impl AsRef<Path>,
    records: &[LabelRecord],
) -> io::Result<()> {
    let smiles: Vec<&str> =
        records.iter().map(|r| r.smiles.as_str()).collect();
    std::fs::write(path, smiles.join("\n"))
}

/// write the headerless `field-name,total` summary CSV
pub fn write_counts(
    path: impl AsRef<Path>,
    totals: &[(&str, usize)],
) -> io::Result<()> {
    let mut f = File::create(path)?;
    for (name, total) in totals {
        writeln!(f, "{name},{total}")?;
    }
    Ok(())
}

/// write the full match matrix as CSV: a `SMILES,Count,<fields...>` header
/// and one row per record with booleans rendered as `true`/`false`
pub fn write_full(
    path: impl AsRef<Path>,
    records: &[LabelRecord],
    catalog: &Catalog,
) -> io::Result<()> {
    let mut f = File::create(path)?;
    write!(f, "SMILES,Count")?;
    for name in catalog.fields() {
        write!(f, ",{name}")?;
    }
    writeln!(f)?;

    for record in records {
        write!(f, "{},{}", record.smiles, record.count())?;
        for set in record.fields() {
            write!(f, ",{set}")?;
        }
        writeln!(f)?;
    }
    Ok(())
}
