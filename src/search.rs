//! batch orchestration: fan the labeller out over a worker pool, then rank
//! and filter the surviving records

use std::cmp::Reverse;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::{
    catalog::Catalog,
    forcefield::ForceField,
    label::{label_molecule, LabelRecord},
    load_smiles,
    report::{create_parent_dir, write_counts, write_full, write_smiles},
    Error,
};

/// a full selection run: everything between argument parsing and process
/// exit. validation happens before any directory creation, input loading,
/// or labelling
pub struct Selection {
    pub input: PathBuf,
    pub output: PathBuf,
    pub only_top_n: i64,
    pub nproc: usize,
    pub output_count: Option<PathBuf>,
    pub output_full: Option<PathBuf>,
    pub count_threshold: i64,
}

impl Selection {
    pub fn run(&self) -> Result<(), Error> {
        if self.only_top_n == 0 {
            return Err(Error::InvalidTopN);
        }

        create_parent_dir(&self.output)?;
        for path in
            [&self.output_count, &self.output_full].into_iter().flatten()
        {
            create_parent_dir(path)?;
        }

        let smiles = load_smiles(&self.input)?;
        let catalog = Catalog::load()?;
        let forcefield = ForceField::load()?;

        let records =
            search_all(&smiles, &catalog, &forcefield, self.nproc)?;
        if records.is_empty() {
            println!(
                "No valid matches found -- skipping writing to {}",
                self.output.display()
            );
            return Ok(());
        }

        let records =
            finalize(records, self.count_threshold, self.only_top_n);

        write_smiles(&self.output, &records)?;
        println!(
            "Wrote {} molecules to {}",
            records.len(),
            self.output.display()
        );

        if let Some(path) = &self.output_count {
            let totals = column_totals(&records, &catalog);
            write_counts(path, &totals)?;
            println!("Wrote counts to {}", path.display());
        }

        if let Some(path) = &self.output_full {
            write_full(path, &records, &catalog)?;
            println!(
                "Wrote {} molecules and matches to {} groups to {}",
                records.len(),
                catalog.len(),
                path.display()
            );
        }

        Ok(())
    }
}

/// label every SMILES string on a pool of `nproc` worker threads, dropping
/// the skips. `nproc` of 1 runs fully sequentially; 0 uses every logical
/// CPU. the workers share only the read-only catalog and force field, and
/// the result order is the input order regardless of thread count
pub fn search_all(
    smiles: &[String],
    catalog: &Catalog,
    forcefield: &ForceField,
    nproc: usize,
) -> Result<Vec<LabelRecord>, Error> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(nproc)
        .build()
        .map_err(|e| Error::Workers(e.to_string()))?;

    let total = smiles.len();
    let interval = (total / 100).max(1);
    let progress = AtomicUsize::new(0);

    let records = pool.install(|| {
        smiles
            .par_iter()
            .filter_map(|s| {
                let cur = progress.fetch_add(1, Ordering::Relaxed);
                if cur % interval == 0 {
                    eprintln!("matching molecules: {cur}/{total}");
                }
                label_molecule(s, catalog, forcefield)
            })
            .collect()
    });

    Ok(records)
}

/// sort descending by match count (stable, so ties keep their arrival
/// order), drop records below `count_threshold`, and truncate to the top
/// `only_top_n` when it is positive. a negative `only_top_n` keeps
/// everything; zero is rejected before any batch work starts
pub fn finalize(
    mut records: Vec<LabelRecord>,
    count_threshold: i64,
    only_top_n: i64,
) -> Vec<LabelRecord> {
    records.sort_by_key(|r| Reverse(r.count()));
    records.retain(|r| r.count() as i64 >= count_threshold);
    if only_top_n > 0 {
        records.truncate(only_top_n as usize);
    }
    records
}

/// column-wise totals over the boolean fields of `records`, in catalog
/// field order. computed on the final filtered and truncated set
pub fn column_totals<'a>(
    records: &[LabelRecord],
    catalog: &'a Catalog,
) -> Vec<(&'a str, usize)> {
    let mut totals = vec![0; catalog.len()];
    for record in records {
        for (total, &set) in totals.iter_mut().zip(record.fields()) {
            *total += set as usize;
        }
    }
    catalog
        .fields()
        .iter()
        .map(String::as_str)
        .zip(totals)
        .collect()
}
