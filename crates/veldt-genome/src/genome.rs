//! Fixed-length gene sequences with an active-gene pointer.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use veldt_core::{Error, Result};

/// Genes take values in `0..GENE_RANGE`
pub const GENE_RANGE: u8 = 8;

/// An ordered, fixed-length gene sequence.
///
/// The length never changes after creation and the active index is always a
/// valid position in the sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genome {
    genes: Vec<u8>,
    active: usize,
}

impl Genome {
    /// Build a genome with uniformly random genes and a random active index
    pub fn random(length: usize, rng: &mut ChaCha8Rng) -> Result<Self> {
        if length == 0 {
            return Err(Error::InvalidParameters(
                "genome length must be greater than zero".into(),
            ));
        }
        let genes = (0..length).map(|_| rng.gen_range(0..GENE_RANGE)).collect();
        Ok(Self::with_random_active(genes, rng))
    }

    /// Build a genome from explicit genes, validating the gene range
    pub fn from_genes(genes: Vec<u8>, rng: &mut ChaCha8Rng) -> Result<Self> {
        if genes.is_empty() {
            return Err(Error::InvalidParameters(
                "genome length must be greater than zero".into(),
            ));
        }
        if let Some(&bad) = genes.iter().find(|&&g| g >= GENE_RANGE) {
            return Err(Error::InvalidGene(bad));
        }
        Ok(Self::with_random_active(genes, rng))
    }

    fn with_random_active(genes: Vec<u8>, rng: &mut ChaCha8Rng) -> Self {
        let active = rng.gen_range(0..genes.len());
        Self { genes, active }
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn genes(&self) -> &[u8] {
        &self.genes
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Value of the currently active gene
    pub fn active_gene(&self) -> u8 {
        self.genes[self.active]
    }

    /// Advance the active index by one, wrapping at the end
    pub fn advance(&mut self) {
        self.active = (self.active + 1) % self.genes.len();
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for gene in &self.genes {
            write!(f, "{gene}")?;
        }
        Ok(())
    }
}
