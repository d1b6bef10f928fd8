use rayon::prelude::*;

/// Occurrence count of every byte value seen in the input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self { counts: [0; 256] }
    }

    /// Count another slice of input into the table.
    pub fn add(&mut self, data: &[u8]) {
        if data.len() > 64_000 {
            self.merge(&par_freqs(data));
        } else {
            data.iter().for_each(|&el| self.counts[el as usize] += 1);
        }
    }

    /// Fold the counts of another table into this one.
    pub fn merge(&mut self, other: &FrequencyTable) {
        self.counts
            .iter_mut()
            .zip(other.counts.iter())
            .for_each(|(a, b)| *a += b);
    }

    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Number of distinct symbols with a non-zero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Sum of all counts, which is the length of the counted input.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Symbols that occurred, with their counts, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(sym, &c)| (sym as u8, c))
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns a frequency count of the input data. Uses parallelism when data set is over 64k.
pub fn freqs(data: &[u8]) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    table.add(data);
    table
}

fn par_freqs(data: &[u8]) -> FrequencyTable {
    // 16k is pretty much the sweet spot for chunk size.
    data.par_chunks(16_000)
        .fold(FrequencyTable::new, |mut freqs, chunk| {
            chunk.iter().for_each(|&el| freqs.counts[el as usize] += 1);
            freqs
        })
        .reduce(FrequencyTable::new, |mut s, f| {
            s.merge(&f);
            s
        })
}
