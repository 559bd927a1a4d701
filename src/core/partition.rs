// partition.rs - Contiguous locus blocks and the worker pool that runs them

use std::ops::Range;

use rayon::ThreadPoolBuilder;

/// Split of `[0, n_loci)` into one contiguous block per worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    blocks: Vec<Range<usize>>,
    requested: usize,
}

impl Partition {
    /// Blocks of ⌊n/T⌋ loci, the first `n mod T` blocks taking one extra
    ///
    /// More threads than loci collapses to a single block.
    pub fn new(n_loci: usize, threads: usize) -> Self {
        let requested = threads;
        let threads = if threads == 0 || threads > n_loci { 1 } else { threads };

        let base = n_loci / threads;
        let extra = n_loci % threads;
        let mut blocks = Vec::with_capacity(threads);
        let mut start = 0;
        for i in 0..threads {
            let len = base + usize::from(i < extra);
            blocks.push(start..start + len);
            start += len;
        }

        Self { blocks, requested }
    }

    pub fn blocks(&self) -> &[Range<usize>] {
        &self.blocks
    }

    pub fn n_threads(&self) -> usize {
        self.blocks.len()
    }

    pub fn n_loci(&self) -> usize {
        self.blocks.last().map(|b| b.end).unwrap_or(0)
    }

    /// True when fewer threads than requested will run
    pub fn was_clamped(&self) -> bool {
        self.requested != self.blocks.len()
    }
}

/// Run `work` for every locus, one pool thread per block
///
/// Each block owns a disjoint slice of `results`, so workers never contend
/// for a slot.
pub fn run_blocks<R, F>(partition: &Partition, results: &mut [R], work: F) -> Result<(), String>
where
    R: Send,
    F: Fn(usize) -> R + Sync,
{
    if results.len() != partition.n_loci() {
        return Err(format!(
            "Result buffer holds {} loci but the partition covers {}",
            results.len(),
            partition.n_loci()
        ));
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(partition.n_threads())
        .thread_name(|i| format!("ehhscan-worker-{}", i))
        .build()
        .map_err(|e| format!("Failed to build thread pool: {}", e))?;

    let work = &work;
    pool.scope(|scope| {
        let mut rest = results;
        for block in partition.blocks() {
            let (mine, tail) = std::mem::take(&mut rest).split_at_mut(block.len());
            rest = tail;
            let start = block.start;
            scope.spawn(move |_| {
                for (offset, slot) in mine.iter_mut().enumerate() {
                    *slot = work(start + offset);
                }
            });
        }
    });

    Ok(())
}
