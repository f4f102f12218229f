use super::{prune_nested, CandidateKind, Decision, UsageOracle, UsageVerdict};
use crate::discovery::Corpus;
use crate::error::Result;
use crate::progress::ProgressReporter;
use crate::refactor::MutationEngine;
use tracing::{debug, info};

/// Runs one pass of any `CandidateKind` over a corpus snapshot.
///
/// Planning never touches the filesystem. Every verdict is decided against
/// the same snapshot before `commit` applies anything, so a live pass removes
/// exactly what a dry run of the same snapshot reports.
pub struct Sweeper {
    progress: ProgressReporter,
}

impl Sweeper {
    pub fn new(progress: ProgressReporter) -> Self {
        Self { progress }
    }

    /// Decide used/unused for every candidate of `kind`
    pub fn plan(&mut self, kind: &dyn CandidateKind, corpus: &Corpus) -> Result<Vec<Decision>> {
        let candidates = kind.extract(corpus)?;
        let total = candidates.len();
        info!("Checking {} {} candidates against {} files", total, kind.name(), corpus.len());

        let oracle = UsageOracle::new(corpus);
        let mut decisions = Vec::with_capacity(total);
        self.progress.begin(total, kind.name());

        for (index, candidate) in candidates.into_iter().enumerate() {
            let pattern = kind.usage_pattern(&candidate)?;
            let referenced_from = oracle
                .first_reference(&pattern, candidate.declaring_file())
                .map(|p| p.to_path_buf());
            let verdict = if referenced_from.is_some() {
                UsageVerdict::Used
            } else {
                UsageVerdict::Unused
            };

            if let Some(reference) = &referenced_from {
                debug!("{} referenced from {}", candidate.name(), reference.display());
            }
            self.progress
                .record(index, total, &candidate.label(), verdict == UsageVerdict::Used);

            decisions.push(Decision {
                span: kind.span(&candidate),
                candidate,
                verdict,
                referenced_from,
            });
        }

        self.progress.finish();
        Ok(prune_nested(decisions))
    }

    /// Apply the planned removals. Returns how many candidates were removed
    /// (or would be, in a dry run).
    pub fn commit(
        &self,
        kind: &dyn CandidateKind,
        decisions: &[Decision],
        corpus: &Corpus,
        engine: &mut MutationEngine,
    ) -> Result<usize> {
        let unused: Vec<&Decision> = decisions.iter().filter(|d| d.is_unused()).collect();
        if unused.is_empty() {
            return Ok(0);
        }

        // A refused prompt leaves the engine in dry-run mode
        engine.approve(unused.len(), kind.name())?;
        kind.commit(&unused, corpus, engine)
    }
}
