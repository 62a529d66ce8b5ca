use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::{Range, RangeInclusive};
use std::thread;

use log::{debug, info};

use crate::libs::bitstream::bitstream::BitStream;
use crate::libs::channel_codec::crc::{decode, encode, Polynomial};
use crate::libs::channel_noise::burst_error::{burst_span, corrupt, BurstPolicy};
use crate::libs::error::error::{Error, Result};

/// Outcome of a batch of trials at one burst length. `missed` counts trials whose corrupted
/// codeword decoded to an all-zero remainder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExperimentReport {
    pub burst_len: usize,
    pub missed: usize,
    pub detected: usize,
    pub total: usize,
}

impl ExperimentReport {
    pub fn miss_probability(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.missed as f64 / self.total as f64
        }
    }
}

impl Display for ExperimentReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Burst {:>3}: missed {} of {} trials (P(miss) = {:.6})",
               self.burst_len, self.missed, self.total, self.miss_probability())
    }
}

/// The immutable inputs shared by every trial: the message, the generator and the burst
/// policy. Trials borrow it read-only, so it can be shared across worker threads.
pub struct Experiment {
    message: BitStream,
    divisor: Polynomial,
    len_crc: usize,
    policy: BurstPolicy,
}

impl Experiment {
    pub fn new(message_bytes: &[u8], divisor: Polynomial, len_crc: usize, policy: BurstPolicy) -> Result<Self> {
        if len_crc != divisor.degree() {
            return Err(Error::LengthMismatch { left: len_crc, right: divisor.degree() });
        }
        Ok(Self {
            message: BitStream::from_bytes(message_bytes),
            divisor,
            len_crc,
            policy,
        })
    }

    pub fn codeword_len(&self) -> usize {
        self.message.len() + self.len_crc
    }

    /// Encode, corrupt with a burst at `offset`, decode. True when the remainder is all
    /// zero, i.e. the corruption went unnoticed.
    pub fn run_trial(&self, burst_len: usize, offset: usize) -> Result<bool> {
        let codeword = encode(&self.message, &self.divisor, self.len_crc)?;
        let corrupted = corrupt(codeword, burst_len, offset, &self.policy)?;
        let remainder = decode(&corrupted, &self.divisor, self.len_crc)?;
        remainder.same_bits_as(&BitStream::zeros(self.len_crc))
    }

    /// Sweeps the burst start over offsets [0, trial_count).
    pub fn run(&self, burst_len: usize, trial_count: usize) -> Result<ExperimentReport> {
        self.check_burst_fits(burst_len, trial_count)?;
        let missed = self.count_misses(burst_len, 0..trial_count)?;
        Ok(self.report(burst_len, missed, trial_count))
    }

    /// As `run`, with the offsets split into contiguous chunks across `workers` threads.
    /// Gives the same report as `run`; on failure, the error of the lowest failing offset.
    pub fn run_parallel(&self, burst_len: usize, trial_count: usize, workers: usize) -> Result<ExperimentReport> {
        if workers <= 1 || trial_count <= 1 {
            return self.run(burst_len, trial_count);
        }
        self.check_burst_fits(burst_len, trial_count)?;
        let chunk = (trial_count + workers - 1) / workers;
        let ranges: Vec<Range<usize>> = (0..trial_count)
            .step_by(chunk)
            .map(|start| start..(start + chunk).min(trial_count))
            .collect();
        debug!("Running {} trials over {} workers in chunks of {}", trial_count, ranges.len(), chunk);

        let results: Vec<Result<usize>> = thread::scope(|scope| {
            let handles: Vec<_> = ranges
                .into_iter()
                .map(|offsets| scope.spawn(move || self.count_misses(burst_len, offsets)))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        });

        let mut missed = 0;
        for result in results {
            missed += result?;
        }
        Ok(self.report(burst_len, missed, trial_count))
    }

    /// Runs the experiment once per burst length, to show how the miss rate changes as
    /// bursts grow past the degree of the generator.
    pub fn sweep(&self, burst_lens: RangeInclusive<usize>, trial_count: usize, workers: usize) -> Result<Vec<ExperimentReport>> {
        let mut reports = vec![];
        for burst_len in burst_lens {
            let report = self.run_parallel(burst_len, trial_count, workers)?;
            info!("{}", report);
            reports.push(report);
        }
        Ok(reports)
    }

    fn count_misses(&self, burst_len: usize, offsets: Range<usize>) -> Result<usize> {
        let mut missed = 0;
        for offset in offsets {
            if self.run_trial(burst_len, offset)? {
                debug!("Undetected burst of {} at offset {}", burst_len, offset);
                missed += 1;
            }
        }
        Ok(missed)
    }

    // Every offset in the sweep must leave room for the whole window, otherwise a late trial
    // would fail after earlier ones had already run.
    fn check_burst_fits(&self, burst_len: usize, trial_count: usize) -> Result<()> {
        if burst_len < 2 {
            return Err(Error::InvalidBurstLength(burst_len));
        }
        if trial_count == 0 {
            return Ok(());
        }
        let last_bit = (trial_count - 1)
            .checked_add(burst_span(burst_len, &self.policy) - 1)
            .ok_or(Error::IndexOutOfRange { index: usize::MAX, len: self.codeword_len() })?;
        if last_bit >= self.codeword_len() {
            return Err(Error::IndexOutOfRange { index: last_bit, len: self.codeword_len() });
        }
        Ok(())
    }

    fn report(&self, burst_len: usize, missed: usize, total: usize) -> ExperimentReport {
        ExperimentReport { burst_len, missed, detected: total - missed, total }
    }
}

pub fn run_trial(message_bytes: &[u8], divisor: &Polynomial, len_crc: usize, burst_len: usize, offset: usize) -> Result<bool> {
    Experiment::new(message_bytes, divisor.clone(), len_crc, BurstPolicy::default())?
        .run_trial(burst_len, offset)
}

/// Returns (missed, total) for a sweep of offsets [0, trial_count).
pub fn run_experiment(message_bytes: &[u8], divisor: &Polynomial, len_crc: usize, burst_len: usize, trial_count: usize) -> Result<(usize, usize)> {
    let report = Experiment::new(message_bytes, divisor.clone(), len_crc, BurstPolicy::default())?
        .run(burst_len, trial_count)?;
    Ok((report.missed, report.total))
}

#[cfg(test)]
#[path = "./validator_spec.rs"]
mod validator_spec;
