//! Equivalence harness: every vector kernel against the scalar reference.
//!
//! Each [`Scenario`] is run through a [`Kernel`] and through
//! [`rej_uniform_scalar`]; the outcome is a [`ScenarioReport`] naming the
//! first diverging index if anything differs. A failure never stops the
//! battery. The fixed-width kernel's dropped tail is classified as a
//! [`Verdict::TailGap`], not a failure, as long as everything it did produce
//! matches the scalar reference over the aligned prefix.

use core::fmt::{self, Display};

use rej_math::{
    COMPACTION_TABLE, FIXED_GROUP_BYTES, VectorLength, rej_uniform_fixed, rej_uniform_scalar,
    rej_uniform_vla_lanes,
};
use tracing::{debug, warn};

use crate::N;

/// Value mismatches recorded per report; the rest are only counted.
pub const MAX_REPORTED: usize = 5;

/// One input buffer plus, optionally, the count the scalar reference must
/// produce for it.
#[derive(Clone, Debug)]
pub struct Scenario {
    pub name: &'static str,
    pub input: Vec<u8>,
    pub expected_count: Option<usize>,
}

impl Scenario {
    #[must_use]
    pub fn new(name: &'static str, input: Vec<u8>) -> Self {
        Self {
            name,
            input,
            expected_count: None,
        }
    }

    #[must_use]
    pub fn expect_count(mut self, count: usize) -> Self {
        self.expected_count = Some(count);
        self
    }
}

/// The reference battery.
#[must_use]
pub fn battery() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "basic: 768 bytes, all candidates in range",
            (0..3 * N).map(|i| (i % 128) as u8).collect(),
        )
        .expect_count(N),
        Scenario::new(
            "rejections: 240 bytes of {ff, ff, 80, i % 64}",
            (0..240usize)
                .map(|i| match i % 4 {
                    0 | 1 => 0xFF,
                    2 => 0x80,
                    _ => (i % 64) as u8,
                })
                .collect(),
        ),
        Scenario::new("small input: 24 bytes = 8 candidates", (0..24).collect()).expect_count(8),
        Scenario::new("all rejected: 48 bytes of ff", vec![0xFF; 48]).expect_count(0),
        Scenario::new(
            "tail bytes: 300 bytes, not a multiple of 24",
            (0..300usize).map(|i| (i % 128) as u8).collect(),
        ),
    ]
}

/// A vector kernel under test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kernel {
    FixedWidth,
    VariableLength(VectorLength),
}

impl Kernel {
    /// The fixed-width kernel followed by every variable length.
    pub fn all() -> impl Iterator<Item = Self> {
        core::iter::once(Self::FixedWidth).chain(VectorLength::ALL.map(Self::VariableLength))
    }

    /// Whether the kernel leaves a partial trailing group unexamined.
    #[must_use]
    pub const fn drops_tail(self) -> bool {
        matches!(self, Self::FixedWidth)
    }

    pub fn run(self, r: &mut [i32], buf: &[u8]) -> usize {
        let table = &COMPACTION_TABLE;
        match self {
            Self::FixedWidth => rej_uniform_fixed(r, buf, table),
            Self::VariableLength(VectorLength::L8) => rej_uniform_vla_lanes::<8>(r, buf, table),
            Self::VariableLength(VectorLength::L16) => rej_uniform_vla_lanes::<16>(r, buf, table),
            Self::VariableLength(VectorLength::L32) => rej_uniform_vla_lanes::<32>(r, buf, table),
            Self::VariableLength(VectorLength::L64) => rej_uniform_vla_lanes::<64>(r, buf, table),
        }
    }
}

impl Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FixedWidth => f.write_str("fixed-width"),
            Self::VariableLength(vl) => write!(f, "variable-length/{vl}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mismatch {
    /// Scalar reference disagrees with the scenario's expected count.
    UnexpectedCount { expected: usize, actual: usize },
    /// Kernel count differs from the scalar count beyond any allowed gap.
    Count { reference: usize, kernel: usize },
    /// Coefficient at `index` differs.
    Value {
        index: usize,
        reference: i32,
        kernel: i32,
    },
}

impl Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::UnexpectedCount { expected, actual } => {
                write!(f, "unexpected count: scalar={actual}, expected {expected}")
            }
            Self::Count { reference, kernel } => write!(
                f,
                "count mismatch: kernel={kernel}, scalar={reference} (delta={})",
                reference as isize - kernel as isize
            ),
            Self::Value {
                index,
                reference,
                kernel,
            } => write!(f, "mismatch at index {index}: kernel={kernel}, scalar={reference}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    /// Fixed-width kernel under-counted by exactly the accepted candidates of
    /// the unprocessed tail.
    TailGap { missing: usize },
    /// `mismatches` keeps the count problems and the first value mismatches,
    /// at most [`MAX_REPORTED`] entries; `total` counts every problem.
    Fail {
        mismatches: Vec<Mismatch>,
        total: usize,
    },
}

impl Verdict {
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Fail { .. })
    }

    /// First coefficient index at which the kernel diverged: the earliest
    /// differing value, or for a count mismatch the shorter of the two counts.
    /// `None` when only the scenario's expected count was wrong.
    #[must_use]
    pub fn first_divergence(&self) -> Option<usize> {
        match self {
            Self::Fail { mismatches, .. } => mismatches
                .iter()
                .filter_map(|m| match *m {
                    Mismatch::Value { index, .. } => Some(index),
                    Mismatch::Count { reference, kernel } => Some(reference.min(kernel)),
                    Mismatch::UnexpectedCount { .. } => None,
                })
                .min(),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ScenarioReport {
    pub scenario: &'static str,
    pub kernel: Kernel,
    pub input_len: usize,
    pub reference_count: usize,
    pub kernel_count: usize,
    pub verdict: Verdict,
}

impl Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] {}", self.kernel, self.scenario)?;
        writeln!(
            f,
            "  kernel: {} coefficients, scalar: {} coefficients",
            self.kernel_count, self.reference_count
        )?;
        match &self.verdict {
            Verdict::Pass => writeln!(f, "  PASSED"),
            Verdict::TailGap { missing } => writeln!(
                f,
                "  EXPECTED GAP: {missing} coefficients in the unprocessed {}-byte tail",
                self.input_len % FIXED_GROUP_BYTES
            ),
            Verdict::Fail { mismatches, total } => {
                for m in mismatches {
                    writeln!(f, "  ERROR: {m}")?;
                }
                writeln!(f, "  FAILED with {total} errors")
            }
        }
    }
}

/// Run one scenario through `kernel` and the scalar reference.
#[must_use]
pub fn run_scenario(scenario: &Scenario, kernel: Kernel) -> ScenarioReport {
    let input = scenario.input.as_slice();
    let mut reference = [0i32; N];
    let mut output = [0i32; N];
    let reference_count = rej_uniform_scalar(&mut reference, input);
    let kernel_count = kernel.run(&mut output, input);

    ScenarioReport {
        scenario: scenario.name,
        kernel,
        input_len: input.len(),
        reference_count,
        kernel_count,
        verdict: compare(
            scenario,
            kernel,
            &reference[..reference_count],
            &output[..kernel_count],
        ),
    }
}

/// Classify a kernel's output against the scalar reference for `scenario`.
///
/// `reference` and `output` are the filled prefixes, so their lengths are the
/// two accepted counts.
#[must_use]
pub fn compare(scenario: &Scenario, kernel: Kernel, reference: &[i32], output: &[i32]) -> Verdict {
    let (reference_count, kernel_count) = (reference.len(), output.len());
    let mut mismatches = Vec::new();
    let mut total = 0;

    if let Some(expected) = scenario.expected_count {
        if expected != reference_count {
            mismatches.push(Mismatch::UnexpectedCount {
                expected,
                actual: reference_count,
            });
            total += 1;
        }
    }

    let gap = tail_gap(kernel, &scenario.input, reference_count, kernel_count);
    if kernel_count != reference_count && gap.is_none() {
        mismatches.push(Mismatch::Count {
            reference: reference_count,
            kernel: kernel_count,
        });
        total += 1;
    }

    for (index, (&r, &k)) in reference.iter().zip(output).enumerate() {
        if r != k {
            total += 1;
            if mismatches.len() < MAX_REPORTED {
                mismatches.push(Mismatch::Value {
                    index,
                    reference: r,
                    kernel: k,
                });
            }
        }
    }

    match (mismatches.is_empty(), gap) {
        (true, None) => Verdict::Pass,
        (true, Some(missing)) => Verdict::TailGap { missing },
        (false, _) => Verdict::Fail { mismatches, total },
    }
}

/// Size of an allowed fixed-width under-count, if this is one.
///
/// Allowed only when the input has a partial trailing group and the kernel
/// produced exactly what the scalar reference produces over the aligned
/// prefix.
fn tail_gap(
    kernel: Kernel, input: &[u8], reference_count: usize, kernel_count: usize,
) -> Option<usize> {
    let tail = input.len() % FIXED_GROUP_BYTES;
    if !kernel.drops_tail() || tail == 0 || kernel_count >= reference_count {
        return None;
    }
    let mut prefix = [0i32; N];
    let aligned_count = rej_uniform_scalar(&mut prefix, &input[..input.len() - tail]);
    (aligned_count == kernel_count).then(|| reference_count - kernel_count)
}

/// Outcome of a whole battery.
#[derive(Clone, Debug, Default)]
pub struct Summary {
    pub reports: Vec<ScenarioReport>,
}

impl Summary {
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(|v| matches!(v, Verdict::Pass))
    }

    #[must_use]
    pub fn tail_gaps(&self) -> usize {
        self.count(|v| matches!(v, Verdict::TailGap { .. }))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(Verdict::is_failure)
    }

    fn count(&self, pred: impl Fn(&Verdict) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.verdict)).count()
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} scenarios: {} passed, {} expected tail gaps, {} failed",
            self.reports.len(),
            self.passed(),
            self.tail_gaps(),
            self.failed()
        )
    }
}

/// One-line list of the kernels a battery run covers.
#[must_use]
pub fn kernel_banner(kernels: &[Kernel]) -> String {
    let names: Vec<String> = kernels.iter().map(Kernel::to_string).collect();
    format!("kernels under test: {}", names.join(", "))
}

/// Run every scenario through every kernel.
#[must_use]
pub fn run_battery(scenarios: &[Scenario], kernels: &[Kernel]) -> Summary {
    let mut summary = Summary::default();
    for &kernel in kernels {
        for scenario in scenarios {
            debug!(%kernel, scenario = scenario.name, len = scenario.input.len(), "running");
            let report = run_scenario(scenario, kernel);
            if let Verdict::Fail { total, .. } = &report.verdict {
                warn!(
                    %kernel,
                    scenario = scenario.name,
                    errors = *total,
                    first = ?report.verdict.first_divergence(),
                    "equivalence failure"
                );
            }
            summary.reports.push(report);
        }
    }
    summary
}
