use crate::error::{InvalidInput, Result};

/// Cost of one node when run with ARCANE enabled, split between the
/// near-memory part and the CPU work that stayed on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfilingSample {
    pub arcane_cost: u64,
    pub cpu_cost: u64,
}

impl ProfilingSample {
    pub const fn new(arcane_cost: u64, cpu_cost: u64) -> Self {
        Self {
            arcane_cost,
            cpu_cost,
        }
    }

    /// Widened so two `u64::MAX` halves still add up exactly.
    pub fn total(&self) -> u128 {
        u128::from(self.arcane_cost) + u128::from(self.cpu_cost)
    }
}

/// Cost of the same node with no ARCANE acceleration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuOnlySample {
    pub cpu_cost: u64,
}

impl CpuOnlySample {
    pub const fn new(cpu_cost: u64) -> Self {
        Self { cpu_cost }
    }
}

pub const ARCANE_PROFILING: [ProfilingSample; 3] = [
    ProfilingSample::new(233410, 3653),
    ProfilingSample::new(36799, 2583),
    ProfilingSample::new(21469, 865),
];

pub const CPU_ONLY_PROFILING: [CpuOnlySample; 3] = [
    CpuOnlySample::new(1484415),
    CpuOnlySample::new(125901),
    CpuOnlySample::new(19449),
];

/// Index-aligned pair of sample tables: node `i` of one side is node `i`
/// of the other.
///
/// A `Dataset` can only be obtained through [`Dataset::new`], so holding one
/// means both sides are non-empty, equally long and every ARCANE total is
/// positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dataset<'a> {
    profiling: &'a [ProfilingSample],
    cpu_only: &'a [CpuOnlySample],
}

impl<'a> Dataset<'a> {
    pub fn new(profiling: &'a [ProfilingSample], cpu_only: &'a [CpuOnlySample]) -> Result<Self> {
        if profiling.is_empty() || cpu_only.is_empty() {
            return Err(InvalidInput::Empty.into());
        }
        if profiling.len() != cpu_only.len() {
            return Err(InvalidInput::LengthMismatch {
                profiling: profiling.len(),
                cpu_only: cpu_only.len(),
            }
            .into());
        }
        if let Some(node) = profiling.iter().position(|s| s.total() == 0) {
            return Err(InvalidInput::ZeroTotal { node }.into());
        }

        Ok(Self {
            profiling,
            cpu_only,
        })
    }

    /// The tables measured on the evaluation machine.
    pub fn builtin() -> Dataset<'static> {
        Dataset {
            profiling: &ARCANE_PROFILING,
            cpu_only: &CPU_ONLY_PROFILING,
        }
    }

    pub fn len(&self) -> usize {
        self.profiling.len()
    }

    /// Always false; construction rejects empty tables.
    pub fn is_empty(&self) -> bool {
        self.profiling.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&'a ProfilingSample, &'a CpuOnlySample)> + 'a {
        self.profiling.iter().zip(self.cpu_only.iter())
    }
}
