//! Small enums and newtypes shared across the workspace.

use std::fmt;

/// A grid axis. Boundary policies are configured independently per axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// The x axis (columns, `0..nx`).
    X,
    /// The y axis (rows, `0..ny`).
    Y,
}

impl Axis {
    /// Both axes in the order boundary treatment is applied.
    ///
    /// Corner cells are touched by both passes; the Y pass runs last and
    /// therefore decides the final corner value.
    pub const ORDER: [Axis; 2] = [Axis::X, Axis::Y];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
        }
    }
}

/// Boundary policy for one axis.
///
/// # Examples
///
/// ```
/// use tmz_core::BoundaryKind;
///
/// // Hosts that toggle with a single key cycle through the modes.
/// let kind = BoundaryKind::Periodic;
/// assert_eq!(kind.next(), BoundaryKind::Absorbing);
/// assert_eq!(kind.next().next(), BoundaryKind::Pec);
/// assert_eq!(kind.next().next().next(), BoundaryKind::Periodic);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    /// Fields wrap to the opposite edge (index modulo the axis length).
    Periodic,
    /// First-order Mur one-way wave extrapolation at the edge.
    Absorbing,
    /// Perfect electric conductor: tangential Ez pinned to zero.
    #[default]
    Pec,
}

impl BoundaryKind {
    /// The next mode in the Periodic → Absorbing → PEC cycle.
    pub fn next(self) -> Self {
        match self {
            Self::Periodic => Self::Absorbing,
            Self::Absorbing => Self::Pec,
            Self::Pec => Self::Periodic,
        }
    }
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Periodic => write!(f, "periodic"),
            Self::Absorbing => write!(f, "absorbing"),
            Self::Pec => write!(f, "pec"),
        }
    }
}

/// Source waveform selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// No excitation; the source contributes nothing.
    Off,
    /// Monochromatic sine at the tuned wavelength.
    #[default]
    Mono,
    /// Repeating Ricker wavelet (second derivative of a Gaussian).
    Ricker,
    /// Hard square wave. Not band-limited at generation time.
    Square,
    /// Hard rising sawtooth. Not band-limited at generation time.
    Sawtooth,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::Mono => write!(f, "sine"),
            Self::Ricker => write!(f, "ricker"),
            Self::Square => write!(f, "square"),
            Self::Sawtooth => write!(f, "sawtooth"),
        }
    }
}

/// How the source sample is written into Ez.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Injection {
    /// Sample is added to the existing cell value (soft source).
    #[default]
    Additive,
    /// Sample overwrites the cell value (hard source).
    Hardwired,
}

impl Injection {
    /// Build from the host's boolean "additive" flag.
    pub fn from_additive(additive: bool) -> Self {
        if additive {
            Self::Additive
        } else {
            Self::Hardwired
        }
    }

    /// Whether this mode adds to the existing value.
    pub fn is_additive(self) -> bool {
        matches!(self, Self::Additive)
    }
}

/// Number of leapfrog cycles taken since the last reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepCount(pub u64);

impl fmt::Display for StepCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StepCount {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
