//! Uniform medium: relative permittivity and permeability plus optional
//! ohmic loss parameterised by a skin length.
//!
//! The loss is expressed through the dimensionless product `σ·Δ`, so the
//! update coefficients do not depend on the absolute cell size.

use std::f64::consts::TAU;

use tmz_core::constants::vacuum_impedance;
use tmz_core::ConfigError;

/// Per-cell update coefficients of the lossy Yee scheme.
///
/// ```text
/// Hx -= chxe·∂yEz        Hy += chye·∂xEz
/// Ez  = ceze·Ez + cezh·(∂xHy − ∂yHx)
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpdateCoefficients {
    /// Ez self-coefficient, `(1 − L)/(1 + L)`.
    pub ceze: f64,
    /// Ez curl coefficient, `S·η0/εr/(1 + L)`.
    pub cezh: f64,
    /// Hx curl coefficient, `S/(μr·η0)`.
    pub chxe: f64,
    /// Hy curl coefficient, `S/(μr·η0)`.
    pub chye: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Damping {
    skin_length: f64,
    ppw: f64,
}

/// Vacuum or uniformly lossy medium.
#[derive(Clone, Debug, PartialEq)]
pub struct DampingMedium {
    mu_r: f64,
    eps_r: f64,
    damping: Option<Damping>,
}

impl DampingMedium {
    /// Shortest accepted skin length, in grid points.
    pub const MIN_SKIN_LENGTH: f64 = 1.0;

    /// Lossless free space.
    pub fn vacuum() -> Self {
        Self {
            mu_r: 1.0,
            eps_r: 1.0,
            damping: None,
        }
    }

    /// Whether the medium is lossless.
    pub fn is_vacuum(&self) -> bool {
        self.damping.is_none()
    }

    /// Remove all loss. Relative parameters are kept.
    pub fn set_vacuum(&mut self) {
        self.damping = None;
    }

    /// Make the medium lossy so that a wave of `ppw` points per wavelength
    /// decays by 1/e over `skin_length` grid points. Returns the skin
    /// length actually used after clamping.
    pub fn set_damping(&mut self, skin_length: f64, ppw: f64) -> f64 {
        let skin_length = if skin_length.is_nan() {
            Self::MIN_SKIN_LENGTH
        } else {
            skin_length.max(Self::MIN_SKIN_LENGTH)
        };
        self.damping = Some(Damping { skin_length, ppw });
        skin_length
    }

    /// Set uniform relative permeability and permittivity.
    pub fn set_relative(&mut self, mu_r: f64, eps_r: f64) -> Result<(), ConfigError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !(valid(mu_r) && valid(eps_r)) {
            return Err(ConfigError::InvalidMedium { mu_r, eps_r });
        }
        self.mu_r = mu_r;
        self.eps_r = eps_r;
        Ok(())
    }

    /// Relative permeability.
    pub fn mu_r(&self) -> f64 {
        self.mu_r
    }

    /// Relative permittivity.
    pub fn eps_r(&self) -> f64 {
        self.eps_r
    }

    /// Cells a wave travels per step for grid Courant factor `courant`.
    pub fn wave_courant(&self, courant: f64) -> f64 {
        courant / (self.eps_r * self.mu_r).sqrt()
    }

    /// Configured skin length, `None` in vacuum.
    pub fn skin_length(&self) -> Option<f64> {
        self.damping.map(|d| d.skin_length)
    }

    /// Conductivity times cell size such that a plane wave at the source
    /// frequency decays by 1/e over the skin length.
    ///
    /// The attenuation of a lossy medium, `α = k·√((√(1 + p²) − 1)/2)` with
    /// loss tangent `p = σ/(ω·ε)`, inverts in closed form: with
    /// `a = α/k = λ/(2π·L)` the loss tangent is `p = 2a·√(1 + a²)`. The
    /// wavelength in cells is `ppw/√(εr·μr)` and `ω·ε·Δ = 2π·εr/(η0·ppw)`.
    pub fn conductivity_delta(&self) -> f64 {
        match self.damping {
            None => 0.0,
            Some(Damping { skin_length, ppw }) => {
                let index = (self.eps_r * self.mu_r).sqrt();
                let a = ppw / (TAU * skin_length * index);
                let loss_tangent = 2.0 * a * (1.0 + a * a).sqrt();
                loss_tangent * TAU * self.eps_r / (vacuum_impedance() * ppw)
            }
        }
    }

    /// Loss term `L = σ·dt/(2ε)` for Courant factor `courant`.
    pub fn loss_factor(&self, courant: f64) -> f64 {
        self.conductivity_delta() * courant * vacuum_impedance() / (2.0 * self.eps_r)
    }

    /// Update coefficients for Courant factor `courant`.
    pub fn coefficients(&self, courant: f64) -> UpdateCoefficients {
        let eta = vacuum_impedance();
        let loss = self.loss_factor(courant);
        let ch = courant / (self.mu_r * eta);
        UpdateCoefficients {
            ceze: (1.0 - loss) / (1.0 + loss),
            cezh: courant * eta / self.eps_r / (1.0 + loss),
            chxe: ch,
            chye: ch,
        }
    }
}

impl Default for DampingMedium {
    fn default() -> Self {
        Self::vacuum()
    }
}
