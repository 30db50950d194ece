//! Physical constants of free space.
//!
//! All solver coefficients are derived from the permeability and
//! permittivity below; impedance and propagation speed follow from them.

/// Permeability of free space, in N/A².
pub const VACUUM_PERMEABILITY: f64 = 1.256_637_062_121_9e-6;

/// Permittivity of free space, in F/m.
pub const VACUUM_PERMITTIVITY: f64 = 8.854_187_812_813e-12;

/// Default Courant factor: the 2-D isotropic stability limit `1/√2`.
pub const DEFAULT_COURANT_FACTOR: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Upper bound on the Courant factor for a 2-D uniform grid.
pub const MAX_COURANT_FACTOR_2D: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Characteristic impedance of free space, `sqrt(μ0 / ε0)` (≈ 376.73 Ω).
pub fn vacuum_impedance() -> f64 {
    (VACUUM_PERMEABILITY / VACUUM_PERMITTIVITY).sqrt()
}

/// Speed of light in free space, `1 / sqrt(μ0 ε0)` (≈ 2.998e8 m/s).
pub fn vacuum_velocity() -> f64 {
    1.0 / (VACUUM_PERMEABILITY * VACUUM_PERMITTIVITY).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impedance_is_about_377_ohm() {
        let eta = vacuum_impedance();
        assert!((eta - 376.730_313).abs() < 1e-3, "eta0 = {eta}");
    }

    #[test]
    fn velocity_is_speed_of_light() {
        let c = vacuum_velocity();
        assert!((c - 299_792_458.0).abs() < 1.0, "c0 = {c}");
    }

    #[test]
    fn impedance_times_permittivity_times_velocity_is_one() {
        let product = vacuum_impedance() * VACUUM_PERMITTIVITY * vacuum_velocity();
        assert!((product - 1.0).abs() < 1e-12);
    }

    #[test]
    fn default_courant_is_stability_limit() {
        assert_eq!(DEFAULT_COURANT_FACTOR, MAX_COURANT_FACTOR_2D);
        assert!((DEFAULT_COURANT_FACTOR * 2.0_f64.sqrt() - 1.0).abs() < 1e-15);
    }
}
