//! Flow state of a 2D irrotational supersonic flow in Riemann-invariant form.
//!
//! - `Gas`: per-run constants (γ, reference stagnation pressure).
//! - `Invariants`: the raw pair (v⁺, v⁻), before the Mach number is resolved.
//! - `FlowState`: invariants + gas with the Mach number resolved once; every
//!   derived quantity is an infallible accessor afterwards.
//!
//! Conventions: ν = (v⁺ + v⁻)/2, θ = (v⁻ − v⁺)/2, angles in radians.

mod state;

pub use state::{FlowState, Gas, Invariants};

#[cfg(test)]
mod tests;
