//! # ql-models
//!
//! Term-structure consistent short-rate models calibrated on trinomial
//! trees.
//!
//! ## Trait hierarchy
//!
//! ```text
//! CalibratedModel
//! └── OneFactorModel                → BlackKarasinski
//! TermStructureConsistentModel      → BlackKarasinski
//! ShortRateDynamics                 → BlackKarasinskiDynamics
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Infrastructure ───────────────────────────────────────────────────────
pub mod calibrated_model;
pub mod fitting_parameter;
pub mod settings;
pub mod short_rate_model;
pub mod short_rate_tree;

// ── One-factor short-rate models ─────────────────────────────────────────
pub mod black_karasinski;

// ── Re-exports ───────────────────────────────────────────────────────────
pub use black_karasinski::{BlackKarasinski, BlackKarasinskiDynamics};
pub use calibrated_model::{CalibratedModel, Constraint, Parameter};
pub use fitting_parameter::FittingParameter;
pub use settings::CalibrationSettings;
pub use short_rate_model::{OneFactorModel, ShortRateDynamics, TermStructureConsistentModel};
pub use short_rate_tree::ShortRateTree;
