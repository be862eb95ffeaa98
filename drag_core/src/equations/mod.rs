//! # Drag Correlations
//!
//! Every closed-form and implicit correlation used by the build-up lives
//! here, separate from the pipeline that applies them, so each law can be
//! checked against its source in isolation.
//!
//! ## Modules
//!
//! - [`friction`] - Laminar and turbulent flat-plate skin friction
//! - [`form_factor`] - Wing and body form factors
//! - [`solver`] - Newton-Raphson root finder for the implicit friction laws
//! - [`registry`] - Correlation metadata, name lookup and markdown reference
//!
//! ## Conventions
//!
//! - **Selectors** are enums with a stable integer `code()` and a display
//!   `name()`. The `*_by_code` helpers map unknown codes to 0 and the
//!   `*_name_by_code` helpers to `"ERROR"`.
//! - **Angles** are radians unless the field name says otherwise.
//! - **Lengths** are in model units.

pub mod form_factor;
pub mod friction;
pub mod registry;
pub mod solver;

pub use form_factor::{
    body_ff, body_ff_by_code, body_ff_name_by_code, datcom_rls, wing_ff, wing_ff_by_code, wing_ff_name_by_code,
    BodyFfEquation, BodyFfInputs, FormFactor, WingFfEquation, WingFfInputs, JENKINSON_TAIL_Q,
};

pub use friction::{
    lam_cf, lam_cf_by_code, lam_cf_name_by_code, turb_cf, turb_cf_by_code, turb_cf_name_by_code, LamCfEquation,
    TurbCfEquation, TurbCfInputs,
};

pub use registry::{generate_correlations_markdown, Correlation, CorrelationFamily, CorrelationMetadata, ALL_CORRELATIONS};

pub use solver::{newton_raphson, NewtonSettings, NewtonSolution, NewtonStatus};
