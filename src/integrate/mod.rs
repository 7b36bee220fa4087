//! Numerical core: nearest-row bound resolution and the bounded trapezoid sum.

pub mod locate;
pub mod trapezoid;

pub use locate::locate;
pub use trapezoid::{
    integrate, integrate_resolved, integrate_with, resolve_window, DegeneratePolicy, IntegrationOptions, Window, WindowPolicy,
};
