//! azimint-core - Geometry and containers for azimuthal integration
//!
//! The building blocks shared by the rebinning engine:
//!
//! - Pixel quadrilaterals in angular space ([`PixelQuad`])
//! - Polygon primitives in bin coordinates: areas, edge line integrals,
//!   axis-aligned Sutherland-Hodgman clipping ([`ClipPoly`], [`EdgeLine`])
//! - Histogram output containers ([`Histogram1d`], [`Histogram2d`])

mod error;
pub mod hist;
pub mod poly;
pub mod quad;

pub use error::{Error, Result};
pub use hist::{Histogram1d, Histogram2d};
pub use poly::{
    BinPoint, ClipPoly, EdgeLine, MAX_VERTICES, quad_signed_area, side_of_line,
};
pub use quad::{Corner, PixelQuad};
