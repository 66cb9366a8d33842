//! A quantitative LC-MS/DIA analysis engine: an mzML codec, a spectrum and feature
//! data model built on typed physical quantities, a fragment-indexed peptide search
//! structure, chromatographic/elution-profile peak picking and fitting, scoring
//! kernels for spectral and chromatographic similarity, and a SWATH/DIA targeted
//! extraction pipeline tying them together.
#![allow(dead_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::must_use_candidate,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_lines
)]

pub mod chemistry;
pub mod error;
pub mod extraction;
pub mod feature;
pub mod fitting;
pub mod fragment_index;
pub mod id;
pub mod io;
pub mod picking;
pub mod scoring;
pub mod sequence;
pub mod spectrum;
pub mod system;
pub mod util;

pub use error::{Error, ErrorKind};

#[macro_use]
extern crate uom;
