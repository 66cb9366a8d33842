//! CV-term handling for `<binaryDataArray>` elements (§4.2, §6).

use crate::io::mzml::binary::{BinaryEncoding, CompressionType};

/// The semantic role of a binary data array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayType {
    /// m/z values (MS:1000514).
    MassToCharge,
    /// Intensity values (MS:1000515).
    Intensity,
    /// Time values, used by chromatograms (MS:1000595).
    Time,
}

impl ArrayType {
    /// Map a PSI-MS CV accession to an array type.
    pub fn from_cv_accession(accession: &str) -> Option<Self> {
        Some(match accession {
            "MS:1000514" => Self::MassToCharge,
            "MS:1000515" => Self::Intensity,
            "MS:1000595" => Self::Time,
            _ => return None,
        })
    }

    /// The CV accession this array type is written with.
    pub const fn cv_accession(self) -> &'static str {
        match self {
            Self::MassToCharge => "MS:1000514",
            Self::Intensity => "MS:1000515",
            Self::Time => "MS:1000595",
        }
    }

    /// The unit multiplier applied after decoding, e.g. minutes→seconds is 60.0 for a
    /// time array whose `unitAccession` is `UO:0000031` (minute) instead of the default
    /// `UO:0000010` (second).
    pub fn unit_multiplier(self, unit_accession: Option<&str>) -> f64 {
        match (self, unit_accession) {
            (Self::Time, Some("UO:0000031")) => 60.0,
            _ => 1.0,
        }
    }
}

/// The accumulated state of a `<binaryDataArray>` while its `<cvParam>` children are
/// being parsed, built up one call to [`apply_cv_param`] at a time.
#[derive(Debug, Clone, Default)]
pub struct BinaryArrayCvState {
    /// Declared element precision.
    pub encoding: Option<BinaryEncoding>,
    /// Declared compression.
    pub compression: Option<CompressionType>,
    /// Declared semantic array type.
    pub array_type: Option<ArrayType>,
    /// Unit accession, if any (used to derive `unit_multiplier`).
    pub unit_accession: Option<String>,
}

/// Outcome of applying one CV param: either the state was updated, or the accession was
/// unrecognized (a warning, not an error, per §4.2).
pub enum CvParamOutcome {
    /// The accession was recognized and the state updated.
    Applied,
    /// The accession is well-formed but not one this engine understands.
    UnknownAccession,
}

/// `handleBinaryDataArrayCVParam` (§4.2): fold one `<cvParam accession="..." .../>`
/// into the running [`BinaryArrayCvState`] for the current `<binaryDataArray>`.
pub fn apply_cv_param(state: &mut BinaryArrayCvState, accession: &str, unit_accession: Option<&str>) -> CvParamOutcome {
    if let Some(encoding) = BinaryEncoding::from_cv_accession(accession) {
        state.encoding = Some(encoding);
        return CvParamOutcome::Applied;
    }
    if let Some(compression) = CompressionType::from_cv_accession(accession) {
        state.compression = Some(compression);
        return CvParamOutcome::Applied;
    }
    if let Some(array_type) = ArrayType::from_cv_accession(accession) {
        state.array_type = Some(array_type);
        state.unit_accession = unit_accession.map(str::to_string);
        return CvParamOutcome::Applied;
    }
    CvParamOutcome::UnknownAccession
}
