//! mzML reader: `spectrumList`/`chromatogramList` parsing over `quick-xml` events.
//!
//! Readers must tolerate both `indexedmzML`-wrapped and bare `<mzML>` documents (§4.2);
//! this reader does not use the trailing index to seek (full engine would build a
//! byte-offset table for random access, out of scope here) — it simply streams every
//! `<spectrum>`/`<chromatogram>` element in document order, which already satisfies the
//! "spectra are delivered in RT order by the reader" ordering guarantee (§5) since
//! mzML's spectrumList is written in acquisition order.

use std::io::BufRead;

use quick_xml::events::Event;
use quick_xml::Reader;

use super::cv::{apply_cv_param, ArrayType, BinaryArrayCvState, CvParamOutcome};
use super::{binary, BinaryEncoding, CompressionType};
use crate::error::{Context, Error, ErrorKind};
use crate::spectrum::{
    Chromatogram, ChromatogramPoint, Experiment, Peak1D, Precursor, Spectrum,
};
use crate::system::f64::{MassOverCharge, Time};
use crate::system::mass_over_charge::mz as mz_unit;
use crate::system::time::second;

/// Parse a complete mzML (or indexedmzML) document into an [`Experiment`].
pub fn read<R: BufRead>(input: R) -> Result<Experiment, Error> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut experiment = Experiment::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(parse_error)? {
            Event::Start(tag) if tag.name().as_ref() == b"spectrum" => {
                let native_id = attribute(&tag, b"id").unwrap_or_default();
                let spectrum = read_spectrum(&mut reader, native_id)?;
                experiment.push_spectrum(spectrum);
            }
            Event::Start(tag) if tag.name().as_ref() == b"chromatogram" => {
                let native_id = attribute(&tag, b"id").unwrap_or_default();
                let chromatogram = read_chromatogram(&mut reader, native_id)?;
                experiment.push_chromatogram(chromatogram);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    experiment.update_ranges();
    Ok(experiment)
}

fn attribute(tag: &quick_xml::events::BytesStart<'_>, name: &[u8]) -> Option<String> {
    tag.attributes().flatten().find_map(|a| {
        (a.key.as_ref() == name).then(|| String::from_utf8_lossy(&a.value).into_owned())
    })
}

fn read_spectrum<R: BufRead>(reader: &mut Reader<R>, native_id: String) -> Result<Spectrum, Error> {
    let mut buf = Vec::new();
    let mut ms_level = 1u8;
    let mut retention_time = Time::new::<second>(0.0);
    let mut precursors = Vec::new();
    let mut mz_array = Vec::new();
    let mut intensity_array = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(parse_error)? {
            Event::Empty(tag) | Event::Start(tag) if tag.name().as_ref() == b"cvParam" => {
                let accession = attribute(&tag, b"accession").unwrap_or_default();
                match accession.as_str() {
                    "MS:1000511" => {
                        if let Some(value) = attribute(&tag, b"value") {
                            ms_level = value.parse().unwrap_or(1);
                        }
                    }
                    "MS:1000016" => {
                        if let Some(value) = attribute(&tag, b"value") {
                            let seconds = value.parse::<f64>().unwrap_or(0.0)
                                * ArrayType::Time.unit_multiplier(attribute(&tag, b"unitAccession").as_deref());
                            retention_time = Time::new::<second>(seconds);
                        }
                    }
                    _ => {}
                }
            }
            Event::Start(tag) if tag.name().as_ref() == b"binaryDataArray" => {
                let (array_type, values) = read_binary_data_array(reader)?;
                match array_type {
                    Some(ArrayType::MassToCharge) => mz_array = values,
                    Some(ArrayType::Intensity) => intensity_array = values,
                    _ => {}
                }
            }
            Event::Start(tag) if tag.name().as_ref() == b"precursor" => {
                precursors.push(read_precursor(reader)?);
            }
            Event::End(tag) if tag.name().as_ref() == b"spectrum" => break,
            Event::Eof => {
                return Err(Error::new(
                    ErrorKind::ParseError,
                    "unexpected end of file inside <spectrum>",
                    Context::none(),
                ))
            }
            _ => {}
        }
        buf.clear();
    }

    if mz_array.len() != intensity_array.len() {
        return Err(Error::new(
            ErrorKind::ParseError,
            format!(
                "spectrum '{native_id}': m/z array length ({}) does not match intensity array length ({})",
                mz_array.len(),
                intensity_array.len()
            ),
            Context::none(),
        ));
    }

    let peaks: Vec<Peak1D> = mz_array
        .into_iter()
        .zip(intensity_array)
        .map(|(mz, intensity)| Peak1D::new(MassOverCharge::new::<mz_unit>(mz), intensity as f32))
        .collect();
    let mut spectrum = Spectrum::from_peaks(native_id, retention_time, ms_level, peaks);
    spectrum.precursors = precursors;
    Ok(spectrum)
}

fn read_precursor<R: BufRead>(reader: &mut Reader<R>) -> Result<Precursor, Error> {
    use crate::spectrum::IsolationWindow;
    let mut buf = Vec::new();
    let mut target_mz = MassOverCharge::new::<mz_unit>(0.0);
    let mut isolation_lower = MassOverCharge::new::<mz_unit>(0.0);
    let mut isolation_upper = MassOverCharge::new::<mz_unit>(0.0);
    let mut charge = 0u8;
    loop {
        match reader.read_event_into(&mut buf).map_err(parse_error)? {
            Event::Empty(tag) | Event::Start(tag) if tag.name().as_ref() == b"cvParam" => {
                let accession = attribute(&tag, b"accession").unwrap_or_default();
                let value = attribute(&tag, b"value").and_then(|v| v.parse::<f64>().ok());
                match (accession.as_str(), value) {
                    ("MS:1000827", Some(v)) => target_mz = MassOverCharge::new::<mz_unit>(v),
                    ("MS:1000828", Some(v)) => isolation_lower = MassOverCharge::new::<mz_unit>(v),
                    ("MS:1000829", Some(v)) => isolation_upper = MassOverCharge::new::<mz_unit>(v),
                    ("MS:1000041", Some(v)) => charge = v as u8,
                    _ => {}
                }
            }
            Event::End(tag) if tag.name().as_ref() == b"precursor" => break,
            Event::Eof => {
                return Err(Error::new(ErrorKind::ParseError, "unexpected end of file inside <precursor>", Context::none()))
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(IsolationWindow {
        target_mz,
        charge,
        isolation_lower,
        isolation_upper,
        activation: Vec::new(),
        activation_energy: None,
        ion_mobility: None,
    })
}

fn read_chromatogram<R: BufRead>(reader: &mut Reader<R>, native_id: String) -> Result<Chromatogram, Error> {
    let mut buf = Vec::new();
    let mut time_array = Vec::new();
    let mut intensity_array = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).map_err(parse_error)? {
            Event::Start(tag) if tag.name().as_ref() == b"binaryDataArray" => {
                let (array_type, values) = read_binary_data_array(reader)?;
                match array_type {
                    Some(ArrayType::Time) => time_array = values,
                    Some(ArrayType::Intensity) => intensity_array = values,
                    _ => {}
                }
            }
            Event::End(tag) if tag.name().as_ref() == b"chromatogram" => break,
            Event::Eof => {
                return Err(Error::new(ErrorKind::ParseError, "unexpected end of file inside <chromatogram>", Context::none()))
            }
            _ => {}
        }
        buf.clear();
    }
    if time_array.len() != intensity_array.len() {
        return Err(Error::new(
            ErrorKind::ParseError,
            format!("chromatogram '{native_id}': time/intensity array length mismatch"),
            Context::none(),
        ));
    }
    let mut chromatogram = Chromatogram::new(native_id);
    for (t, i) in time_array.into_iter().zip(intensity_array) {
        chromatogram.push_point(ChromatogramPoint {
            retention_time: Time::new::<second>(t),
            intensity: i as f32,
        });
    }
    Ok(chromatogram)
}

fn read_binary_data_array<R: BufRead>(reader: &mut Reader<R>) -> Result<(Option<ArrayType>, Vec<f64>), Error> {
    let mut buf = Vec::new();
    let mut state = BinaryArrayCvState::default();
    let mut payload = String::new();
    loop {
        match reader.read_event_into(&mut buf).map_err(parse_error)? {
            Event::Empty(tag) | Event::Start(tag) if tag.name().as_ref() == b"cvParam" => {
                let accession = attribute(&tag, b"accession").unwrap_or_default();
                let unit_accession = attribute(&tag, b"unitAccession");
                if let CvParamOutcome::UnknownAccession =
                    apply_cv_param(&mut state, &accession, unit_accession.as_deref())
                {
                    log::warn!("unknown binaryDataArray cvParam accession: {accession}");
                }
            }
            Event::Text(text) => {
                payload.push_str(&text.unescape().map_err(parse_error)?);
            }
            Event::End(tag) if tag.name().as_ref() == b"binaryDataArray" => break,
            Event::Eof => {
                return Err(Error::new(ErrorKind::ParseError, "unexpected end of file inside <binaryDataArray>", Context::none()))
            }
            _ => {}
        }
        buf.clear();
    }

    let encoding = state.encoding.unwrap_or(BinaryEncoding::Float64);
    let compression = state.compression.unwrap_or(CompressionType::None);
    let multiplier = state
        .array_type
        .map_or(1.0, |t| t.unit_multiplier(state.unit_accession.as_deref()));
    let values = binary::decode(&payload, compression, encoding).map_err(|e| {
        Error::new(ErrorKind::ParseError, format!("malformed binary array: {e}"), Context::none())
    })?;
    let values = if multiplier == 1.0 {
        values
    } else {
        values.into_iter().map(|v| v * multiplier).collect()
    };
    Ok((state.array_type, values))
}

fn parse_error(e: impl std::fmt::Display) -> Error {
    Error::new(ErrorKind::ParseError, format!("mzML parse error: {e}"), Context::none())
}
