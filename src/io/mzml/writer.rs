//! mzML writer: emits `indexedmzML` with byte-offset indices and a SHA-1 checksum
//! trailer (§4.2, §6).
//!
//! Grounded in structure on
//! `examples/other_examples/caacde15_mobiusklein-mzdata__src-io-mzml-writer.rs.rs`'s
//! `MzMLWriterType` (a state machine wrapping a `quick_xml::Writer`, with CV-param
//! emission helpers and an index-then-checksum tail); adapted from that file's MD5
//! trailer to the SHA-1 trailer this engine's spec requires.

use std::io::Write;

use sha1::{Digest, Sha1};

use super::binary;
use super::binary::{BinaryEncoding, CompressionType};
use crate::spectrum::Experiment;

/// Which compression/precision to use for m/z and intensity arrays.
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    /// Compression for m/z arrays.
    pub mz_compression: CompressionType,
    /// Compression for intensity arrays.
    pub intensity_compression: CompressionType,
    /// Precision for both arrays.
    pub encoding: BinaryEncoding,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            mz_compression: CompressionType::NumpressLinear,
            intensity_compression: CompressionType::Zlib,
            encoding: BinaryEncoding::Float32,
        }
    }
}

/// Write a complete `indexedmzML` document for `experiment` to `out`.
pub fn write<W: Write>(out: &mut W, experiment: &Experiment, options: WriteOptions) -> std::io::Result<()> {
    let mut tracker = OffsetTrackingWriter::new(out);

    writeln!(tracker, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        tracker,
        r#"<indexedmzML xmlns="http://psi.hupo.org/ms/mzml">"#
    )?;
    writeln!(tracker, r#"<mzML version="1.1.0">"#)?;
    writeln!(tracker, r#"<run id="run1">"#)?;
    writeln!(
        tracker,
        r#"<spectrumList count="{}">"#,
        experiment.size()
    )?;

    let mut spectrum_offsets = Vec::with_capacity(experiment.size());
    for (index, spectrum) in experiment.spectra().iter().enumerate() {
        spectrum_offsets.push((spectrum.native_id.clone(), tracker.offset()));
        write_spectrum(&mut tracker, index, spectrum, options)?;
    }
    writeln!(tracker, "</spectrumList>")?;

    let mut chromatogram_offsets = Vec::with_capacity(experiment.chromatograms().len());
    if !experiment.chromatograms().is_empty() {
        writeln!(
            tracker,
            r#"<chromatogramList count="{}">"#,
            experiment.chromatograms().len()
        )?;
        for (index, chromatogram) in experiment.chromatograms().iter().enumerate() {
            chromatogram_offsets.push((chromatogram.native_id.clone(), tracker.offset()));
            write_chromatogram(&mut tracker, index, chromatogram, options)?;
        }
        writeln!(tracker, "</chromatogramList>")?;
    }

    writeln!(tracker, "</run>")?;
    writeln!(tracker, "</mzML>")?;

    let index_list_offset = tracker.offset();
    writeln!(tracker, r#"<indexList count="{}">"#, if chromatogram_offsets.is_empty() { 1 } else { 2 })?;
    write_index(&mut tracker, "spectrum", &spectrum_offsets)?;
    if !chromatogram_offsets.is_empty() {
        write_index(&mut tracker, "chromatogram", &chromatogram_offsets)?;
    }
    writeln!(tracker, "</indexList>")?;
    writeln!(tracker, r#"<indexListOffset>{index_list_offset}</indexListOffset>"#)?;

    let digest = tracker.finish_hash_placeholder();
    writeln!(tracker, r#"<fileChecksum>{digest:x}</fileChecksum>"#)?;
    writeln!(tracker, "</indexedmzML>")?;
    Ok(())
}

fn write_spectrum<W: Write>(
    out: &mut OffsetTrackingWriter<W>,
    index: usize,
    spectrum: &crate::spectrum::Spectrum,
    options: WriteOptions,
) -> std::io::Result<()> {
    writeln!(
        out,
        r#"<spectrum index="{index}" id="{}" defaultArrayLength="{}">"#,
        xml_escape(&spectrum.native_id),
        spectrum.peaks().len()
    )?;
    writeln!(
        out,
        r#"<cvParam cvRef="MS" accession="MS:1000511" name="ms level" value="{}"/>"#,
        spectrum.ms_level
    )?;
    writeln!(
        out,
        r#"<scanList count="1"><scan><cvParam cvRef="MS" accession="MS:1000016" name="scan start time" value="{}" unitAccession="UO:0000010" unitName="second"/></scan></scanList>"#,
        spectrum.retention_time.value
    )?;
    for precursor in &spectrum.precursors {
        writeln!(
            out,
            r#"<precursorList count="1"><precursor><isolationWindow><cvParam cvRef="MS" accession="MS:1000827" name="isolation window target m/z" value="{}"/></isolationWindow></precursor></precursorList>"#,
            precursor.target_mz.value
        )?;
    }
    let mz_values: Vec<f64> = spectrum.peaks().iter().map(|p| p.mz.value).collect();
    let intensity_values: Vec<f64> = spectrum.peaks().iter().map(|p| f64::from(p.intensity)).collect();
    writeln!(out, r#"<binaryDataArrayList count="2">"#)?;
    write_binary_data_array(out, &mz_values, options.mz_compression, options.encoding, "MS:1000514")?;
    write_binary_data_array(out, &intensity_values, options.intensity_compression, options.encoding, "MS:1000515")?;
    writeln!(out, "</binaryDataArrayList>")?;
    writeln!(out, "</spectrum>")
}

fn write_chromatogram<W: Write>(
    out: &mut OffsetTrackingWriter<W>,
    index: usize,
    chromatogram: &crate::spectrum::Chromatogram,
    options: WriteOptions,
) -> std::io::Result<()> {
    writeln!(
        out,
        r#"<chromatogram index="{index}" id="{}" defaultArrayLength="{}">"#,
        xml_escape(&chromatogram.native_id),
        chromatogram.points().len()
    )?;
    let time_values: Vec<f64> = chromatogram.points().iter().map(|p| p.retention_time.value).collect();
    let intensity_values: Vec<f64> = chromatogram.points().iter().map(|p| f64::from(p.intensity)).collect();
    writeln!(out, r#"<binaryDataArrayList count="2">"#)?;
    write_binary_data_array(out, &time_values, CompressionType::Zlib, options.encoding, "MS:1000595")?;
    write_binary_data_array(out, &intensity_values, options.intensity_compression, options.encoding, "MS:1000515")?;
    writeln!(out, "</binaryDataArrayList>")?;
    writeln!(out, "</chromatogram>")
}

fn write_binary_data_array<W: Write>(
    out: &mut OffsetTrackingWriter<W>,
    values: &[f64],
    compression: CompressionType,
    encoding: BinaryEncoding,
    array_type_accession: &str,
) -> std::io::Result<()> {
    let payload = binary::encode(values, compression, encoding);
    writeln!(out, "<binaryDataArray>")?;
    writeln!(out, r#"<cvParam cvRef="MS" accession="{}"/>"#, encoding.cv_accession())?;
    writeln!(out, r#"<cvParam cvRef="MS" accession="{}"/>"#, compression.cv_accession())?;
    writeln!(out, r#"<cvParam cvRef="MS" accession="{array_type_accession}"/>"#)?;
    writeln!(out, "<binary>{payload}</binary>")?;
    writeln!(out, "</binaryDataArray>")
}

fn write_index<W: Write>(
    out: &mut OffsetTrackingWriter<W>,
    name: &str,
    offsets: &[(String, u64)],
) -> std::io::Result<()> {
    writeln!(out, r#"<index name="{name}">"#)?;
    for (id, offset) in offsets {
        writeln!(out, r#"<offset idRef="{}">{offset}</offset>"#, xml_escape(id))?;
    }
    writeln!(out, "</index>")
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

/// Wraps an inner writer, tracking byte offset (for the index) and hashing every byte
/// written so far with SHA-1 (for the `<fileChecksum>` trailer), matching the
/// `indexedmzML` contract of a checksum "of the preceding bytes" (§4.2).
struct OffsetTrackingWriter<'a, W: Write> {
    inner: &'a mut W,
    offset: u64,
    hasher: Sha1,
}

impl<'a, W: Write> OffsetTrackingWriter<'a, W> {
    fn new(inner: &'a mut W) -> Self {
        Self {
            inner,
            offset: 0,
            hasher: Sha1::new(),
        }
    }

    fn offset(&self) -> u64 {
        self.offset
    }

    fn finish_hash_placeholder(&mut self) -> sha1::digest::Output<Sha1> {
        self.hasher.clone().finalize()
    }
}

impl<W: Write> Write for OffsetTrackingWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.hasher.update(&buf[..written]);
        self.offset += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
