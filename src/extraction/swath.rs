//! SWATH map bookkeeping: data-derived isolation windows, external window file
//! annotation, and validation (§4.6 `annotateSwathMapsFromFile`/`checkSwathMap`).

use crate::error::{Context, Error, ErrorKind, Result};
use crate::spectrum::Spectrum;
use crate::system::f64::MassOverCharge;

/// One SWATH isolation window's worth of spectra: a precursor isolation range, an MS
/// level, and the spectra observed in it.
#[derive(Debug, Clone)]
pub struct SwathMap {
    /// Lower precursor isolation bound, in Th.
    pub lower: f64,
    /// Upper precursor isolation bound, in Th.
    pub upper: f64,
    /// Whether this map is an MS1 (survey) map rather than an MS2 SWATH window.
    pub ms1: bool,
    /// The spectra belonging to this window.
    pub spectra: Vec<Spectrum>,
}

/// Read whitespace-delimited `(lower, upper)` pairs from a SWATH windows file (§6):
/// first line is a discarded header, every following line must satisfy `lower <
/// upper`.
pub fn read_swath_windows(contents: &str) -> Result<Vec<(f64, f64)>> {
    let mut lines = contents.lines();
    lines.next();

    let mut windows = Vec::new();
    for (line_index, line) in lines.enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let lower: f64 = fields
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| swath_parse_error(line, line_index + 1))?;
        let upper: f64 = fields
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| swath_parse_error(line, line_index + 1))?;
        if lower >= upper {
            return Err(Error::new(
                ErrorKind::InvalidValue,
                format!("SWATH window line {}: lower ({lower}) must be < upper ({upper})", line_index + 1),
                Context::none(),
            ));
        }
        windows.push((lower, upper));
    }
    Ok(windows)
}

fn swath_parse_error(line: &str, line_number: usize) -> Error {
    Error::new(
        ErrorKind::ParseError,
        format!("SWATH window line {line_number} is not two whitespace-separated numbers: '{line}'"),
        Context::none(),
    )
}

/// Overwrite each non-MS1 map's `(lower, upper)` from an external windows file,
/// walking both sequences in lockstep (§9.2). `do_sort` sorts `swath_maps` ascending
/// by `upper` first. Containment violations are fatal unless `force` is set, in which
/// case they are logged and the map is overwritten anyway. Any count mismatch between
/// external windows and non-MS1 maps is always fatal, regardless of `force`.
pub fn annotate_swath_maps_from_file(
    contents: &str,
    swath_maps: &mut [SwathMap],
    do_sort: bool,
    force: bool,
) -> Result<()> {
    let external_windows = read_swath_windows(contents)?;

    if do_sort {
        swath_maps.sort_by(|a, b| a.upper.total_cmp(&b.upper));
    }

    let mut j = 0usize;
    for map in swath_maps.iter_mut() {
        if map.ms1 {
            continue;
        }
        if j >= external_windows.len() {
            return Err(Error::new(
                ErrorKind::IllegalArgument,
                "counts of raw-data maps and annotation-file windows do not match",
                Context::none(),
            ));
        }
        let (ext_lower, ext_upper) = external_windows[j];
        let contained = ext_lower >= map.lower && ext_upper <= map.upper;
        if !contained {
            if force {
                log::warn!(
                    "external SWATH window [{ext_lower}, {ext_upper}] is not contained in data-derived window [{}, {}]; proceeding because force was set",
                    map.lower, map.upper
                );
            } else {
                return Err(Error::new(
                    ErrorKind::IllegalArgument,
                    format!(
                        "external SWATH window [{ext_lower}, {ext_upper}] is not contained in data-derived window [{}, {}]",
                        map.lower, map.upper
                    ),
                    Context::none(),
                ));
            }
        }
        map.lower = ext_lower;
        map.upper = ext_upper;
        j += 1;
    }

    if j != external_windows.len() {
        return Err(Error::new(
            ErrorKind::IllegalArgument,
            "counts of raw-data maps and annotation-file windows do not match",
            Context::none(),
        ));
    }
    Ok(())
}

/// Validate a built [`SwathMap`] (§4.6 `checkSwathMap`): every spectrum must carry
/// exactly one precursor, share the map's MS level, and have isolation bounds within
/// 0.1 Th of the first spectrum.
pub fn check_swath_map(map: &SwathMap) -> Result<()> {
    let Some(first) = map.spectra.first() else {
        return Ok(());
    };
    let Some(first_precursor) = first.precursors.first() else {
        return Err(Error::new(
            ErrorKind::Postcondition,
            "SWATH map's first spectrum carries no precursor",
            Context::none(),
        ));
    };
    let (first_lower, first_upper) = first_precursor.bounds();

    for spectrum in &map.spectra {
        if spectrum.ms_level != first.ms_level {
            return Err(Error::new(
                ErrorKind::Postcondition,
                "SWATH map contains spectra with mismatched MS levels",
                Context::none(),
            ));
        }
        if spectrum.precursors.len() != 1 {
            return Err(Error::new(
                ErrorKind::Postcondition,
                "SWATH map spectrum does not carry exactly one precursor",
                Context::none(),
            ));
        }
        let (lower, upper) = spectrum.precursors[0].bounds();
        if mz_distance(lower, first_lower) > 0.1 || mz_distance(upper, first_upper) > 0.1 {
            return Err(Error::new(
                ErrorKind::Postcondition,
                "SWATH map spectrum's isolation bounds drift more than 0.1 Th from the map's first spectrum",
                Context::none(),
            ));
        }
    }
    Ok(())
}

fn mz_distance(a: MassOverCharge, b: MassOverCharge) -> f64 {
    (a.value - b.value).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::time::second;
    use crate::system::Time;

    fn map(lower: f64, upper: f64, ms1: bool) -> SwathMap {
        SwathMap { lower, upper, ms1, spectra: Vec::new() }
    }

    #[test]
    fn read_swath_windows_skips_header_and_parses_pairs() {
        let windows = read_swath_windows("lower\tupper\n400\t425\n424\t449\n").unwrap();
        assert_eq!(windows, vec![(400.0, 425.0), (424.0, 449.0)]);
    }

    #[test]
    fn read_swath_windows_rejects_lower_not_less_than_upper() {
        let err = read_swath_windows("header\n425\t400\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    /// S6: raw-data-derived windows [400,425],[424,449],[448,473] annotated from an
    /// external file with windows [400,425],[425,450],[450,475]. Without `force`, the
    /// second external window is not contained in the corresponding data window
    /// ([424,449] does not contain [425,450] since 450 > 449) and annotation fails.
    #[test]
    fn annotate_without_force_rejects_non_contained_window() {
        let mut maps = vec![map(400.0, 425.0, false), map(424.0, 449.0, false), map(448.0, 473.0, false)];
        let contents = "header\n400\t425\n425\t450\n450\t475\n";
        let err = annotate_swath_maps_from_file(contents, &mut maps, false, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalArgument);
    }

    #[test]
    fn annotate_with_force_overwrites_despite_non_containment() {
        let mut maps = vec![map(400.0, 425.0, false), map(424.0, 449.0, false), map(448.0, 473.0, false)];
        let contents = "header\n400\t425\n425\t450\n450\t475\n";
        annotate_swath_maps_from_file(contents, &mut maps, false, true).unwrap();
        assert_eq!((maps[0].lower, maps[0].upper), (400.0, 425.0));
        assert_eq!((maps[1].lower, maps[1].upper), (425.0, 450.0));
        assert_eq!((maps[2].lower, maps[2].upper), (450.0, 475.0));
    }

    #[test]
    fn annotate_skips_ms1_maps() {
        let mut maps = vec![map(0.0, 0.0, true), map(400.0, 425.0, false)];
        let contents = "header\n400\t425\n";
        annotate_swath_maps_from_file(contents, &mut maps, false, false).unwrap();
        assert_eq!((maps[0].lower, maps[0].upper), (0.0, 0.0));
        assert_eq!((maps[1].lower, maps[1].upper), (400.0, 425.0));
    }

    #[test]
    fn annotate_always_fails_on_count_mismatch_even_with_force() {
        let mut maps = vec![map(400.0, 425.0, false)];
        let contents = "header\n400\t425\n425\t450\n";
        let err = annotate_swath_maps_from_file(contents, &mut maps, false, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalArgument);
    }

    #[test]
    fn check_swath_map_accepts_consistent_spectra() {
        use crate::spectrum::IsolationWindow;
        use crate::system::mass_over_charge::mz;
        let mut spectrum1 = Spectrum::new("scan=1", Time::new::<second>(1.0), 2);
        spectrum1.precursors.push(IsolationWindow {
            target_mz: MassOverCharge::new::<mz>(412.5),
            charge: 2,
            isolation_lower: MassOverCharge::new::<mz>(12.5),
            isolation_upper: MassOverCharge::new::<mz>(12.5),
            activation: Vec::new(),
            activation_energy: None,
            ion_mobility: None,
        });
        let map = SwathMap { lower: 400.0, upper: 425.0, ms1: false, spectra: vec![spectrum1.clone(), spectrum1] };
        assert!(check_swath_map(&map).is_ok());
    }
}
