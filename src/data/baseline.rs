use roxmltree::Node;

use super::loader::{child, element_children, split_cells, text_of};
use super::model::Baseline;
use crate::error::{TidyError, TidyResult};

/// Which reference scan of an experiment block to normalise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineKind {
    Dark,
    White,
}

impl BaselineKind {
    /// Element holding one scan shared by every observation.
    pub fn shared_element(self) -> &'static str {
        match self {
            BaselineKind::Dark => "DarkCsv",
            BaselineKind::White => "WhiteCsv",
        }
    }

    /// Element holding repeated scans to be averaged.
    pub fn list_element(self) -> &'static str {
        match self {
            BaselineKind::Dark => "DarkListCsv",
            BaselineKind::White => "WhiteListCsv",
        }
    }
}

/// Reduce a block's dark or white reference to one profile of `width` cells,
/// broadcast over `observations` rows.
///
/// Order of preference: a non-empty shared scan verbatim, the per-wavelength
/// mean of a non-empty scan list, and finally a profile of `"0"`.
pub fn normalize(
    block: Node<'_, '_>,
    kind: BaselineKind,
    observations: usize,
    width: usize,
) -> TidyResult<Baseline> {
    let profile = if let Some(shared) = shared_scan(block, kind) {
        check_width(kind.shared_element(), shared.len(), width)?;
        shared
    } else if let Some(scans) = scan_list(block, kind) {
        average(kind.list_element(), &scans, width)?
    } else {
        vec!["0".to_string(); width]
    };

    Ok(Baseline {
        profile,
        observations,
    })
}

fn shared_scan(block: Node<'_, '_>, kind: BaselineKind) -> Option<Vec<String>> {
    let text = text_of(child(block, kind.shared_element())?);
    if text.trim().is_empty() {
        return None;
    }
    Some(split_cells(&text))
}

fn scan_list(block: Node<'_, '_>, kind: BaselineKind) -> Option<Vec<Vec<String>>> {
    let scans: Vec<Vec<String>> = element_children(child(block, kind.list_element())?)
        .map(|scan| split_cells(&text_of(scan)))
        .collect();
    (!scans.is_empty()).then_some(scans)
}

/// Arithmetic mean of every wavelength column across `scans`.
pub fn average(element: &str, scans: &[Vec<String>], width: usize) -> TidyResult<Vec<String>> {
    let mut sums = vec![0.0_f64; width];
    for (i, scan) in scans.iter().enumerate() {
        check_width(element, scan.len(), width)?;
        for (j, cell) in scan.iter().enumerate() {
            let value: f64 = cell.trim().parse().map_err(|_| {
                TidyError::invalid(element, format!("scan {i}, cell {j}: '{cell}' is not a number"))
            })?;
            sums[j] += value;
        }
    }

    let count = scans.len() as f64;
    Ok(sums.into_iter().map(|sum| format_mean(sum / count)).collect())
}

/// Twelve significant digits, `%.12g` style: trailing zeros dropped, `.0` kept
/// on integral values, scientific notation outside `1e-4..1e12`.
pub fn format_mean(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let scientific = format!("{value:.11e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..12).contains(&exponent) {
        let decimals = (11 - exponent) as usize;
        let fixed = format!("{value:.decimals$}");
        let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
        if trimmed.contains('.') {
            trimmed.to_string()
        } else {
            format!("{trimmed}.0")
        }
    } else {
        let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}

fn check_width(element: &str, found: usize, width: usize) -> TidyResult<()> {
    if found != width {
        return Err(TidyError::invalid(
            element,
            format!("expected {width} cells to match the wavelengths, found {found}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    fn normalize_xml(xml: &str, kind: BaselineKind, observations: usize, width: usize) -> TidyResult<Baseline> {
        let doc = Document::parse(xml).unwrap();
        normalize(doc.root_element(), kind, observations, width)
    }

    #[test]
    fn shared_scan_is_broadcast_verbatim() {
        let baseline = normalize_xml(
            "<Reflectance><WhiteCsv>10,10.50</WhiteCsv><WhiteListCsv><string>1,1</string></WhiteListCsv></Reflectance>",
            BaselineKind::White,
            3,
            2,
        )
        .unwrap();
        for row in baseline.to_matrix() {
            assert_eq!(row, ["10", "10.50"]);
        }
    }

    #[test]
    fn scan_list_is_averaged_per_wavelength() {
        let baseline = normalize_xml(
            "<Reflectance><DarkCsv/><DarkListCsv><string>1,2.5</string><string>2,3.5</string><string>6,0</string></DarkListCsv></Reflectance>",
            BaselineKind::Dark,
            2,
            2,
        )
        .unwrap();
        assert_eq!(baseline.profile, ["3.0", "2.0"]);
        assert_eq!(baseline.to_matrix(), vec![baseline.profile.clone(); 2]);
    }

    #[test]
    fn fractional_means_stay_within_tolerance() {
        let scans = vec![vec!["0.1".to_string()], vec!["0.2".to_string()], vec!["0.4".to_string()]];
        let mean: f64 = average("DarkListCsv", &scans, 1).unwrap()[0].parse().unwrap();
        assert!((mean - 0.7 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn means_print_twelve_significant_digits() {
        assert_eq!(format_mean(0.7 / 3.0), "0.233333333333");
        assert_eq!(format_mean(10.0), "10.0");
        assert_eq!(format_mean(0.0), "0.0");
        assert_eq!(format_mean(-2.5), "-2.5");
        assert_eq!(format_mean(1234.56789012345), "1234.56789012");
        assert_eq!(format_mean(0.00001), "1e-05");
        assert_eq!(format_mean(2.5e16), "2.5e+16");
    }

    #[test]
    fn missing_reference_is_zero_filled() {
        let baseline = normalize_xml("<Transmission/>", BaselineKind::Dark, 2, 3).unwrap();
        assert_eq!(baseline.to_matrix(), vec![vec!["0"; 3]; 2]);

        let baseline =
            normalize_xml("<Transmission><DarkListCsv/></Transmission>", BaselineKind::Dark, 1, 1)
                .unwrap();
        assert_eq!(baseline.profile, ["0"]);
    }

    #[test]
    fn width_mismatch_and_bad_cells_are_fatal() {
        let err = normalize_xml("<R><WhiteCsv>1,2,3</WhiteCsv></R>", BaselineKind::White, 1, 2)
            .unwrap_err();
        assert!(matches!(err, TidyError::InvalidValue { element, .. } if element == "WhiteCsv"));

        let err = normalize_xml(
            "<R><DarkListCsv><string>1,x</string></DarkListCsv></R>",
            BaselineKind::Dark,
            1,
            2,
        )
        .unwrap_err();
        assert!(matches!(err, TidyError::InvalidValue { .. }));
    }
}
