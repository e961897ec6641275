use std::path::Path;

use roxmltree::{Document, Node};

use super::baseline::{normalize, BaselineKind};
use super::model::{ExperimentBlock, Protocol, SampleRecord};
use crate::error::{TidyError, TidyResult};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read a whole XML document from `path`, or standard input when `None`.
pub fn read_source(path: Option<&Path>) -> TidyResult<String> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            TidyError::io(
                format!("problem opening specified files in command args: {}", path.display()),
                e,
            )
        }),
        None => std::io::read_to_string(std::io::stdin())
            .map_err(|e| TidyError::io("problem reading standard input", e)),
    }
}

/// Parse XML text, naming `source_name` in the diagnostic on failure.
pub fn parse_document<'input>(text: &'input str, source_name: &str) -> TidyResult<Document<'input>> {
    Document::parse(text).map_err(|e| TidyError::Xml {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })
}

/// Values that take precedence over what the measurement document says.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides<'a> {
    pub upc: Option<&'a str>,
    pub temperature: Option<&'a str>,
}

/// Build a [`SampleRecord`] from the root element of a measurement document.
///
/// Expected layout:
///
/// ```xml
/// <Drink>
///   <Name>Sample A</Name>
///   <DrinkIdStr>D1</DrinkIdStr>
///   <Details>
///     <Detail><Key><string>Ean</string></Key><Value><string>0123</string></Value></Detail>
///   </Details>
///   <Reflectance>
///     <WavelengthsCsv>400,500</WavelengthsCsv>
///     <NumberOfScans>1</NumberOfScans>
///     <IntensitiesListCsv><string>1.0,2.0</string></IntensitiesListCsv>
///     <WhiteCsv>10,10</WhiteCsv>
///     ...
///   </Reflectance>
/// </Drink>
/// ```
pub fn extract(root: Node<'_, '_>, overrides: Overrides<'_>) -> TidyResult<SampleRecord> {
    let name = text_of(required(root, "Name")?);
    let drink_id = text_of(required(root, "DrinkIdStr")?);
    let upc = resolve_upc(root, overrides.upc)?;

    let reflectance = child(root, Protocol::Reflectance.element())
        .map(|node| extract_block(node, Protocol::Reflectance, overrides.temperature))
        .transpose()?;
    let transmission = child(root, Protocol::Transmission.element())
        .map(|node| extract_block(node, Protocol::Transmission, overrides.temperature))
        .transpose()?;

    Ok(SampleRecord {
        name,
        drink_id,
        upc,
        reflectance,
        transmission,
    })
}

// ---------------------------------------------------------------------------
// Identity fields
// ---------------------------------------------------------------------------

fn resolve_upc(root: Node<'_, '_>, upc: Option<&str>) -> TidyResult<String> {
    let details = required(root, "Details")?;
    if let Some(upc) = upc {
        log::warn!("overriding upc/ean from input file");
        return Ok(upc.to_string());
    }

    let found = element_children(details).find_map(|item| {
        let mut parts = element_children(item);
        let key = leaf_text(parts.next()?);
        let value = parts.next().map(leaf_text);
        (key == "Ean").then_some(value)
    });
    match found.flatten() {
        Some(upc) => Ok(upc),
        None => {
            log::warn!("cannot find upc");
            Ok(String::new())
        }
    }
}

/// Text of a detail key/value, either direct or wrapped in one child element.
fn leaf_text(node: Node<'_, '_>) -> String {
    match element_children(node).next() {
        Some(inner) => text_of(inner),
        None => text_of(node),
    }
}

// ---------------------------------------------------------------------------
// Experiment blocks
// ---------------------------------------------------------------------------

fn extract_block(
    node: Node<'_, '_>,
    protocol: Protocol,
    temperature: Option<&str>,
) -> TidyResult<ExperimentBlock> {
    let wavelengths = split_cells(&text_of(required(node, "WavelengthsCsv")?));
    let width = wavelengths.len();

    let declared = text_of(required(node, "NumberOfScans")?);
    let observations: usize = declared.trim().parse().map_err(|_| {
        TidyError::invalid("NumberOfScans", format!("'{declared}' is not a scan count"))
    })?;

    let read: Vec<Vec<String>> = element_children(required(node, "IntensitiesListCsv")?)
        .map(|scan| split_cells(&text_of(scan)))
        .collect();
    if read.len() != observations {
        return Err(TidyError::invalid(
            "IntensitiesListCsv",
            format!("{observations} scans declared but {} listed", read.len()),
        ));
    }
    if let Some((i, scan)) = read.iter().enumerate().find(|(_, scan)| scan.len() != width) {
        return Err(TidyError::invalid(
            "IntensitiesListCsv",
            format!("scan {i} has {} cells for {width} wavelengths", scan.len()),
        ));
    }

    Ok(ExperimentBlock {
        protocol,
        serial_number: text_of(required(node, "SerialNumber")?),
        integration_time: text_of(required(node, "IntegrationTime")?),
        dark: normalize(node, BaselineKind::Dark, observations, width)?,
        white: normalize(node, BaselineKind::White, observations, width)?,
        wavelengths,
        read,
        read_date: text_of(required(node, "ExperimentRecordedStr")?),
        dark_date: text_of(required(node, "DarkRecordedStr")?),
        white_date: text_of(required(node, "WhiteRecordedStr")?),
        temperature: resolve_temperature(node, temperature),
        xsmooth: optional_text(node, "XSmooth"),
        temperature_compensated: optional_text(node, "IsTemperatureCompensated"),
        scans_to_average: optional_text(node, "ScansToAverage"),
        x_timing_resolution: optional_text(node, "XTimingResolution"),
    })
}

fn resolve_temperature(node: Node<'_, '_>, temperature: Option<&str>) -> String {
    if let Some(temperature) = temperature {
        log::warn!("overriding liquid temperature from input file");
        return temperature.to_string();
    }
    match child(node, "LiquidTemperature") {
        Some(temp) => text_of(temp),
        None => {
            log::warn!("cannot find liquid temperature");
            String::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Element helpers
// ---------------------------------------------------------------------------

/// First direct child element named `tag` (local name, namespaces ignored).
pub(crate) fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    element_children(node).find(|n| n.tag_name().name() == tag)
}

pub(crate) fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.is_element())
}

fn required<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> TidyResult<Node<'a, 'input>> {
    child(node, tag).ok_or_else(|| TidyError::MissingElement {
        parent: node.tag_name().name().to_string(),
        element: tag.to_string(),
    })
}

/// Element text; an element without text reads as empty.
pub(crate) fn text_of(node: Node<'_, '_>) -> String {
    node.text().unwrap_or_default().to_string()
}

fn optional_text(node: Node<'_, '_>, tag: &str) -> String {
    child(node, tag).map(text_of).unwrap_or_default()
}

/// Split a comma-delimited scan into its cells, kept verbatim.
pub(crate) fn split_cells(text: &str) -> Vec<String> {
    text.split(',').map(str::to_string).collect()
}
