use std::borrow::Cow;
use std::io::Write;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::columns::{header, Column};
use crate::data::model::{CategoryLevel, CategoryTriple, ExperimentBlock, SampleRecord};
use crate::error::{TidyError, TidyResult};

// ---------------------------------------------------------------------------
// TidyRow – one (observation, wavelength) pair of a block
// ---------------------------------------------------------------------------

/// A borrowed view of one output row. Field values are produced on demand so
/// only the selected columns are ever computed.
pub struct TidyRow<'a> {
    pub record: &'a SampleRecord,
    pub categories: &'a CategoryTriple,
    pub block: &'a ExperimentBlock,
    pub observation: usize,
    pub wavelength: usize,
}

impl<'a> TidyRow<'a> {
    /// Text of `column` for this row; absent values are empty strings.
    pub fn value(&self, column: Column) -> Cow<'a, str> {
        let (record, block, categories) = (self.record, self.block, self.categories);
        let (o, w) = (self.observation, self.wavelength);
        let category = move |level: CategoryLevel| categories.get(level);

        let text: &'a str = match column {
            Column::Observation => return Cow::Owned(o.to_string()),
            Column::Name => &record.name,
            Column::DrinkId => &record.drink_id,
            Column::Upc => &record.upc,
            Column::CategoryId1 => &category(CategoryLevel::First).id,
            Column::CategoryName1 => &category(CategoryLevel::First).name,
            Column::CategoryId2 => &category(CategoryLevel::Second).id,
            Column::CategoryName2 => &category(CategoryLevel::Second).name,
            Column::CategoryId3 => &category(CategoryLevel::Third).id,
            Column::CategoryName3 => &category(CategoryLevel::Third).name,
            Column::Wavelength => block.wavelengths.get(w).map_or("", String::as_str),
            Column::Reading => block
                .read
                .get(o)
                .and_then(|scan| scan.get(w))
                .map_or("", String::as_str),
            Column::White => block.white.value(o, w).unwrap_or(""),
            Column::Dark => block.dark.value(o, w).unwrap_or(""),
            Column::ReadingDate => &block.read_date,
            Column::WhiteDate => &block.white_date,
            Column::DarkDate => &block.dark_date,
            Column::Temperature => &block.temperature,
            Column::IntegrationTime => &block.integration_time,
            Column::SerialNumber => &block.serial_number,
            Column::Protocol => block.protocol.tag(),
            Column::ScansToAverage => &block.scans_to_average,
            Column::XSmooth => &block.xsmooth,
            Column::TemperatureCompensated => &block.temperature_compensated,
            Column::XTimingResolution => &block.x_timing_resolution,
        };
        Cow::Borrowed(text)
    }
}

// ---------------------------------------------------------------------------
// TidyWriter – fixed CSV dialect over any sink
// ---------------------------------------------------------------------------

/// Writes projected rows with the tidy dialect: `,` delimiter, CRLF line
/// endings, and a field quoted only when it holds a delimiter, quote, line
/// break, or the `\` escape character. Quotes inside a field are doubled.
pub struct TidyWriter<W: Write> {
    inner: csv::Writer<W>,
    columns: Vec<Column>,
    rows: u64,
}

impl<W: Write> TidyWriter<W> {
    pub fn new(sink: W, columns: Vec<Column>) -> Self {
        let inner = WriterBuilder::new()
            .delimiter(b',')
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::CRLF)
            .has_headers(false)
            .from_writer(sink);
        TidyWriter {
            inner,
            columns,
            rows: 0,
        }
    }

    pub fn write_header(&mut self) -> TidyResult<()> {
        let names = header(&self.columns);
        let single = names.len() == 1;
        self.inner
            .write_record(names.into_iter().map(|n| quote_field(n, single).into_owned()))
            .map_err(|e| TidyError::from_csv("problem writing header", e))
    }

    /// Write every (observation, wavelength) row of every present block:
    /// reflectance before transmission, observation-major, wavelength-minor.
    pub fn write_record(
        &mut self,
        record: &SampleRecord,
        categories: &CategoryTriple,
    ) -> TidyResult<()> {
        for block in record.blocks() {
            for observation in 0..block.observation_count() {
                for wavelength in 0..block.wavelength_count() {
                    let row = TidyRow {
                        record,
                        categories,
                        block,
                        observation,
                        wavelength,
                    };
                    self.write_row(&row)?;
                }
            }
        }
        Ok(())
    }

    pub fn write_row(&mut self, row: &TidyRow<'_>) -> TidyResult<()> {
        let single = self.columns.len() == 1;
        let fields = self
            .columns
            .iter()
            .map(|&c| quote_field(&row.value(c), single).into_owned());
        self.inner
            .write_record(fields)
            .map_err(|e| TidyError::from_csv("problem writing rows", e))?;
        self.rows += 1;
        Ok(())
    }

    /// Number of data rows written so far.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Flush and hand back the sink.
    pub fn finish(self) -> TidyResult<W> {
        self.inner
            .into_inner()
            .map_err(|e| {
                let err = e.error();
                TidyError::io(
                    "problem flushing output",
                    std::io::Error::new(err.kind(), err.to_string()),
                )
            })
    }
}

/// Quote `field` when the dialect requires it. A lone empty field is quoted so
/// the row is not mistaken for a blank line.
fn quote_field(field: &str, single: bool) -> Cow<'_, str> {
    let needs_quotes = (single && field.is_empty())
        || field.contains([',', '"', '\\', '\r', '\n']);
    if needs_quotes {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Write the optional header and all rows of `record` to `sink`.
pub fn emit<W: Write>(
    record: &SampleRecord,
    categories: &CategoryTriple,
    columns: Vec<Column>,
    sink: W,
    with_header: bool,
) -> TidyResult<(W, u64)> {
    let mut writer = TidyWriter::new(sink, columns);
    if with_header {
        writer.write_header()?;
    }
    writer.write_record(record, categories)?;
    let rows = writer.rows();
    Ok((writer.finish()?, rows))
}
