use crate::error::{TidyError, TidyResult};

// ---------------------------------------------------------------------------
// Column – one field of the tidy output schema
// ---------------------------------------------------------------------------

/// A field of an output row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Name,
    DrinkId,
    CategoryId1,
    CategoryName1,
    CategoryId2,
    CategoryName2,
    CategoryId3,
    CategoryName3,
    Observation,
    Wavelength,
    Reading,
    White,
    Dark,
    ReadingDate,
    WhiteDate,
    DarkDate,
    Upc,
    Temperature,
    IntegrationTime,
    SerialNumber,
    Protocol,
    ScansToAverage,
    XSmooth,
    TemperatureCompensated,
    XTimingResolution,
}

impl Column {
    /// Default output order.
    pub const DEFAULT: [Column; 25] = [
        Column::Name,
        Column::DrinkId,
        Column::CategoryId1,
        Column::CategoryName1,
        Column::CategoryId2,
        Column::CategoryName2,
        Column::CategoryId3,
        Column::CategoryName3,
        Column::Observation,
        Column::Wavelength,
        Column::Reading,
        Column::White,
        Column::Dark,
        Column::ReadingDate,
        Column::WhiteDate,
        Column::DarkDate,
        Column::Upc,
        Column::Temperature,
        Column::IntegrationTime,
        Column::SerialNumber,
        Column::Protocol,
        Column::ScansToAverage,
        Column::XSmooth,
        Column::TemperatureCompensated,
        Column::XTimingResolution,
    ];

    /// Header name as written to the tidy file.
    pub fn name(self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::DrinkId => "drink.id",
            Column::CategoryId1 => "category.guid.1",
            Column::CategoryName1 => "category.name.1",
            Column::CategoryId2 => "category.guid.2",
            Column::CategoryName2 => "category.name.2",
            Column::CategoryId3 => "category.guid.3",
            Column::CategoryName3 => "category.name.3",
            Column::Observation => "observation",
            Column::Wavelength => "wavelength",
            Column::Reading => "reading",
            Column::White => "white",
            Column::Dark => "dark",
            Column::ReadingDate => "reading.date",
            Column::WhiteDate => "white.date",
            Column::DarkDate => "dark.date",
            Column::Upc => "upc",
            Column::Temperature => "temp",
            Column::IntegrationTime => "integration.time",
            Column::SerialNumber => "serial.number",
            Column::Protocol => "protocol",
            Column::ScansToAverage => "scans.to.avg",
            Column::XSmooth => "xsmooth",
            Column::TemperatureCompensated => "temp.comp",
            Column::XTimingResolution => "xtrate",
        }
    }

    pub fn from_name(name: &str) -> Option<Column> {
        Column::DEFAULT.into_iter().find(|c| c.name() == name)
    }
}

// ---------------------------------------------------------------------------
// Selection: which columns are written, in which order
// ---------------------------------------------------------------------------

/// Caller's override of the default column set. Include and exclude are
/// mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ColumnSelection {
    #[default]
    Default,
    /// Exactly these columns, in this order.
    Include(Vec<String>),
    /// The default order minus these columns.
    Exclude(Vec<String>),
}

/// Resolve the ordered output columns, rejecting unknown names.
pub fn resolve_columns(selection: &ColumnSelection) -> TidyResult<Vec<Column>> {
    match selection {
        ColumnSelection::Default => Ok(Column::DEFAULT.to_vec()),
        ColumnSelection::Include(names) => names.iter().map(|n| lookup(n)).collect(),
        ColumnSelection::Exclude(names) => {
            let excluded = names
                .iter()
                .map(|n| lookup(n))
                .collect::<TidyResult<Vec<_>>>()?;
            Ok(Column::DEFAULT
                .into_iter()
                .filter(|c| !excluded.contains(c))
                .collect())
        }
    }
}

fn lookup(name: &str) -> TidyResult<Column> {
    Column::from_name(name).ok_or_else(|| TidyError::ColumnNotFound(name.to_string()))
}

/// Header names for a resolved column list.
pub fn header(columns: &[Column]) -> Vec<&'static str> {
    columns.iter().map(|c| c.name()).collect()
}
