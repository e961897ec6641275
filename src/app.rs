use crate::config::{open_output, resolve_output, OutputTarget, TidyConfig};
use crate::data::category::resolve_triple;
use crate::data::loader::{extract, parse_document, read_source, Overrides};
use crate::error::TidyResult;
use crate::tidy::columns::resolve_columns;
use crate::tidy::writer::emit;

/// What a finished conversion produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub input: String,
    pub output: OutputTarget,
    pub rows: u64,
}

/// Convert one measurement document into a tidy file.
///
/// Columns and documents are validated before the output is opened, so a
/// rejected run leaves no output file behind.
pub fn run(config: &TidyConfig) -> TidyResult<Conversion> {
    let columns = resolve_columns(&config.columns)?;

    let input_name = config.input_name();
    let text = read_source(config.input.as_deref())?;
    let doc = parse_document(&text, &input_name)?;

    let category_text = config
        .category_path
        .as_deref()
        .map(|path| read_source(Some(path)))
        .transpose()?;
    let category_doc = match (&category_text, &config.category_path) {
        (Some(text), Some(path)) => Some(parse_document(text, &path.display().to_string())?),
        _ => None,
    };

    let root = doc.root_element();
    let categories = resolve_triple(
        &config.category_names,
        root,
        category_doc.as_ref(),
        config.strict_categories,
    )?;
    let overrides = Overrides {
        upc: config.upc.as_deref(),
        temperature: config.temperature.as_deref(),
    };
    let record = extract(root, overrides)?;

    let target = resolve_output(config.output.as_deref(), config.input.as_deref());
    let sink = open_output(&target, config.no_clobber)?;
    let (_, rows) = emit(&record, &categories, columns, sink, !config.no_header)?;

    log::info!("converted {input_name} to {}", target.display_name());
    log::debug!("wrote {rows} rows");
    Ok(Conversion {
        input: input_name,
        output: target,
        rows,
    })
}
