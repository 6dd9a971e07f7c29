use std::path::Path;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use rankboard_io::{
    CsvReadOptions, CsvSource, DataSource, ExcelSource, JsonSource, RemoteCsvSource,
    SampleSource,
};

/// Where the dashboard data comes from, decided from the `--source` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Sample,
    Url,
    Csv,
    Tsv,
    Excel,
    Json,
}

impl SourceKind {
    pub fn detect(source: &str) -> Result<Self> {
        if source.eq_ignore_ascii_case("sample") {
            return Ok(Self::Sample);
        }
        if source.starts_with("http://") || source.starts_with("https://") {
            return Ok(Self::Url);
        }
        let ext = Path::new(source)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") | Some("txt") => Ok(Self::Csv),
            Some("tsv") => Ok(Self::Tsv),
            Some("xlsx") | Some("xlsm") | Some("xlsb") | Some("xls") | Some("ods") => {
                Ok(Self::Excel)
            }
            Some("json") => Ok(Self::Json),
            Some(other) => bail!("unsupported source extension '.{other}' for {source}"),
            None => bail!("cannot tell the format of {source}; use a .csv, .tsv, .xlsx, .ods or .json file"),
        }
    }
}

pub struct SourceArgs<'a> {
    pub source: &'a str,
    pub sheet: Option<&'a str>,
    pub seed: Option<u64>,
    pub reference: NaiveDate,
}

pub fn open_source(args: &SourceArgs<'_>) -> Result<Box<dyn DataSource>> {
    let kind = SourceKind::detect(args.source)?;
    if args.sheet.is_some() && kind != SourceKind::Excel {
        tracing::warn!(source = args.source, "--sheet only applies to workbook sources; ignored");
    }
    let source: Box<dyn DataSource> = match kind {
        SourceKind::Sample => {
            let mut sample = SampleSource::new(args.reference);
            if let Some(seed) = args.seed {
                sample = sample.with_seed(seed);
            }
            Box::new(sample)
        }
        SourceKind::Url => Box::new(RemoteCsvSource::new(args.source)),
        SourceKind::Csv => Box::new(CsvSource::open_path(args.source)),
        SourceKind::Tsv => Box::new(CsvSource::open_path_with_options(
            args.source,
            CsvReadOptions {
                delimiter: b'\t',
                ..CsvReadOptions::default()
            },
        )),
        SourceKind::Excel => {
            let workbook = ExcelSource::open_path(args.source);
            match args.sheet {
                Some(sheet) => Box::new(workbook.with_sheet(sheet)),
                None => Box::new(workbook),
            }
        }
        SourceKind::Json => Box::new(JsonSource::open_path(args.source)),
    };
    Ok(source)
}
