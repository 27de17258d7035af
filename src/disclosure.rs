use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, anyhow};
use csv::StringRecord;
use serde::{Serialize, Serializer};

use crate::index::{IndexBuilder, PriceIndex};
use crate::pricing::{PriceBounds, PublishedCharges, UNKNOWN_SETTING};

/// Disclosure files open with this many free-form metadata lines before the header row.
pub const METADATA_LINES: usize = 2;

const COL_CODE_1: &str = "code|1";
const COL_CODE_1_TYPE: &str = "code|1|type";
const COL_CODE_2: &str = "code|2";
const COL_CODE_2_TYPE: &str = "code|2|type";
const COL_MIN: &str = "standard_charge|min";
const COL_MAX: &str = "standard_charge|max";
const COL_GROSS: &str = "standard_charge|gross";
const COL_DISCOUNTED_CASH: &str = "standard_charge|discounted_cash";
const COL_SETTING: &str = "setting";
const COL_DESCRIPTION: &str = "description";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeKind {
    Cpt,
    Drg,
    Hcpcs,
    Other(String),
    Unspecified,
}

impl CodeKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "" => CodeKind::Unspecified,
            "CPT" => CodeKind::Cpt,
            "DRG" | "MS-DRG" => CodeKind::Drg,
            "HCPCS" => CodeKind::Hcpcs,
            other => CodeKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CodeKind::Cpt => "CPT",
            CodeKind::Drg => "DRG",
            CodeKind::Hcpcs => "HCPCS",
            CodeKind::Other(s) => s,
            CodeKind::Unspecified => "unknown",
        }
    }
}

impl Serialize for CodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One disclosure row as registered under a single billing code.
#[derive(Debug, Clone, PartialEq)]
pub struct DisclosureRecord {
    pub code: String,
    pub code_kind: CodeKind,
    pub description: Option<String>,
    pub setting: String,
    pub bounds: PriceBounds,
}

/// Column layouts seen in published disclosure files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One code per row in `code|1`.
    SingleCode,
    /// DRG codes in `code|1`, CPT codes in `code|2`; each pair is gated on its type column.
    DualCode,
}

impl Layout {
    fn extractor(self) -> &'static dyn CodeExtractor {
        match self {
            Layout::SingleCode => &SINGLE_CODE,
            Layout::DualCode => &DUAL_CODE,
        }
    }
}

/// Header positions for the columns the loader reads. Missing columns are `None`.
#[derive(Debug, Clone, Default)]
pub struct Columns {
    code_1: Option<usize>,
    code_1_type: Option<usize>,
    code_2: Option<usize>,
    code_2_type: Option<usize>,
    min: Option<usize>,
    max: Option<usize>,
    gross: Option<usize>,
    discounted_cash: Option<usize>,
    setting: Option<usize>,
    description: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| clean(h) == name);
        Self {
            code_1: find(COL_CODE_1),
            code_1_type: find(COL_CODE_1_TYPE),
            code_2: find(COL_CODE_2),
            code_2_type: find(COL_CODE_2_TYPE),
            min: find(COL_MIN),
            max: find(COL_MAX),
            gross: find(COL_GROSS),
            discounted_cash: find(COL_DISCOUNTED_CASH),
            setting: find(COL_SETTING),
            description: find(COL_DESCRIPTION),
        }
    }
}

/// Per-layout rule for which codes a row is registered under.
pub trait CodeExtractor: Sync {
    fn check_headers(&self, columns: &Columns) -> anyhow::Result<()>;

    /// Codes the row registers under, in registration order.
    fn codes(&self, row: &StringRecord, columns: &Columns) -> Vec<(String, CodeKind)>;
}

pub struct SingleCodeColumns;

pub struct DualCodeColumns {
    pub drg_tag: &'static str,
    pub procedural_tag: &'static str,
}

static SINGLE_CODE: SingleCodeColumns = SingleCodeColumns;

static DUAL_CODE: DualCodeColumns = DualCodeColumns {
    drg_tag: "DRG",
    procedural_tag: "CPT",
};

impl CodeExtractor for SingleCodeColumns {
    fn check_headers(&self, columns: &Columns) -> anyhow::Result<()> {
        require(columns.code_1, COL_CODE_1)
    }

    fn codes(&self, row: &StringRecord, columns: &Columns) -> Vec<(String, CodeKind)> {
        let code = cell(row, columns.code_1).trim();
        if code.is_empty() {
            return Vec::new();
        }
        let kind = CodeKind::from_tag(&clean(cell(row, columns.code_1_type)));
        vec![(code.to_string(), kind)]
    }
}

impl CodeExtractor for DualCodeColumns {
    fn check_headers(&self, columns: &Columns) -> anyhow::Result<()> {
        require(columns.code_1, COL_CODE_1)?;
        require(columns.code_1_type, COL_CODE_1_TYPE)?;
        require(columns.code_2, COL_CODE_2)?;
        require(columns.code_2_type, COL_CODE_2_TYPE)
    }

    fn codes(&self, row: &StringRecord, columns: &Columns) -> Vec<(String, CodeKind)> {
        let pairs = [
            (columns.code_1, columns.code_1_type, self.drg_tag),
            (columns.code_2, columns.code_2_type, self.procedural_tag),
        ];
        let mut out = Vec::with_capacity(2);
        for (code_col, type_col, tag) in pairs {
            let kind = clean(cell(row, type_col));
            if kind != tag {
                continue;
            }
            let code = clean(cell(row, code_col));
            if !code.is_empty() {
                out.push((code, CodeKind::from_tag(&kind)));
            }
        }
        out
    }
}

fn require(col: Option<usize>, name: &str) -> anyhow::Result<()> {
    col.map(|_| ())
        .with_context(|| format!("disclosure file missing required header '{name}'"))
}

fn cell(row: &StringRecord, col: Option<usize>) -> &str {
    col.and_then(|i| row.get(i)).unwrap_or("")
}

/// Trims and drops stray literal quote characters left over from double-quoted exports.
fn clean(raw: &str) -> String {
    raw.replace('"', "").trim().to_string()
}

fn price_cell(row: &StringRecord, col: Option<usize>) -> Option<f64> {
    let s = clean(cell(row, col));
    if s.is_empty() {
        return None;
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Some(v),
        _ => None,
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    pub rows: usize,
    pub registered: usize,
    pub duplicates: usize,
    pub unpriced: usize,
}

/// Reads a disclosure file from disk, skipping its metadata preamble.
pub fn load(path: &Path, layout: Layout) -> anyhow::Result<PriceIndex> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let (index, stats) =
        read_index(file, layout).with_context(|| format!("parse {}", path.display()))?;
    tracing::info!(
        "Loaded {} codes from {} ({} rows, {} duplicate codes dropped, {} unpriced skipped)",
        stats.registered,
        path.display(),
        stats.rows,
        stats.duplicates,
        stats.unpriced
    );
    Ok(index)
}

pub fn read_index<R: Read>(input: R, layout: Layout) -> anyhow::Result<(PriceIndex, LoadStats)> {
    let mut input = BufReader::new(input);
    let mut skipped = Vec::new();
    for n in 0..METADATA_LINES {
        skipped.clear();
        let read = input
            .read_until(b'\n', &mut skipped)
            .with_context(|| format!("read metadata line {}", n + 1))?;
        if read == 0 {
            return Err(anyhow!("file ended inside the metadata preamble"));
        }
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    // Exports carry the odd Latin-1 byte; decode lossily rather than drop the file.
    let headers = StringRecord::from_byte_record_lossy(
        reader.byte_headers().context("read header row")?.clone(),
    );
    let columns = Columns::from_headers(&headers);
    let extractor = layout.extractor();
    extractor.check_headers(&columns)?;

    let mut builder = IndexBuilder::default();
    let mut stats = LoadStats::default();
    for (i, result) in reader.byte_records().enumerate() {
        // 1-based file line, counting the preamble and header row.
        let row = result.with_context(|| format!("read row on line {}", i + METADATA_LINES + 2))?;
        let row = StringRecord::from_byte_record_lossy(row);
        stats.rows += 1;

        let codes = extractor.codes(&row, &columns);
        if codes.is_empty() {
            continue;
        }

        let bounds = PriceBounds::from_charges(PublishedCharges {
            min: price_cell(&row, columns.min),
            max: price_cell(&row, columns.max),
            gross: price_cell(&row, columns.gross),
            discounted_cash: price_cell(&row, columns.discounted_cash),
        });
        if bounds.range().is_none() {
            stats.unpriced += codes.len();
            continue;
        }

        let setting = clean(cell(&row, columns.setting));
        let setting = if setting.is_empty() {
            UNKNOWN_SETTING.to_string()
        } else {
            setting
        };
        let description = Some(clean(cell(&row, columns.description))).filter(|d| !d.is_empty());

        for (code, code_kind) in codes {
            let inserted = builder.insert_if_absent(DisclosureRecord {
                code,
                code_kind,
                description: description.clone(),
                setting: setting.clone(),
                bounds,
            });
            if inserted {
                stats.registered += 1;
            }
        }
    }
    stats.duplicates = builder.duplicates();

    Ok((builder.finish(), stats))
}
