//! Minimal XLSX worksheet reader
//!
//! An `.xlsx` workbook is a ZIP archive of XML parts. This reader extracts the
//! cell text of the first worksheet as a grid of strings:
//!
//! ```text
//! workbook.xlsx
//!   xl/workbook.xml             <sheet name="..." r:id="rId1"/> ... in tab order
//!   xl/_rels/workbook.xml.rels  <Relationship Id="rId1" Target="worksheets/sheet1.xml"/>
//!   xl/sharedStrings.xml        <si><t>Bezirk</t></si> ...
//!   xl/worksheets/sheet1.xml    <row><c r="A1" t="s"><v>0</v></c> ...
//! ```
//!
//! The first worksheet is the first `<sheet>` of `workbook.xml`. Shared
//! strings, inline strings, numbers, booleans and cached formula results are
//! supported. Styles and dates are not interpreted.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::io::{Read, Seek};

use super::error::{DatasetError, DatasetResult};

const WORKBOOK: &str = "xl/workbook.xml";
const WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS: &str = "xl/sharedStrings.xml";
const SHEET_PREFIX: &str = "xl/worksheets/sheet";

/// Column count of the widest Excel sheet (A..XFD)
const MAX_COLUMNS: usize = 16_384;

/// Read the first worksheet of a workbook into rows of cell text
///
/// Rows are padded so that every cell lands at its column index; missing
/// cells become empty strings.
pub fn read_first_sheet<R: Read + Seek>(reader: R) -> DatasetResult<Vec<Vec<String>>> {
    let mut archive = zip::ZipArchive::new(reader)?;

    let shared = match read_entry(&mut archive, SHARED_STRINGS)? {
        Some(xml) => parse_shared_strings(&xml)?,
        None => Vec::new(),
    };

    let sheet_name = match first_sheet_part(&mut archive)? {
        Some(part) => part,
        None => fallback_sheet_name(&archive).ok_or_else(|| {
            DatasetError::Spreadsheet("workbook contains no worksheet".to_string())
        })?,
    };
    let sheet = read_entry(&mut archive, &sheet_name)?
        .ok_or_else(|| DatasetError::Spreadsheet(format!("missing part {}", sheet_name)))?;

    parse_sheet(&sheet, &shared)
}

/// Resolve the part of the first sheet in tab order through the workbook relationships
///
/// `None` when the workbook or its relationships part is absent.
fn first_sheet_part<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> DatasetResult<Option<String>> {
    let Some(workbook) = read_entry(archive, WORKBOOK)? else {
        return Ok(None);
    };
    let Some(rels) = read_entry(archive, WORKBOOK_RELS)? else {
        return Ok(None);
    };

    let Some(rel_id) = first_attribute(&workbook, b"sheet", "r:id")? else {
        return Ok(None);
    };
    match relationship_target(&rels, &rel_id)? {
        Some(target) => Ok(Some(resolve_target(&target))),
        None => Err(DatasetError::Spreadsheet(format!(
            "first sheet relationship '{}' not found",
            rel_id
        ))),
    }
}

/// Value of `attribute` on the first `element` in the document
fn first_attribute(xml: &str, element: &[u8], attribute: &str) -> DatasetResult<Option<String>> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == element => {
                return match e.try_get_attribute(attribute)? {
                    Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
                    None => Ok(None),
                };
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Target of the relationship with the given id
fn relationship_target(xml: &str, id: &str) -> DatasetResult<Option<String>> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"Relationship" => {
                let matches = match e.try_get_attribute("Id")? {
                    Some(attr) => attr.unescape_value()? == id,
                    None => false,
                };
                if matches {
                    return match e.try_get_attribute("Target")? {
                        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
                        None => Ok(None),
                    };
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Relationship targets are relative to `xl/` unless absolute
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target),
    }
}

/// Lowest-numbered `sheetN.xml` part, for workbooks without relationships
fn fallback_sheet_name<R: Read + Seek>(archive: &zip::ZipArchive<R>) -> Option<String> {
    archive
        .file_names()
        .filter_map(|name| {
            let number = name.strip_prefix(SHEET_PREFIX)?.strip_suffix(".xml")?;
            Some((number.parse::<u32>().ok()?, name))
        })
        .min_by_key(|(number, _)| *number)
        .map(|(_, name)| name.to_string())
}

fn read_entry<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    name: &str,
) -> DatasetResult<Option<String>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| DatasetError::Spreadsheet(format!("failed to read {}: {}", name, e)))?;
    Ok(Some(content))
}

/// Parse `sharedStrings.xml` into the string table
///
/// Rich-text runs inside one `<si>` are concatenated; phonetic hints
/// (`<rPh>`) are skipped.
fn parse_shared_strings(xml: &str) -> DatasetResult<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut strings = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;
    let mut in_phonetic = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"si" => current = Some(String::new()),
                b"t" => in_text = true,
                b"rPh" => in_phonetic = true,
                _ => {}
            },
            Event::Empty(e) => {
                if e.name().as_ref() == b"si" {
                    strings.push(String::new());
                }
            }
            Event::Text(t) => {
                if in_text && !in_phonetic {
                    if let Some(buf) = current.as_mut() {
                        buf.push_str(&t.unescape()?);
                    }
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"si" => strings.push(current.take().unwrap_or_default()),
                b"t" => in_text = false,
                b"rPh" => in_phonetic = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(strings)
}

/// How a cell's `<v>` content is to be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Shared,
    Inline,
    Boolean,
    Plain,
}

#[derive(Debug)]
struct PendingCell {
    column: Option<usize>,
    kind: CellKind,
    text: String,
}

fn parse_sheet(xml: &str, shared: &[String]) -> DatasetResult<Vec<Vec<String>>> {
    let mut reader = Reader::from_str(xml);
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Option<Vec<String>> = None;
    let mut cell: Option<PendingCell> = None;
    let mut in_value = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"row" => row = Some(Vec::new()),
                b"c" => cell = Some(start_cell(&e)?),
                b"v" | b"t" => in_value = cell.is_some(),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"row" => rows.push(Vec::new()),
                b"c" => {
                    if let Some(r) = row.as_mut() {
                        let pending = start_cell(&e)?;
                        place_cell(r, pending.column, String::new())?;
                    }
                }
                _ => {}
            },
            Event::Text(t) => {
                if in_value {
                    if let Some(c) = cell.as_mut() {
                        c.text.push_str(&t.unescape()?);
                    }
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"v" | b"t" => in_value = false,
                b"c" => {
                    if let (Some(pending), Some(r)) = (cell.take(), row.as_mut()) {
                        let column = pending.column;
                        let value = resolve_cell(pending, shared)?;
                        place_cell(r, column, value)?;
                    }
                }
                b"row" => {
                    if let Some(r) = row.take() {
                        rows.push(r);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(rows)
}

fn start_cell(e: &BytesStart<'_>) -> DatasetResult<PendingCell> {
    let column = match e.try_get_attribute("r")? {
        Some(attr) => column_index(&attr.unescape_value()?)?,
        None => None,
    };

    let kind = match e.try_get_attribute("t")? {
        Some(attr) => match &*attr.unescape_value()? {
            "s" => CellKind::Shared,
            "inlineStr" => CellKind::Inline,
            "b" => CellKind::Boolean,
            _ => CellKind::Plain,
        },
        None => CellKind::Plain,
    };

    Ok(PendingCell {
        column,
        kind,
        text: String::new(),
    })
}

fn resolve_cell(cell: PendingCell, shared: &[String]) -> DatasetResult<String> {
    match cell.kind {
        CellKind::Shared => {
            let index: usize = cell.text.trim().parse().map_err(|_| {
                DatasetError::Spreadsheet(format!("invalid shared string index '{}'", cell.text))
            })?;
            shared.get(index).cloned().ok_or_else(|| {
                DatasetError::Spreadsheet(format!("shared string index {} out of range", index))
            })
        }
        CellKind::Boolean => Ok(if cell.text.trim() == "1" {
            "TRUE".to_string()
        } else {
            "FALSE".to_string()
        }),
        CellKind::Inline | CellKind::Plain => Ok(cell.text),
    }
}

fn place_cell(row: &mut Vec<String>, column: Option<usize>, value: String) -> DatasetResult<()> {
    let index = column.unwrap_or(row.len());
    if index >= MAX_COLUMNS {
        return Err(DatasetError::Spreadsheet(format!(
            "row has more than {} columns",
            MAX_COLUMNS
        )));
    }
    if row.len() <= index {
        row.resize(index + 1, String::new());
    }
    row[index] = value;
    Ok(())
}

/// Convert the letters of an A1-style reference to a zero-based column
///
/// References without letters have no column; references past `XFD` are
/// rejected.
fn column_index(reference: &str) -> DatasetResult<Option<usize>> {
    let letters = reference.bytes().take_while(|b| b.is_ascii_alphabetic());

    let mut index = 0usize;
    for b in letters {
        let digit = (b.to_ascii_uppercase() - b'A' + 1) as usize;
        index = index * 26 + digit;
        if index > MAX_COLUMNS {
            return Err(DatasetError::Spreadsheet(format!(
                "cell reference '{}' is beyond the last column",
                reference
            )));
        }
    }

    Ok(index.checked_sub(1))
}
