//! Test cases as a single-sheet `.xlsx` workbook.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::ExportError;
use crate::domain::TestCase;

pub const SPREADSHEET_FILE_NAME: &str = "test_cases.xlsx";
pub const SHEET_NAME: &str = "TestCases";

pub const SPREADSHEET_HEADERS: [&str; 10] = [
    "ID",
    "Area",
    "Module",
    "SubModule",
    "Title",
    "Priority",
    "Preconditions",
    "Test Data",
    "Steps",
    "Expected",
];

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

/// One row per case, in workspace order. Multi-line fields are joined
/// with `\n`.
pub fn spreadsheet_rows(cases: &[TestCase]) -> Vec<[String; 10]> {
    cases
        .iter()
        .map(|case| {
            [
                case.id.clone(),
                case.area.clone(),
                case.module.clone(),
                case.submodule.clone(),
                case.title.clone(),
                case.priority.to_string(),
                case.preconditions.join("\n"),
                case.test_data.join("\n"),
                case.test_steps.join("\n"),
                case.expected_results.join("\n"),
            ]
        })
        .collect()
}

/// Serialize the cases to `.xlsx` bytes: a header row then one row per case.
pub fn write_spreadsheet(cases: &[TestCase]) -> Result<Vec<u8>, ExportError> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
        ("_rels/.rels", ROOT_RELS_XML.to_string()),
        ("xl/workbook.xml", workbook_xml()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML.to_string()),
        ("xl/worksheets/sheet1.xml", sheet_xml(cases)),
    ];
    for (name, xml) in parts {
        writer.start_file(name, options)?;
        writer.write_all(xml.as_bytes())?;
    }

    Ok(writer.finish()?.into_inner())
}

fn workbook_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        SHEET_NAME
    )
}

fn sheet_xml(cases: &[TestCase]) -> String {
    let header = SPREADSHEET_HEADERS.map(str::to_string);
    let rows = std::iter::once(header).chain(spreadsheet_rows(cases));

    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (r, row) in rows.enumerate() {
        let row_num = r + 1;
        xml.push_str(&format!(r#"<row r="{}">"#, row_num));
        for (c, value) in row.iter().enumerate() {
            xml.push_str(&format!(
                r#"<c r="{}{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                column_name(c),
                row_num,
                escape_xml(value)
            ));
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Zero-based column index to its letter name (0 -> A, 26 -> AA).
fn column_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            // Control characters other than tab and newline are not valid XML
            c if c.is_control() && c != '\t' && c != '\n' => {}
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;
    use calamine::{Reader, Xlsx};

    fn case() -> TestCase {
        TestCase {
            id: "TC_001".to_string(),
            area: "UI/UX".to_string(),
            module: "Authentication".to_string(),
            submodule: "Login".to_string(),
            title: "Login with <valid> & \"trusted\" creds".to_string(),
            priority: Priority::High,
            preconditions: vec!["Registered".to_string()],
            test_data: vec![],
            test_steps: vec!["1. Open app".to_string(), "2. Submit".to_string()],
            expected_results: vec!["Dashboard shown".to_string()],
            attachments: vec![],
            selected: false,
        }
    }

    #[test]
    fn test_rows_join_multiline_fields() {
        let rows = spreadsheet_rows(&[case()]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], "TC_001");
        assert_eq!(rows[0][5], "High");
        assert_eq!(rows[0][7], "");
        assert_eq!(rows[0][8], "1. Open app\n2. Submit");
    }

    #[test]
    fn test_column_names() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(9), "J");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(27), "AB");
        assert_eq!(column_name(701), "ZZ");
        assert_eq!(column_name(702), "AAA");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b>&\"c\"\u{1}\n"), "a&lt;b&gt;&amp;&quot;c&quot;\n");
    }

    #[test]
    fn test_workbook_reads_back() {
        let bytes = write_spreadsheet(&[case()]).unwrap();
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);

        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "ID");
        assert_eq!(rows[0][9], "Expected");
        assert_eq!(rows[1][4], "Login with <valid> & \"trusted\" creds");
        assert_eq!(rows[1][8], "1. Open app\n2. Submit");
    }
}
