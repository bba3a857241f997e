//! In-memory `.docx` builder for integration tests

#![allow(dead_code)]

use encoding_rs::Encoding;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Builds `word/document.xml` bodies the way Word lays out EBD sections:
/// a level 3 heading, then a table whose first row announces the role and
/// whose second row is the column legend.
pub struct DocumentBuilder {
    body: String,
    next_id: u32,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self {
            body: String::new(),
            next_id: 0x1000_0000,
        }
    }

    fn next_para_id(&mut self) -> String {
        self.next_id += 1;
        format!("{:08X}", self.next_id)
    }

    fn paragraph(&mut self, text: &str) -> String {
        let id = self.next_para_id();
        if text.is_empty() {
            format!(r#"<w:p w14:paraId="{id}" w14:textId="77777777"/>"#)
        } else {
            format!(
                r#"<w:p w14:paraId="{id}" w14:textId="77777777"><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
                escape(text)
            )
        }
    }

    pub fn heading(mut self, title: &str) -> Self {
        let id = self.next_para_id();
        self.body.push_str(&format!(
            r#"<w:p w14:paraId="{id}" w14:textId="77777777"><w:pPr><w:pStyle w:val="berschrift3"/></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>"#,
            escape(title)
        ));
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        let paragraph = self.paragraph(text);
        self.body.push_str(&paragraph);
        self
    }

    /// Raw XML appended verbatim
    pub fn raw(mut self, xml: &str) -> Self {
        self.body.push_str(xml);
        self
    }

    /// EBD table: role row, legend row, then `rows` of cell texts. Rows carry
    /// their own paragraph ids ahead of their cells' ids, as Word writes them.
    pub fn ebd_table(mut self, role: &str, rows: &[&[&str]]) -> Self {
        let mut xml = String::from(r#"<w:tbl><w:tblPr><w:tblStyle w:val="Tabellenraster"/></w:tblPr><w:tblGrid><w:gridCol/></w:tblGrid>"#);
        let row_id = self.next_para_id();
        let role_cell = self.paragraph(&format!("Prüfende Rolle: {role}"));
        xml.push_str(&format!(
            r#"<w:tr w14:paraId="{row_id}" w14:textId="77777777"><w:tc>{role_cell}</w:tc></w:tr>"#
        ));

        let legend = ["Nr.", "Prüfschritt", "Prüfergebnis", "Code"];
        xml.push_str(&self.row(&legend));
        for row in rows {
            xml.push_str(&self.row(row));
        }
        xml.push_str("</w:tbl>");
        self.body.push_str(&xml);
        self
    }

    fn row(&mut self, cells: &[&str]) -> String {
        let row_id = self.next_para_id();
        let mut xml = format!(r#"<w:tr w14:paraId="{row_id}" w14:textId="77777777">"#);
        for cell in cells {
            let paragraph = self.paragraph(cell);
            xml.push_str(&format!("<w:tc><w:tcPr/>{paragraph}</w:tc>"));
        }
        xml.push_str("</w:tr>");
        xml
    }

    pub fn build_xml(&self) -> String {
        self.build_xml_declaring("UTF-8")
    }

    fn build_xml_declaring(&self, encoding: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="{encoding}" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:w14="http://schemas.microsoft.com/office/word/2010/wordml"><w:body>{}<w:sectPr/></w:body></w:document>"#,
            self.body
        )
    }

    /// Archive whose body is declared as and encoded in `label`
    pub fn build_docx_encoded(&self, label: &str) -> Vec<u8> {
        let encoding = Encoding::for_label(label.as_bytes()).expect("known encoding label");
        let xml = self.build_xml_declaring(label);
        let (bytes, _, had_errors) = encoding.encode(&xml);
        assert!(!had_errors, "fixture text not representable in {label}");
        docx_with_entries(&[
            ("[Content_Types].xml", "<Types/>".as_bytes()),
            ("word/document.xml", &bytes),
        ])
    }

    pub fn build_docx(&self) -> Vec<u8> {
        docx_with_entries(&[
            ("[Content_Types].xml", "<Types/>".as_bytes()),
            ("word/document.xml", self.build_xml().as_bytes()),
        ])
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn docx_with_entries(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("start zip entry");
        writer.write_all(data).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

/// Two EBDs as they appear in the BDEW documents
pub fn sample_document() -> DocumentBuilder {
    DocumentBuilder::new()
        .heading("E_0003_Bestellung der Aggregationsebene RZ prüfen")
        .text("Basiert auf Strom EBD: E_0003_Bestellung der Aggregationsebene")
        .ebd_table(
            "ÜNB",
            &[&["1", "Erfolgt die Bestellung zum Monatsersten?", "nein", "A01"]],
        )
        .heading("E_0401_Prüfen, ob Anfrage vollständig ist")
        .ebd_table(
            "MSB",
            &[
                &["1", "Ist die Marktlokation bekannt?", "ja", ""],
                &["", "", "020"],
                &["", "", "nein", "A01"],
                &["2", "Ist das Datum plausibel?", "", ""],
                &["", "", "A02"],
                &["", "Hinweis: Prüfung nur für Strom", "", ""],
                &["3", "Liegt eine Vollmacht vor?", "ja", "Ende"],
                &["", "", "nein", "A03"],
            ],
        )
        .heading("E_0402_Stornierung prüfen")
        .ebd_table("lf", &[&["010", "Ist die Stornierung fristgerecht?", "nein", "A99"]])
}
