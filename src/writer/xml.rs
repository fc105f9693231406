// src/writer/xml.rs

//! eopkg-compatible XML rendering
//!
//! Element names follow the legacy PiSi schema so existing package tools
//! can read the output unchanged.

use super::DocumentWriter;
use crate::descriptor::{PackageDescriptor, SourceInfo};
use crate::error::{Error, Result};
use crate::manifest::PackageManifest;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

const FILES_ROOT: &str = "Files";
const METADATA_ROOT: &str = "PISI";
const LANG: &str = "en";

/// Writes files.xml and metadata.xml in the PiSi layout
#[derive(Debug, Clone)]
pub struct XmlDocumentWriter {
    indent: usize,
}

impl Default for XmlDocumentWriter {
    fn default() -> Self {
        Self { indent: 4 }
    }
}

impl XmlDocumentWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spaces per nesting level
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Render files.xml as a string
    pub fn files_xml(&self, manifest: &PackageManifest) -> Result<String> {
        let mut xml = XmlOut::new(self.indent)?;
        xml.start(FILES_ROOT)?;

        for record in manifest {
            xml.start("File")?;
            xml.text_element("Path", &record.path)?;
            xml.text_element("Type", record.file_type.as_str())?;
            xml.text_element("Size", &record.size.to_string())?;
            xml.text_element("Uid", &record.uid)?;
            xml.text_element("Gid", &record.gid)?;
            xml.text_element("Mode", &record.mode)?;
            if let Some(hash) = &record.hash {
                xml.text_element("Hash", hash.as_str())?;
            }
            xml.end("File")?;
        }

        xml.end(FILES_ROOT)?;
        xml.finish()
    }

    /// Render metadata.xml as a string
    pub fn metadata_xml(&self, descriptor: &PackageDescriptor) -> Result<String> {
        let mut xml = XmlOut::new(self.indent)?;
        xml.start(METADATA_ROOT)?;

        xml.start("Source")?;
        write_source(&mut xml, &descriptor.source)?;
        xml.end("Source")?;

        xml.start("Package")?;
        xml.text_element("Name", &descriptor.name)?;
        xml.lang_element("Summary", &descriptor.summary)?;
        xml.lang_element("Description", &descriptor.description)?;
        if let Some(part_of) = &descriptor.part_of {
            xml.text_element("PartOf", part_of)?;
        }
        for license in &descriptor.licenses {
            xml.text_element("License", license)?;
        }

        xml.start("Files")?;
        for pattern in &descriptor.file_patterns {
            xml.element_with_attr("Path", ("fileType", pattern.file_type.as_str()), &pattern.pattern)?;
        }
        xml.end("Files")?;

        xml.start("History")?;
        for update in &descriptor.history {
            let release = update.release.to_string();
            xml.start_with_attr("Update", ("release", &release))?;
            xml.text_element("Date", &update.date.format("%Y-%m-%d").to_string())?;
            xml.text_element("Version", &update.version)?;
            xml.text_element("Comment", &update.comment)?;
            xml.text_element("Name", &update.name)?;
            xml.text_element("Email", &update.email)?;
            xml.end("Update")?;
        }
        xml.end("History")?;

        xml.text_element("BuildHost", &descriptor.build_host)?;
        xml.text_element("Distribution", &descriptor.distribution)?;
        xml.text_element("DistributionRelease", &descriptor.distribution_release)?;
        xml.text_element("Architecture", &descriptor.architecture)?;
        xml.text_element("InstalledSize", &descriptor.installed_size.to_string())?;
        xml.text_element("PackageFormat", &descriptor.package_format)?;

        xml.start("Source")?;
        write_source(&mut xml, &descriptor.source)?;
        xml.end("Source")?;

        xml.end("Package")?;
        xml.end(METADATA_ROOT)?;
        xml.finish()
    }
}

impl DocumentWriter for XmlDocumentWriter {
    fn files_document(&self, manifest: &PackageManifest) -> Result<Vec<u8>> {
        Ok(self.files_xml(manifest)?.into_bytes())
    }

    fn metadata_document(&self, descriptor: &PackageDescriptor) -> Result<Vec<u8>> {
        Ok(self.metadata_xml(descriptor)?.into_bytes())
    }
}

fn write_source(xml: &mut XmlOut, source: &SourceInfo) -> Result<()> {
    xml.text_element("Name", &source.name)?;
    if let Some(homepage) = &source.homepage {
        xml.text_element("Homepage", homepage)?;
    }
    xml.start("Packager")?;
    xml.text_element("Name", &source.packager.name)?;
    xml.text_element("Email", &source.packager.email)?;
    xml.end("Packager")
}

/// Thin event writer mapping quick-xml failures into [`Error::Xml`]
struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    fn new(indent: usize) -> Result<Self> {
        let mut out = Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', indent),
        };
        out.emit(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        Ok(out)
    }

    fn emit(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| Error::Xml(e.to_string()))
    }

    fn start(&mut self, name: &str) -> Result<()> {
        self.emit(Event::Start(BytesStart::new(name)))
    }

    fn start_with_attr(&mut self, name: &str, attr: (&str, &str)) -> Result<()> {
        let mut start = BytesStart::new(name);
        start.push_attribute(attr);
        self.emit(Event::Start(start))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.emit(Event::End(BytesEnd::new(name)))
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.start(name)?;
        self.emit(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    fn element_with_attr(&mut self, name: &str, attr: (&str, &str), text: &str) -> Result<()> {
        self.start_with_attr(name, attr)?;
        self.emit(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    fn lang_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.element_with_attr(name, ("xml:lang", LANG), text)
    }

    fn finish(self) -> Result<String> {
        let mut bytes = self.writer.into_inner();
        bytes.push(b'\n');
        String::from_utf8(bytes).map_err(|e| Error::Xml(e.to_string()))
    }
}
