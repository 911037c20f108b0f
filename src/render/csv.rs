use std::io::Write;

use ::csv::{QuoteStyle, Terminator, WriterBuilder};

use super::{Cells, Renderer, HEADER_LABELS};
use crate::errors::Result;
use crate::transaction::LedgerRow;

const CSV_TOTAL_LABEL: &str = "合計";

/// comma separated values with every field quoted
#[derive(Debug, Default)]
pub struct CsvRenderer;

impl CsvRenderer {
    pub fn new() -> Self {
        Self
    }

    fn write_record<'r>(
        &self,
        out: &mut dyn Write,
        record: impl IntoIterator<Item = &'r str>,
    ) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(out);
        writer.write_record(record)?;
        writer.flush()?;
        Ok(())
    }
}

impl Renderer for CsvRenderer {
    fn header(&self, out: &mut dyn Write) -> Result<()> {
        self.write_record(out, HEADER_LABELS.iter().copied().chain([""]))
    }

    fn row(&self, out: &mut dyn Write, _row: &LedgerRow, cells: &Cells) -> Result<()> {
        self.write_record(out, cells.columns().into_iter().chain([cells.remark.as_str()]))
    }

    fn footer(&self, out: &mut dyn Write, total: &str) -> Result<()> {
        self.write_record(out, ["", "", "", "", "", "", "", CSV_TOTAL_LABEL, total, ""])
    }

    fn warning(&self, out: &mut dyn Write, message: &str) -> Result<()> {
        self.write_record(out, [message])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_footer_are_quoted() {
        let renderer = CsvRenderer::new();
        let mut out = Vec::new();
        renderer.header(&mut out).unwrap();
        renderer.footer(&mut out, "-13,862").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\"日付\",\"借入\",\"返済\",\"年利\",\"日数\",\"利息\",\"増減\",\"残利息\",\"残元金\",\"\"\n\
             \"\",\"\",\"\",\"\",\"\",\"\",\"\",\"合計\",\"-13,862\",\"\"\n"
        );
    }
}
