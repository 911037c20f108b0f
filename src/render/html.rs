use std::io::Write;

use super::{Cells, Renderer, HEADER_LABELS, TOTAL_LABEL};
use crate::errors::Result;
use crate::transaction::LedgerRow;

/// html `<table>` with right-aligned figures
#[derive(Debug, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl Renderer for HtmlRenderer {
    fn header(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "<table>")?;
        let labels: String = HEADER_LABELS
            .iter()
            .map(|label| format!("<th>{}</th>", label))
            .collect();
        writeln!(out, "<tr>{}<th></th></tr>", labels)?;
        Ok(())
    }

    fn row(&self, out: &mut dyn Write, _row: &LedgerRow, cells: &Cells) -> Result<()> {
        let columns = cells.columns();
        let figures: String = columns[1..]
            .iter()
            .map(|cell| format!("<td align=\"right\">{}</td>", cell))
            .collect();
        writeln!(
            out,
            "<tr><td>{}</td>{}<td>{}</td></tr>",
            columns[0],
            figures,
            escape(&cells.remark)
        )?;
        Ok(())
    }

    fn footer(&self, out: &mut dyn Write, total: &str) -> Result<()> {
        writeln!(
            out,
            "<tr>{}<td>{}</td><td>{}</td><td></td></tr>",
            "<td></td>".repeat(7),
            TOTAL_LABEL,
            total
        )?;
        writeln!(out, "</table>")?;
        Ok(())
    }

    fn warning(&self, out: &mut dyn Write, message: &str) -> Result<()> {
        writeln!(out, "<!-- {} -->", message.trim_end_matches('-').trim_end())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footer_closes_table() {
        let renderer = HtmlRenderer::new();
        let mut out = Vec::new();
        renderer.footer(&mut out, "91,367").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<tr><td></td><td></td><td></td><td></td><td></td><td></td><td></td>\
             <td>【合計】</td><td>91,367</td><td></td></tr>\n</table>\n"
        );
    }

    #[test]
    fn test_warning_is_a_comment() {
        let renderer = HtmlRenderer::new();
        let mut out = Vec::new();
        renderer.warning(&mut out, "WARNING: x. ----").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "<!-- WARNING: x. -->\n");
    }
}
