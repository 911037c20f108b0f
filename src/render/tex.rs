use std::io::Write;

use super::{Cells, Renderer, HEADER_LABELS, TOTAL_LABEL};
use crate::errors::Result;
use crate::transaction::LedgerRow;

/// LaTeX `tabular` body
#[derive(Debug, Default)]
pub struct TexRenderer;

impl TexRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn escape_underscore(text: &str) -> String {
    text.replace('_', "\\_")
}

fn escape_remark(text: &str) -> String {
    text.replace('\\', "{\\textbackslash}")
        .replace('#', "\\#")
        .replace('&', "\\&")
}

impl Renderer for TexRenderer {
    fn header(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "\\begin{{tabular}}{{lrrrrrrrrl}}")?;
        writeln!(out, "{}&\\\\", HEADER_LABELS.join("&"))?;
        Ok(())
    }

    fn row(&self, out: &mut dyn Write, _row: &LedgerRow, cells: &Cells) -> Result<()> {
        let fields = [
            cells.date.clone(),
            escape_underscore(&cells.borrowing),
            escape_underscore(&cells.repayment),
            cells.rate.clone(),
            escape_underscore(&cells.days),
            cells.interest.clone(),
            cells.change_of_principal.clone(),
            cells.remaining_interest.clone(),
            cells.remaining_principal.clone(),
            escape_remark(&cells.remark),
        ];
        writeln!(out, "{}\\\\", fields.join("&"))?;
        Ok(())
    }

    fn footer(&self, out: &mut dyn Write, total: &str) -> Result<()> {
        writeln!(out, "{}{}&{}&\\\\", "&".repeat(7), TOTAL_LABEL, total)?;
        writeln!(out, "\\end{{tabular}}")?;
        Ok(())
    }

    fn warning(&self, out: &mut dyn Write, message: &str) -> Result<()> {
        writeln!(out, "% {}", message)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_footer() {
        let renderer = TexRenderer::new();
        let mut out = Vec::new();
        renderer.header(&mut out).unwrap();
        renderer.footer(&mut out, "91,367").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\\begin{tabular}{lrrrrrrrrl}\n\
             日付&借入&返済&年利&日数&利息&増減&残利息&残元金&\\\\\n\
             &&&&&&&【合計】&91,367&\\\\\n\
             \\end{tabular}\n"
        );
    }

    #[test]
    fn test_escapes() {
        assert_eq!(escape_underscore("_50,000"), "\\_50,000");
        assert_eq!(escape_remark("#a&b\\c"), "\\#a\\&b{\\textbackslash}c");
    }
}
