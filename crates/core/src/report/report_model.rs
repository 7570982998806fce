//! Form 2086 report models.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::disposals::DisposalField;

/// Sections of the form, in display order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportSection {
    General,
    DisposalPrice,
    AcquisitionPrice,
    Result,
}

impl ReportSection {
    pub fn title(&self) -> Option<&'static str> {
        match self {
            ReportSection::DisposalPrice => Some("Détermination du prix de cession"),
            ReportSection::AcquisitionPrice => Some("Détermination du prix total d'acquisition"),
            ReportSection::General | ReportSection::Result => None,
        }
    }
}

/// One numbered line of the form with a formatted cell per disposal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportLine {
    pub code: u16,
    pub label: String,
    pub section: ReportSection,
    /// Raw field behind the line, when the user can edit it.
    pub editable_field: Option<DisposalField>,
    pub cells: Vec<String>,
}

/// The whole form laid out for display, one column per disposal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Form2086Report {
    pub columns: Vec<String>,
    pub lines: Vec<ReportLine>,
    pub total_gain_or_loss: String,
    pub estimated_tax: String,
}

impl Form2086Report {
    pub fn line(&self, code: u16) -> Option<&ReportLine> {
        self.lines.iter().find(|line| line.code == code)
    }
}

impl fmt::Display for Form2086Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<48}", "")?;
        for column in &self.columns {
            write!(f, " | {:>16}", column)?;
        }
        writeln!(f)?;

        let mut current_section = None;
        for line in &self.lines {
            if current_section != Some(line.section) {
                current_section = Some(line.section);
                if let Some(title) = line.section.title() {
                    writeln!(f, "{}", title)?;
                }
            }
            write!(f, "{:<48}", format!("{} - {}", line.code, line.label))?;
            for cell in &line.cells {
                write!(f, " | {:>16}", cell)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Plus-value totale : {}", self.total_gain_or_loss)?;
        write!(
            f,
            "Montant d'impôt estimé (flat tax 30 %) : {}",
            self.estimated_tax
        )
    }
}
