use crate::constants::DISPOSAL_DATE_FORMAT;
use crate::disposals::{ComputedRecord, DisposalField, DisposalSummary};
use crate::utils::format_utils::format_currency;

use super::report_model::{Form2086Report, ReportLine, ReportSection};

enum Cell {
    Date,
    Amount(fn(&ComputedRecord) -> f64),
}

struct LineLayout {
    code: u16,
    label: &'static str,
    section: ReportSection,
    editable_field: Option<DisposalField>,
    cell: Cell,
}

fn line_layouts() -> [LineLayout; 12] {
    [
        LineLayout {
            code: 211,
            label: "Date de la cession",
            section: ReportSection::General,
            editable_field: Some(DisposalField::Date),
            cell: Cell::Date,
        },
        LineLayout {
            code: 212,
            label: "Valeur globale du portefeuille",
            section: ReportSection::General,
            editable_field: Some(DisposalField::TotalPortfolioValue),
            cell: Cell::Amount(|row| row.disposal.total_portfolio_value),
        },
        LineLayout {
            code: 213,
            label: "Prix de cession",
            section: ReportSection::DisposalPrice,
            editable_field: Some(DisposalField::DisposalAmount),
            cell: Cell::Amount(|row| row.disposal.disposal_amount),
        },
        LineLayout {
            code: 214,
            label: "Frais de cession",
            section: ReportSection::DisposalPrice,
            editable_field: Some(DisposalField::DisposalFees),
            cell: Cell::Amount(|row| row.disposal.disposal_fees),
        },
        LineLayout {
            code: 216,
            label: "Soulte reçue/versée",
            section: ReportSection::DisposalPrice,
            editable_field: Some(DisposalField::BalancingPayment),
            cell: Cell::Amount(|row| row.disposal.balancing_payment),
        },
        LineLayout {
            code: 217,
            label: "Prix net des soultes",
            section: ReportSection::DisposalPrice,
            editable_field: None,
            cell: Cell::Amount(|row| row.net_of_balancing),
        },
        LineLayout {
            code: 218,
            label: "Prix net frais + soultes",
            section: ReportSection::DisposalPrice,
            editable_field: None,
            cell: Cell::Amount(|row| row.net_of_fees_and_balancing),
        },
        LineLayout {
            code: 220,
            label: "Prix total d'acquisition",
            section: ReportSection::AcquisitionPrice,
            editable_field: Some(DisposalField::TotalAcquisitionCost),
            cell: Cell::Amount(|row| row.disposal.total_acquisition_cost),
        },
        LineLayout {
            code: 221,
            label: "Fraction de capital",
            section: ReportSection::AcquisitionPrice,
            editable_field: None,
            cell: Cell::Amount(|row| row.capital_fraction),
        },
        LineLayout {
            code: 222,
            label: "Soultes reçues (échanges antérieurs)",
            section: ReportSection::AcquisitionPrice,
            editable_field: Some(DisposalField::PriorBalancingPaymentReceived),
            cell: Cell::Amount(|row| row.disposal.prior_balancing_payment_received),
        },
        LineLayout {
            code: 223,
            label: "Prix total acquisition net",
            section: ReportSection::AcquisitionPrice,
            editable_field: None,
            cell: Cell::Amount(|row| row.net_acquisition_cost),
        },
        LineLayout {
            code: 224,
            label: "Plus-value ou moins-value",
            section: ReportSection::Result,
            editable_field: None,
            cell: Cell::Amount(|row| row.gain_or_loss),
        },
    ]
}

/// Lays out a computed summary as the numbered lines of form 2086.
pub fn build_form_2086_report(summary: &DisposalSummary) -> Form2086Report {
    let columns = (1..=summary.disposals.len())
        .map(|n| format!("Cession {}", n))
        .collect();

    let lines = line_layouts()
        .iter()
        .map(|layout| ReportLine {
            code: layout.code,
            label: layout.label.to_string(),
            section: layout.section,
            editable_field: layout.editable_field,
            cells: summary
                .disposals
                .iter()
                .map(|row| match layout.cell {
                    Cell::Date => row.disposal.date.format(DISPOSAL_DATE_FORMAT).to_string(),
                    Cell::Amount(value) => format_currency(value(row)),
                })
                .collect(),
        })
        .collect();

    Form2086Report {
        columns,
        lines,
        total_gain_or_loss: format_currency(summary.total_gain_or_loss),
        estimated_tax: format_currency(summary.estimated_tax),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disposals::{summarize_disposals, DisposalRecord};
    use chrono::NaiveDate;

    fn sample_summary() -> DisposalSummary {
        let records = vec![
            DisposalRecord {
                date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                total_portfolio_value: 10000.0,
                disposal_amount: 1000.0,
                disposal_fees: 10.0,
                balancing_payment: 0.0,
                total_acquisition_cost: 5000.0,
                prior_balancing_payment_received: 0.0,
            },
            DisposalRecord {
                date: NaiveDate::from_ymd_opt(2023, 6, 15).unwrap(),
                total_portfolio_value: 8000.0,
                disposal_amount: 2000.0,
                disposal_fees: 20.0,
                balancing_payment: 0.0,
                total_acquisition_cost: 5000.0,
                prior_balancing_payment_received: 0.0,
            },
        ];
        summarize_disposals(&records, 0.0)
    }

    #[test]
    fn test_report_lines_are_in_form_order() {
        let report = build_form_2086_report(&sample_summary());
        let codes: Vec<u16> = report.lines.iter().map(|line| line.code).collect();
        assert_eq!(
            codes,
            vec![211, 212, 213, 214, 216, 217, 218, 220, 221, 222, 223, 224]
        );
        assert_eq!(report.columns, vec!["Cession 1", "Cession 2"]);
    }

    #[test]
    fn test_report_cells_are_formatted() {
        let report = build_form_2086_report(&sample_summary());

        assert_eq!(report.line(211).unwrap().cells, vec!["2023-01-01", "2023-06-15"]);
        assert_eq!(report.line(218).unwrap().cells[0], "990.00 €");
        assert_eq!(report.line(221).unwrap().cells, vec!["0.00 €", "500.00 €"]);
        assert_eq!(report.line(224).unwrap().cells, vec!["490.00 €", "855.00 €"]);
        assert_eq!(report.total_gain_or_loss, "1345.00 €");
        assert_eq!(report.estimated_tax, "403.50 €");
    }

    #[test]
    fn test_only_raw_lines_are_editable() {
        let report = build_form_2086_report(&sample_summary());
        let editable: Vec<u16> = report
            .lines
            .iter()
            .filter(|line| line.editable_field.is_some())
            .map(|line| line.code)
            .collect();
        assert_eq!(editable, vec![211, 212, 213, 214, 216, 220, 222]);
    }

    #[test]
    fn test_empty_report() {
        let report = build_form_2086_report(&summarize_disposals(&[], 0.0));
        assert!(report.columns.is_empty());
        assert!(report.lines.iter().all(|line| line.cells.is_empty()));
        assert_eq!(report.total_gain_or_loss, "0.00 €");
        assert_eq!(report.estimated_tax, "0.00 €");
    }

    #[test]
    fn test_text_rendering_lists_sections() {
        let text = build_form_2086_report(&sample_summary()).to_string();
        assert!(text.contains("Détermination du prix de cession"));
        assert!(text.contains("224 - Plus-value ou moins-value"));
        assert!(text.contains("403.50 €"));
    }
}
