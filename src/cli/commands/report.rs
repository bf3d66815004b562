//! `lca report` command - Full impact matrix and headline summary

use miette::Result;
use serde::Serialize;

use crate::cli::args::InputArgs;
use crate::cli::helpers::{is_human, write_output, Session};
use crate::cli::output::{number, percent, serialize, Grid};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::engine::aggregate::DISTRIBUTION_PER_INDICATOR;
use crate::engine::{AssessmentReport, ImpactMatrix};

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Structured report for JSON/YAML output
#[derive(Serialize)]
struct ReportDocument<'a> {
    product: String,
    functional_unit: String,
    /// Grand normalized total (µPt)
    grand_total: f64,
    /// Grand total as a share of a citizen's yearly footprint (%)
    share_of_citizen_footprint: f64,
    #[serde(flatten)]
    report: &'a AssessmentReport,
    missing_factors: Vec<String>,
}

pub fn run(args: ReportArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::load(&args.input)?;
    let format = session.format(global);

    let report = session.assessment.run(&session.product)?;
    let missing = session.assessment.missing_entities(&session.product);
    let yearly = session.config.citizen_yearly_micropoints();

    let content = match format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let document = ReportDocument {
                product: session.product_name(),
                functional_unit: session.product.usage.functional_unit(),
                grand_total: report.matrix.grand_total(),
                share_of_citizen_footprint: report.matrix.share_of_citizen_footprint(yearly),
                report: &report,
                missing_factors: missing.iter().map(|w| w.to_string()).collect(),
            };
            serialize(&document, format)?
        }
        _ if !is_human(format) => matrix_grid(&report.matrix, format).render(format)?,
        _ => {
            let mut out = String::new();
            out.push_str(&format!("# Life-cycle assessment: {}\n\n", session.product_name()));
            out.push_str(&format!(
                "Functional unit: {}\n\n",
                session.product.usage.functional_unit()
            ));
            out.push_str(&matrix_grid(&report.matrix, format).render(format)?);
            out.push('\n');
            out.push_str(&format!(
                "Grand total: {} µPt ({} of an average European citizen's yearly footprint)\n",
                number(report.matrix.grand_total(), format),
                percent(report.matrix.share_of_citizen_footprint(yearly), format)
            ));
            if !missing.is_empty() {
                out.push_str(&format!(
                    "\nNote: {} reference factor(s) missing and counted as 0, run `lca check` for details\n",
                    missing.len()
                ));
            }
            out
        }
    };

    write_output(&content, global.output.as_deref(), global.quiet)
}

/// Impact matrix as a grid: phase rows, derived rows, derived columns
pub(crate) fn matrix_grid(matrix: &ImpactMatrix, format: OutputFormat) -> Grid {
    let columns = matrix.columns();
    let last = columns.len().saturating_sub(1);
    let mut grid = Grid::new(std::iter::once("Phase".to_string()).chain(columns));

    for row in matrix.rows() {
        let as_percent = row.label == DISTRIBUTION_PER_INDICATOR;
        let cells = row.cells.iter().enumerate().map(|(i, cell)| match cell {
            None => String::new(),
            Some(v) if as_percent || i == last => percent(*v, format),
            Some(v) => number(*v, format),
        });
        grid.push_row(std::iter::once(row.label.clone()).chain(cells));
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::Indicator;
    use crate::engine::{aggregate, ImpactVector, NormalizationFactors, PhaseImpacts};

    fn matrix() -> ImpactMatrix {
        let indicators = vec![Indicator::new("kg eq. CO2")];
        let v = |x: f64| -> ImpactVector { [(Indicator::new("kg eq. CO2"), x)].into_iter().collect() };
        let phases = PhaseImpacts {
            material: v(3.0),
            processing: v(1.0),
            use_phase: v(0.0),
            transportation: v(0.0),
        };
        aggregate(&phases, &indicators, &NormalizationFactors::default()).unwrap()
    }

    #[test]
    fn test_matrix_grid_layout() {
        let grid = matrix_grid(&matrix(), OutputFormat::Csv);
        // 4 phases + 3 derived rows
        assert_eq!(grid.len(), 7);
        let csv = grid.render(OutputFormat::Csv).unwrap();
        let header = csv.lines().next().unwrap();
        assert_eq!(
            header,
            "Phase,kg eq. CO2,Total per phase (normalized),Distribution per phase (%)"
        );
        assert!(csv.lines().any(|l| l.starts_with("Material,3,")));
    }

    #[test]
    fn test_matrix_grid_percent_cells() {
        let md = matrix_grid(&matrix(), OutputFormat::Md)
            .render(OutputFormat::Md)
            .unwrap();
        assert!(md.contains("75.00 %"));
        assert!(md.contains("100.00 %"));
    }
}
