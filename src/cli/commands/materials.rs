//! `lca materials` command - Per-material impacts

use miette::Result;
use serde::Serialize;

use crate::cli::args::InputArgs;
use crate::cli::helpers::{is_human, write_output, Session};
use crate::cli::output::{number, serialize, Grid};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::engine::material::{material_impacts, material_phase_impact};
use crate::engine::ImpactVector;

#[derive(clap::Args, Debug)]
pub struct MaterialsArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Serialize)]
struct MaterialRow<'a> {
    name: &'a str,
    origin: &'a str,
    usable_mass_kg: f64,
    finished_mass_kg: f64,
    impacts: &'a ImpactVector,
}

pub fn run(args: MaterialsArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::load(&args.input)?;
    let format = session.format(global);
    let table = &session.assessment.reference;

    let impacts = material_impacts(&session.product, table);
    let total = material_phase_impact(&impacts, table.indicators());

    let content = match format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let rows: Vec<MaterialRow> = session
                .product
                .materials
                .iter()
                .filter_map(|m| {
                    impacts.get(&m.name).map(|v| MaterialRow {
                        name: m.name.as_str(),
                        origin: m.origin.as_str(),
                        usable_mass_kg: m.usable_mass_kg,
                        finished_mass_kg: m.finished_mass_kg,
                        impacts: v,
                    })
                })
                .collect();
            serialize(&rows, format)?
        }
        _ => {
            let mut grid = Grid::new(
                ["Material", "Origin", "Usable mass (kg)"]
                    .into_iter()
                    .map(String::from)
                    .chain(table.indicators().iter().map(|c| c.to_string())),
            );
            for m in &session.product.materials {
                let Some(vector) = impacts.get(&m.name) else {
                    continue;
                };
                grid.push_row(
                    [
                        m.name.to_string(),
                        m.origin.to_string(),
                        number(m.usable_mass_kg, format),
                    ]
                    .into_iter()
                    .chain(vector.iter().map(|(_, v)| number(v, format))),
                );
            }
            if is_human(format) {
                grid.push_row(
                    [
                        "Total".to_string(),
                        String::new(),
                        number(
                            session.product.materials.iter().map(|m| m.usable_mass_kg).sum(),
                            format,
                        ),
                    ]
                    .into_iter()
                    .chain(total.iter().map(|(_, v)| number(v, format))),
                );
            }
            grid.render(format)?
        }
    };

    write_output(&content, global.output.as_deref(), global.quiet)
}
