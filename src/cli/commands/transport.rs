//! `lca transport` command - Route legs and t·km per mode

use miette::Result;
use serde::Serialize;

use crate::cli::args::InputArgs;
use crate::cli::helpers::{is_human, write_output, Session};
use crate::cli::output::{number, serialize, Grid};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::TransportMode;
use crate::engine::transport::{impact_of, shipments, transported_mass_distance, Cargo, Leg};
use crate::engine::{ImpactVector, TransportedMassDistance};

#[derive(clap::Args, Debug)]
pub struct TransportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Only print the per-mode summary
    #[arg(long)]
    pub summary: bool,
}

#[derive(Serialize)]
struct LegRow {
    cargo: Cargo,
    mass_kg: f64,
    #[serde(flatten)]
    leg: Leg,
    distance_km: f64,
    tkm: f64,
}

#[derive(Serialize)]
struct TransportDocument {
    legs: Vec<LegRow>,
    tkm: TransportedMassDistance,
    impact: ImpactVector,
}

pub fn run(args: TransportArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::load(&args.input)?;
    let format = session.format(global);
    let distances = &session.assessment.distances;
    let table = &session.assessment.reference;

    let mut legs = Vec::new();
    for shipment in shipments(&session.product) {
        for leg in &shipment.legs {
            legs.push(LegRow {
                cargo: shipment.cargo.clone(),
                mass_kg: shipment.mass_kg,
                leg: *leg,
                distance_km: leg.distance_km(distances)?,
                tkm: shipment.leg_tkm(leg, distances)?,
            });
        }
    }
    let tkm = transported_mass_distance(&session.product, distances)?;
    let impact = impact_of(&tkm, table);

    let content = match format {
        OutputFormat::Json | OutputFormat::Yaml => serialize(
            &TransportDocument { legs, tkm, impact },
            format,
        )?,
        _ => {
            let mut out = String::new();
            if !args.summary {
                let mut grid = Grid::new(["Cargo", "Mass (kg)", "From", "To", "Mode", "Distance (km)", "t·km"]);
                for row in &legs {
                    grid.push_row([
                        row.cargo.to_string(),
                        number(row.mass_kg, format),
                        row.leg.from.to_string(),
                        row.leg.to.to_string(),
                        row.leg.mode.to_string(),
                        number(row.distance_km, format),
                        number(row.tkm, format),
                    ]);
                }
                out.push_str(&grid.render(format)?);
                if is_human(format) {
                    out.push('\n');
                }
            }
            if args.summary || is_human(format) {
                let mut grid = Grid::new(
                    ["Mode".to_string(), "t·km".to_string()]
                        .into_iter()
                        .chain(table.indicators().iter().map(|c| c.to_string())),
                );
                for (mode, amount) in tkm.iter() {
                    let per_mode = impact_of(&single_mode(mode, amount), table);
                    grid.push_row(
                        [mode.to_string(), number(amount, format)]
                            .into_iter()
                            .chain(per_mode.iter().map(|(_, v)| number(v, format))),
                    );
                }
                out.push_str(&grid.render(format)?);
            }
            out
        }
    };

    write_output(&content, global.output.as_deref(), global.quiet)
}

fn single_mode(mode: TransportMode, amount: f64) -> TransportedMassDistance {
    let mut tkm = TransportedMassDistance::default();
    tkm.add(mode, amount);
    tkm
}
