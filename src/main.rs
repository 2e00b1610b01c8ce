use clap::Parser;
use dta_router::{AssignmentConfig, NetworkDescription, Waypoint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(help = "path to a JSON network description")]
    network: PathBuf,
    #[arg(long, help = "path to a JSON assignment configuration")]
    config: Option<PathBuf>,
    #[arg(long, help = "print the per-edge state as JSON after routing")]
    snapshot: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => {
            log::info!("reading assignment configuration from {}", path.display());
            AssignmentConfig::from_path(path)?
        }
        None => AssignmentConfig::default(),
    };
    let network = NetworkDescription::from_path(&args.network)?;
    let run = network.start_run(config)?;

    println!(
        "{} edges -> {} vertices, {} parking lots",
        run.graph().edge_count(),
        run.graph().vertex_count(),
        run.lots().len(),
    );

    let origins = run.lots().origins().map(Waypoint::Lot).collect::<Vec<_>>();
    let destinations = run
        .lots()
        .destinations()
        .map(Waypoint::Lot)
        .collect::<Vec<_>>();
    for outcome in run.route(&origins, &destinations) {
        let (Waypoint::Lot(from), Waypoint::Lot(to)) = (outcome.origin, outcome.destination) else {
            continue;
        };
        match outcome.result {
            Ok(route) => println!(
                "lot {} -> lot {}: {:.1} s, nodes {:?}, edges {:?}",
                from,
                to,
                route.travel_time,
                route.nodes.iter().map(|n| n.0).collect::<Vec<_>>(),
                route.edges.iter().map(|e| e.0).collect::<Vec<_>>(),
            ),
            Err(err) => println!("lot {} -> lot {}: {}", from, to, err),
        }
    }

    if args.snapshot {
        println!("{}", serde_json::to_string_pretty(&run.snapshot())?);
    }
    Ok(())
}
