use anyhow::{bail, Context, Result};
use aplan::api::{
    detect_connections, directions_from_codes, generate, CancelToken, ConnectionConfig,
    ConnectionGraph, GraphJson, MotionDirection, NegativePolicy, ObstructionConfig,
    ObstructionGraph, ObstructionRequest, Reporter,
};
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;
mod scene;

use provenance::{write_artifact, Payload};

#[derive(Parser)]
#[command(name = "aplan")]
#[command(about = "Contact, obstruction and AND/OR graph analysis for box assemblies")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Detect touching components and write the connection graph
    Connections(ConnectionsArgs),
    /// Batch obstruction detection; prints `{code: [[[target, obstructor], ...], seconds]}`
    Obstructions(ObstructionsArgs),
    /// Build the AND/OR graph from stored connection/obstruction graphs
    Aog(AogArgs),
    /// Print a small provenance JSON block
    Report,
}

#[derive(Args, Debug, Clone)]
struct SceneArgs {
    /// Scene file (box solids, placements, part filter)
    #[arg(long)]
    scene: PathBuf,
    /// Component labels to analyse; defaults to every unit of the scene
    #[arg(long, value_delimiter = ',')]
    components: Vec<String>,
    #[arg(long, default_value_t = 0.1)]
    linear_deflection: f64,
}

#[derive(Args, Debug, Clone)]
struct ConnectionsArgs {
    #[command(flatten)]
    scene: SceneArgs,
    #[arg(long, default_value = "BoundBox")]
    refinement: String,
    #[arg(long, default_value = r#"{"swellDistance": 0.01}"#)]
    refinement_params: String,
    #[arg(long, default_value = "DistToShape")]
    solver: String,
    #[arg(long, default_value = r#"{"minDistance": 1e-5}"#)]
    solver_params: String,
    /// Output connection graph JSON
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct ObstructionsArgs {
    #[command(flatten)]
    scene: SceneArgs,
    /// Motion direction codes: 1/-1 = ±X, 2/-2 = ±Y, 3/-3 = ±Z
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, default_value = "1,-1,2,-2,3,-3")]
    directions: Vec<i32>,
    #[arg(long, default_value = "None")]
    refinement: String,
    #[arg(long, default_value = "{}")]
    refinement_params: String,
    #[arg(long, default_value = "DistToShape")]
    solver: String,
    #[arg(
        long,
        default_value = r#"{"overlapTolerance": 1e-5, "minDistance": 1e-5, "classificationTolerance": 1e-5}"#
    )]
    solver_params: String,
    /// Step sizing: variableStepSizeEnabled, stepSizeCoefficient, minStepSize, fixedStepSize
    #[arg(long, default_value = "{}")]
    general_params: String,
    /// Sweep every direction on its own worker thread
    #[arg(long)]
    parallel: bool,
    /// Sweep negative directions instead of reversing their positive counterpart
    #[arg(long)]
    solve_negative: bool,
    /// Also write one obstruction graph JSON per direction here
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct AogArgs {
    /// Connection graph JSON; without it every pair counts as connected
    #[arg(long)]
    connections: Option<PathBuf>,
    /// Obstruction graph JSON files as `CODE=PATH`, e.g. `1=obstructions_POS_X.json`
    #[arg(long = "obstruction", value_name = "CODE=PATH")]
    obstructions: Vec<String>,
    /// Component labels; defaults to every node of the given graphs
    #[arg(long, value_delimiter = ',')]
    components: Vec<String>,
    /// Output AND/OR graph JSON
    #[arg(long)]
    out: PathBuf,
}

fn main() -> Result<()> {
    // stdout carries payloads only
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Connections(args) => connections(&args),
        Action::Obstructions(args) => {
            let payload = obstructions(&args)?;
            println!("{}", serde_json::to_string(&payload)?);
            Ok(())
        }
        Action::Aog(args) => aog(&args),
        Action::Report => report(),
    }
}

fn parse_params(flag: &str, text: &str) -> Result<Value> {
    serde_json::from_str(text).with_context(|| format!("--{flag} is not valid JSON"))
}

fn connections(args: &ConnectionsArgs) -> Result<()> {
    let cfg = ConnectionConfig::from_json(
        &args.refinement,
        &parse_params("refinement-params", &args.refinement_params)?,
        &args.solver,
        &parse_params("solver-params", &args.solver_params)?,
        args.scene.linear_deflection,
    )?;
    let mut loaded = scene::load(&args.scene.scene)?;
    let comps = loaded.components(&args.scene.components)?;
    tracing::info!(
        refinement = cfg.refinement.label(),
        solver = cfg.solver.label(),
        components = comps.len(),
        "connections"
    );
    let out = detect_connections(
        &mut loaded.scene,
        &comps,
        &cfg,
        &CancelToken::new(),
        &Reporter::silent(),
    );
    let Some(graph) = out.into_result()? else {
        bail!("connection detection was aborted");
    };
    let text = graph.to_json().to_string_pretty()?;
    write_artifact(
        &args.out,
        text.as_bytes(),
        Payload::new(
            "connections",
            json!({
                "scene": args.scene.scene.to_string_lossy(),
                "components": comps,
                "refinement": args.refinement,
                "refinement_params": args.refinement_params,
                "solver": args.solver,
                "solver_params": args.solver_params,
                "linear_deflection": args.scene.linear_deflection
            }),
        ),
    )?;
    Ok(())
}

fn obstructions(args: &ObstructionsArgs) -> Result<Value> {
    let mut cfg = ObstructionConfig::from_json(
        &args.refinement,
        &parse_params("refinement-params", &args.refinement_params)?,
        &args.solver,
        &parse_params("solver-params", &args.solver_params)?,
        &parse_params("general-params", &args.general_params)?,
        args.scene.linear_deflection,
    )?;
    if args.solve_negative {
        cfg.negative_policy = NegativePolicy::Solve;
    }
    let directions = directions_from_codes(&args.directions)?;
    let mut loaded = scene::load(&args.scene.scene)?;
    let comps = loaded.components(&args.scene.components)?;
    tracing::info!(
        refinement = cfg.refinement.name(),
        solver = cfg.criterion.label(),
        directions = ?args.directions,
        parallel = args.parallel,
        "obstructions"
    );
    let req = ObstructionRequest::new(comps.clone(), directions, cfg).parallel(args.parallel);
    let out = req.run(&mut loaded.scene, &CancelToken::new(), &Reporter::silent());
    let Some(report) = out.into_result()? else {
        bail!("obstruction detection was aborted");
    };

    if let Some(dir) = &args.out_dir {
        for (d, r) in &report.results {
            let path = dir.join(obstruction_file_name(*d));
            let text = r.graph.to_json().to_string_pretty()?;
            write_artifact(
                &path,
                text.as_bytes(),
                Payload::new(
                    "obstructions",
                    json!({
                        "scene": args.scene.scene.to_string_lossy(),
                        "components": comps,
                        "direction": d.code(),
                        "derived": r.derived,
                        "refinement": args.refinement,
                        "refinement_params": args.refinement_params,
                        "solver": args.solver,
                        "solver_params": args.solver_params,
                        "general_params": args.general_params,
                        "linear_deflection": args.scene.linear_deflection
                    }),
                ),
            )?;
        }
    }
    Ok(report.to_payload())
}

fn obstruction_file_name(d: MotionDirection) -> String {
    format!("obstructions_{}.json", d.name())
}

fn read_graph(path: &Path) -> Result<GraphJson> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    GraphJson::parse(&text).with_context(|| format!("parsing {}", path.display()))
}

fn parse_obstruction_arg(arg: &str) -> Result<(MotionDirection, PathBuf)> {
    let Some((code, path)) = arg.split_once('=') else {
        bail!("expected CODE=PATH, got `{arg}`");
    };
    let code: i32 = code
        .trim()
        .parse()
        .with_context(|| format!("invalid direction code in `{arg}`"))?;
    let dirs = directions_from_codes(&[code])?;
    Ok((dirs[0], PathBuf::from(path)))
}

fn aog(args: &AogArgs) -> Result<()> {
    let topo = args
        .connections
        .as_deref()
        .map(|p| read_graph(p).map(|doc| ConnectionGraph::from_json(&doc)))
        .transpose()?;
    let mut geometrical = Vec::new();
    for arg in &args.obstructions {
        let (dir, path) = parse_obstruction_arg(arg)?;
        geometrical.push(ObstructionGraph::from_json(dir, &read_graph(&path)?));
    }
    let comps: Vec<String> = if args.components.is_empty() {
        let mut all: BTreeSet<String> = BTreeSet::new();
        if let Some(t) = &topo {
            all.extend(t.nodes().map(str::to_string));
        }
        for g in &geometrical {
            all.extend(g.nodes().map(str::to_string));
        }
        all.into_iter().collect()
    } else {
        args.components.clone()
    };
    let graph = generate(&comps, topo.as_ref(), &geometrical)?;
    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "aog"
    );
    let text = graph.to_json().to_string_pretty()?;
    write_artifact(
        &args.out,
        text.as_bytes(),
        Payload::new(
            "aog",
            json!({
                "connections": args.connections.as_ref().map(|p| p.to_string_lossy().into_owned()),
                "obstructions": args.obstructions,
                "components": comps
            }),
        ),
    )?;
    Ok(())
}

fn report() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&provenance::report_block())?);
    Ok(())
}
