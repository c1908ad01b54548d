use clap::Parser;
use netlab_rs::emu::{CaptureSession, Emulator, RouteInstaller, ShellPlan};
use netlab_rs::topo::spec::{LabSpec, build_from_spec};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "lab-plan",
    about = "Build a routed lab topology from a lab.json description"
)]
struct Args {
    /// Path to lab.json
    #[arg(long)]
    lab: PathBuf,

    /// Write the command plan as a shell-style script
    #[arg(long)]
    script_out: Option<PathBuf>,

    /// Write the command plan as JSON
    #[arg(long)]
    json_out: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();
    let raw = fs::read_to_string(&args.lab).expect("read lab.json");
    let spec: LabSpec = serde_json::from_str(&raw).expect("parse lab.json");

    let topo = build_from_spec(&spec).expect("build lab topology");
    println!(
        "built topology: {} routers, {} switches, {} hosts, {} links, {} static routes",
        topo.routers().len(),
        topo.switches().count(),
        topo.hosts().len(),
        topo.links().len(),
        topo.route_count()
    );

    let mut plan = ShellPlan::default();
    plan.instantiate(&topo).expect("render emulator plan");
    plan.install_routes(&topo).expect("render route plan");
    plan.start_capture(&topo).expect("render capture plan");

    for cmd in &plan.cmds {
        println!("{} {}", cmd.node, cmd.cmd);
    }

    if let Some(path) = args.script_out {
        plan.write_script(&path).expect("write script");
        eprintln!("wrote command script to {}", path.display());
    }
    if let Some(path) = args.json_out {
        let json = serde_json::to_string_pretty(&plan.cmds).expect("serialize plan");
        fs::write(&path, json).expect("write plan json");
        eprintln!("wrote command plan to {}", path.display());
    }
}
