use clap::Parser;
use ipnet::Ipv4Net;
use netlab_rs::emu::{CaptureSession, Emulator, RouteInstaller, ShellPlan};
use netlab_rs::topo::routed_lan::{RoutedLanOpts, build_routed_lan};
use std::net::Ipv4Addr;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "routed-lan",
    about = "Build a routed multi-subnet lab topology and print its command plan"
)]
struct Args {
    /// Number of routers (one edge subnet each)
    #[arg(long, default_value_t = 3)]
    routers: usize,

    /// Hosts per edge subnet
    #[arg(long, default_value_t = 2)]
    hosts_per_edge: usize,

    /// Write the full command plan as a shell-style script
    #[arg(long)]
    script_out: Option<PathBuf>,

    /// Write the full command plan as JSON
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
    assert!(
        args.routers >= 1 && args.routers <= 26,
        "router count must be in 1..=26 (single-letter names)"
    );

    // 192.168.1.0/24 .. 192.168.N.0/24 edges, 192.168.N+1.0/24 backbone,
    // same plan as the original three-router lab.
    let edge_subnets = (0..args.routers)
        .map(|i| {
            Ipv4Net::new(Ipv4Addr::new(192, 168, (i + 1) as u8, 0), 24).expect("valid prefix")
        })
        .collect::<Vec<_>>();
    let backbone = Ipv4Net::new(Ipv4Addr::new(192, 168, (args.routers + 1) as u8, 0), 24)
        .expect("valid prefix");

    let opts = RoutedLanOpts {
        edge_subnets,
        backbone,
        hosts_per_edge: args.hosts_per_edge,
    };
    let lan = build_routed_lan(&opts).expect("build routed lan");
    let topo = &lan.topology;

    println!(
        "built topology: {} routers, {} switches, {} hosts, {} links, {} static routes",
        topo.routers().len(),
        topo.switches().count(),
        topo.hosts().len(),
        topo.links().len(),
        topo.route_count()
    );

    let mut routes = ShellPlan::default();
    routes.install_routes(topo).expect("render route plan");
    for cmd in &routes.cmds {
        println!("{} {}", cmd.node, cmd.cmd);
    }

    if args.script_out.is_some() || args.json_out.is_some() {
        let mut plan = ShellPlan::default();
        plan.instantiate(topo).expect("render emulator plan");
        plan.install_routes(topo).expect("render route plan");
        plan.start_capture(topo).expect("render capture plan");

        if let Some(path) = args.script_out {
            plan.write_script(&path).expect("write script");
            eprintln!("wrote command script to {}", path.display());
        }
        if let Some(path) = args.json_out {
            let json = serde_json::to_string_pretty(&plan.cmds).expect("serialize plan");
            std::fs::write(&path, json).expect("write plan json");
            eprintln!("wrote command plan to {}", path.display());
        }
    }
}
