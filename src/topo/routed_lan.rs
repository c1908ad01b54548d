//! 路由实验网拓扑构建
//!
//! N 个路由器各带一个边缘子网和一台边缘交换机，经一台共享骨干
//! 交换机互联；每个边缘子网挂 M 台主机。默认参数复现三路由器、
//! 四交换机、六主机的实验网。

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;

use crate::net::{IfaceConfig, NodeId, TopoError, Topology, TopologyBuilder};

/// 路由实验网配置选项
#[derive(Debug, Clone)]
pub struct RoutedLanOpts {
    /// 每个路由器的边缘子网（路由器数量由此决定）
    pub edge_subnets: Vec<Ipv4Net>,
    /// 共享骨干子网；路由器按序取其可用地址
    pub backbone: Ipv4Net,
    /// 每个边缘子网的主机数，地址从 .100 起
    pub hosts_per_edge: usize,
}

impl Default for RoutedLanOpts {
    fn default() -> Self {
        Self {
            edge_subnets: vec![
                Ipv4Net::new(Ipv4Addr::new(192, 168, 1, 0), 24).expect("valid prefix"),
                Ipv4Net::new(Ipv4Addr::new(192, 168, 2, 0), 24).expect("valid prefix"),
                Ipv4Net::new(Ipv4Addr::new(192, 168, 3, 0), 24).expect("valid prefix"),
            ],
            backbone: Ipv4Net::new(Ipv4Addr::new(192, 168, 4, 0), 24).expect("valid prefix"),
            hosts_per_edge: 2,
        }
    }
}

/// 构建结果
#[derive(Debug)]
pub struct RoutedLan {
    pub routers: Vec<NodeId>,
    pub edge_switches: Vec<NodeId>,
    pub backbone_switch: NodeId,
    pub hosts: Vec<NodeId>,
    pub topology: Topology,
}

/// 路由器名：ra, rb, rc, ...
fn router_name(idx: usize) -> String {
    format!("r{}", (b'a' + idx as u8) as char)
}

/// 构建路由实验网
///
/// 拓扑结构：h <-> s_i <-> r_i <-> s_backbone <-> r_j ...
pub fn build_routed_lan(opts: &RoutedLanOpts) -> Result<RoutedLan, TopoError> {
    let mut b = TopologyBuilder::new();
    let n = opts.edge_subnets.len();

    let mut routers = Vec::with_capacity(n);
    for (idx, subnet) in opts.edge_subnets.iter().enumerate() {
        routers.push(b.add_router(router_name(idx), *subnet)?);
    }

    let mut edge_switches = Vec::with_capacity(n);
    for idx in 0..n {
        edge_switches.push(b.add_switch(format!("s{}", idx + 1))?);
    }
    let backbone_switch = b.add_switch(format!("s{}", n + 1))?;

    // 边缘交换机 <-> 路由器边缘接口
    for (idx, &router) in routers.iter().enumerate() {
        let name = format!("{}-eth1", router_name(idx));
        b.connect_cfg(
            edge_switches[idx],
            IfaceConfig::default(),
            router,
            IfaceConfig::named(name),
        )?;
    }

    // 骨干交换机 <-> 路由器骨干接口，地址按序取骨干子网可用地址
    let mut backbone_addrs = opts.backbone.hosts();
    for (idx, &router) in routers.iter().enumerate() {
        let addr = backbone_addrs
            .next()
            .ok_or_else(|| TopoError::IncompleteTopology {
                router: router_name(idx),
            })?;
        b.add_backbone_link(router, opts.backbone, addr)?;
        let name = format!("{}-eth2", router_name(idx));
        b.connect_cfg(
            backbone_switch,
            IfaceConfig::default(),
            router,
            IfaceConfig::named(name),
        )?;
    }

    // 主机：每个边缘子网 M 台，地址从 .100 起，网关为该子网的 .1
    let mut hosts = Vec::with_capacity(n * opts.hosts_per_edge);
    let mut host_no = 1;
    for (idx, subnet) in opts.edge_subnets.iter().enumerate() {
        let gateway = subnet
            .hosts()
            .next()
            .expect("subnet has at least one usable host address");
        let base = u32::from(subnet.network());
        for h in 0..opts.hosts_per_edge {
            let addr = Ipv4Addr::from(base.saturating_add(100 + h as u32));
            // 地址序列不得越出子网，也不得占用广播地址
            if !subnet.contains(&addr)
                || (subnet.prefix_len() < 31 && addr == subnet.broadcast())
            {
                return Err(TopoError::AddressOutsideSubnet {
                    addr,
                    subnet: *subnet,
                });
            }
            let addr = Ipv4Net::new(addr, subnet.prefix_len())
                .expect("prefix length comes from a valid Ipv4Net");
            let host = b.add_host(format!("h{host_no}"), addr, gateway)?;
            b.connect(host, edge_switches[idx])?;
            hosts.push(host);
            host_no += 1;
        }
    }

    b.derive_routes()?;
    let topology = b.seal()?;

    Ok(RoutedLan {
        routers,
        edge_switches,
        backbone_switch,
        hosts,
        topology,
    })
}
