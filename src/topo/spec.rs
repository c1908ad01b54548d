//! 实验网 JSON 描述
//!
//! 外部调用方可以用 JSON 文件描述实验网（路由器、骨干网、主机），
//! 由 [`build_from_spec`] 驱动构建器生成密封拓扑。

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};

use crate::net::{IfaceConfig, TopoError, Topology, TopologyBuilder};

/// 实验网描述
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabSpec {
    pub schema_version: u32,
    #[serde(default)]
    pub meta: Option<LabMeta>,
    pub routers: Vec<RouterSpec>,
    pub backbone: BackboneSpec,
    #[serde(default)]
    pub hosts: Vec<HostSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabMeta {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterSpec {
    pub name: String,
    pub edge_subnet: Ipv4Net,
    /// 缺省时按路由器顺序从骨干子网可用地址中自动分配
    #[serde(default)]
    pub backbone_addr: Option<Ipv4Addr>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackboneSpec {
    pub subnet: Ipv4Net,
    /// 骨干交换机名；缺省为 `s{N+1}`
    #[serde(default)]
    pub switch: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostSpec {
    pub name: String,
    pub addr: Ipv4Net,
    pub gateway: Ipv4Addr,
}

/// 按描述构建密封拓扑
///
/// 每个路由器各配一台边缘交换机 `s1..sN`；主机接到其网关所属
/// 路由器的边缘交换机上。
pub fn build_from_spec(spec: &LabSpec) -> Result<Topology, TopoError> {
    let mut b = TopologyBuilder::new();
    let n = spec.routers.len();

    let mut routers = Vec::with_capacity(n);
    for r in &spec.routers {
        routers.push(b.add_router(&r.name, r.edge_subnet)?);
    }

    let mut edge_switches = Vec::with_capacity(n);
    for idx in 0..n {
        edge_switches.push(b.add_switch(format!("s{}", idx + 1))?);
    }
    let backbone_name = spec
        .backbone
        .switch
        .clone()
        .unwrap_or_else(|| format!("s{}", n + 1));
    let backbone_switch = b.add_switch(backbone_name)?;

    for (idx, r) in spec.routers.iter().enumerate() {
        b.connect_cfg(
            edge_switches[idx],
            IfaceConfig::default(),
            routers[idx],
            IfaceConfig::named(format!("{}-eth1", r.name)),
        )?;
    }

    // 显式地址优先；其余按序自动分配，跳过已被显式占用的地址
    let explicit: Vec<Ipv4Addr> = spec
        .routers
        .iter()
        .filter_map(|r| r.backbone_addr)
        .collect();
    let mut auto = spec
        .backbone
        .subnet
        .hosts()
        .filter(|a| !explicit.contains(a));
    for (idx, r) in spec.routers.iter().enumerate() {
        let addr = match r.backbone_addr {
            Some(addr) => addr,
            None => auto.next().ok_or_else(|| TopoError::IncompleteTopology {
                router: r.name.clone(),
            })?,
        };
        b.add_backbone_link(routers[idx], spec.backbone.subnet, addr)?;
        b.connect_cfg(
            backbone_switch,
            IfaceConfig::default(),
            routers[idx],
            IfaceConfig::named(format!("{}-eth2", r.name)),
        )?;
    }

    for h in &spec.hosts {
        let host = b.add_host(&h.name, h.addr, h.gateway)?;
        let edge_idx = spec
            .routers
            .iter()
            .position(|r| {
                r.edge_subnet
                    .hosts()
                    .next()
                    .is_some_and(|gw| gw == h.gateway)
            })
            .expect("add_host validated the gateway against a router");
        b.connect(host, edge_switches[edge_idx])?;
    }

    b.derive_routes()?;
    b.seal()
}
