//! 拓扑构建器
//!
//! 一次性、单线程地构建多子网路由拓扑：添加节点和链路、
//! 分配地址、推导静态路由，最后密封为只读 [`Topology`]。
//!
//! 构建阶段单向推进：`Building → RoutesDerived`，密封通过
//! 所有权转移完成（[`TopologyBuilder::seal`] 消耗构建器），
//! 因此密封之后不存在可变引用。

use std::collections::HashMap;
use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use tracing::{debug, info};

use super::error::TopoError;
use super::id::{IfaceId, LinkId, NodeId};
use super::iface::{Iface, IfaceConfig};
use super::link::{Endpoint, Link};
use super::node::{Node, NodeRole};
use super::route::Route;
use super::topology::{HostInfo, RouterInfo, Topology};

/// 构建阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    /// 可以添加节点和链路
    Building,
    /// 路由已推导；不再接受任何变更，只能密封
    RoutesDerived,
}

/// 链路端点的落点：已有接口或待创建接口
enum EndpointPlan {
    Existing {
        iface: IfaceId,
        addr: Option<Ipv4Net>,
    },
    New {
        name: String,
        addr: Option<Ipv4Net>,
    },
}

/// 拓扑构建器
#[derive(Debug)]
pub struct TopologyBuilder {
    phase: BuildPhase,
    nodes: Vec<Node>,
    names: HashMap<String, NodeId>,
    ifaces: Vec<Iface>,
    links: Vec<Link>,
    routers: Vec<RouterInfo>,
    hosts: Vec<HostInfo>,
    routes: HashMap<NodeId, Vec<Route>>,
}

impl Default for TopologyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TopologyBuilder {
    /// 创建空构建器
    pub fn new() -> Self {
        Self {
            phase: BuildPhase::Building,
            nodes: Vec::new(),
            names: HashMap::new(),
            ifaces: Vec::new(),
            links: Vec::new(),
            routers: Vec::new(),
            hosts: Vec::new(),
            routes: HashMap::new(),
        }
    }

    /// 当前构建阶段
    pub fn phase(&self) -> BuildPhase {
        self.phase
    }

    /// 获取节点
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// 按名称查找节点
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// 获取接口
    pub fn iface(&self, id: IfaceId) -> &Iface {
        &self.ifaces[id.0]
    }

    /// 所有路由器元数据
    pub fn routers(&self) -> &[RouterInfo] {
        &self.routers
    }

    fn ensure_building(&self, op: &'static str) -> Result<(), TopoError> {
        if self.phase != BuildPhase::Building {
            return Err(TopoError::InvalidPhase {
                op,
                phase: self.phase,
            });
        }
        Ok(())
    }

    /// 校验名称后创建节点并登记
    fn new_node(&mut self, name: String, role: NodeRole) -> Result<NodeId, TopoError> {
        if self.names.contains_key(&name) {
            return Err(TopoError::DuplicateName { name });
        }
        let id = NodeId(self.nodes.len());
        self.names.insert(name.clone(), id);
        self.nodes.push(Node::new(id, name, role));
        Ok(id)
    }

    /// 在节点上创建接口
    fn new_iface(
        &mut self,
        node: NodeId,
        name: impl Into<String>,
        addr: Option<Ipv4Net>,
    ) -> IfaceId {
        let id = IfaceId(self.ifaces.len());
        self.ifaces.push(Iface::new(id, node, name, addr));
        self.nodes[node.0].ifaces.push(id);
        id
    }

    /// 添加路由器节点
    ///
    /// 在 `edge_subnet` 上创建边缘接口 `{name}-eth1`，地址取子网第一个
    /// 可用主机地址（作为该子网的网关），并预留骨干网接口 `{name}-eth2`。
    pub fn add_router(
        &mut self,
        name: impl Into<String>,
        edge_subnet: Ipv4Net,
    ) -> Result<NodeId, TopoError> {
        self.ensure_building("add_router")?;
        let name = name.into();

        // 对任何 IPv4 前缀（含 /31、/32）hosts() 都至少产出一个地址
        let edge_addr = edge_subnet
            .hosts()
            .next()
            .expect("subnet has at least one usable host address");

        let id = self.new_node(name.clone(), NodeRole::Router)?;
        let edge_net = Ipv4Net::new(edge_addr, edge_subnet.prefix_len())
            .expect("prefix length comes from a valid Ipv4Net");
        let edge_iface = self.new_iface(id, format!("{name}-eth1"), Some(edge_net));
        let backbone_iface = self.new_iface(id, format!("{name}-eth2"), None);

        self.routers.push(RouterInfo {
            node: id,
            edge_subnet: edge_subnet.trunc(),
            edge_addr,
            edge_iface,
            backbone_iface,
            backbone_addr: None,
        });

        debug!(name = %self.nodes[id.0].name, subnet = %edge_subnet, gateway = %edge_addr, "🛜 添加路由器节点");
        Ok(id)
    }

    /// 添加交换机节点
    pub fn add_switch(&mut self, name: impl Into<String>) -> Result<NodeId, TopoError> {
        self.ensure_building("add_switch")?;
        let id = self.new_node(name.into(), NodeRole::Switch)?;
        debug!(name = %self.nodes[id.0].name, "🔀 添加交换机节点");
        Ok(id)
    }

    /// 添加主机节点
    ///
    /// `gateway` 必须恰好等于一个路由器的边缘子网网关地址。
    pub fn add_host(
        &mut self,
        name: impl Into<String>,
        addr: Ipv4Net,
        gateway: Ipv4Addr,
    ) -> Result<NodeId, TopoError> {
        self.ensure_building("add_host")?;
        let name = name.into();

        let matching = self
            .routers
            .iter()
            .filter(|r| r.edge_addr == gateway)
            .count();
        if matching != 1 {
            return Err(TopoError::UnknownGateway { gateway });
        }

        let id = self.new_node(name.clone(), NodeRole::Host)?;
        self.new_iface(id, format!("{name}-eth0"), Some(addr));
        self.hosts.push(HostInfo {
            node: id,
            addr,
            gateway,
        });

        debug!(name = %self.nodes[id.0].name, addr = %addr, gateway = %gateway, "🖥️  添加主机节点");
        Ok(id)
    }

    /// 为路由器的骨干网接口分配地址
    ///
    /// `addr` 必须位于 `backbone_subnet` 内，且在所有骨干网接口地址中唯一。
    pub fn add_backbone_link(
        &mut self,
        router: NodeId,
        backbone_subnet: Ipv4Net,
        addr: Ipv4Addr,
    ) -> Result<(), TopoError> {
        self.ensure_building("add_backbone_link")?;

        let idx = self
            .routers
            .iter()
            .position(|r| r.node == router)
            .ok_or_else(|| TopoError::NotARouter {
                name: self.nodes[router.0].name.clone(),
            })?;

        if !backbone_subnet.contains(&addr) {
            return Err(TopoError::AddressOutsideSubnet {
                addr,
                subnet: backbone_subnet,
            });
        }
        // 重复分配同样视为冲突
        if self
            .routers
            .iter()
            .any(|r| r.backbone_addr == Some(addr))
            || self.routers[idx].backbone_addr.is_some()
        {
            return Err(TopoError::AddressConflict { addr });
        }

        let backbone_net = Ipv4Net::new(addr, backbone_subnet.prefix_len())
            .expect("prefix length comes from a valid Ipv4Net");
        let iface = self.routers[idx].backbone_iface;
        self.ifaces[iface.0].addr = Some(backbone_net);
        self.routers[idx].backbone_addr = Some(addr);

        debug!(router = %self.nodes[router.0].name, addr = %backbone_net, "🔗 分配骨干网地址");
        Ok(())
    }

    /// 连接两个节点（复用未接线接口，否则自动生成）
    pub fn connect(&mut self, a: NodeId, b: NodeId) -> Result<LinkId, TopoError> {
        self.connect_cfg(a, IfaceConfig::default(), b, IfaceConfig::default())
    }

    /// 连接两个节点，按 [`IfaceConfig`] 选择或创建两端接口
    #[tracing::instrument(skip(self, cfg_a, cfg_b), fields(a = %self.nodes[a.0].name, b = %self.nodes[b.0].name))]
    pub fn connect_cfg(
        &mut self,
        a: NodeId,
        cfg_a: IfaceConfig,
        b: NodeId,
        cfg_b: IfaceConfig,
    ) -> Result<LinkId, TopoError> {
        self.ensure_building("connect")?;
        if a == b {
            return Err(TopoError::SelfLink {
                node: self.nodes[a.0].name.clone(),
            });
        }

        // 先完成两端校验，再一并落盘，保证失败时不留下半条链路
        let plan_a = self.plan_endpoint(a, &cfg_a)?;
        let plan_b = self.plan_endpoint(b, &cfg_b)?;

        let link_id = LinkId(self.links.len());
        let ep_a = self.apply_endpoint(a, plan_a, link_id);
        let ep_b = self.apply_endpoint(b, plan_b, link_id);
        self.links.push(Link::new(link_id, ep_a, ep_b));

        debug!(
            iface_a = %self.ifaces[ep_a.iface.0].name,
            iface_b = %self.ifaces[ep_b.iface.0].name,
            "🔌 创建链路"
        );
        Ok(link_id)
    }

    fn plan_endpoint(&self, node: NodeId, cfg: &IfaceConfig) -> Result<EndpointPlan, TopoError> {
        if let Some(name) = &cfg.intf_name {
            let existing = self.nodes[node.0]
                .ifaces
                .iter()
                .find(|i| self.ifaces[i.0].name == *name)
                .copied();
            if let Some(iface) = existing {
                if self.ifaces[iface.0].link.is_some() {
                    return Err(TopoError::InterfaceInUse {
                        node: self.nodes[node.0].name.clone(),
                        iface: name.clone(),
                    });
                }
                return Ok(EndpointPlan::Existing {
                    iface,
                    addr: cfg.ip,
                });
            }
            return Ok(EndpointPlan::New {
                name: name.clone(),
                addr: cfg.ip,
            });
        }
        // 未命名时优先复用该节点第一个未接线的既有接口
        // （主机的寻址接口由 add_host 预建，接线必须落在它上面）
        let unlinked = self.nodes[node.0]
            .ifaces
            .iter()
            .find(|i| self.ifaces[i.0].link.is_none())
            .copied();
        if let Some(iface) = unlinked {
            return Ok(EndpointPlan::Existing {
                iface,
                addr: cfg.ip,
            });
        }
        let name = format!("{}-eth{}", self.nodes[node.0].name, self.nodes[node.0].ifaces.len());
        Ok(EndpointPlan::New {
            name,
            addr: cfg.ip,
        })
    }

    fn apply_endpoint(&mut self, node: NodeId, plan: EndpointPlan, link: LinkId) -> Endpoint {
        let iface = match plan {
            EndpointPlan::Existing { iface, addr } => {
                if addr.is_some() {
                    self.ifaces[iface.0].addr = addr;
                }
                self.ifaces[iface.0].link = Some(link);
                iface
            }
            EndpointPlan::New { name, addr } => {
                let iface = self.new_iface(node, name, addr);
                self.ifaces[iface.0].link = Some(link);
                iface
            }
        };
        Endpoint { node, iface }
    }

    /// 推导静态路由
    ///
    /// 对每个有序路由器对 (R, R')，在 R 上生成一条到 R' 边缘子网的路由，
    /// 下一跳为 R' 的骨干网地址，出口为 R 的骨干网接口。骨干网是单一
    /// 共享网段，所有路由器互为一跳，因此共 N·(N-1) 条路由且无歧义。
    /// 只能调用一次。
    #[tracing::instrument(skip(self))]
    pub fn derive_routes(&mut self) -> Result<(), TopoError> {
        self.ensure_building("derive_routes")?;

        // 全部路由器就位之前不产出任何路由
        for r in &self.routers {
            if r.backbone_addr.is_none() {
                return Err(TopoError::IncompleteTopology {
                    router: self.nodes[r.node.0].name.clone(),
                });
            }
        }

        for r in &self.routers {
            let dev = self.ifaces[r.backbone_iface.0].name.clone();
            let table = self.routes.entry(r.node).or_default();
            for other in &self.routers {
                if other.node == r.node {
                    continue;
                }
                let via = other
                    .backbone_addr
                    .expect("backbone addresses checked above");
                table.push(Route {
                    dest: other.edge_subnet,
                    via,
                    dev: dev.clone(),
                });
            }
        }

        self.phase = BuildPhase::RoutesDerived;
        info!(
            routers = self.routers.len(),
            routes = self.routes.values().map(Vec::len).sum::<usize>(),
            "🛣️  静态路由推导完成"
        );
        Ok(())
    }

    /// 密封为只读拓扑（消耗构建器）
    pub fn seal(self) -> Result<Topology, TopoError> {
        if self.phase != BuildPhase::RoutesDerived {
            return Err(TopoError::InvalidPhase {
                op: "seal",
                phase: self.phase,
            });
        }
        Ok(Topology {
            nodes: self.nodes,
            names: self.names,
            ifaces: self.ifaces,
            links: self.links,
            routers: self.routers,
            hosts: self.hosts,
            routes: self.routes,
        })
    }
}
