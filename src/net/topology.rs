//! 密封拓扑
//!
//! 构建器密封后产出的只读拓扑描述：节点、接口、链路、
//! 每路由器的路由表以及每主机的默认路由。
//! 密封之后整个结构不再变化；运行时状态由外部仿真器负责。

use std::collections::HashMap;
use std::net::Ipv4Addr;

use ipnet::Ipv4Net;

use super::id::{IfaceId, NodeId};
use super::iface::Iface;
use super::link::Link;
use super::node::{Node, NodeRole};
use super::route::Route;

/// 路由器元数据
#[derive(Debug, Clone)]
pub struct RouterInfo {
    pub node: NodeId,
    /// 边缘子网（网络形式）
    pub edge_subnet: Ipv4Net,
    /// 边缘子网网关地址（子网第一个可用主机地址）
    pub edge_addr: Ipv4Addr,
    pub edge_iface: IfaceId,
    pub backbone_iface: IfaceId,
    /// 骨干网地址；路由推导前必须全部就位
    pub backbone_addr: Option<Ipv4Addr>,
}

/// 主机元数据
#[derive(Debug, Clone)]
pub struct HostInfo {
    pub node: NodeId,
    /// 主机地址（带前缀）
    pub addr: Ipv4Net,
    /// 默认路由网关，等于某个路由器的边缘网关
    pub gateway: Ipv4Addr,
}

/// 密封后的只读拓扑
#[derive(Debug, Clone)]
pub struct Topology {
    pub(crate) nodes: Vec<Node>,
    pub(crate) names: HashMap<String, NodeId>,
    pub(crate) ifaces: Vec<Iface>,
    pub(crate) links: Vec<Link>,
    pub(crate) routers: Vec<RouterInfo>,
    pub(crate) hosts: Vec<HostInfo>,
    pub(crate) routes: HashMap<NodeId, Vec<Route>>,
}

impl Topology {
    /// 获取节点
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// 所有节点
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// 按名称查找节点
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// 获取接口
    pub fn iface(&self, id: IfaceId) -> &Iface {
        &self.ifaces[id.0]
    }

    /// 所有接口
    pub fn ifaces(&self) -> &[Iface] {
        &self.ifaces
    }

    /// 所有链路
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// 所有路由器元数据
    pub fn routers(&self) -> &[RouterInfo] {
        &self.routers
    }

    /// 所有主机元数据
    pub fn hosts(&self) -> &[HostInfo] {
        &self.hosts
    }

    /// 所有交换机节点
    pub fn switches(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.role == NodeRole::Switch)
    }

    /// 路由器的静态路由表；非路由器节点返回空表
    pub fn routes(&self, node: NodeId) -> &[Route] {
        self.routes.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 全部静态路由条数
    pub fn route_count(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }
}
