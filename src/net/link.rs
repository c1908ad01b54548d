//! 链路类型
//!
//! 链路连接两个不同节点上的两个接口；一个接口最多出现在一条链路上。

use super::id::{IfaceId, LinkId, NodeId};

/// 链路端点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub node: NodeId,
    pub iface: IfaceId,
}

/// 链路（无序端点对）
#[derive(Debug, Clone)]
pub struct Link {
    pub id: LinkId,
    pub a: Endpoint,
    pub b: Endpoint,
}

impl Link {
    /// 创建新链路
    pub fn new(id: LinkId, a: Endpoint, b: Endpoint) -> Self {
        Self { id, a, b }
    }
}
