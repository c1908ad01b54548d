//! 节点类型
//!
//! 定义网络节点：名称唯一，角色为主机、路由器或交换机，
//! 持有其接口的有序集合。

use super::id::{IfaceId, NodeId};

/// 节点角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Host,
    Router,
    Switch,
}

/// 网络节点
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub role: NodeRole,
    /// 接口（按创建顺序）
    pub ifaces: Vec<IfaceId>,
}

impl Node {
    /// 创建新节点
    pub fn new(id: NodeId, name: impl Into<String>, role: NodeRole) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            ifaces: Vec::new(),
        }
    }
}
