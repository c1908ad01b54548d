//! 接口类型
//!
//! 定义节点上的网络接口：接口属于且仅属于一个节点，
//! 名称在节点内唯一，最多接入一条链路。

use ipnet::Ipv4Net;

use super::id::{IfaceId, LinkId, NodeId};

/// 网络接口
#[derive(Debug, Clone)]
pub struct Iface {
    pub id: IfaceId,
    pub node: NodeId,
    pub name: String,
    /// 接口地址（带前缀）；交换机端口没有地址
    pub addr: Option<Ipv4Net>,
    /// 接入的链路；未接入时为 None
    pub link: Option<LinkId>,
}

impl Iface {
    /// 创建新接口
    pub fn new(id: IfaceId, node: NodeId, name: impl Into<String>, addr: Option<Ipv4Net>) -> Self {
        Self {
            id,
            node,
            name: name.into(),
            addr,
            link: None,
        }
    }
}

/// 链路端点的接口配置
///
/// 显式替代原实现里的动态关键字参数：`intf_name` 选择或创建命名接口，
/// `ip` 为该接口指定地址。
#[derive(Debug, Clone, Default)]
pub struct IfaceConfig {
    pub ip: Option<Ipv4Net>,
    pub intf_name: Option<String>,
}

impl IfaceConfig {
    /// 仅指定接口名称
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            ip: None,
            intf_name: Some(name.into()),
        }
    }
}
