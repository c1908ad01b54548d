//! 拓扑构建错误
//!
//! 所有校验失败都在出错的调用处同步返回，不做重试，
//! 构建器保持在最后一次有效状态。

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use thiserror::Error;

use super::builder::BuildPhase;

/// 拓扑构建错误
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TopoError {
    /// 节点名称重复
    #[error("duplicate node name {name:?}")]
    DuplicateName { name: String },

    /// 骨干网地址冲突
    #[error("backbone address {addr} is already assigned")]
    AddressConflict { addr: Ipv4Addr },

    /// 地址不在给定子网内
    #[error("address {addr} is not inside subnet {subnet}")]
    AddressOutsideSubnet { addr: Ipv4Addr, subnet: Ipv4Net },

    /// 主机网关不匹配任何路由器的边缘子网网关
    #[error("gateway {gateway} does not match any router's edge gateway")]
    UnknownGateway { gateway: Ipv4Addr },

    /// 接口已接入链路
    #[error("interface {iface:?} on node {node:?} is already linked")]
    InterfaceInUse { node: String, iface: String },

    /// 路由推导时仍有路由器缺少骨干网地址
    #[error("router {router:?} has no backbone address")]
    IncompleteTopology { router: String },

    /// 操作在当前构建阶段不允许
    #[error("{op} is not allowed in phase {phase:?}")]
    InvalidPhase { op: &'static str, phase: BuildPhase },

    /// 节点不是路由器
    #[error("node {name:?} is not a router")]
    NotARouter { name: String },

    /// 链路两端必须是两个不同节点
    #[error("link endpoints must be two distinct nodes, got {node:?} twice")]
    SelfLink { node: String },
}
