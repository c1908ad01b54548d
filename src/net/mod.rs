//! 网络拓扑模块
//!
//! 此模块包含拓扑描述的核心组件，如节点、接口、链路、路由和拓扑构建器。

// 子模块声明
mod id;
mod error;
mod iface;
mod node;
mod link;
mod route;
mod builder;
mod topology;

// 重新导出公共接口
pub use id::{NodeId, IfaceId, LinkId};
pub use error::TopoError;
pub use iface::{Iface, IfaceConfig};
pub use node::{Node, NodeRole};
pub use link::{Endpoint, Link};
pub use route::Route;
pub use builder::{BuildPhase, TopologyBuilder};
pub use topology::{HostInfo, RouterInfo, Topology};
