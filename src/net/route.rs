//! 静态路由
//!
//! 路由器的静态路由条目。不变式：下一跳地址必须位于
//! 出口接口所配置的子网内。

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};

/// 路由条目：(目的子网, 下一跳, 出口接口)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub dest: Ipv4Net,
    pub via: Ipv4Addr,
    pub dev: String,
}
