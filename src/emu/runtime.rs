//! 协作者接口
//!
//! 定义核心与外部运行时之间的 trait 边界。具体的命名空间、
//! 内核路由表和抓包进程都在边界之外。

use thiserror::Error;

use crate::net::Topology;

/// 协作者错误
#[derive(Debug, Error)]
pub enum EmuError {
    /// 协作者拒绝了拓扑
    #[error("emulator rejected topology: {reason}")]
    Rejected { reason: String },

    /// 输出失败
    #[error("io error")]
    Io(#[from] std::io::Error),
}

/// 仿真器：实例化密封拓扑并在路由器上开启转发
pub trait Emulator {
    fn instantiate(&mut self, topo: &Topology) -> Result<(), EmuError>;
    fn teardown(&mut self, topo: &Topology) -> Result<(), EmuError>;
}

/// 路由安装器：应用推导出的路由器路由和主机默认路由
pub trait RouteInstaller {
    fn install_routes(&mut self, topo: &Topology) -> Result<(), EmuError>;
}

/// 抓包会话：按路由器启停抓包
pub trait CaptureSession {
    fn start_capture(&mut self, topo: &Topology) -> Result<(), EmuError>;
    fn stop_capture(&mut self, topo: &Topology) -> Result<(), EmuError>;
}
