//! 命令计划
//!
//! 把协作者需要执行的 shell 命令渲染成可检查、可序列化的计划，
//! 而不是直接执行。每条命令绑定在应当执行它的节点上。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::runtime::{CaptureSession, EmuError, Emulator, RouteInstaller};
use crate::net::Topology;

/// 单条命令：在 `node` 上执行 `cmd`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellCmd {
    pub node: String,
    pub cmd: String,
}

/// 渲染出的命令计划
#[derive(Debug, Default)]
pub struct ShellPlan {
    pub cmds: Vec<ShellCmd>,
}

impl ShellPlan {
    fn push(&mut self, node: &str, cmd: String) {
        debug!(node, cmd = %cmd, "📝 渲染命令");
        self.cmds.push(ShellCmd {
            node: node.to_string(),
            cmd,
        });
    }

    /// 某节点的全部命令
    pub fn cmds_for(&self, node: &str) -> impl Iterator<Item = &ShellCmd> {
        self.cmds.iter().filter(move |c| c.node == node)
    }

    /// 渲染为脚本文本（每行 `<node> <cmd>`）
    pub fn script(&self) -> String {
        let mut out = String::new();
        for c in &self.cmds {
            out.push_str(&c.node);
            out.push(' ');
            out.push_str(&c.cmd);
            out.push('\n');
        }
        out
    }

    /// 写出脚本文件
    pub fn write_script(&self, path: &Path) -> Result<(), EmuError> {
        fs::write(path, self.script())?;
        Ok(())
    }
}

impl Emulator for ShellPlan {
    fn instantiate(&mut self, topo: &Topology) -> Result<(), EmuError> {
        // 地址配置 + 路由器开启转发
        for iface in topo.ifaces() {
            if let Some(addr) = iface.addr {
                let node = topo.node(iface.node).name.clone();
                self.push(&node, format!("ip addr add {} dev {}", addr, iface.name));
            }
        }
        for r in topo.routers() {
            let node = topo.node(r.node).name.clone();
            self.push(&node, "sysctl net.ipv4.ip_forward=1".to_string());
        }
        Ok(())
    }

    fn teardown(&mut self, topo: &Topology) -> Result<(), EmuError> {
        for r in topo.routers() {
            let node = topo.node(r.node).name.clone();
            self.push(&node, "sysctl net.ipv4.ip_forward=0".to_string());
        }
        Ok(())
    }
}

impl RouteInstaller for ShellPlan {
    fn install_routes(&mut self, topo: &Topology) -> Result<(), EmuError> {
        for r in topo.routers() {
            let node = topo.node(r.node).name.clone();
            for route in topo.routes(r.node) {
                self.push(
                    &node,
                    format!("ip route add {} via {} dev {}", route.dest, route.via, route.dev),
                );
            }
        }
        for h in topo.hosts() {
            let node = topo.node(h.node).name.clone();
            self.push(&node, format!("ip route add default via {}", h.gateway));
        }
        Ok(())
    }
}

impl CaptureSession for ShellPlan {
    fn start_capture(&mut self, topo: &Topology) -> Result<(), EmuError> {
        for r in topo.routers() {
            let node = topo.node(r.node).name.clone();
            self.push(&node, format!("tcpdump -i any -w {node}_dump.pcap"));
        }
        Ok(())
    }

    fn stop_capture(&mut self, topo: &Topology) -> Result<(), EmuError> {
        for r in topo.routers() {
            let node = topo.node(r.node).name.clone();
            self.push(&node, format!("pkill -f {node}_dump.pcap"));
        }
        Ok(())
    }
}
