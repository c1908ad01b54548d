//! 外部协作者模块
//!
//! 仿真运行时、路由安装和抓包都是外部协作者，核心只通过
//! 注入的 trait 接口与之交互，不自行实现转发或进程管理。

// 子模块声明
mod runtime;
mod shell_plan;

// 重新导出公共接口
pub use runtime::{CaptureSession, EmuError, Emulator, RouteInstaller};
pub use shell_plan::{ShellCmd, ShellPlan};
