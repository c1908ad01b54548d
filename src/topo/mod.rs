//! 预置拓扑构建
//!
//! 提供参数化的路由实验网构建与 JSON 描述文件支持。

pub mod routed_lan;
pub mod spec;
