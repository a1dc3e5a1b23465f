/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : Graph 模块：模块图引擎的核心实现
 *
 * 公开 API：
 * - `ModelEngine`: 构图、即时前向计算与参数管理
 * - `ModuleRegistry`: 有序的模块注册表
 * - `GraphError` / `GraphWarning`: 错误与非致命警告
 */

mod engine;
mod error;
mod params;
mod registry;

pub use engine::ModelEngine;
pub use error::{GraphError, GraphWarning};
pub use params::StateDict;
pub use registry::ModuleRegistry;
