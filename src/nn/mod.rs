/*
 * @Author       : 老董
 * @Date         : 2026-03-02
 * @Description  : 负责模块图的构建、即时计算、参数管理，以及导出为独立的 Rust 包
 */

mod codegen;
mod descriptor;
mod graph;
mod modules;
mod shape;
pub mod state_dict;

pub use codegen::SaveOutcome;
pub use descriptor::{GraphDescriptor, InputDescriptor, ModuleDescriptor, ParameterDescriptor};
pub use graph::{GraphError, GraphWarning, ModelEngine, ModuleRegistry, StateDict};
pub use modules::{
    Add, Cat, GCNConv, GlobalMeanPool, Input, Linear, ModuleHandle, ModuleId, ModuleType,
    Parameter, ReLU, Reshape, Softmax, TraitModule,
};
pub use shape::{DeclaredShape, WILDCARD};

#[cfg(test)]
mod tests;
