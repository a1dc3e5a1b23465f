//! # TorchGNN
//!
//! `torch_gnn`用于在运行时搭建由具名模块（线性层、图卷积、激活、拼接、池化等）构成的计算图，
//! 对真实张量即时执行前向计算，并把同一个图导出为不依赖本库、可独立编译的 Rust 包
//! （运行时源码 + 模型代码 + 参数文件）。
//!

pub mod errors;
pub mod nn;
pub mod tensor;

#[cfg(test)]
mod utils;
