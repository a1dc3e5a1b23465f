//! # 单元测试辅助
//!
//! 本模块仅在测试时编译
