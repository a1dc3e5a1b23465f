/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : ModelEngine 参数管理：手动设置、二进制文件读写、state dict 绑定
 *
 * 参数的最终取值以最后一次执行的 set / load_parameters / load_state_dict 为准。
 * 缺失的文件或键只产生 MissingParameter 警告，不会中断加载。
 * 加载按注册顺序进行，遇到错误即停止：之前的模块已更新，已产生的警告均已记录。
 */

use std::collections::HashMap;
use std::path::Path;

use super::{GraphError, ModelEngine};
use crate::tensor::Tensor;

/// 外部 state dict：`{模块名}.{参数键}` -> 行优先数据
pub type StateDict = HashMap<String, Vec<f32>>;

impl ModelEngine {
    /// 设置模块的权重（`weight`或`lin_weight`，即模块的第一个参数）
    pub fn set_weights(&mut self, module: &str, data: &[f32]) -> Result<(), GraphError> {
        let suffix = self.parameter_suffix(module, 0)?;
        self.set_parameter(module, suffix, data)
    }

    /// 设置模块的偏置
    pub fn set_biases(&mut self, module: &str, data: &[f32]) -> Result<(), GraphError> {
        self.set_parameter(module, "bias", data)
    }

    /// 按文件后缀设置任意参数
    pub fn set_parameter(
        &mut self,
        module: &str,
        suffix: &str,
        data: &[f32],
    ) -> Result<(), GraphError> {
        self.registry_mut()
            .get_mut(module)
            .ok_or_else(|| GraphError::ModuleNotFound(module.to_string()))?
            .set_parameter(suffix, data)
    }

    /// 按文件后缀读取参数
    pub fn parameter(&self, module: &str, suffix: &str) -> Result<&Tensor, GraphError> {
        self.module(module)?
            .parameters()
            .iter()
            .find(|p| p.suffix() == suffix)
            .map(|p| p.value())
            .ok_or_else(|| {
                GraphError::InvalidArgument(format!("模块`{module}`没有名为`{suffix}`的参数"))
            })
    }

    fn parameter_suffix(&self, module: &str, index: usize) -> Result<&'static str, GraphError> {
        let handle = self.module(module)?;
        handle
            .parameters()
            .get(index)
            .map(|p| p.suffix())
            .ok_or_else(|| {
                GraphError::InvalidOperation(format!(
                    "模块`{module}`（{}）没有参数",
                    handle.operation()
                ))
            })
    }

    // ========== 二进制文件 ==========

    /// 从`params_dir()`加载所有有状态模块的参数
    pub fn load_parameters(&mut self) -> Result<(), GraphError> {
        let dir = self.params_dir().to_path_buf();
        self.load_parameters_from(dir)
    }

    pub fn load_parameters_from(&mut self, dir: impl AsRef<Path>) -> Result<(), GraphError> {
        let dir = dir.as_ref();
        let (registry, warnings) = self.registry_and_warnings_mut();
        for module in registry.modules_mut() {
            module.load_parameters(dir, warnings)?;
        }
        Ok(())
    }

    /// 把所有有状态模块的参数写入`dir`（不存在时自动创建）
    pub fn save_parameters(&self, dir: impl AsRef<Path>) -> Result<(), GraphError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| {
            GraphError::Io(format!("无法创建参数目录{}: {e}", dir.display()))
        })?;
        for module in self.registry().modules() {
            module.save_parameters(dir)?;
        }
        Ok(())
    }

    // ========== state dict ==========

    pub fn load_state_dict(&mut self, dict: &StateDict) -> Result<(), GraphError> {
        let (registry, warnings) = self.registry_and_warnings_mut();
        for module in registry.modules_mut() {
            module.load_state_dict(dict, warnings)?;
        }
        Ok(())
    }
}
