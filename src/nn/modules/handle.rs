/*
 * @Author       : 老董
 * @Date         : 2026-03-02
 * @Description  : ModuleHandle：包裹一个计算核，持有名称、已解析的输入、最近一次的输出与形状
 */

use std::path::Path;

use super::{ModuleType, TraitModule};
use crate::nn::{GraphError, GraphWarning, StateDict};
use crate::tensor::Tensor;

/// 模块在注册表中的位置（非拥有引用，目标由注册表持有）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub(crate) usize);

impl ModuleId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct ModuleHandle {
    id: ModuleId,
    name: String,
    raw: ModuleType,
    input_ids: Vec<ModuleId>,
    value: Option<Tensor>,
    shape: Vec<usize>,
}

impl ModuleHandle {
    pub(crate) fn new(id: ModuleId, name: String, raw: ModuleType, input_ids: Vec<ModuleId>) -> Self {
        Self {
            id,
            name,
            raw,
            input_ids,
            value: None,
            shape: Vec::new(),
        }
    }

    pub fn id(&self) -> ModuleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn raw(&self) -> &ModuleType {
        &self.raw
    }

    pub fn operation(&self) -> &'static str {
        self.raw.operation()
    }

    pub fn input_ids(&self) -> &[ModuleId] {
        &self.input_ids
    }

    /// 最近一次前向计算的输出
    pub fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    /// 最近一次推断的输出形状（尚未计算过时为空）
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn parameters(&self) -> &[super::Parameter] {
        self.raw.parameters()
    }

    // ========== 前向传播 ==========

    /// 为输入模块赋值
    pub(crate) fn feed(&mut self, data: &[f32]) -> Result<(), GraphError> {
        match &mut self.raw {
            ModuleType::Input(input) => input.assign(&self.name, data),
            _ => Err(GraphError::InvalidOperation(format!(
                "模块`{}`不是输入模块，不能直接赋值",
                self.name
            ))),
        }
    }

    pub fn infer_shape(&self, inputs: &[&Tensor]) -> Result<Vec<usize>, GraphError> {
        self.raw.infer_shape(&self.name, inputs)
    }

    /// 先推断形状，再计算输出
    pub(crate) fn execute(&mut self, inputs: &[&Tensor]) -> Result<(), GraphError> {
        let shape = self.raw.infer_shape(&self.name, inputs)?;
        let value = self.raw.forward(&self.name, inputs, &shape)?;
        self.shape = shape;
        self.value = Some(value);
        Ok(())
    }

    // ========== 参数 ==========

    pub(crate) fn set_parameter(&mut self, suffix: &str, data: &[f32]) -> Result<(), GraphError> {
        let name = &self.name;
        let operation = self.raw.operation();
        let params = self.raw.parameters_mut();
        if params.is_empty() {
            return Err(GraphError::InvalidOperation(format!(
                "模块`{name}`（{operation}）没有参数"
            )));
        }
        let param = params
            .iter_mut()
            .find(|p| p.suffix() == suffix)
            .ok_or_else(|| {
                GraphError::InvalidArgument(format!("模块`{name}`没有名为`{suffix}`的参数"))
            })?;
        param.set(name, data)
    }

    pub(crate) fn save_parameters(&self, dir: &Path) -> Result<(), GraphError> {
        for param in self.raw.parameters() {
            param.save(&self.name, dir)?;
        }
        Ok(())
    }

    pub(crate) fn load_parameters(
        &mut self,
        dir: &Path,
        warnings: &mut Vec<GraphWarning>,
    ) -> Result<(), GraphError> {
        let name = &self.name;
        for param in self.raw.parameters_mut() {
            if !param.load(name, dir)? {
                GraphWarning::MissingParameter {
                    module: name.clone(),
                    source: dir.join(param.file_name(name)).display().to_string(),
                }
                .emit(warnings);
            }
        }
        Ok(())
    }

    pub(crate) fn load_state_dict(
        &mut self,
        dict: &StateDict,
        warnings: &mut Vec<GraphWarning>,
    ) -> Result<(), GraphError> {
        let name = &self.name;
        for param in self.raw.parameters_mut() {
            let key = param.state_dict_key(name);
            match dict.get(&key) {
                Some(data) => param.set(name, data)?,
                None => GraphWarning::MissingParameter {
                    module: name.clone(),
                    source: key,
                }
                .emit(warnings),
            }
        }
        Ok(())
    }
}
