/*
 * @Author       : 老董
 * @Date         : 2026-03-02
 * @Description  : Input 模块：模型的外部输入，由引擎在每次前向前赋值
 */

use crate::nn::modules::TraitModule;
use crate::nn::{DeclaredShape, GraphError};
use crate::tensor::Tensor;

#[derive(Debug, Clone)]
pub struct Input {
    shape: DeclaredShape,
    value: Option<Tensor>,
}

impl Input {
    pub fn new(shape: &[i64]) -> Result<Self, GraphError> {
        Ok(Self {
            shape: DeclaredShape::new("Input", shape)?,
            value: None,
        })
    }

    pub fn declared_shape(&self) -> &DeclaredShape {
        &self.shape
    }

    /// 按声明形状（解析通配维后）保存本次的输入数据
    pub(crate) fn assign(&mut self, name: &str, data: &[f32]) -> Result<(), GraphError> {
        let dims = self.shape.resolve(name, data.len())?;
        self.value = Some(Tensor::try_new(data, &dims)?);
        Ok(())
    }
}

impl TraitModule for Input {
    fn operation(&self) -> &'static str {
        "Input"
    }

    fn inputs(&self) -> &[String] {
        &[]
    }

    fn args(&self) -> Vec<String> {
        vec![self.shape.to_literal()]
    }

    fn infer_shape(&self, name: &str, _inputs: &[&Tensor]) -> Result<Vec<usize>, GraphError> {
        self.value
            .as_ref()
            .map(|v| v.shape().to_vec())
            .ok_or_else(|| GraphError::InvalidInput {
                module: name.to_string(),
                message: "尚未赋值".to_string(),
            })
    }

    fn forward(
        &mut self,
        name: &str,
        _inputs: &[&Tensor],
        _out_shape: &[usize],
    ) -> Result<Tensor, GraphError> {
        self.value.clone().ok_or_else(|| GraphError::InvalidInput {
            module: name.to_string(),
            message: "尚未赋值".to_string(),
        })
    }
}
