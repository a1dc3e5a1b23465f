use crate::nn::modules::TraitModule;
use crate::nn::{DeclaredShape, GraphError};
use crate::tensor::Tensor;

/// 改变形状，数据顺序不变；目标形状可含一个通配维（-1）
#[derive(Debug, Clone)]
pub struct Reshape {
    inputs: Vec<String>,
    shape: DeclaredShape,
}

impl Reshape {
    pub fn new(x: &str, shape: &[i64]) -> Result<Self, GraphError> {
        Ok(Self {
            inputs: vec![x.to_string()],
            shape: DeclaredShape::new("Reshape", shape)?,
        })
    }

    pub fn target_shape(&self) -> &DeclaredShape {
        &self.shape
    }
}

impl TraitModule for Reshape {
    fn operation(&self) -> &'static str {
        "Reshape"
    }

    fn inputs(&self) -> &[String] {
        &self.inputs
    }

    fn args(&self) -> Vec<String> {
        vec![self.shape.to_literal()]
    }

    fn infer_shape(&self, name: &str, inputs: &[&Tensor]) -> Result<Vec<usize>, GraphError> {
        self.shape.resolve(name, inputs[0].size())
    }

    fn forward(
        &mut self,
        _name: &str,
        inputs: &[&Tensor],
        out_shape: &[usize],
    ) -> Result<Tensor, GraphError> {
        Ok(inputs[0].reshape(out_shape)?)
    }
}
