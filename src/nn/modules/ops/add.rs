use crate::nn::GraphError;
use crate::nn::modules::TraitModule;
use crate::tensor::Tensor;

/// 逐元素相加，两个输入形状必须完全一致
#[derive(Debug, Clone)]
pub struct Add {
    inputs: Vec<String>,
}

impl Add {
    pub fn new(a: &str, b: &str) -> Result<Self, GraphError> {
        Ok(Self {
            inputs: vec![a.to_string(), b.to_string()],
        })
    }
}

impl TraitModule for Add {
    fn operation(&self) -> &'static str {
        "Add"
    }

    fn inputs(&self) -> &[String] {
        &self.inputs
    }

    fn args(&self) -> Vec<String> {
        Vec::new()
    }

    fn infer_shape(&self, name: &str, inputs: &[&Tensor]) -> Result<Vec<usize>, GraphError> {
        let (a, b) = (inputs[0], inputs[1]);
        if !a.is_same_shape(b) {
            return Err(GraphError::ShapeMismatch {
                expected: a.shape().to_vec(),
                got: b.shape().to_vec(),
                message: format!("模块`{name}`（Add）的两个输入形状须一致"),
            });
        }
        Ok(a.shape().to_vec())
    }

    fn forward(
        &mut self,
        _name: &str,
        inputs: &[&Tensor],
        _out_shape: &[usize],
    ) -> Result<Tensor, GraphError> {
        Ok(Tensor::from_array(inputs[0].as_array() + inputs[1].as_array()))
    }
}
