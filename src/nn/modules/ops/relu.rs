use crate::nn::GraphError;
use crate::nn::modules::TraitModule;
use crate::tensor::Tensor;

#[derive(Debug, Clone)]
pub struct ReLU {
    inputs: Vec<String>,
}

impl ReLU {
    pub fn new(x: &str) -> Result<Self, GraphError> {
        Ok(Self {
            inputs: vec![x.to_string()],
        })
    }
}

impl TraitModule for ReLU {
    fn operation(&self) -> &'static str {
        "ReLU"
    }

    fn inputs(&self) -> &[String] {
        &self.inputs
    }

    fn args(&self) -> Vec<String> {
        Vec::new()
    }

    fn infer_shape(&self, _name: &str, inputs: &[&Tensor]) -> Result<Vec<usize>, GraphError> {
        Ok(inputs[0].shape().to_vec())
    }

    fn forward(
        &mut self,
        _name: &str,
        inputs: &[&Tensor],
        _out_shape: &[usize],
    ) -> Result<Tensor, GraphError> {
        Ok(Tensor::from_array(inputs[0].as_array().mapv(|v| v.max(0.0))))
    }
}
